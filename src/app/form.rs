use crate::api::client::UgcBackend;
use crate::api::models::Peptide;
use crate::app::draft::Draft;
use crate::app::fetch::MountedFetch;
use crate::app::search::filter_catalog;
use crate::app::status::{SubmitState, SubmitStatus};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{info, warn};

/// The stack suggestion workflow for one session: compound search and
/// selection, the draft, and its submission to the moderation queue.
pub struct StackSuggestionForm {
    backend: Arc<dyn UgcBackend>,
    ugc_slug: String,
    catalog: MountedFetch<Vec<Peptide>>,
    draft: Draft,
    status: SubmitStatus,
}

impl StackSuggestionForm {
    /// Creates the form and starts loading the compound list. Must be called
    /// inside a tokio runtime.
    pub fn mount(backend: Arc<dyn UgcBackend>, ugc_slug: impl Into<String>) -> Self {
        let fetcher = Arc::clone(&backend);
        let catalog = MountedFetch::spawn(async move {
            match fetcher.fetch_peptides().await {
                Ok(peptides) => peptides,
                Err(e) => {
                    warn!(error = %e, "compound list unavailable");
                    Vec::new()
                }
            }
        });

        Self {
            backend,
            ugc_slug: ugc_slug.into(),
            catalog,
            draft: Draft::default(),
            status: SubmitStatus::new(),
        }
    }

    pub fn with_ok_delay(mut self, delay: Duration) -> Self {
        self.status = SubmitStatus::with_delay(delay);
        self
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn set_username(&mut self, username: impl Into<String>) {
        self.draft.username = username.into();
    }

    pub fn set_stack_name(&mut self, name: impl Into<String>) {
        self.draft.stack_name = name.into();
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.draft.query = query.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.draft.description = description.into();
    }

    pub fn set_include_outcomes(&mut self, include: bool) {
        self.draft.include_outcomes = include;
    }

    pub fn set_acknowledged(&mut self, acknowledged: bool) {
        self.draft.acknowledged_no_dosing = acknowledged;
    }

    pub fn is_loading(&mut self) -> bool {
        self.catalog.poll();
        self.catalog.is_loading()
    }

    /// Waits for the compound list and returns how many compounds it holds.
    pub async fn wait_for_catalog(&mut self) -> usize {
        self.catalog.ready().await.len()
    }

    /// The compound list as far as it has arrived. Empty while loading.
    pub fn catalog(&mut self) -> &[Peptide] {
        self.catalog.poll();
        self.catalog.value()
    }

    /// Compounds matching the current query.
    pub fn suggestions(&mut self) -> Vec<&Peptide> {
        self.catalog.poll();
        filter_catalog(self.catalog.value(), &self.draft.query)
    }

    /// Adds `peptide` to the selection and clears the query. Nothing changes
    /// if the slug is already selected.
    pub fn select(&mut self, peptide: Peptide) -> bool {
        if !self.draft.selection.add(peptide) {
            return false;
        }
        self.draft.query.clear();
        true
    }

    /// Selects a catalog compound by slug.
    pub fn select_slug(&mut self, slug: &str) -> bool {
        let slug = slug.trim();
        self.catalog.poll();
        let found = self
            .catalog
            .value()
            .iter()
            .find(|p| p.slug.eq_ignore_ascii_case(slug))
            .cloned();

        match found {
            Some(peptide) => self.select(peptide),
            None => false,
        }
    }

    pub fn remove(&mut self, slug: &str) -> bool {
        self.draft.selection.remove(slug.trim())
    }

    /// The outcomes draft, when the preview toggle is on.
    pub fn outcomes_preview(&self) -> Option<String> {
        self.draft
            .include_outcomes
            .then(|| self.draft.outcomes_draft())
    }

    pub fn submission_text(&self) -> String {
        self.draft.submission_text()
    }

    pub fn state(&self) -> SubmitState {
        self.status.current()
    }

    pub fn subscribe(&self) -> watch::Receiver<SubmitState> {
        self.status.subscribe()
    }

    /// Whether the submit trigger is available.
    pub fn can_submit(&self) -> bool {
        !self.status.current().is_submitting()
    }

    /// Validates the draft and, if it passes, sends it for moderation.
    ///
    /// Validation failures never reach the network. On success the draft is
    /// cleared; on any failure it is kept so the user can fix and retry.
    pub async fn submit(&mut self) -> SubmitState {
        if let Err(e) = self.draft.validate() {
            self.status.fail(e.to_string());
            return self.status.current();
        }

        let payload = self.draft.to_payload(&self.ugc_slug);
        self.status.begin();
        info!(
            slug = %payload.slug,
            compounds = self.draft.selection.len(),
            "submitting stack suggestion"
        );

        match self.backend.submit(&payload).await {
            Ok(()) => {
                info!("stack suggestion accepted for review");
                self.draft = Draft::default();
                self.status.succeed();
            }
            Err(e) => {
                warn!(error = %e, "stack suggestion not accepted");
                self.status.fail(e.user_message("submission"));
            }
        }

        self.status.current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::MockUgcBackend;
    use crate::api::models::{EntityType, RejectionCode};
    use crate::utils::error::{ApiError, SubmitError, ACK_MESSAGE, GENERIC_SUBMIT_MESSAGE};
    use assert_matches::assert_matches;

    fn catalog() -> Vec<Peptide> {
        vec![
            Peptide::new("bpc-157", "BPC-157"),
            Peptide::new("tb-500", "TB-500"),
            Peptide::new("ghk-cu", "GHK-Cu"),
        ]
    }

    fn backend_with_catalog() -> MockUgcBackend {
        let mut backend = MockUgcBackend::new();
        backend
            .expect_fetch_peptides()
            .returning(|| Ok(catalog()));
        backend
    }

    async fn mounted(backend: MockUgcBackend) -> StackSuggestionForm {
        let mut form = StackSuggestionForm::mount(Arc::new(backend), "__global__");
        form.wait_for_catalog().await;
        form
    }

    fn fill(form: &mut StackSuggestionForm) {
        form.set_username("alice");
        form.set_stack_name("Recovery Combo");
        assert!(form.select_slug("bpc-157"));
        assert!(form.select_slug("tb-500"));
        form.set_description("trying to support joint recovery and sleep");
        form.set_include_outcomes(true);
        form.set_acknowledged(true);
    }

    #[tokio::test]
    async fn test_fetch_failure_leaves_empty_catalog() {
        let mut backend = MockUgcBackend::new();
        backend.expect_fetch_peptides().returning(|| {
            Err(ApiError::Status {
                url: "http://localhost/api/content/peptides".to_string(),
                status: 500,
            })
        });

        let mut form = mounted(backend).await;
        assert!(form.catalog().is_empty());
        assert!(form.suggestions().is_empty());
    }

    #[tokio::test]
    async fn test_selecting_clears_query_and_dedups() {
        let mut form = mounted(backend_with_catalog()).await;
        form.set_query("tb");
        assert_eq!(form.suggestions().len(), 1);

        assert!(form.select_slug("tb-500"));
        assert_eq!(form.draft().query, "");

        form.set_query("tb");
        assert!(!form.select_slug("tb-500"));
        assert_eq!(form.draft().selection.len(), 1);
        assert_eq!(form.draft().query, "tb");
    }

    #[tokio::test]
    async fn test_unknown_slug_is_not_selected() {
        let mut form = mounted(backend_with_catalog()).await;
        assert!(!form.select_slug("semaglutide"));
        assert!(form.draft().selection.is_empty());
    }

    #[tokio::test]
    async fn test_remove_touches_only_selection() {
        let mut form = mounted(backend_with_catalog()).await;
        fill(&mut form);
        let before = form.draft().clone();

        assert!(form.remove("bpc-157"));
        let after = form.draft();
        assert_eq!(after.selection.len(), 1);
        assert_eq!(after.username, before.username);
        assert_eq!(after.description, before.description);
        assert_eq!(after.include_outcomes, before.include_outcomes);
    }

    #[tokio::test]
    async fn test_validation_failure_never_calls_backend() {
        let mut backend = backend_with_catalog();
        backend.expect_submit().never();

        let mut form = mounted(backend).await;
        form.set_description("something");

        let state = form.submit().await;
        assert_eq!(state, SubmitState::Error("Username is required.".to_string()));

        // Same invalid draft, same answer.
        assert_eq!(form.submit().await, state);
    }

    #[tokio::test]
    async fn test_successful_submit_resets_draft() {
        let mut backend = backend_with_catalog();
        backend
            .expect_submit()
            .withf(|payload| {
                payload.entity_type == EntityType::Stack
                    && payload.slug == "__global__"
                    && payload.username == "alice"
                    && payload.ack_no_dosing
                    && payload.text.contains("Peptides: BPC-157 (bpc-157), TB-500 (tb-500)")
            })
            .times(1)
            .returning(|_| Ok(()));

        let mut form = mounted(backend).await;
        fill(&mut form);
        form.set_query("ghk");

        assert_eq!(form.submit().await, SubmitState::Ok);
        assert_eq!(form.draft(), &Draft::default());
    }

    #[tokio::test]
    async fn test_rejection_keeps_draft() {
        let mut backend = backend_with_catalog();
        backend
            .expect_submit()
            .returning(|_| Err(SubmitError::Rejected(RejectionCode::AckRequired)));

        let mut form = mounted(backend).await;
        fill(&mut form);
        let before = form.draft().clone();

        assert_eq!(form.submit().await, SubmitState::Error(ACK_MESSAGE.to_string()));
        assert_eq!(form.draft(), &before);
    }

    #[tokio::test]
    async fn test_transport_failure_uses_generic_message() {
        let mut backend = backend_with_catalog();
        backend
            .expect_submit()
            .returning(|_| Err(SubmitError::Transport("connection reset".to_string())));

        let mut form = mounted(backend).await;
        fill(&mut form);

        assert_matches!(
            form.submit().await,
            SubmitState::Error(message) if message == GENERIC_SUBMIT_MESSAGE
        );
        assert_eq!(form.draft().username, "alice");
    }

    #[tokio::test]
    async fn test_outcomes_preview_follows_toggle() {
        let mut form = mounted(backend_with_catalog()).await;
        fill(&mut form);

        form.set_include_outcomes(false);
        assert_eq!(form.outcomes_preview(), None);

        form.set_include_outcomes(true);
        let preview = form.outcomes_preview().unwrap();
        assert!(preview.starts_with("Draft summary for \"Recovery Combo\""));
    }

    #[tokio::test(start_paused = true)]
    async fn test_catalog_is_picked_up_without_waiting() {
        let mut form = StackSuggestionForm::mount(Arc::new(backend_with_catalog()), "__global__");
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(form.catalog().len(), 3);
        form.set_query("bpc");
        assert_eq!(form.suggestions().len(), 1);
        assert!(form.select_slug("tb-500"));
        assert_eq!(form.draft().selection.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_can_submit_while_catalog_loads() {
        let mut backend = MockUgcBackend::new();
        backend.expect_fetch_peptides().returning(|| Ok(catalog()));
        let mut form = StackSuggestionForm::mount(Arc::new(backend), "__global__");

        assert!(form.is_loading());
        assert!(form.can_submit());
        form.wait_for_catalog().await;
        assert!(form.can_submit());
    }

    #[tokio::test(start_paused = true)]
    async fn test_subscriber_sees_ok_then_idle() {
        let mut backend = backend_with_catalog();
        backend.expect_submit().returning(|_| Ok(()));

        let mut form = StackSuggestionForm::mount(Arc::new(backend), "__global__")
            .with_ok_delay(Duration::from_millis(300));
        form.wait_for_catalog().await;
        fill(&mut form);
        let mut rx = form.subscribe();

        assert_eq!(form.submit().await, SubmitState::Ok);
        assert_eq!(*rx.borrow_and_update(), SubmitState::Ok);

        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), SubmitState::Idle);
        assert_eq!(form.state(), SubmitState::Idle);
    }
}
