//! Community notes attached to a single compound page.
//!
//! Approved notes are listed read-only; new notes go through the same
//! moderation endpoint as stack suggestions and only show up once approved.

use crate::api::client::UgcBackend;
use crate::api::models::{CommunityPost, EntityType, SubmissionPayload};
use crate::app::fetch::MountedFetch;
use crate::app::status::{SubmitState, SubmitStatus};
use crate::utils::error::ValidationError;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{info, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteDraft {
    pub username: String,
    pub text: String,
    pub acknowledged_no_dosing: bool,
}

impl NoteDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.username.trim().is_empty() {
            return Err(ValidationError::MissingUsername);
        }
        if self.text.trim().is_empty() {
            return Err(ValidationError::MissingNoteText);
        }
        if !self.acknowledged_no_dosing {
            return Err(ValidationError::MissingAcknowledgement);
        }
        Ok(())
    }
}

pub struct CommunityNotes {
    backend: Arc<dyn UgcBackend>,
    entity_type: EntityType,
    slug: String,
    posts: MountedFetch<Vec<CommunityPost>>,
    draft: NoteDraft,
    status: SubmitStatus,
}

impl CommunityNotes {
    /// Starts loading the approved notes for `(entity_type, slug)`.
    pub fn mount(backend: Arc<dyn UgcBackend>, entity_type: EntityType, slug: impl Into<String>) -> Self {
        let slug = slug.into();
        let fetcher = Arc::clone(&backend);
        let page = slug.clone();
        let posts = MountedFetch::spawn(async move {
            fetcher
                .list_posts(entity_type, &page)
                .await
                .unwrap_or_else(|e| {
                    warn!(error = %e, %entity_type, slug = %page, "community notes unavailable");
                    Vec::new()
                })
        });

        Self {
            backend,
            entity_type,
            slug,
            posts,
            draft: NoteDraft::default(),
            status: SubmitStatus::new(),
        }
    }

    pub fn with_ok_delay(mut self, delay: Duration) -> Self {
        self.status = SubmitStatus::with_delay(delay);
        self
    }

    pub fn is_loading(&mut self) -> bool {
        self.posts.poll();
        self.posts.is_loading()
    }

    pub async fn wait_for_posts(&mut self) -> &[CommunityPost] {
        self.posts.ready().await
    }

    pub fn posts(&self) -> &[CommunityPost] {
        self.posts.value()
    }

    pub fn draft(&self) -> &NoteDraft {
        &self.draft
    }

    pub fn set_username(&mut self, username: impl Into<String>) {
        self.draft.username = username.into();
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.draft.text = text.into();
    }

    pub fn set_acknowledged(&mut self, acknowledged: bool) {
        self.draft.acknowledged_no_dosing = acknowledged;
    }

    pub fn state(&self) -> SubmitState {
        self.status.current()
    }

    pub fn subscribe(&self) -> watch::Receiver<SubmitState> {
        self.status.subscribe()
    }

    pub async fn submit(&mut self) -> SubmitState {
        if let Err(e) = self.draft.validate() {
            self.status.fail(e.to_string());
            return self.status.current();
        }

        let payload = SubmissionPayload {
            entity_type: self.entity_type,
            slug: self.slug.clone(),
            username: self.draft.username.trim().to_string(),
            text: self.draft.text.trim().to_string(),
            ack_no_dosing: self.draft.acknowledged_no_dosing,
        };
        self.status.begin();

        match self.backend.submit(&payload).await {
            Ok(()) => {
                info!(entity_type = %self.entity_type, slug = %self.slug, "note sent for review");
                self.draft = NoteDraft::default();
                self.status.succeed();
            }
            Err(e) => {
                warn!(error = %e, "note not accepted");
                self.status.fail(e.user_message("note"));
            }
        }

        self.status.current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::MockUgcBackend;
    use crate::api::models::RejectionCode;
    use crate::utils::error::SubmitError;

    fn post(id: &str) -> CommunityPost {
        CommunityPost {
            id: id.to_string(),
            username: "bob".to_string(),
            text: "Useful summary of the evidence.".to_string(),
            created_at: None,
        }
    }

    #[tokio::test]
    async fn test_posts_load_for_page() {
        let mut backend = MockUgcBackend::new();
        backend
            .expect_list_posts()
            .withf(|entity_type, slug| *entity_type == EntityType::Peptide && slug == "bpc-157")
            .returning(|_, _| Ok(vec![post("p1"), post("p2")]));

        let mut notes = CommunityNotes::mount(Arc::new(backend), EntityType::Peptide, "bpc-157");
        assert_eq!(notes.wait_for_posts().await.len(), 2);
    }

    #[tokio::test]
    async fn test_missing_text_is_reported_after_username() {
        let mut backend = MockUgcBackend::new();
        backend.expect_list_posts().returning(|_, _| Ok(Vec::new()));
        backend.expect_submit().never();

        let mut notes = CommunityNotes::mount(Arc::new(backend), EntityType::Peptide, "kpv");
        notes.set_username("carol");
        notes.set_acknowledged(true);

        assert_eq!(
            notes.submit().await,
            SubmitState::Error("Note text is required.".to_string())
        );
    }

    #[tokio::test]
    async fn test_success_resets_draft_and_keeps_posts() {
        let mut backend = MockUgcBackend::new();
        backend
            .expect_list_posts()
            .returning(|_, _| Ok(vec![post("p1")]));
        backend
            .expect_submit()
            .withf(|payload| {
                payload.entity_type == EntityType::Blend
                    && payload.slug == "wolverine"
                    && payload.username == "carol"
                    && payload.text == "Clear write-up."
            })
            .times(1)
            .returning(|_| Ok(()));

        let mut notes = CommunityNotes::mount(Arc::new(backend), EntityType::Blend, "wolverine");
        notes.wait_for_posts().await;
        notes.set_username(" carol ");
        notes.set_text("Clear write-up. ");
        notes.set_acknowledged(true);

        assert_eq!(notes.submit().await, SubmitState::Ok);
        assert_eq!(notes.draft(), &NoteDraft::default());
        assert_eq!(notes.posts().len(), 1);
    }

    #[tokio::test]
    async fn test_dosing_rejection_names_the_note() {
        let mut backend = MockUgcBackend::new();
        backend.expect_list_posts().returning(|_, _| Ok(Vec::new()));
        backend
            .expect_submit()
            .returning(|_| Err(SubmitError::Rejected(RejectionCode::ContainsDosingOrProtocol)));

        let mut notes = CommunityNotes::mount(Arc::new(backend), EntityType::Peptide, "kpv");
        notes.set_username("carol");
        notes.set_text("Some text");
        notes.set_acknowledged(true);

        assert_eq!(
            notes.submit().await,
            SubmitState::Error(
                "Looks like your note contains dosing/protocol language. Remove it to submit."
                    .to_string()
            )
        );
        assert_eq!(notes.draft().text, "Some text");
    }

    #[tokio::test(start_paused = true)]
    async fn test_subscriber_sees_note_ok_revert_to_idle() {
        let mut backend = MockUgcBackend::new();
        backend.expect_list_posts().returning(|_, _| Ok(Vec::new()));
        backend.expect_submit().times(1).returning(|_| Ok(()));

        let mut notes = CommunityNotes::mount(Arc::new(backend), EntityType::Stack, "recovery-combo")
            .with_ok_delay(Duration::from_millis(200));
        assert!(notes.is_loading());
        notes.wait_for_posts().await;
        assert!(!notes.is_loading());

        notes.set_username("carol");
        notes.set_text("Worth reading alongside the BPC-157 page.");
        notes.set_acknowledged(true);
        let mut rx = notes.subscribe();

        assert_eq!(notes.submit().await, SubmitState::Ok);
        assert_eq!(*rx.borrow_and_update(), SubmitState::Ok);

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(notes.state(), SubmitState::Ok);

        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), SubmitState::Idle);
    }
}
