//! Submission status shared by the stack and notes forms.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// How long `Ok` stays visible before reverting to `Idle`.
pub const OK_DISPLAY_DELAY: Duration = Duration::from_millis(2500);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SubmitState {
    #[default]
    Idle,
    Submitting,
    Ok,
    Error(String),
}

impl SubmitState {
    pub fn is_submitting(&self) -> bool {
        matches!(self, SubmitState::Submitting)
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            SubmitState::Error(message) => Some(message),
            _ => None,
        }
    }
}

/// Owns the current [`SubmitState`] and the pending `Ok -> Idle` revert.
///
/// The revert task is aborted whenever the state moves on and when the
/// status is dropped, so it can never fire into a newer submission or a
/// torn-down form.
pub struct SubmitStatus {
    state: Arc<watch::Sender<SubmitState>>,
    revert: Option<JoinHandle<()>>,
    ok_delay: Duration,
}

impl SubmitStatus {
    pub fn new() -> Self {
        Self::with_delay(OK_DISPLAY_DELAY)
    }

    pub fn with_delay(ok_delay: Duration) -> Self {
        let (tx, _rx) = watch::channel(SubmitState::Idle);
        Self {
            state: Arc::new(tx),
            revert: None,
            ok_delay,
        }
    }

    pub fn current(&self) -> SubmitState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SubmitState> {
        self.state.subscribe()
    }

    pub fn begin(&mut self) {
        self.set(SubmitState::Submitting);
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.set(SubmitState::Error(message.into()));
    }

    /// Moves to `Ok` and schedules the revert to `Idle`. Needs a tokio
    /// runtime.
    pub fn succeed(&mut self) {
        self.set(SubmitState::Ok);

        let state = Arc::clone(&self.state);
        let delay = self.ok_delay;
        self.revert = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            state.send_if_modified(|current| {
                if *current == SubmitState::Ok {
                    *current = SubmitState::Idle;
                    true
                } else {
                    false
                }
            });
        }));
    }

    fn set(&mut self, next: SubmitState) {
        self.cancel_revert();
        self.state.send_replace(next);
    }

    fn cancel_revert(&mut self) {
        if let Some(handle) = self.revert.take() {
            handle.abort();
        }
    }
}

impl Default for SubmitStatus {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for SubmitStatus {
    fn drop(&mut self) {
        self.cancel_revert();
    }
}
