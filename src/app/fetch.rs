use std::future::Future;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// A fetch started when a form mounts.
///
/// The result is delivered over a oneshot channel. Dropping the owner
/// aborts the task and closes the channel, so a late result is discarded
/// instead of landing in a form that no longer exists.
pub struct MountedFetch<T> {
    rx: Option<oneshot::Receiver<T>>,
    task: JoinHandle<()>,
    value: T,
}

impl<T: Default + Send + 'static> MountedFetch<T> {
    pub fn spawn<F>(fetch: F) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let task = tokio::spawn(async move {
            let value = fetch.await;
            // Nobody is listening once the form is gone.
            let _ = tx.send(value);
        });

        Self {
            rx: Some(rx),
            task,
            value: T::default(),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.rx.is_some()
    }

    /// Picks up the result without waiting. Returns true when the result
    /// arrived on this call.
    pub fn poll(&mut self) -> bool {
        let Some(rx) = self.rx.as_mut() else {
            return false;
        };

        match rx.try_recv() {
            Ok(value) => {
                self.value = value;
                self.rx = None;
                true
            }
            Err(oneshot::error::TryRecvError::Empty) => false,
            Err(oneshot::error::TryRecvError::Closed) => {
                self.rx = None;
                true
            }
        }
    }

    /// Waits for the result if it has not arrived yet.
    pub async fn ready(&mut self) -> &T {
        if let Some(rx) = self.rx.take() {
            self.value = rx.await.unwrap_or_default();
        }
        &self.value
    }

    pub fn value(&self) -> &T {
        &self.value
    }
}

impl<T> Drop for MountedFetch<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}
