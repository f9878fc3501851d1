use std::future::Future;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Runs an action once input has been quiet for `delay`. Scheduling again
/// before the delay elapses drops the previously scheduled action.
pub struct Debouncer {
    delay: Duration,
    pending: Mutex<CancellationToken>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(CancellationToken::new()),
        }
    }

    pub fn schedule<F>(&self, action: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let token = {
            let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
            pending.cancel();
            *pending = CancellationToken::new();
            pending.clone()
        };

        let delay = self.delay;
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(delay) => action.await,
            }
        });
    }
}
