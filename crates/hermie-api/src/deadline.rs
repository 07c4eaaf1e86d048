// Scoped request deadline.
//
// Arming spawns a timer task that cancels a token when it fires. Dropping
// the guard aborts the timer, so every exit path out of a fetch (success,
// HTTP error, decode error, timeout, or the caller dropping the future)
// disarms it.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::{CancellationToken, WaitForCancellationFuture};

/// An armed, cancellable timer bound to the lifetime of one request.
pub(crate) struct Deadline {
    after: Duration,
    cancel: CancellationToken,
    timer: JoinHandle<()>,
}

impl Deadline {
    /// Start the timer. Must be called from within a Tokio runtime.
    pub(crate) fn arm(after: Duration) -> Self {
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let timer = tokio::spawn(async move {
            tokio::time::sleep(after).await;
            token.cancel();
        });
        Self {
            after,
            cancel,
            timer,
        }
    }

    /// Resolves once the deadline has fired.
    pub(crate) fn expired(&self) -> WaitForCancellationFuture<'_> {
        self.cancel.cancelled()
    }

    /// The configured deadline.
    pub(crate) fn after(&self) -> Duration {
        self.after
    }

    #[cfg(test)]
    fn token(&self) -> CancellationToken {
        self.cancel.clone()
    }
}

impl Drop for Deadline {
    fn drop(&mut self) {
        self.timer.abort();
    }
}
