//! Global stop signal observable at every suspension point.

use std::time::Duration;

use thiserror::Error;
use tokio::sync::watch;

/// Returned by a wait that was interrupted by the stop signal.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("operation cancelled by stop signal")]
pub struct Cancelled;

/// Owner side of the stop signal.
#[derive(Debug)]
pub struct StopHandle {
    tx: watch::Sender<bool>,
}

impl StopHandle {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx }
    }

    /// A receiver that observes this handle.
    #[must_use]
    pub fn signal(&self) -> StopSignal {
        StopSignal {
            rx: self.tx.subscribe(),
        }
    }

    /// Ask every worker to stop. Idempotent.
    pub fn stop(&self) {
        self.tx.send_replace(true);
    }
}

impl Default for StopHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Cloneable view of the stop state.
#[derive(Debug, Clone)]
pub struct StopSignal {
    rx: watch::Receiver<bool>,
}

impl StopSignal {
    /// A signal that never fires.
    #[must_use]
    pub fn never() -> Self {
        let (_tx, rx) = watch::channel(false);
        Self { rx }
    }

    #[must_use]
    pub fn is_stopped(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once stop is requested. Pends forever if the handle is gone
    /// without having stopped.
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        if rx.wait_for(|stopped| *stopped).await.is_err() {
            std::future::pending::<()>().await;
        }
    }

    /// Sleep for `duration` unless stop is requested first.
    ///
    /// # Errors
    ///
    /// Returns [`Cancelled`] when the stop signal fires during the wait.
    pub async fn sleep(&self, duration: Duration) -> Result<(), Cancelled> {
        if duration.is_zero() {
            return if self.is_stopped() { Err(Cancelled) } else { Ok(()) };
        }
        tokio::select! {
            biased;
            () = self.cancelled() => Err(Cancelled),
            () = tokio::time::sleep(duration) => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stop_wakes_waiters() {
        let handle = StopHandle::new();
        let signal = handle.signal();
        assert!(!signal.is_stopped());

        let waiter = tokio::spawn({
            let signal = signal.clone();
            async move { signal.sleep(Duration::from_secs(30)).await }
        });
        handle.stop();

        let outcome = tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter should wake promptly")
            .unwrap();
        assert_eq!(outcome, Err(Cancelled));
        assert!(signal.is_stopped());
    }

    #[tokio::test]
    async fn never_signal_lets_sleep_finish() {
        let signal = StopSignal::never();
        assert_eq!(signal.sleep(Duration::from_millis(5)).await, Ok(()));
        assert!(!signal.is_stopped());
    }

    #[tokio::test]
    async fn signal_taken_after_stop_is_already_stopped() {
        let handle = StopHandle::new();
        handle.stop();
        let signal = handle.signal();
        assert!(signal.is_stopped());
        signal.cancelled().await;
    }
}
