//! Per-source request pacing.

use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::Instant;

use crate::application::pipeline::stop::{Cancelled, StopSignal};

/// Spaces physical requests to a single source.
///
/// Every acquisition reserves a start slot at least `delay` after the
/// previous one. The returned [`PaceGuard`] pushes the next free slot to
/// `delay` after the request finished when it is dropped, so slow or failed
/// requests still leave the source a full pacing window.
#[derive(Debug)]
pub struct Pacer {
    next_free: Mutex<Instant>,
}

impl Pacer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_free: Mutex::new(Instant::now()),
        }
    }

    /// Wait for this caller's slot, then hold it until the guard drops.
    ///
    /// # Errors
    ///
    /// Returns [`Cancelled`] when `stop` fires while waiting.
    pub async fn acquire(
        &self,
        delay: Duration,
        stop: &StopSignal,
    ) -> Result<PaceGuard<'_>, Cancelled> {
        let start = {
            let mut next_free = self.next_free.lock();
            let start = (*next_free).max(Instant::now());
            *next_free = start + delay;
            start
        };

        if start > Instant::now() {
            tokio::select! {
                biased;
                () = stop.cancelled() => return Err(Cancelled),
                () = tokio::time::sleep_until(start) => {}
            }
        } else if stop.is_stopped() {
            return Err(Cancelled);
        }

        Ok(PaceGuard { pacer: self, delay })
    }

    /// Earliest instant the next acquisition may start.
    #[must_use]
    pub fn next_free(&self) -> Instant {
        *self.next_free.lock()
    }

    fn release(&self, delay: Duration) {
        let mut next_free = self.next_free.lock();
        let after = Instant::now() + delay;
        if after > *next_free {
            *next_free = after;
        }
    }
}

impl Default for Pacer {
    fn default() -> Self {
        Self::new()
    }
}

/// Held for the duration of one physical request.
#[derive(Debug)]
pub struct PaceGuard<'a> {
    pacer: &'a Pacer,
    delay: Duration,
}

impl PaceGuard<'_> {
    /// Lengthen the window left after this request, e.g. for a retry backoff.
    pub fn extend(&mut self, delay: Duration) {
        self.delay = self.delay.max(delay);
    }

    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }
}

impl Drop for PaceGuard<'_> {
    fn drop(&mut self) {
        self.pacer.release(self.delay);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::pipeline::stop::StopHandle;

    #[tokio::test]
    async fn consecutive_acquisitions_are_spaced() {
        let pacer = Pacer::new();
        let stop = StopSignal::never();
        let delay = Duration::from_millis(40);

        let started = Instant::now();
        drop(pacer.acquire(delay, &stop).await.unwrap());
        drop(pacer.acquire(delay, &stop).await.unwrap());
        assert!(started.elapsed() >= delay);
    }

    #[tokio::test]
    async fn guard_drop_advances_slot_past_request_end() {
        let pacer = Pacer::new();
        let stop = StopSignal::never();
        let mut guard = pacer.acquire(Duration::ZERO, &stop).await.unwrap();
        guard.extend(Duration::from_secs(60));
        drop(guard);
        assert!(pacer.next_free() >= Instant::now() + Duration::from_secs(59));
    }

    #[tokio::test]
    async fn waiting_for_slot_is_cancellable() {
        let pacer = Pacer::new();
        let handle = StopHandle::new();
        let stop = handle.signal();
        drop(pacer.acquire(Duration::from_secs(60), &stop).await.unwrap());

        handle.stop();
        let outcome = tokio::time::timeout(
            Duration::from_secs(1),
            pacer.acquire(Duration::ZERO, &stop),
        )
        .await
        .expect("cancelled acquisition returns promptly");
        assert!(matches!(outcome, Err(Cancelled)));
    }
}
