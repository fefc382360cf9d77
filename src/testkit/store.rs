//! Recording [`RecordStore`] and [`DiscardSink`] implementations.

use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::Semaphore;

use crate::domain::evaluation::{AcceptedResult, DiscardedResult};
use crate::error::{Error, Result};
use crate::port::outbound::report::DiscardSink;
use crate::port::outbound::store::RecordStore;

/// Keeps every successfully inserted batch in memory.
///
/// `fail_next(n)` makes the next `n` inserts fail with a database error.
/// A [`gated`](Self::gated) store holds every insert until [`release`](Self::release).
#[derive(Default)]
pub struct RecordingStore {
    batches: Mutex<Vec<Vec<AcceptedResult>>>,
    fail_remaining: AtomicU32,
    attempts: AtomicUsize,
    latency: Duration,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
    gate: Option<Semaphore>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every insert by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Block inserts until `release` is called.
    pub fn gated(mut self) -> Self {
        self.gate = Some(Semaphore::new(0));
        self
    }

    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.add_permits(Semaphore::MAX_PERMITS);
        }
    }

    /// Inserts currently waiting or running.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub fn fail_next(&self, n: u32) {
        self.fail_remaining.store(n, Ordering::SeqCst);
    }

    /// Sizes of the successful inserts, in order.
    pub fn batch_sizes(&self) -> Vec<usize> {
        self.batches.lock().iter().map(Vec::len).collect()
    }

    pub fn records(&self) -> Vec<AcceptedResult> {
        self.batches.lock().iter().flatten().cloned().collect()
    }

    pub fn persisted(&self) -> usize {
        self.batches.lock().iter().map(Vec::len).sum()
    }

    /// Insert calls, failed ones included.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    /// Highest number of concurrent inserts observed.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecordStore for RecordingStore {
    async fn insert_batch(&self, records: &[AcceptedResult]) -> Result<usize> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(current, Ordering::SeqCst);

        if let Some(gate) = &self.gate {
            let _ = gate.acquire().await;
        }
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let failing = self
            .fail_remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(Error::Database("scripted insert failure".into()));
        }

        self.batches.lock().push(records.to_vec());
        Ok(records.len())
    }
}

/// Collects every discard report write.
#[derive(Default)]
pub struct RecordingDiscards {
    writes: Mutex<Vec<Vec<DiscardedResult>>>,
}

impl RecordingDiscards {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `write_discarded` calls.
    pub fn writes(&self) -> usize {
        self.writes.lock().len()
    }

    pub fn records(&self) -> Vec<DiscardedResult> {
        self.writes.lock().iter().flatten().cloned().collect()
    }
}

#[async_trait]
impl DiscardSink for RecordingDiscards {
    async fn write_discarded(&self, records: &[DiscardedResult]) -> Result<()> {
        self.writes.lock().push(records.to_vec());
        Ok(())
    }
}
