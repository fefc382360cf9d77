//! Storage batcher: route results, batch accepted ones, flush by count.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use super::config::FlushFailurePolicy;
use super::ledger::DiscardLedger;
use super::queue::QueueReceiver;
use super::stop::StopSignal;
use crate::domain::batch::Batch;
use crate::domain::error::DomainError;
use crate::domain::evaluation::{AcceptedResult, EvaluationResult};
use crate::port::outbound::store::RecordStore;

/// Flush behaviour of a storage worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageSettings {
    pub batch_size: usize,
    pub flush_timeout: Duration,
    pub flush_attempts: u32,
    pub flush_retry_delay: Duration,
    pub failure_policy: FlushFailurePolicy,
    pub requeue_limit: usize,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            batch_size: 10,
            flush_timeout: Duration::from_secs(10),
            flush_attempts: 3,
            flush_retry_delay: Duration::from_secs(1),
            failure_policy: FlushFailurePolicy::Drop,
            requeue_limit: 100,
        }
    }
}

/// What one storage worker did before it exited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StorageReport {
    pub worker_id: usize,
    /// Successful flush calls.
    pub flushes: u64,
    /// Flushes whose retries ran out.
    pub failed_flushes: u64,
    pub persisted: u64,
    pub dropped: u64,
    /// Discarded results routed to the side report.
    pub discards_routed: u64,
}

/// One member of the storage pool.
///
/// Drains the result queue until it is closed, so every accepted result
/// emitted by the scrape pool reaches a flush. Retry waits are skipped
/// once the stop signal has fired.
pub struct StorageWorker {
    id: usize,
    input: QueueReceiver<EvaluationResult>,
    store: Arc<dyn RecordStore>,
    ledger: DiscardLedger,
    settings: StorageSettings,
    stop: StopSignal,
    empty: Batch,
    carried: Vec<AcceptedResult>,
    report: StorageReport,
}

impl StorageWorker {
    /// # Errors
    ///
    /// Returns [`DomainError::ZeroBatchCapacity`] for a zero batch size.
    pub fn new(
        id: usize,
        input: QueueReceiver<EvaluationResult>,
        store: Arc<dyn RecordStore>,
        ledger: DiscardLedger,
        settings: StorageSettings,
        stop: StopSignal,
    ) -> Result<Self, DomainError> {
        let empty = Batch::try_new(settings.batch_size)?;
        Ok(Self {
            id,
            input,
            store,
            ledger,
            settings,
            stop,
            empty,
            carried: Vec::new(),
            report: StorageReport {
                worker_id: id,
                ..StorageReport::default()
            },
        })
    }

    pub async fn run(mut self) -> StorageReport {
        debug!(worker_id = self.id, "Storage worker started");
        let mut batch = self.new_batch();

        while let Some(result) = self.input.recv().await {
            match result {
                EvaluationResult::Accepted(accepted) => {
                    if batch.push(accepted) {
                        let full = std::mem::replace(&mut batch, self.new_batch());
                        self.flush(full, false).await;
                    }
                }
                EvaluationResult::Discarded(discarded) => {
                    self.report.discards_routed += 1;
                    self.ledger.push(discarded);
                }
            }
        }

        if !batch.is_empty() || !self.carried.is_empty() {
            self.flush(batch, true).await;
        }

        debug!(
            worker_id = self.id,
            flushes = self.report.flushes,
            persisted = self.report.persisted,
            dropped = self.report.dropped,
            "Storage worker finished"
        );
        self.report
    }

    fn new_batch(&self) -> Batch {
        self.empty.clone()
    }

    /// Write carried records plus `batch`, retrying up to `flush_attempts`.
    ///
    /// A timeout only stops the worker waiting. A store whose write
    /// outlives `flush_timeout` may still complete it, so a retry can append
    /// the same records twice and a dropped batch may in fact be persisted.
    /// `SqliteRecordStore` is built with a write deadline equal to
    /// `flush_timeout` and rolls back such writes itself.
    async fn flush(&mut self, batch: Batch, terminal: bool) {
        let mut records = std::mem::take(&mut self.carried);
        records.extend(batch.into_records());
        if records.is_empty() {
            return;
        }

        let attempts = self.settings.flush_attempts.max(1);
        for attempt in 1..=attempts {
            let outcome =
                tokio::time::timeout(self.settings.flush_timeout, self.store.insert_batch(&records))
                    .await;
            match outcome {
                Ok(Ok(written)) => {
                    self.report.flushes += 1;
                    self.report.persisted += written as u64;
                    info!(
                        worker_id = self.id,
                        batch_size = records.len(),
                        terminal,
                        "Batch flushed"
                    );
                    return;
                }
                Ok(Err(err)) => warn!(
                    worker_id = self.id,
                    attempt,
                    batch_size = records.len(),
                    error = %err,
                    "Batch flush failed"
                ),
                Err(_) => warn!(
                    worker_id = self.id,
                    attempt,
                    batch_size = records.len(),
                    timeout_ms = self.settings.flush_timeout.as_millis() as u64,
                    "Batch flush timed out"
                ),
            }

            if attempt < attempts
                && self
                    .stop
                    .sleep(self.settings.flush_retry_delay)
                    .await
                    .is_err()
            {
                break;
            }
        }

        self.report.failed_flushes += 1;
        self.give_up(records, terminal);
    }

    fn give_up(&mut self, mut records: Vec<AcceptedResult>, terminal: bool) {
        let requeue = self.settings.failure_policy == FlushFailurePolicy::Requeue && !terminal;
        if requeue {
            let limit = self.settings.requeue_limit;
            if records.len() > limit {
                // Keep the newest records; the oldest overflow is dropped.
                let overflow = records.len() - limit;
                records.drain(..overflow);
                self.report.dropped += overflow as u64;
                warn!(
                    worker_id = self.id,
                    dropped = overflow,
                    "Requeue limit reached, dropping oldest records"
                );
            }
            warn!(
                worker_id = self.id,
                batch_size = records.len(),
                "Flush retries exhausted, requeueing into next flush"
            );
            self.carried = records;
        } else {
            self.report.dropped += records.len() as u64;
            error!(
                worker_id = self.id,
                batch_size = records.len(),
                "Flush retries exhausted, dropping batch"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::pipeline::queue::{bounded, QueueSender};
    use crate::testkit::{domain, store::RecordingStore};

    fn settings(batch_size: usize) -> StorageSettings {
        StorageSettings {
            batch_size,
            flush_timeout: Duration::from_secs(1),
            flush_attempts: 2,
            flush_retry_delay: Duration::ZERO,
            failure_policy: FlushFailurePolicy::Drop,
            requeue_limit: 100,
        }
    }

    async fn feed(tx: QueueSender<EvaluationResult>, results: Vec<EvaluationResult>) {
        let stop = StopSignal::never();
        for result in results {
            tx.send(result, &stop).await.unwrap();
        }
    }

    fn spawn_worker(
        store: Arc<RecordingStore>,
        settings: StorageSettings,
    ) -> (
        QueueSender<EvaluationResult>,
        DiscardLedger,
        tokio::task::JoinHandle<StorageReport>,
    ) {
        let (tx, rx) = bounded(4);
        let ledger = DiscardLedger::default();
        let worker = StorageWorker::new(
            0,
            rx,
            store,
            ledger.clone(),
            settings,
            StopSignal::never(),
        )
        .unwrap();
        (tx, ledger, tokio::spawn(worker.run()))
    }

    #[tokio::test]
    async fn flushes_full_batches_then_terminal_partial() {
        let store = Arc::new(RecordingStore::new());
        let (tx, _ledger, handle) = spawn_worker(Arc::clone(&store), settings(2));

        let results = (0..5).map(|n| domain::accepted(&format!("Item {n}"))).collect();
        feed(tx, results).await;

        let report = handle.await.unwrap();
        assert_eq!(report.flushes, 3);
        assert_eq!(report.persisted, 5);
        assert_eq!(store.batch_sizes(), [2, 2, 1]);
    }

    #[tokio::test]
    async fn discards_bypass_batching() {
        let store = Arc::new(RecordingStore::new());
        let (tx, ledger, handle) = spawn_worker(Arc::clone(&store), settings(10));

        feed(
            tx,
            vec![
                domain::discarded("Item 0"),
                domain::accepted("Item 1"),
                domain::discarded("Item 2"),
            ],
        )
        .await;

        let report = handle.await.unwrap();
        assert_eq!(report.discards_routed, 2);
        assert_eq!(ledger.len(), 2);
        assert_eq!(store.batch_sizes(), [1]);
    }

    #[tokio::test]
    async fn exhausted_flush_is_dropped_without_crashing() {
        let store = Arc::new(RecordingStore::new());
        store.fail_next(2);
        let (tx, _ledger, handle) = spawn_worker(Arc::clone(&store), settings(2));

        let results = (0..3).map(|n| domain::accepted(&format!("Item {n}"))).collect();
        feed(tx, results).await;

        let report = handle.await.unwrap();
        assert_eq!(report.failed_flushes, 1);
        assert_eq!(report.dropped, 2);
        assert_eq!(report.persisted, 1);
    }

    #[tokio::test]
    async fn timed_out_flushes_are_retried_then_dropped() {
        let store = Arc::new(RecordingStore::new().with_latency(Duration::from_millis(200)));
        let mut settings = settings(1);
        settings.flush_timeout = Duration::from_millis(10);
        let (tx, _ledger, handle) = spawn_worker(Arc::clone(&store), settings);

        feed(tx, vec![domain::accepted("Item 0")]).await;

        let report = handle.await.unwrap();
        assert_eq!(store.attempts(), 2);
        assert_eq!(store.persisted(), 0);
        assert_eq!(report.failed_flushes, 1);
        assert_eq!(report.dropped, 1);
    }

    #[tokio::test]
    async fn requeue_carries_records_into_next_flush() {
        let store = Arc::new(RecordingStore::new());
        store.fail_next(2);
        let mut settings = settings(2);
        settings.failure_policy = FlushFailurePolicy::Requeue;
        let (tx, _ledger, handle) = spawn_worker(Arc::clone(&store), settings);

        let results = (0..4).map(|n| domain::accepted(&format!("Item {n}"))).collect();
        feed(tx, results).await;

        let report = handle.await.unwrap();
        assert_eq!(report.dropped, 0);
        assert_eq!(report.persisted, 4);
        assert_eq!(store.batch_sizes(), [4]);
    }

    #[test]
    fn zero_batch_size_is_rejected() {
        let (_tx, rx) = bounded(1);
        let result = StorageWorker::new(
            0,
            rx,
            Arc::new(RecordingStore::new()),
            DiscardLedger::default(),
            settings(0),
            StopSignal::never(),
        );
        assert!(matches!(result, Err(DomainError::ZeroBatchCapacity)));
    }
}
