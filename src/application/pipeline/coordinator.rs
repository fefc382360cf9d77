//! Pipeline coordinator: wires producer, scrape pool and storage pool, and
//! produces the run summary.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use futures_util::future::join_all;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::config::PipelineConfig;
use super::intake::{IntakeCounters, IntakeFilter, QueueSink};
use super::ledger::DiscardLedger;
use super::queue::bounded;
use super::scrape::{ScrapeReport, ScrapeWorker};
use super::stop::StopSignal;
use super::storage::{StorageReport, StorageSettings, StorageWorker};
use crate::application::fetch::fetcher::DetailFetcher;
use crate::domain::candidate::Candidate;
use crate::domain::evaluation::{EvaluationResult, Evaluator};
use crate::domain::run::{DiscardCounts, RunSummary};
use crate::error::{Error, Result};
use crate::port::inbound::producer::CandidateProducer;
use crate::port::outbound::report::DiscardSink;
use crate::port::outbound::store::RecordStore;

/// Collaborators the coordinator drives.
pub struct PipelineParts {
    pub fetcher: Arc<DetailFetcher>,
    pub evaluator: Arc<Evaluator>,
    pub store: Arc<dyn RecordStore>,
    pub discards: Arc<dyn DiscardSink>,
}

/// Runs one pipeline end to end.
///
/// Lifecycle: start storage workers, start scrape workers, run the producer,
/// close the candidate queue once it returns, wait for the scrape pool to
/// drain (closing the result queue), wait for the storage pool to flush,
/// then write the discard report.
pub struct Coordinator {
    config: PipelineConfig,
    parts: PipelineParts,
    run_id: String,
}

impl Coordinator {
    #[must_use]
    pub fn new(config: PipelineConfig, parts: PipelineParts) -> Self {
        Self {
            config,
            parts,
            run_id: Uuid::new_v4().to_string(),
        }
    }

    /// Use an explicit run identifier instead of a random one.
    #[must_use]
    pub fn with_run_id(mut self, run_id: impl Into<String>) -> Self {
        self.run_id = run_id.into();
        self
    }

    #[must_use]
    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Run the pipeline until the producer is exhausted or `stop` fires.
    ///
    /// Worker failures are aggregated into the summary. A producer failure
    /// is fatal: in-flight work is drained and flushed, then the error is
    /// returned.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Producer`] when the producer fails or panics, and a
    /// domain error for an invalid batch size.
    pub async fn run(
        &self,
        mut producer: Box<dyn CandidateProducer>,
        stop: StopSignal,
    ) -> Result<RunSummary> {
        let started_at = Utc::now();
        let clock = Instant::now();
        let scrape_workers = self.config.effective_scrape_workers();
        let storage_workers = self.config.effective_storage_workers();
        info!(
            run_id = %self.run_id,
            scrape_workers,
            storage_workers,
            batch_size = self.config.batch_size,
            "Pipeline starting"
        );

        let (candidate_tx, candidate_rx) =
            bounded::<Candidate>(self.config.candidate_queue_capacity);
        let (result_tx, result_rx) =
            bounded::<EvaluationResult>(self.config.result_queue_capacity);
        let ledger = DiscardLedger::default();

        let storage_settings = self.storage_settings();
        let mut storage_handles: Vec<JoinHandle<StorageReport>> =
            Vec::with_capacity(storage_workers);
        for id in 0..storage_workers {
            let worker = StorageWorker::new(
                id,
                result_rx.clone(),
                Arc::clone(&self.parts.store),
                ledger.clone(),
                storage_settings.clone(),
                stop.clone(),
            )?;
            storage_handles.push(tokio::spawn(worker.run()));
        }
        drop(result_rx);

        let scrape_handles: Vec<JoinHandle<ScrapeReport>> = (0..scrape_workers)
            .map(|id| {
                let worker = ScrapeWorker::new(
                    id,
                    candidate_rx.clone(),
                    result_tx.clone(),
                    Arc::clone(&self.parts.fetcher),
                    Arc::clone(&self.parts.evaluator),
                    stop.clone(),
                );
                tokio::spawn(worker.run())
            })
            .collect();
        drop(candidate_rx);
        drop(result_tx);

        let counters = Arc::new(IntakeCounters::default());
        let sink = QueueSink::new(
            candidate_tx,
            IntakeFilter {
                exclude_prefixes: self.config.exclude_prefixes.clone(),
                limit: self.config.limit,
            },
            Arc::clone(&counters),
            stop.clone(),
        );

        // The sink owns the last candidate sender; dropping it closes the queue.
        let mut producer_task = tokio::spawn(async move {
            let outcome = producer.produce(&sink).await;
            drop(sink);
            outcome
        });
        let producer_outcome = tokio::select! {
            joined = &mut producer_task => joined,
            () = stop.cancelled() => {
                warn!(run_id = %self.run_id, "Stop requested, halting producer");
                producer_task.abort();
                producer_task.await
            }
        };
        let producer_error = match producer_outcome {
            Ok(Ok(())) => None,
            Ok(Err(err)) => Some(err.to_string()),
            Err(join) if join.is_cancelled() => None,
            Err(join) => Some(format!("producer task panicked: {join}")),
        };
        if let Some(reason) = &producer_error {
            error!(
                run_id = %self.run_id,
                error = %reason,
                "Producer failed, draining in-flight work"
            );
        }

        let mut worker_failures = 0u64;
        let mut accepted = 0u64;
        let mut discarded = DiscardCounts::default();
        for joined in join_all(scrape_handles).await {
            match joined {
                Ok(report) => {
                    accepted += report.accepted;
                    discarded.merge(&report.discarded);
                }
                Err(err) => {
                    worker_failures += 1;
                    error!(run_id = %self.run_id, error = %err, "Scrape worker failed");
                }
            }
        }

        let mut storage = StorageReport::default();
        for joined in join_all(storage_handles).await {
            match joined {
                Ok(report) => {
                    storage.flushes += report.flushes;
                    storage.failed_flushes += report.failed_flushes;
                    storage.persisted += report.persisted;
                    storage.dropped += report.dropped;
                }
                Err(err) => {
                    worker_failures += 1;
                    error!(run_id = %self.run_id, error = %err, "Storage worker failed");
                }
            }
        }

        let discards = ledger.take();
        if !discards.is_empty() {
            if let Err(err) = self.parts.discards.write_discarded(&discards).await {
                error!(run_id = %self.run_id, error = %err, "Failed to write discard report");
            }
        }

        let summary = RunSummary {
            run_id: self.run_id.clone(),
            started_at,
            finished_at: Utc::now(),
            elapsed_ms: u64::try_from(clock.elapsed().as_millis()).unwrap_or(u64::MAX),
            seen: counters.seen(),
            excluded: counters.excluded(),
            refused: counters.refused(),
            accepted,
            discarded,
            flushes: storage.flushes,
            persisted: storage.persisted,
            dropped: storage.dropped,
            worker_failures,
            cancelled: stop.is_stopped(),
        };
        info!(
            run_id = %summary.run_id,
            seen = summary.seen,
            accepted = summary.accepted,
            discarded = summary.discarded_total(),
            persisted = summary.persisted,
            dropped = summary.dropped,
            elapsed_ms = summary.elapsed_ms,
            cancelled = summary.cancelled,
            "Pipeline finished"
        );

        match producer_error {
            Some(reason) => Err(Error::Producer(reason)),
            None => Ok(summary),
        }
    }

    fn storage_settings(&self) -> StorageSettings {
        StorageSettings {
            batch_size: self.config.batch_size,
            flush_timeout: Duration::from_millis(self.config.flush_timeout_ms),
            flush_attempts: self.config.flush_attempts,
            flush_retry_delay: Duration::from_millis(self.config.flush_retry_delay_ms),
            failure_policy: self.config.flush_failure,
            requeue_limit: self.config.requeue_limit,
        }
    }
}
