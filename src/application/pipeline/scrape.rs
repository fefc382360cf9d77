//! Scrape worker: claim a candidate, fetch, evaluate, emit.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use chrono::Utc;
use futures_util::FutureExt;
use tracing::{debug, error, info};

use super::queue::{QueueReceiver, QueueSender, SendError};
use super::stop::StopSignal;
use crate::application::fetch::fetcher::DetailFetcher;
use crate::domain::candidate::Candidate;
use crate::domain::evaluation::{DiscardReason, DiscardedResult, EvaluationResult, Evaluator};
use crate::domain::run::DiscardCounts;

/// What one scrape worker did before it exited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrapeReport {
    pub worker_id: usize,
    /// Results emitted downstream.
    pub emitted: u64,
    pub accepted: u64,
    pub discarded: DiscardCounts,
    /// Candidates claimed but dropped because of the stop signal.
    pub abandoned: u64,
}

/// One member of the scrape pool.
///
/// Cycles `idle → fetching → evaluating → emitting → idle` until the
/// candidate queue is closed and empty or the stop signal fires. A failure
/// for one candidate becomes a discarded result, never a worker exit.
pub struct ScrapeWorker {
    id: usize,
    input: QueueReceiver<Candidate>,
    output: QueueSender<EvaluationResult>,
    fetcher: Arc<DetailFetcher>,
    evaluator: Arc<Evaluator>,
    stop: StopSignal,
}

impl ScrapeWorker {
    #[must_use]
    pub fn new(
        id: usize,
        input: QueueReceiver<Candidate>,
        output: QueueSender<EvaluationResult>,
        fetcher: Arc<DetailFetcher>,
        evaluator: Arc<Evaluator>,
        stop: StopSignal,
    ) -> Self {
        Self {
            id,
            input,
            output,
            fetcher,
            evaluator,
            stop,
        }
    }

    pub async fn run(self) -> ScrapeReport {
        let mut report = ScrapeReport {
            worker_id: self.id,
            ..ScrapeReport::default()
        };
        debug!(worker_id = self.id, "Scrape worker started");

        loop {
            let candidate = tokio::select! {
                biased;
                () = self.stop.cancelled() => break,
                next = self.input.recv() => match next {
                    Some(candidate) => candidate,
                    None => break,
                },
            };

            let Some(result) = self.process(candidate).await else {
                report.abandoned += 1;
                break;
            };

            let reason = result.discard_reason();
            match self.output.send(result, &self.stop).await {
                Ok(()) => {
                    report.emitted += 1;
                    match reason {
                        Some(reason) => report.discarded.record(reason),
                        None => report.accepted += 1,
                    }
                }
                Err(SendError::Stopped(_)) => {
                    report.abandoned += 1;
                    break;
                }
                Err(SendError::Closed(result)) => {
                    error!(
                        worker_id = self.id,
                        candidate = %result.candidate(),
                        "Result queue closed while workers were running"
                    );
                    report.abandoned += 1;
                    break;
                }
            }
        }

        debug!(
            worker_id = self.id,
            emitted = report.emitted,
            abandoned = report.abandoned,
            "Scrape worker finished"
        );
        report
    }

    /// Fetch and evaluate one candidate. `None` means it was abandoned on stop.
    async fn process(&self, candidate: Candidate) -> Option<EvaluationResult> {
        let outcome = AssertUnwindSafe(self.fetch_and_evaluate(&candidate))
            .catch_unwind()
            .await;

        match outcome {
            Ok(result) => result,
            Err(_) => {
                error!(
                    worker_id = self.id,
                    candidate = %candidate,
                    "Panic while processing candidate"
                );
                Some(EvaluationResult::Discarded(DiscardedResult::new(
                    candidate,
                    DiscardReason::ExtractionFailed,
                    "panic while processing candidate",
                    Utc::now(),
                )))
            }
        }
    }

    async fn fetch_and_evaluate(&self, candidate: &Candidate) -> Option<EvaluationResult> {
        let result = match self.fetcher.fetch(candidate, &self.stop).await {
            Ok((buff, steam)) => self.evaluator.evaluate(candidate, &buff, &steam, Utc::now()),
            Err(err) => {
                let reason = err.discard_reason()?;
                EvaluationResult::Discarded(DiscardedResult::new(
                    candidate.clone(),
                    reason,
                    err.to_string(),
                    Utc::now(),
                ))
            }
        };

        match &result {
            EvaluationResult::Accepted(accepted) => info!(
                worker_id = self.id,
                candidate = %candidate,
                profit = %accepted.profit().round_dp(2),
                roi_pct = %accepted.roi_pct().round_dp(2),
                "Candidate accepted"
            ),
            EvaluationResult::Discarded(discarded) => info!(
                worker_id = self.id,
                candidate = %candidate,
                reason = %discarded.reason(),
                detail = discarded.detail(),
                "Candidate discarded"
            ),
        }
        Some(result)
    }
}
