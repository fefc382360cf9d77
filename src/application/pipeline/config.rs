//! Pipeline sizing, batching and intake settings.

use serde::{Deserialize, Serialize};

/// Hard cap on concurrent scrape workers.
pub const MAX_SCRAPE_WORKERS: usize = 5;

/// What a storage worker does with a batch whose flush retries ran out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FlushFailurePolicy {
    /// Log and drop the batch.
    #[default]
    Drop,
    /// Carry the records into the worker's next flush.
    Requeue,
}

/// Configuration for the producer/scrape/storage pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PipelineConfig {
    #[serde(default = "default_scrape_workers")]
    pub scrape_workers: usize,
    #[serde(default = "default_storage_workers")]
    pub storage_workers: usize,
    #[serde(default = "default_queue_capacity")]
    pub candidate_queue_capacity: usize,
    #[serde(default = "default_queue_capacity")]
    pub result_queue_capacity: usize,
    /// Accepted results per flush.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Upper bound on one physical detail request.
    #[serde(default = "default_fetch_timeout_ms")]
    pub fetch_timeout_ms: u64,
    /// Upper bound on one storage flush call.
    #[serde(default = "default_flush_timeout_ms")]
    pub flush_timeout_ms: u64,
    /// Flush attempts before the failure policy applies.
    #[serde(default = "default_flush_attempts")]
    pub flush_attempts: u32,
    #[serde(default = "default_flush_retry_delay_ms")]
    pub flush_retry_delay_ms: u64,
    #[serde(default)]
    pub flush_failure: FlushFailurePolicy,
    /// Records a worker may carry between flushes under `requeue`.
    #[serde(default = "default_requeue_limit")]
    pub requeue_limit: usize,
    /// Candidate names starting with any of these are excluded.
    #[serde(default = "default_exclude_prefixes")]
    pub exclude_prefixes: Vec<String>,
    /// Maximum candidates admitted per run.
    #[serde(default)]
    pub limit: Option<u64>,
}

impl PipelineConfig {
    /// Scrape worker count clamped to `1..=MAX_SCRAPE_WORKERS`.
    #[must_use]
    pub fn effective_scrape_workers(&self) -> usize {
        self.scrape_workers.clamp(1, MAX_SCRAPE_WORKERS)
    }

    #[must_use]
    pub fn effective_storage_workers(&self) -> usize {
        self.storage_workers.max(1)
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            scrape_workers: default_scrape_workers(),
            storage_workers: default_storage_workers(),
            candidate_queue_capacity: default_queue_capacity(),
            result_queue_capacity: default_queue_capacity(),
            batch_size: default_batch_size(),
            fetch_timeout_ms: default_fetch_timeout_ms(),
            flush_timeout_ms: default_flush_timeout_ms(),
            flush_attempts: default_flush_attempts(),
            flush_retry_delay_ms: default_flush_retry_delay_ms(),
            flush_failure: FlushFailurePolicy::default(),
            requeue_limit: default_requeue_limit(),
            exclude_prefixes: default_exclude_prefixes(),
            limit: None,
        }
    }
}

const fn default_scrape_workers() -> usize {
    2
}

const fn default_storage_workers() -> usize {
    1
}

const fn default_queue_capacity() -> usize {
    4
}

const fn default_batch_size() -> usize {
    10
}

const fn default_fetch_timeout_ms() -> u64 {
    15_000
}

const fn default_flush_timeout_ms() -> u64 {
    10_000
}

const fn default_flush_attempts() -> u32 {
    3
}

const fn default_flush_retry_delay_ms() -> u64 {
    1_000
}

const fn default_requeue_limit() -> usize {
    100
}

fn default_exclude_prefixes() -> Vec<String> {
    vec!["Charm |".to_string()]
}
