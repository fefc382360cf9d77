//! Runtime control projection types for operator-facing adapters.
//!
//! Defines request and response types for starting a scrape run.

use async_trait::async_trait;

use crate::domain::run::RunSummary;
use crate::error::Result;

/// Run parameters from CLI flags.
///
/// Overrides take precedence over the configuration file.
#[derive(Debug, Clone)]
pub struct RunRequest {
    /// Raw TOML configuration content.
    pub config_toml: String,

    /// Location of the JSON-lines candidate file.
    pub candidates: String,

    /// Override for log level (e.g., "debug", "info", "warn").
    pub log_level: Option<String>,

    /// Whether to output logs as JSON.
    pub json_logs: bool,

    /// Override for the candidate limit.
    pub limit: Option<u64>,

    /// Override for the scrape worker count.
    pub scrape_workers: Option<usize>,

    /// Override for database file path.
    pub database_path: Option<String>,

    /// Log accepted results instead of persisting them.
    pub dry_run: bool,
}

/// What a run is about to do, for the startup banner.
#[derive(Debug, Clone)]
pub struct RunStartupSnapshot {
    pub profile: String,
    pub candidates: String,
    pub scrape_workers: usize,
    pub storage_workers: usize,
    pub batch_size: usize,
    pub limit: Option<u64>,
    /// Database path, or a dry-run marker.
    pub storage_label: String,
    pub discarded_path: String,
}

/// Runtime use-cases for operator-facing adapters.
#[async_trait]
pub trait RuntimeOperator: Send + Sync {
    /// Resolve the effective settings without starting anything.
    fn prepare_run(&self, request: &RunRequest) -> Result<RunStartupSnapshot>;

    /// Run the pipeline to completion or until interrupted.
    async fn execute_run(&self, request: RunRequest) -> Result<RunSummary>;
}
