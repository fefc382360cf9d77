//! Configuration projections for operator-facing adapters.

use crate::error::Result;

/// Pacing line of a configuration view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigPacing {
    pub market: String,
    pub min_delay_ms: u64,
    pub jitter_ms: u64,
}

/// Full configuration projection for operator-facing output.
#[derive(Debug, Clone)]
pub struct ConfigView {
    pub profile: String,
    pub scrape_workers: usize,
    pub storage_workers: usize,
    pub batch_size: usize,
    pub queue_capacities: (usize, usize),
    pub flush_failure: String,
    pub limit: Option<u64>,
    pub exclude_prefixes: Vec<String>,
    pub max_attempts: u32,
    pub pacing: Vec<ConfigPacing>,
    pub breaker_threshold: u32,
    pub exchange_rate: String,
    pub fees: (String, String),
    pub min_listings: u32,
    pub min_roi_pct: String,
    pub database: String,
    pub discarded_path: String,
    pub source_urls: (String, String),
    /// Effective configuration rendered as TOML.
    pub toml: String,
}

/// Validation output for `config validate`.
#[derive(Debug, Clone, Default)]
pub struct ConfigValidationReport {
    pub warnings: Vec<String>,
}

/// Configuration use-cases for operator-facing adapters.
pub trait ConfigurationOperator: Send + Sync {
    /// Build a projection for `config show`.
    fn show_config(&self, config_toml: &str) -> Result<ConfigView>;

    /// Validate config and return non-fatal warnings.
    fn validate_config(&self, config_toml: &str) -> Result<ConfigValidationReport>;
}
