//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all application settings.
//! Configuration is loaded from a TOML file; `ARBSCOUT_DATABASE` overrides the
//! database path.
//!
//! # Example
//!
//! ```no_run
//! use arbscout::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use url::Url;

use super::evaluation::EvaluationConfig;
use super::logging::LoggingConfig;
use super::profile::Profile;
use crate::adapter::outbound::http::settings::SourcesConfig;
use crate::application::pipeline::config::{PipelineConfig, MAX_SCRAPE_WORKERS};
use crate::application::policy::config::{BreakerConfig, PacingConfig};
use crate::domain::market::Marketplace;
use crate::error::{ConfigError, Result};

/// Environment variable overriding `storage.database`.
pub const DATABASE_ENV: &str = "ARBSCOUT_DATABASE";

/// `[storage]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database: String,
    /// Connections shared by the storage workers.
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database: default_database_path(),
            pool_size: default_pool_size(),
        }
    }
}

/// `[report]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ReportConfig {
    /// Where the discard report is written at the end of a run.
    #[serde(default = "default_discarded_path")]
    pub discarded_path: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            discarded_path: default_discarded_path(),
        }
    }
}

/// Main application configuration.
///
/// Load from a TOML file using [`Config::load`] or parse directly with
/// [`Config::parse_toml`]. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Anti-ban profile. Anything but `custom` overrides the scrape worker
    /// count and per-source pacing.
    #[serde(default)]
    pub profile: Profile,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub pipeline: PipelineConfig,

    #[serde(default)]
    pub pacing: PacingConfig,

    #[serde(default)]
    pub breaker: BreakerConfig,

    #[serde(default)]
    pub evaluation: EvaluationConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub sources: SourcesConfig,

    #[serde(default)]
    pub report: ReportConfig,
}

fn default_database_path() -> String {
    "arbscout.db".to_string()
}

const fn default_pool_size() -> u32 {
    4
}

fn default_discarded_path() -> String {
    "discarded.json".to_string()
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// Applies the profile preset and the database environment override,
    /// then validates.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML content is malformed or validation fails.
    #[allow(clippy::result_large_err)]
    pub fn parse_toml(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;

        config.profile.apply(&mut config.pipeline, &mut config.pacing);
        if let Ok(database) = std::env::var(DATABASE_ENV) {
            if !database.trim().is_empty() {
                config.storage.database = database;
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the TOML content is
    /// malformed, or validation fails.
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Initialize logging from the `[logging]` section.
    pub fn init_logging(&self) {
        self.logging.init();
    }

    /// Render the effective configuration as TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Other(e.to_string()).into())
    }

    /// Non-fatal observations about the configuration.
    #[must_use]
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.profile == Profile::Fast {
            warnings.push("profile `fast` carries the highest ban risk".to_string());
        }
        for market in Marketplace::ALL {
            if self.pacing.for_market(market).min_delay_ms == 0 {
                warnings.push(format!("{market} requests are not paced (min_delay_ms = 0)"));
            }
        }
        if self.pipeline.limit == Some(0) {
            warnings.push("pipeline.limit = 0 admits no candidates".to_string());
        }
        warnings
    }

    /// Validate configuration values.
    ///
    /// Checks that all required fields are present and values are within
    /// acceptable ranges.
    #[allow(clippy::result_large_err)]
    pub(crate) fn validate(&self) -> Result<()> {
        let pipeline = &self.pipeline;
        if pipeline.scrape_workers == 0 || pipeline.scrape_workers > MAX_SCRAPE_WORKERS {
            return Err(invalid(
                "scrape_workers",
                format!("must be between 1 and {MAX_SCRAPE_WORKERS}"),
            ));
        }
        for (field, value) in [
            ("storage_workers", pipeline.storage_workers),
            ("candidate_queue_capacity", pipeline.candidate_queue_capacity),
            ("result_queue_capacity", pipeline.result_queue_capacity),
            ("batch_size", pipeline.batch_size),
        ] {
            if value == 0 {
                return Err(invalid(field, "must be greater than 0"));
            }
        }
        if pipeline.fetch_timeout_ms == 0 {
            return Err(invalid("fetch_timeout_ms", "must be greater than 0"));
        }
        if pipeline.flush_timeout_ms == 0 {
            return Err(invalid("flush_timeout_ms", "must be greater than 0"));
        }
        if pipeline.flush_attempts == 0 {
            return Err(invalid("flush_attempts", "must be greater than 0"));
        }

        if self.pacing.max_attempts == 0 {
            return Err(invalid("max_attempts", "must be greater than 0"));
        }
        if self.pacing.backoff_multiplier < 1.0 {
            return Err(invalid("backoff_multiplier", "must be >= 1.0"));
        }
        if self.breaker.failure_threshold == 0 {
            return Err(invalid("failure_threshold", "must be greater than 0"));
        }

        self.evaluation.validate()?;

        if self.storage.database.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "database" }.into());
        }
        if self.report.discarded_path.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "discarded_path",
            }
            .into());
        }
        for (field, url) in [
            ("buff_base_url", &self.sources.buff_base_url),
            ("steam_base_url", &self.sources.steam_base_url),
        ] {
            if let Err(e) = Url::parse(url) {
                return Err(invalid(field, e.to_string()));
            }
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> crate::error::Error {
    ConfigError::InvalidValue {
        field,
        reason: reason.into(),
    }
    .into()
}
