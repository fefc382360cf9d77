//! Canonical test configurations.
//!
//! Single source of truth for config structs used across tests.
//! Avoids each test module defining its own slightly-different defaults.

use std::time::Duration;

use rust_decimal::Decimal;

use crate::application::fetch::fetcher::FetchSettings;
use crate::application::fetch::normalize::QuoteShape;
use crate::application::pipeline::config::PipelineConfig;
use crate::application::policy::config::{BreakerConfig, PacingConfig, SourcePacing};
use crate::domain::evaluation::{EvaluationRules, Fees};
use crate::domain::pricing::ExchangeRate;

/// Pacing with zero delays and jitter, three attempts per fetch.
pub fn pacing() -> PacingConfig {
    PacingConfig {
        max_attempts: 3,
        backoff_multiplier: 1.0,
        max_delay_ms: 0,
        buff: SourcePacing::new(0, 0),
        steam: SourcePacing::new(0, 0),
    }
}

/// Fetch settings with no pacing and a two second request timeout.
pub fn fetch_settings() -> FetchSettings {
    FetchSettings {
        timeout: Duration::from_secs(2),
        min_listings: 40,
        shape: QuoteShape::default(),
        pacing: pacing(),
    }
}

/// Breaker that trips after three consecutive failures.
pub fn breaker() -> BreakerConfig {
    BreakerConfig {
        failure_threshold: 3,
    }
}

/// Evaluation rules matching the shipped defaults.
pub fn rules() -> EvaluationRules {
    EvaluationRules {
        exchange_rate: ExchangeRate::try_new(Decimal::new(81, 1)).expect("positive rate"),
        fees: Fees {
            buy: Decimal::new(25, 3),
            sell: Decimal::new(13, 2),
        },
        min_listings: 40,
        volatility_window: 5,
        volatility_threshold_pct: Decimal::from(10),
        min_roi_pct: Decimal::ZERO,
    }
}

/// Pipeline config with the given pool sizes and batch size.
///
/// Flush retries do not wait; exclusion uses the default prefixes.
pub fn pipeline(scrape_workers: usize, storage_workers: usize, batch_size: usize) -> PipelineConfig {
    PipelineConfig {
        scrape_workers,
        storage_workers,
        batch_size,
        fetch_timeout_ms: 2_000,
        flush_timeout_ms: 2_000,
        flush_retry_delay_ms: 0,
        ..PipelineConfig::default()
    }
}
