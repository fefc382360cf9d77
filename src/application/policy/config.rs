//! Pacing, retry and circuit-breaker configuration.

use serde::{Deserialize, Serialize};

use crate::domain::market::Marketplace;

/// Per-source request spacing bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct SourcePacing {
    /// Minimum delay between two requests to the source.
    pub min_delay_ms: u64,
    /// Upper bound of the random term added to every delay.
    pub jitter_ms: u64,
}

impl SourcePacing {
    #[must_use]
    pub const fn new(min_delay_ms: u64, jitter_ms: u64) -> Self {
        Self {
            min_delay_ms,
            jitter_ms,
        }
    }
}

/// Request pacing and retry settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PacingConfig {
    /// Attempt ceiling per marketplace fetch, including the first attempt.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Growth factor applied to the minimum delay for every failed attempt.
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
    /// Cap on the exponential part of a delay.
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
    #[serde(default = "default_buff_pacing")]
    pub buff: SourcePacing,
    #[serde(default = "default_steam_pacing")]
    pub steam: SourcePacing,
}

impl PacingConfig {
    #[must_use]
    pub const fn for_market(&self, market: Marketplace) -> SourcePacing {
        match market {
            Marketplace::Buff => self.buff,
            Marketplace::Steam => self.steam,
        }
    }
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            backoff_multiplier: default_backoff_multiplier(),
            max_delay_ms: default_max_delay_ms(),
            buff: default_buff_pacing(),
            steam: default_steam_pacing(),
        }
    }
}

const fn default_max_attempts() -> u32 {
    3
}

const fn default_backoff_multiplier() -> f64 {
    2.0
}

const fn default_max_delay_ms() -> u64 {
    15_000
}

const fn default_buff_pacing() -> SourcePacing {
    SourcePacing::new(500, 1_000)
}

const fn default_steam_pacing() -> SourcePacing {
    SourcePacing::new(2_000, 3_000)
}

/// Circuit-breaker settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct BreakerConfig {
    /// Consecutive failed candidate fetches that mark a source unavailable.
    #[serde(default = "default_failure_threshold")]
    pub failure_threshold: u32,
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: default_failure_threshold(),
        }
    }
}

const fn default_failure_threshold() -> u32 {
    3
}
