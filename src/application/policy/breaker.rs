//! Per-source circuit breaker shared by all scrape workers.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use serde::Serialize;
use tracing::error;

use super::config::BreakerConfig;
use crate::domain::market::Marketplace;

#[derive(Debug, Default)]
struct SourceState {
    consecutive_failures: AtomicU32,
    open: AtomicBool,
}

/// Tracks consecutive failed fetches per marketplace.
///
/// One failure is recorded per candidate fetch that ended in a transient
/// failure (retries exhausted), not per attempt. Once the threshold is
/// reached the source stays open for the remainder of the run.
#[derive(Debug)]
pub struct CircuitBreaker {
    threshold: u32,
    sources: [SourceState; 2],
}

/// Point-in-time view of one source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SourceSnapshot {
    pub market: Marketplace,
    pub consecutive_failures: u32,
    pub open: bool,
}

impl CircuitBreaker {
    #[must_use]
    pub fn new(config: BreakerConfig) -> Self {
        Self {
            threshold: config.failure_threshold.max(1),
            sources: Default::default(),
        }
    }

    fn state(&self, market: Marketplace) -> &SourceState {
        &self.sources[market.index()]
    }

    /// Whether the source has been marked unavailable.
    #[must_use]
    pub fn is_open(&self, market: Marketplace) -> bool {
        self.state(market).open.load(Ordering::Acquire)
    }

    /// Record one failed candidate fetch. Returns `true` if this call tripped
    /// the breaker.
    pub fn record_failure(&self, market: Marketplace) -> bool {
        let state = self.state(market);
        let failures = state.consecutive_failures.fetch_add(1, Ordering::AcqRel) + 1;
        if failures < self.threshold {
            return false;
        }
        let tripped = !state.open.swap(true, Ordering::AcqRel);
        if tripped {
            error!(
                market = %market,
                consecutive_failures = failures,
                "Circuit breaker tripped, source unavailable for the rest of the run"
            );
        }
        tripped
    }

    /// The source answered; reset its consecutive failure count.
    pub fn record_success(&self, market: Marketplace) {
        self.state(market)
            .consecutive_failures
            .store(0, Ordering::Release);
    }

    #[must_use]
    pub fn snapshot(&self) -> [SourceSnapshot; 2] {
        Marketplace::ALL.map(|market| SourceSnapshot {
            market,
            consecutive_failures: self.state(market).consecutive_failures.load(Ordering::Acquire),
            open: self.is_open(market),
        })
    }
}
