//! Inter-request delay and retry decisions.

use std::time::Duration;

use rand::Rng;

use super::config::{PacingConfig, SourcePacing};
use crate::domain::failure::FailureKind;

/// Exponential backoff with a bounded random jitter term.
///
/// Attempt `0` is plain pacing (`min + random(0, jitter)`); attempt `n` scales
/// the minimum by `multiplier^n`, capped at `max_delay`, before adding jitter.
#[derive(Debug, Clone, PartialEq)]
pub struct BackoffPolicy {
    max_attempts: u32,
    multiplier: f64,
    max_delay_ms: u64,
}

impl BackoffPolicy {
    #[must_use]
    pub fn new(config: &PacingConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            multiplier: config.backoff_multiplier.max(1.0),
            max_delay_ms: config.max_delay_ms,
        }
    }

    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay to observe after attempt number `attempt` against a source.
    #[must_use]
    pub fn next_delay(&self, attempt: u32, base: SourcePacing) -> Duration {
        let jitter_ms = if base.jitter_ms == 0 {
            0
        } else {
            rand::thread_rng().gen_range(0..=base.jitter_ms)
        };
        Duration::from_millis(self.base_delay_ms(attempt, base).saturating_add(jitter_ms))
    }

    /// Deterministic part of [`next_delay`](Self::next_delay).
    #[must_use]
    pub fn base_delay_ms(&self, attempt: u32, base: SourcePacing) -> u64 {
        if attempt == 0 {
            return base.min_delay_ms;
        }
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let scaled = base.min_delay_ms as f64 * self.multiplier.powi(exponent);
        let cap = self.max_delay_ms.max(base.min_delay_ms);
        if !scaled.is_finite() || scaled >= cap as f64 {
            cap
        } else {
            scaled as u64
        }
    }

    /// Whether a failure on attempt number `attempt` (1-based) earns a retry.
    ///
    /// Structural failures are never retried.
    #[must_use]
    pub const fn should_retry(&self, attempt: u32, kind: FailureKind) -> bool {
        kind.is_transient() && attempt < self.max_attempts
    }
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self::new(&PacingConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> BackoffPolicy {
        BackoffPolicy::default()
    }

    #[test]
    fn first_attempt_is_plain_pacing() {
        let delay = policy().next_delay(0, SourcePacing::new(500, 0));
        assert_eq!(delay, Duration::from_millis(500));
    }

    #[test]
    fn delay_grows_exponentially_until_capped() {
        let policy = policy();
        let base = SourcePacing::new(2_000, 0);
        assert_eq!(policy.base_delay_ms(1, base), 4_000);
        assert_eq!(policy.base_delay_ms(2, base), 8_000);
        assert_eq!(policy.base_delay_ms(3, base), 15_000);
        assert_eq!(policy.base_delay_ms(u32::MAX, base), 15_000);
    }

    #[test]
    fn jitter_stays_within_spread() {
        let policy = policy();
        let base = SourcePacing::new(100, 50);
        for _ in 0..200 {
            let delay = policy.next_delay(0, base);
            assert!(delay >= Duration::from_millis(100));
            assert!(delay <= Duration::from_millis(150));
        }
    }

    #[test]
    fn transient_failures_retry_up_to_ceiling() {
        let policy = policy();
        assert!(policy.should_retry(1, FailureKind::Timeout));
        assert!(policy.should_retry(2, FailureKind::RateLimited));
        assert!(!policy.should_retry(3, FailureKind::ConnectionReset));
    }

    #[test]
    fn structural_failures_never_retry() {
        let policy = policy();
        assert!(!policy.should_retry(1, FailureKind::ElementNotFound));
        assert!(!policy.should_retry(1, FailureKind::Malformed));
    }

    #[test]
    fn zero_attempt_ceiling_still_allows_one_attempt() {
        let config = PacingConfig {
            max_attempts: 0,
            ..PacingConfig::default()
        };
        let policy = BackoffPolicy::new(&config);
        assert_eq!(policy.max_attempts(), 1);
        assert!(!policy.should_retry(1, FailureKind::Timeout));
    }
}
