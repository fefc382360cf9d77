//! Per-candidate fetch failures.

use thiserror::Error;

use crate::domain::evaluation::DiscardReason;
use crate::domain::failure::FailureKind;
use crate::domain::market::Marketplace;
use crate::port::outbound::source::SourceError;

/// Why a candidate's detail could not be fetched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("{market} timed out after {attempts} attempt(s)")]
    Timeout { market: Marketplace, attempts: u32 },

    #[error("{market} rate limited after {attempts} attempt(s)")]
    RateLimited { market: Marketplace, attempts: u32 },

    #[error("{market} connection reset after {attempts} attempt(s): {message}")]
    ConnectionReset {
        market: Marketplace,
        attempts: u32,
        message: String,
    },

    #[error("{market} detail could not be parsed ({kind}): {message}")]
    Parse {
        market: Marketplace,
        kind: FailureKind,
        message: String,
    },

    #[error("{market} is unavailable for the rest of the run")]
    SourceUnavailable { market: Marketplace },

    #[error("{market} has {listings} listings, below minimum {minimum}")]
    LowLiquidity {
        market: Marketplace,
        listings: u32,
        minimum: u32,
    },

    #[error("fetch cancelled by stop signal")]
    Cancelled,
}

impl FetchError {
    /// Map a source failure that will not be retried any further.
    #[must_use]
    pub fn from_source(market: Marketplace, attempts: u32, err: &SourceError) -> Self {
        match err.kind() {
            FailureKind::Timeout => Self::Timeout { market, attempts },
            FailureKind::RateLimited => Self::RateLimited { market, attempts },
            FailureKind::ConnectionReset => Self::ConnectionReset {
                market,
                attempts,
                message: err.message().to_string(),
            },
            kind @ (FailureKind::ElementNotFound | FailureKind::Malformed) => Self::Parse {
                market,
                kind,
                message: err.message().to_string(),
            },
        }
    }

    /// Discard reason this failure converts to. `None` for cancellation,
    /// which is not an outcome.
    #[must_use]
    pub const fn discard_reason(&self) -> Option<DiscardReason> {
        match self {
            Self::Timeout { .. }
            | Self::RateLimited { .. }
            | Self::ConnectionReset { .. }
            | Self::Parse { .. } => Some(DiscardReason::ExtractionFailed),
            Self::SourceUnavailable { .. } => Some(DiscardReason::SourceUnavailable),
            Self::LowLiquidity { .. } => Some(DiscardReason::LowLiquidity),
            Self::Cancelled => None,
        }
    }

    #[must_use]
    pub const fn market(&self) -> Option<Marketplace> {
        match self {
            Self::Timeout { market, .. }
            | Self::RateLimited { market, .. }
            | Self::ConnectionReset { market, .. }
            | Self::Parse { market, .. }
            | Self::SourceUnavailable { market }
            | Self::LowLiquidity { market, .. } => Some(*market),
            Self::Cancelled => None,
        }
    }

    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_and_structural_failures_become_extraction_failed() {
        for err in [
            SourceError::timeout("slow"),
            SourceError::rate_limited("429"),
            SourceError::element_not_found("price"),
        ] {
            let fetch = FetchError::from_source(Marketplace::Buff, 3, &err);
            assert_eq!(fetch.discard_reason(), Some(DiscardReason::ExtractionFailed));
            assert_eq!(fetch.market(), Some(Marketplace::Buff));
        }
    }

    #[test]
    fn cancellation_has_no_discard_reason() {
        assert_eq!(FetchError::Cancelled.discard_reason(), None);
        assert!(FetchError::Cancelled.is_cancelled());
    }

    #[test]
    fn policy_and_systemic_failures_keep_their_reason() {
        let unavailable = FetchError::SourceUnavailable {
            market: Marketplace::Steam,
        };
        assert_eq!(
            unavailable.discard_reason(),
            Some(DiscardReason::SourceUnavailable)
        );
        let thin = FetchError::LowLiquidity {
            market: Marketplace::Steam,
            listings: 3,
            minimum: 40,
        };
        assert_eq!(thin.discard_reason(), Some(DiscardReason::LowLiquidity));
    }
}
