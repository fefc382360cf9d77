//! Classification of upstream fetch failures.

use std::fmt;

use serde::Serialize;

/// Why a single physical request to a marketplace failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The request did not complete within the fetch timeout.
    Timeout,
    /// The upstream answered with a rate-limit response.
    RateLimited,
    /// The connection was reset or could not be established.
    ConnectionReset,
    /// An expected page element or field was absent.
    ElementNotFound,
    /// The response was present but could not be interpreted.
    Malformed,
}

impl FailureKind {
    /// Transient failures are worth retrying and count toward the breaker.
    #[must_use]
    pub const fn is_transient(self) -> bool {
        matches!(self, Self::Timeout | Self::RateLimited | Self::ConnectionReset)
    }

    /// Structural failures are never retried.
    #[must_use]
    pub const fn is_structural(self) -> bool {
        !self.is_transient()
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::RateLimited => "rate_limited",
            Self::ConnectionReset => "connection_reset",
            Self::ElementNotFound => "element_not_found",
            Self::Malformed => "malformed",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
