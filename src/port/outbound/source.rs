//! Marketplace detail-source port.
//!
//! The pipeline consumes a single capability from the browser/session
//! collaborator: fetch the raw detail behind one locator. Session lifecycle,
//! cookies and page extraction are entirely the implementation's concern.

use std::fmt;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::domain::failure::FailureKind;
use crate::domain::market::Marketplace;

/// Loosely-shaped detail payload as produced by a source.
///
/// Recognised keys are `price`, `listings`, `listing_count` and
/// `recent_sales`; the detail fetcher validates them into a
/// [`MarketQuote`](crate::domain::quote::MarketQuote) exactly once.
#[derive(Debug, Clone, PartialEq)]
pub struct RawDetail(Value);

impl RawDetail {
    #[must_use]
    pub const fn new(value: Value) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn as_value(&self) -> &Value {
        &self.0
    }

    /// Look up a top-level field.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}

impl From<Value> for RawDetail {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// Failure of a single physical fetch, classified by kind.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind}: {message}")]
pub struct SourceError {
    kind: FailureKind,
    message: String,
}

impl SourceError {
    pub fn new(kind: FailureKind, message: impl fmt::Display) -> Self {
        Self {
            kind,
            message: message.to_string(),
        }
    }

    pub fn timeout(message: impl fmt::Display) -> Self {
        Self::new(FailureKind::Timeout, message)
    }

    pub fn rate_limited(message: impl fmt::Display) -> Self {
        Self::new(FailureKind::RateLimited, message)
    }

    pub fn connection_reset(message: impl fmt::Display) -> Self {
        Self::new(FailureKind::ConnectionReset, message)
    }

    pub fn element_not_found(message: impl fmt::Display) -> Self {
        Self::new(FailureKind::ElementNotFound, message)
    }

    pub fn malformed(message: impl fmt::Display) -> Self {
        Self::new(FailureKind::Malformed, message)
    }

    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        self.kind
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub const fn is_transient(&self) -> bool {
        self.kind.is_transient()
    }
}

/// Fetches raw marketplace detail for one locator.
///
/// Possibly slow, possibly failing; callers pace and retry around it.
#[async_trait]
pub trait MarketDetailSource: Send + Sync {
    async fn fetch_market_detail(
        &self,
        market: Marketplace,
        locator: &str,
    ) -> Result<RawDetail, SourceError>;
}
