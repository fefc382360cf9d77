//! Domain validation errors for core domain types.
//!
//! These errors are returned by `try_new` constructors when a value would
//! violate a domain invariant.
//!
//! # Examples
//!
//! ```
//! use arbscout::domain::error::DomainError;
//! use arbscout::domain::market::Marketplace;
//! use arbscout::domain::quote::MarketQuote;
//! use rust_decimal_macros::dec;
//!
//! let result = MarketQuote::try_new(Marketplace::Buff, dec!(0), 50, vec![]);
//! assert!(matches!(result, Err(DomainError::NonPositivePrice { .. })));
//! ```

use thiserror::Error;

use super::market::Marketplace;

/// Errors that occur when domain invariants are violated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Candidates must carry a non-empty name.
    #[error("candidate name cannot be empty")]
    EmptyName,

    /// Every candidate needs a locator for both marketplaces.
    #[error("missing {market} locator for candidate '{name}'")]
    MissingLocator {
        /// The candidate name.
        name: String,
        /// The marketplace whose locator is empty.
        market: Marketplace,
    },

    /// Quoted prices must be strictly positive.
    #[error("{market} price must be positive, got {price}")]
    NonPositivePrice {
        /// The marketplace that produced the quote.
        market: Marketplace,
        /// The invalid price.
        price: rust_decimal::Decimal,
    },

    /// Recent sale prices must be strictly positive.
    #[error("{market} recent sale must be positive, got {price}")]
    NonPositiveSale {
        /// The marketplace that produced the quote.
        market: Marketplace,
        /// The invalid sale price.
        price: rust_decimal::Decimal,
    },

    /// Exchange rates are divisors and must be positive.
    #[error("exchange rate must be positive, got {rate}")]
    NonPositiveRate {
        /// The invalid rate.
        rate: rust_decimal::Decimal,
    },

    /// Batches must be able to hold at least one record.
    #[error("batch capacity must be greater than zero")]
    ZeroBatchCapacity,
}
