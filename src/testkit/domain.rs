//! Builders for domain primitives used across tests.
//!
//! Factory functions for [`Candidate`], [`RawDetail`] and evaluation results
//! so tests focus on assertions rather than construction boilerplate.

use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use serde_json::json;

use crate::domain::candidate::Candidate;
use crate::domain::evaluation::{
    AcceptedResult, DiscardReason, DiscardedResult, EvaluationResult, Fees,
};
use crate::domain::market::Marketplace;
use crate::domain::money::Price;
use crate::domain::quote::MarketQuote;
use crate::port::outbound::source::RawDetail;

/// Lowercase, dash-separated form of an item name.
pub fn slug(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// A candidate with locators `buff/<slug>` and `steam/<slug>`.
pub fn candidate(name: &str) -> Candidate {
    let slug = slug(name);
    Candidate::try_new(
        name,
        Some("Field-Tested".to_string()),
        false,
        format!("buff/{slug}"),
        format!("steam/{slug}"),
    )
    .expect("valid test candidate")
}

/// `n` candidates named `Item 0` .. `Item {n-1}`.
pub fn candidates(n: usize) -> Vec<Candidate> {
    (0..n).map(|i| candidate(&format!("Item {i}"))).collect()
}

/// A raw detail payload with an explicit price and listing count.
pub fn detail(price: u32, listing_count: u32) -> RawDetail {
    RawDetail::new(json!({
        "price": price,
        "listing_count": listing_count,
    }))
}

/// A raw detail payload that also carries recent sales.
pub fn detail_with_sales(price: u32, listing_count: u32, recent_sales: &[u32]) -> RawDetail {
    RawDetail::new(json!({
        "price": price,
        "listing_count": listing_count,
        "recent_sales": recent_sales,
    }))
}

/// A validated quote.
pub fn quote(market: Marketplace, price: Price, listing_count: u32) -> MarketQuote {
    MarketQuote::try_new(market, price, listing_count, Vec::new()).expect("valid test quote")
}

/// An accepted result with fixed prices and timestamp.
pub fn accepted(name: &str) -> EvaluationResult {
    EvaluationResult::Accepted(AcceptedResult::compute(
        candidate(name),
        Decimal::new(1234, 2),
        Decimal::new(1852, 2),
        Fees {
            buy: Decimal::new(25, 3),
            sell: Decimal::new(13, 2),
        },
        (80, 90),
        fixed_time(),
    ))
}

/// A result discarded for low liquidity.
pub fn discarded(name: &str) -> EvaluationResult {
    discarded_for(name, DiscardReason::LowLiquidity)
}

/// A result discarded with the given reason.
pub fn discarded_for(name: &str, reason: DiscardReason) -> EvaluationResult {
    EvaluationResult::Discarded(DiscardedResult::new(
        candidate(name),
        reason,
        format!("test discard: {reason}"),
        fixed_time(),
    ))
}

fn fixed_time() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0)
        .single()
        .unwrap_or_else(Utc::now)
}
