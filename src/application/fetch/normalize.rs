//! Validation of raw collaborator output into [`MarketQuote`].
//!
//! This is the single place loosely-shaped detail payloads are interpreted.
//! Missing fields are `element_not_found`; present but unusable fields are
//! `malformed`.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::Value;

use crate::domain::market::Marketplace;
use crate::domain::money::Price;
use crate::domain::quote::MarketQuote;
use crate::port::outbound::source::{RawDetail, SourceError};

/// How raw listings and sale history are condensed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuoteShape {
    /// Listings averaged when no explicit price is given.
    pub listing_sample: usize,
    /// Recent sales kept, most recent first.
    pub history_len: usize,
}

impl Default for QuoteShape {
    fn default() -> Self {
        Self {
            listing_sample: 5,
            history_len: 10,
        }
    }
}

/// Normalize one marketplace's raw detail.
///
/// # Errors
///
/// Returns a structural [`SourceError`] when the payload lacks a price or a
/// listing count, or when a value cannot be read as a positive number.
pub fn normalize(
    market: Marketplace,
    raw: &RawDetail,
    shape: QuoteShape,
) -> Result<MarketQuote, SourceError> {
    let listings = match non_null(raw.field("listings")) {
        Some(value) => Some(decimal_array(value, "listings")?),
        None => None,
    };

    let price = match non_null(raw.field("price")) {
        Some(value) => decimal(value, "price")?,
        None => {
            let sample: Vec<Price> = listings
                .as_deref()
                .unwrap_or_default()
                .iter()
                .take(shape.listing_sample.max(1))
                .copied()
                .collect();
            if sample.is_empty() {
                return Err(SourceError::element_not_found(
                    "neither price nor listings present",
                ));
            }
            let sum: Price = sample.iter().copied().sum();
            sum / Decimal::from(sample.len() as u64)
        }
    };

    let listing_count = match non_null(raw.field("listing_count")) {
        Some(value) => count(value)?,
        None => match &listings {
            Some(listings) => u32::try_from(listings.len()).unwrap_or(u32::MAX),
            None => return Err(SourceError::element_not_found("listing_count")),
        },
    };

    let mut recent_sales = match non_null(raw.field("recent_sales")) {
        Some(value) => decimal_array(value, "recent_sales")?,
        None => Vec::new(),
    };
    recent_sales.truncate(shape.history_len);

    MarketQuote::try_new(market, price, listing_count, recent_sales)
        .map_err(SourceError::malformed)
}

fn non_null(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

fn decimal(value: &Value, field: &str) -> Result<Decimal, SourceError> {
    let parsed = match value {
        Value::Number(n) => {
            let text = n.to_string();
            Decimal::from_str(&text)
                .or_else(|_| Decimal::from_scientific(&text))
                .map_err(|e| e.to_string())
        }
        Value::String(s) => parse_price_text(s),
        _ => return Err(SourceError::malformed(format!("{field}: expected a number"))),
    };
    parsed.map_err(|e| SourceError::malformed(format!("{field}: {e}")))
}

/// Accepts display strings such as `"¥ 1,234.50"`, `"12.30€"` or `"12,30€"`.
///
/// A single comma followed by exactly two digits, with no `.`, is a decimal
/// separator. Otherwise commas must group the integer part in threes.
fn parse_price_text(text: &str) -> Result<Decimal, String> {
    let trimmed = text
        .trim()
        .trim_matches(|c: char| !(c.is_ascii_digit() || c == '-' || c == '.'));
    if !trimmed.contains(',') {
        return Decimal::from_str(trimmed).map_err(|e| e.to_string());
    }

    let ambiguous = || format!("ambiguous separators in {text:?}");
    let (integer, fraction) = match trimmed.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (trimmed, None),
    };
    if fraction.is_some_and(|f| f.contains(',')) {
        return Err(ambiguous());
    }

    let groups: Vec<&str> = integer.split(',').collect();
    let digits = |g: &str| !g.is_empty() && g.bytes().all(|b| b.is_ascii_digit());
    let head = groups[0].strip_prefix('-').unwrap_or(groups[0]);

    let normalized = match groups.as_slice() {
        [whole, cents] if fraction.is_none() && cents.len() == 2 && digits(*cents) => {
            format!("{whole}.{cents}")
        }
        [_, rest @ ..]
            if (1..=3).contains(&head.len())
                && digits(head)
                && rest.iter().all(|g| g.len() == 3 && digits(*g)) =>
        {
            let mut joined = groups.concat();
            if let Some(fraction) = fraction {
                joined.push('.');
                joined.push_str(fraction);
            }
            joined
        }
        _ => return Err(ambiguous()),
    };
    Decimal::from_str(&normalized).map_err(|e| e.to_string())
}

fn decimal_array(value: &Value, field: &str) -> Result<Vec<Decimal>, SourceError> {
    let items = value
        .as_array()
        .ok_or_else(|| SourceError::malformed(format!("{field}: expected an array")))?;
    items.iter().map(|item| decimal(item, field)).collect()
}

fn count(value: &Value) -> Result<u32, SourceError> {
    let n = match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().replace(',', "").parse::<u64>().ok(),
        _ => None,
    };
    n.and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| SourceError::malformed("listing_count: expected a non-negative integer"))
}
