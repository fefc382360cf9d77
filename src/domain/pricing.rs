//! Pure pricing rules: conversion, fee-adjusted profit, ROI and the
//! liquidity/volatility guards.
//!
//! Fees are fractions (`0.13` is 13%); ROI and volatility thresholds are
//! percentages. The canonical ROI formula is the fee-explicit one:
//!
//! ```text
//! profit = sell * (1 - sell_fee) - buy * (1 + buy_fee)
//! roi    = profit / (buy * (1 + buy_fee)) * 100
//! ```

use rust_decimal::Decimal;

use super::error::DomainError;
use super::money::{Price, Rate};

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Native-currency units per reporting-currency unit (e.g. CNY per EUR).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExchangeRate(Rate);

impl ExchangeRate {
    /// # Errors
    ///
    /// Returns [`DomainError::NonPositiveRate`] unless `rate > 0`.
    pub fn try_new(rate: Rate) -> Result<Self, DomainError> {
        if rate <= Rate::ZERO {
            return Err(DomainError::NonPositiveRate { rate });
        }
        Ok(Self(rate))
    }

    #[must_use]
    pub const fn value(self) -> Rate {
        self.0
    }
}

/// Convert a native price into the reporting currency.
#[must_use]
pub fn convert(price: Price, rate: ExchangeRate) -> Price {
    price / rate.0
}

/// Buy price including the buy-side fee.
#[must_use]
pub fn buy_cost(buy_price: Price, buy_fee: Rate) -> Price {
    buy_price * (Decimal::ONE + buy_fee)
}

/// Sell price net of the sell-side fee.
#[must_use]
pub fn sell_net(sell_price: Price, sell_fee: Rate) -> Price {
    sell_price * (Decimal::ONE - sell_fee)
}

/// Fee-adjusted profit of buying at `buy_price` and selling at `sell_price`.
#[must_use]
pub fn compute_profit(buy_price: Price, sell_price: Price, buy_fee: Rate, sell_fee: Rate) -> Price {
    sell_net(sell_price, sell_fee) - buy_cost(buy_price, buy_fee)
}

/// Return on the fee-inclusive investment, as a percentage.
///
/// Returns zero when the investment is zero.
#[must_use]
pub fn compute_roi(profit: Price, buy_price: Price, buy_fee: Rate) -> Rate {
    let investment = buy_cost(buy_price, buy_fee);
    if investment.is_zero() {
        return Rate::ZERO;
    }
    profit / investment * HUNDRED
}

/// Guard against quoting a price that recent trades contradict.
///
/// Takes the mean of the most recent `window` sales and fails when that mean
/// sits more than `threshold_pct` percent below `current_price`. An empty
/// history passes: there is nothing to contradict the quote.
#[must_use]
pub fn check_volatility(
    recent_sales: &[Price],
    current_price: Price,
    window: usize,
    threshold_pct: Rate,
) -> bool {
    let take = window.min(recent_sales.len());
    if take == 0 {
        return true;
    }
    let sum: Price = recent_sales[..take].iter().copied().sum();
    let mean = sum / Decimal::from(take as u64);
    let floor = current_price * (HUNDRED - threshold_pct) / HUNDRED;
    mean >= floor
}

/// Listing-count threshold.
#[must_use]
pub const fn check_liquidity(listing_count: u32, minimum: u32) -> bool {
    listing_count >= minimum
}
