//! Evaluation engine: turns a quote pair into a strict accepted/discarded
//! outcome.
//!
//! Checks run in a fixed order so the discard reason is the most specific
//! one: liquidity, then volatility, then profitability.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::candidate::Candidate;
use super::market::Marketplace;
use super::money::{Price, Rate};
use super::pricing::{
    buy_cost, check_liquidity, check_volatility, compute_profit, compute_roi, convert, sell_net,
    ExchangeRate,
};
use super::quote::MarketQuote;

/// Closed set of reasons a candidate is discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscardReason {
    /// Detail could not be extracted (structural failure or exhausted retries).
    ExtractionFailed,
    /// A marketplace was marked unavailable by the circuit breaker.
    SourceUnavailable,
    /// Listing count below the configured minimum on either side.
    LowLiquidity,
    /// Recent trades contradict the quoted price.
    VolatilePrice,
    /// ROI does not exceed the configured minimum.
    Unprofitable,
}

impl DiscardReason {
    pub const ALL: [DiscardReason; 5] = [
        DiscardReason::ExtractionFailed,
        DiscardReason::SourceUnavailable,
        DiscardReason::LowLiquidity,
        DiscardReason::VolatilePrice,
        DiscardReason::Unprofitable,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ExtractionFailed => "extraction_failed",
            Self::SourceUnavailable => "source_unavailable",
            Self::LowLiquidity => "low_liquidity",
            Self::VolatilePrice => "volatile_price",
            Self::Unprofitable => "unprofitable",
        }
    }
}

impl fmt::Display for DiscardReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fee schedule for the two sides of the trade (fractions).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fees {
    pub buy: Rate,
    pub sell: Rate,
}

/// A candidate whose quote pair passed every check.
///
/// All prices are in the reporting currency. The derived fields are computed
/// in [`AcceptedResult::compute`], so `profit == steam_net - buff_cost` and
/// `roi_pct == profit / buff_cost * 100` always hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AcceptedResult {
    candidate: Candidate,
    buff_price: Price,
    steam_price: Price,
    buff_cost: Price,
    steam_net: Price,
    profit: Price,
    roi_pct: Rate,
    buff_listings: u32,
    steam_listings: u32,
    evaluated_at: DateTime<Utc>,
}

impl AcceptedResult {
    /// Derive cost, net, profit and ROI from converted prices.
    #[must_use]
    pub fn compute(
        candidate: Candidate,
        buff_price: Price,
        steam_price: Price,
        fees: Fees,
        listings: (u32, u32),
        evaluated_at: DateTime<Utc>,
    ) -> Self {
        let profit = compute_profit(buff_price, steam_price, fees.buy, fees.sell);
        Self {
            candidate,
            buff_price,
            steam_price,
            buff_cost: buy_cost(buff_price, fees.buy),
            steam_net: sell_net(steam_price, fees.sell),
            profit,
            roi_pct: compute_roi(profit, buff_price, fees.buy),
            buff_listings: listings.0,
            steam_listings: listings.1,
            evaluated_at,
        }
    }

    #[must_use]
    pub const fn candidate(&self) -> &Candidate {
        &self.candidate
    }

    /// Converted BUFF (buy side) price before fees.
    #[must_use]
    pub const fn buff_price(&self) -> Price {
        self.buff_price
    }

    /// Converted Steam (sell side) price before fees.
    #[must_use]
    pub const fn steam_price(&self) -> Price {
        self.steam_price
    }

    #[must_use]
    pub const fn buff_cost(&self) -> Price {
        self.buff_cost
    }

    #[must_use]
    pub const fn steam_net(&self) -> Price {
        self.steam_net
    }

    #[must_use]
    pub const fn profit(&self) -> Price {
        self.profit
    }

    #[must_use]
    pub const fn roi_pct(&self) -> Rate {
        self.roi_pct
    }

    #[must_use]
    pub const fn listings(&self, market: Marketplace) -> u32 {
        match market {
            Marketplace::Buff => self.buff_listings,
            Marketplace::Steam => self.steam_listings,
        }
    }

    #[must_use]
    pub const fn evaluated_at(&self) -> DateTime<Utc> {
        self.evaluated_at
    }
}

/// A candidate that was filtered out or could not be fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscardedResult {
    candidate: Candidate,
    reason: DiscardReason,
    detail: String,
    discarded_at: DateTime<Utc>,
}

impl DiscardedResult {
    #[must_use]
    pub fn new(
        candidate: Candidate,
        reason: DiscardReason,
        detail: impl Into<String>,
        discarded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            candidate,
            reason,
            detail: detail.into(),
            discarded_at,
        }
    }

    #[must_use]
    pub const fn candidate(&self) -> &Candidate {
        &self.candidate
    }

    #[must_use]
    pub const fn reason(&self) -> DiscardReason {
        self.reason
    }

    /// Free-form context for the side report.
    #[must_use]
    pub fn detail(&self) -> &str {
        &self.detail
    }

    #[must_use]
    pub const fn discarded_at(&self) -> DateTime<Utc> {
        self.discarded_at
    }
}

/// Outcome of evaluating one candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum EvaluationResult {
    Accepted(AcceptedResult),
    Discarded(DiscardedResult),
}

impl EvaluationResult {
    #[must_use]
    pub const fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }

    /// Discard reason, if discarded.
    #[must_use]
    pub const fn discard_reason(&self) -> Option<DiscardReason> {
        match self {
            Self::Accepted(_) => None,
            Self::Discarded(d) => Some(d.reason),
        }
    }

    #[must_use]
    pub const fn candidate(&self) -> &Candidate {
        match self {
            Self::Accepted(a) => &a.candidate,
            Self::Discarded(d) => &d.candidate,
        }
    }
}

/// Thresholds and constants the engine evaluates against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvaluationRules {
    pub exchange_rate: ExchangeRate,
    pub fees: Fees,
    pub min_listings: u32,
    pub volatility_window: usize,
    pub volatility_threshold_pct: Rate,
    pub min_roi_pct: Rate,
}

/// Stateless evaluation engine.
#[derive(Debug, Clone)]
pub struct Evaluator {
    rules: EvaluationRules,
}

impl Evaluator {
    #[must_use]
    pub const fn new(rules: EvaluationRules) -> Self {
        Self { rules }
    }

    #[must_use]
    pub const fn rules(&self) -> &EvaluationRules {
        &self.rules
    }

    /// Liquidity guard applied to both sides; names the first failing side.
    #[must_use]
    pub fn liquidity_shortfall<'a>(
        &self,
        quotes: impl IntoIterator<Item = &'a MarketQuote>,
    ) -> Option<&'a MarketQuote> {
        quotes
            .into_iter()
            .find(|q| !check_liquidity(q.listing_count(), self.rules.min_listings))
    }

    /// Evaluate a BUFF/Steam quote pair for `candidate`.
    ///
    /// Deterministic: the same inputs always produce the same result.
    #[must_use]
    pub fn evaluate(
        &self,
        candidate: &Candidate,
        buff: &MarketQuote,
        steam: &MarketQuote,
        now: DateTime<Utc>,
    ) -> EvaluationResult {
        let rules = &self.rules;
        let discard = |reason, detail: String| {
            EvaluationResult::Discarded(DiscardedResult::new(
                candidate.clone(),
                reason,
                detail,
                now,
            ))
        };

        if let Some(thin) = self.liquidity_shortfall([buff, steam]) {
            return discard(
                DiscardReason::LowLiquidity,
                format!(
                    "{} listings {} below minimum {}",
                    thin.market(),
                    thin.listing_count(),
                    rules.min_listings
                ),
            );
        }

        for quote in [buff, steam] {
            if !check_volatility(
                quote.recent_sales(),
                quote.price(),
                rules.volatility_window,
                rules.volatility_threshold_pct,
            ) {
                return discard(
                    DiscardReason::VolatilePrice,
                    format!(
                        "{} recent sales more than {}% below {}",
                        quote.market(),
                        rules.volatility_threshold_pct,
                        quote.price()
                    ),
                );
            }
        }

        let accepted = AcceptedResult::compute(
            candidate.clone(),
            convert(buff.price(), rules.exchange_rate),
            convert(steam.price(), rules.exchange_rate),
            rules.fees,
            (buff.listing_count(), steam.listing_count()),
            now,
        );

        if accepted.roi_pct <= rules.min_roi_pct {
            return discard(
                DiscardReason::Unprofitable,
                format!(
                    "roi {}% does not exceed {}%",
                    accepted.roi_pct.round_dp(2),
                    rules.min_roi_pct
                ),
            );
        }

        EvaluationResult::Accepted(accepted)
    }
}
