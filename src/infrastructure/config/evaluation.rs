//! Evaluation rule settings.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::application::fetch::normalize::QuoteShape;
use crate::domain::evaluation::{EvaluationRules, Fees};
use crate::domain::pricing::ExchangeRate;
use crate::error::{ConfigError, Result};

/// `[evaluation]` section: currency, fees and acceptance thresholds.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct EvaluationConfig {
    /// Source currency units per reporting currency unit (CNY per EUR).
    #[serde(default = "default_exchange_rate")]
    pub exchange_rate: Decimal,
    /// Fraction added to the buy price.
    #[serde(default = "default_buy_fee_rate")]
    pub buy_fee_rate: Decimal,
    /// Fraction removed from the sell price.
    #[serde(default = "default_sell_fee_rate")]
    pub sell_fee_rate: Decimal,
    #[serde(default = "default_min_listings")]
    pub min_listings: u32,
    /// Recent sales averaged by the volatility check.
    #[serde(default = "default_volatility_window")]
    pub volatility_window: usize,
    #[serde(default = "default_volatility_threshold_pct")]
    pub volatility_threshold_pct: Decimal,
    /// ROI must strictly exceed this.
    #[serde(default)]
    pub min_roi_pct: Decimal,
    /// Listings averaged when a detail has no explicit price.
    #[serde(default = "default_listing_sample")]
    pub listing_sample: usize,
    /// Recent sales kept per quote.
    #[serde(default = "default_history_len")]
    pub history_len: usize,
}

impl EvaluationConfig {
    /// Build the evaluator rule set.
    ///
    /// # Errors
    ///
    /// Returns an error for a non-positive exchange rate.
    pub fn rules(&self) -> Result<EvaluationRules> {
        Ok(EvaluationRules {
            exchange_rate: ExchangeRate::try_new(self.exchange_rate)?,
            fees: Fees {
                buy: self.buy_fee_rate,
                sell: self.sell_fee_rate,
            },
            min_listings: self.min_listings,
            volatility_window: self.volatility_window,
            volatility_threshold_pct: self.volatility_threshold_pct,
            min_roi_pct: self.min_roi_pct,
        })
    }

    #[must_use]
    pub const fn shape(&self) -> QuoteShape {
        QuoteShape {
            listing_sample: self.listing_sample,
            history_len: self.history_len,
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.exchange_rate <= Decimal::ZERO {
            return Err(invalid("exchange_rate", "must be greater than 0"));
        }
        for (field, rate) in [
            ("buy_fee_rate", self.buy_fee_rate),
            ("sell_fee_rate", self.sell_fee_rate),
        ] {
            if rate < Decimal::ZERO || rate >= Decimal::ONE {
                return Err(invalid(field, "must be a fraction in [0, 1)"));
            }
        }
        if self.volatility_threshold_pct < Decimal::ZERO
            || self.volatility_threshold_pct > Decimal::ONE_HUNDRED
        {
            return Err(invalid("volatility_threshold_pct", "must be between 0 and 100"));
        }
        if self.volatility_window == 0 {
            return Err(invalid("volatility_window", "must be greater than 0"));
        }
        if self.listing_sample == 0 {
            return Err(invalid("listing_sample", "must be greater than 0"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: &str) -> crate::error::Error {
    ConfigError::InvalidValue {
        field,
        reason: reason.to_string(),
    }
    .into()
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            exchange_rate: default_exchange_rate(),
            buy_fee_rate: default_buy_fee_rate(),
            sell_fee_rate: default_sell_fee_rate(),
            min_listings: default_min_listings(),
            volatility_window: default_volatility_window(),
            volatility_threshold_pct: default_volatility_threshold_pct(),
            min_roi_pct: Decimal::ZERO,
            listing_sample: default_listing_sample(),
            history_len: default_history_len(),
        }
    }
}

const fn default_exchange_rate() -> Decimal {
    Decimal::from_parts(81, 0, 0, false, 1)
}

const fn default_buy_fee_rate() -> Decimal {
    Decimal::from_parts(25, 0, 0, false, 3)
}

const fn default_sell_fee_rate() -> Decimal {
    Decimal::from_parts(13, 0, 0, false, 2)
}

const fn default_min_listings() -> u32 {
    40
}

const fn default_volatility_window() -> usize {
    5
}

const fn default_volatility_threshold_pct() -> Decimal {
    Decimal::from_parts(10, 0, 0, false, 0)
}

const fn default_listing_sample() -> usize {
    5
}

const fn default_history_len() -> usize {
    10
}
