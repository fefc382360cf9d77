//! Monetary types for price and rate representation.

use rust_decimal::{Decimal, RoundingStrategy};

/// Price represented as a Decimal for precision.
pub type Price = Decimal;

/// Fractional or percentage rate represented as a Decimal.
pub type Rate = Decimal;

/// Round a monetary amount to cents for display and persistence.
#[must_use]
pub fn round_cents(amount: Price) -> Price {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn round_cents_rounds_half_away_from_zero() {
        assert_eq!(round_cents(dec!(1.005)), dec!(1.01));
        assert_eq!(round_cents(dec!(-1.005)), dec!(-1.01));
        assert_eq!(round_cents(dec!(12.344)), dec!(12.34));
    }
}
