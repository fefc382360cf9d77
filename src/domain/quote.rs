//! Normalized per-marketplace detail snapshot.

use super::error::DomainError;
use super::market::Marketplace;
use super::money::Price;

/// One marketplace's price, liquidity and recent-sale snapshot.
///
/// This is the only shape the evaluation engine accepts; raw collaborator
/// output is validated into it exactly once, in the detail fetcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketQuote {
    market: Marketplace,
    price: Price,
    listing_count: u32,
    /// Most recent first.
    recent_sales: Vec<Price>,
}

impl MarketQuote {
    /// Create a validated quote.
    ///
    /// # Errors
    ///
    /// Returns an error if the price or any recent sale is not positive.
    pub fn try_new(
        market: Marketplace,
        price: Price,
        listing_count: u32,
        recent_sales: Vec<Price>,
    ) -> Result<Self, DomainError> {
        if price <= Price::ZERO {
            return Err(DomainError::NonPositivePrice { market, price });
        }
        if let Some(&bad) = recent_sales.iter().find(|p| **p <= Price::ZERO) {
            return Err(DomainError::NonPositiveSale { market, price: bad });
        }
        Ok(Self {
            market,
            price,
            listing_count,
            recent_sales,
        })
    }

    #[must_use]
    pub const fn market(&self) -> Marketplace {
        self.market
    }

    /// Current price in the marketplace's native currency.
    #[must_use]
    pub const fn price(&self) -> Price {
        self.price
    }

    #[must_use]
    pub const fn listing_count(&self) -> u32 {
        self.listing_count
    }

    /// Recent trades, most recent first.
    #[must_use]
    pub fn recent_sales(&self) -> &[Price] {
        &self.recent_sales
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn accepts_positive_values() {
        let quote =
            MarketQuote::try_new(Marketplace::Steam, dec!(12.5), 80, vec![dec!(12), dec!(13)])
                .unwrap();
        assert_eq!(quote.price(), dec!(12.5));
        assert_eq!(quote.listing_count(), 80);
        assert_eq!(quote.recent_sales(), &[dec!(12), dec!(13)]);
    }

    #[test]
    fn rejects_non_positive_sale() {
        let result =
            MarketQuote::try_new(Marketplace::Buff, dec!(10), 50, vec![dec!(9), dec!(-1)]);
        assert_eq!(
            result,
            Err(DomainError::NonPositiveSale {
                market: Marketplace::Buff,
                price: dec!(-1)
            })
        );
    }
}
