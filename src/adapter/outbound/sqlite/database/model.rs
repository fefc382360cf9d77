//! Database model types for Diesel ORM.

use diesel::prelude::*;

use super::schema::accepted_results;
use crate::domain::evaluation::AcceptedResult;
use crate::domain::market::Marketplace;

/// Database row for an accepted result (insertable).
///
/// Monetary values are stored as decimal text so no precision is lost.
#[derive(Insertable, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = accepted_results)]
pub struct NewAcceptedRow {
    pub source: String,
    pub name: String,
    pub quality: Option<String>,
    pub rare: bool,
    pub buff_locator: String,
    pub steam_locator: String,
    pub buff_price: String,
    pub steam_price: String,
    pub buff_cost: String,
    pub steam_net: String,
    pub profit: String,
    pub roi_pct: String,
    pub buff_listings: i32,
    pub steam_listings: i32,
    pub evaluated_at: String,
}

impl NewAcceptedRow {
    /// Build a row tagged with the run that produced it.
    #[must_use]
    pub fn from_result(source: &str, result: &AcceptedResult) -> Self {
        let candidate = result.candidate();
        Self {
            source: source.to_string(),
            name: candidate.name().to_string(),
            quality: candidate.quality().map(str::to_string),
            rare: candidate.is_rare(),
            buff_locator: candidate.locator(Marketplace::Buff).to_string(),
            steam_locator: candidate.locator(Marketplace::Steam).to_string(),
            buff_price: result.buff_price().to_string(),
            steam_price: result.steam_price().to_string(),
            buff_cost: result.buff_cost().to_string(),
            steam_net: result.steam_net().to_string(),
            profit: result.profit().to_string(),
            roi_pct: result.roi_pct().to_string(),
            buff_listings: listing_column(result.listings(Marketplace::Buff)),
            steam_listings: listing_column(result.listings(Marketplace::Steam)),
            evaluated_at: result.evaluated_at().to_rfc3339(),
        }
    }
}

/// Database row for an accepted result (queryable).
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = accepted_results)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AcceptedRow {
    pub id: Option<i32>,
    pub source: String,
    pub name: String,
    pub quality: Option<String>,
    pub rare: bool,
    pub buff_locator: String,
    pub steam_locator: String,
    pub buff_price: String,
    pub steam_price: String,
    pub buff_cost: String,
    pub steam_net: String,
    pub profit: String,
    pub roi_pct: String,
    pub buff_listings: i32,
    pub steam_listings: i32,
    pub evaluated_at: String,
}

fn listing_column(count: u32) -> i32 {
    i32::try_from(count).unwrap_or(i32::MAX)
}
