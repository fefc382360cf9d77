//! The two marketplaces an arbitrage spans.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Upstream marketplace queried for a candidate.
///
/// BUFF is the buy side (quoted in CNY) and the Steam community market is
/// the sell side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Marketplace {
    /// BUFF163, where positions are bought.
    Buff,
    /// Steam community market, where positions are sold.
    Steam,
}

impl Marketplace {
    /// Both marketplaces, buy side first.
    pub const ALL: [Marketplace; 2] = [Marketplace::Buff, Marketplace::Steam];

    /// Stable lowercase identifier used in logs and persisted rows.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Buff => "buff",
            Self::Steam => "steam",
        }
    }

    /// Index into per-marketplace arrays.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Buff => 0,
            Self::Steam => 1,
        }
    }

    /// True for the side where positions are entered.
    #[must_use]
    pub const fn is_buy_side(self) -> bool {
        matches!(self, Self::Buff)
    }
}

impl fmt::Display for Marketplace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
