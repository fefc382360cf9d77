//! Candidate rows discovered upstream.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::market::Marketplace;

/// One tradable item worth evaluating.
///
/// Immutable once produced. The locators are opaque to the pipeline and are
/// handed to the detail source as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    name: String,
    #[serde(default)]
    quality: Option<String>,
    #[serde(default, alias = "stattrak")]
    rare: bool,
    #[serde(alias = "buff_url")]
    buff_locator: String,
    #[serde(alias = "steam_url")]
    steam_locator: String,
}

impl Candidate {
    /// Create a validated candidate.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::EmptyName`] for a blank name and
    /// [`DomainError::MissingLocator`] when either locator is blank.
    pub fn try_new(
        name: impl Into<String>,
        quality: Option<String>,
        rare: bool,
        buff_locator: impl Into<String>,
        steam_locator: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let candidate = Self {
            name: name.into(),
            quality,
            rare,
            buff_locator: buff_locator.into(),
            steam_locator: steam_locator.into(),
        };
        candidate.validate()?;
        Ok(candidate)
    }

    /// Check invariants on a candidate built through deserialization.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Candidate::try_new`].
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::EmptyName);
        }
        for market in Marketplace::ALL {
            if self.locator(market).trim().is_empty() {
                return Err(DomainError::MissingLocator {
                    name: self.name.clone(),
                    market,
                });
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Quality/variant tag (wear tier), if any.
    #[must_use]
    pub fn quality(&self) -> Option<&str> {
        self.quality.as_deref()
    }

    /// Rarity flag (StatTrak variant).
    #[must_use]
    pub const fn is_rare(&self) -> bool {
        self.rare
    }

    /// Detail-fetch locator for the given marketplace.
    #[must_use]
    pub fn locator(&self, market: Marketplace) -> &str {
        match market {
            Marketplace::Buff => &self.buff_locator,
            Marketplace::Steam => &self.steam_locator,
        }
    }

    /// Human-readable label, e.g. `ST AK-47 | Redline (FT)`.
    #[must_use]
    pub fn display_name(&self) -> String {
        let prefix = if self.rare { "ST " } else { "" };
        match &self.quality {
            Some(quality) => format!("{prefix}{} ({quality})", self.name),
            None => format!("{prefix}{}", self.name),
        }
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name())
    }
}
