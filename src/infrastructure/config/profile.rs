//! Anti-ban profiles.
//!
//! A profile presets the scrape concurrency and per-source pacing. `custom`
//! leaves the explicitly configured `[pipeline]` and `[pacing]` values alone.

use serde::{Deserialize, Serialize};

use crate::application::pipeline::config::PipelineConfig;
use crate::application::policy::config::{PacingConfig, SourcePacing};

/// Scraping aggressiveness preset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// One worker, long randomized delays.
    Safe,
    /// Two workers, moderate delays.
    Balanced,
    /// Four workers, short delays. Highest ban risk.
    Fast,
    /// One worker, the longest delays.
    Stealth,
    /// Use the `[pipeline]` and `[pacing]` values as written.
    #[default]
    Custom,
}

/// Concurrency and pacing a profile forces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfilePreset {
    pub scrape_workers: usize,
    pub buff: SourcePacing,
    pub steam: SourcePacing,
}

impl Profile {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Safe => "safe",
            Self::Balanced => "balanced",
            Self::Fast => "fast",
            Self::Stealth => "stealth",
            Self::Custom => "custom",
        }
    }

    /// Preset values, or `None` for [`Profile::Custom`].
    #[must_use]
    pub const fn preset(self) -> Option<ProfilePreset> {
        let (scrape_workers, buff, steam) = match self {
            Self::Safe => (1, SourcePacing::new(2_000, 3_000), SourcePacing::new(5_000, 3_000)),
            Self::Balanced => (2, SourcePacing::new(1_000, 2_000), SourcePacing::new(3_000, 2_000)),
            Self::Fast => (4, SourcePacing::new(500, 500), SourcePacing::new(1_500, 1_000)),
            Self::Stealth => (1, SourcePacing::new(5_000, 5_000), SourcePacing::new(8_000, 5_000)),
            Self::Custom => return None,
        };
        Some(ProfilePreset {
            scrape_workers,
            buff,
            steam,
        })
    }

    /// Overwrite worker count and pacing with the preset, if any.
    pub fn apply(self, pipeline: &mut PipelineConfig, pacing: &mut PacingConfig) {
        if let Some(preset) = self.preset() {
            pipeline.scrape_workers = preset.scrape_workers;
            pacing.buff = preset.buff;
            pacing.steam = preset.steam;
        }
    }
}

impl std::fmt::Display for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
