//! Path utilities for arbscout.
//!
//! Operator files live under `~/.arbscout/`:
//! - `~/.arbscout/config.toml` - main configuration

use std::path::PathBuf;

/// Returns the arbscout home directory (`~/.arbscout/`).
pub fn home_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".arbscout")
}

/// Returns the default config file path (`~/.arbscout/config.toml`).
pub fn default_config() -> PathBuf {
    home_dir().join("config.toml")
}
