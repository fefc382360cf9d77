//! Detail service endpoints and HTTP client settings.

use serde::{Deserialize, Serialize};

use crate::domain::market::Marketplace;

/// Where detail requests for each marketplace are sent.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SourcesConfig {
    /// Base URL that relative BUFF locators are joined onto.
    #[serde(default = "default_buff_base_url")]
    pub buff_base_url: String,
    /// Base URL that relative Steam locators are joined onto.
    #[serde(default = "default_steam_base_url")]
    pub steam_base_url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
}

impl SourcesConfig {
    #[must_use]
    pub fn base_url(&self, market: Marketplace) -> &str {
        match market {
            Marketplace::Buff => &self.buff_base_url,
            Marketplace::Steam => &self.steam_base_url,
        }
    }
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            buff_base_url: default_buff_base_url(),
            steam_base_url: default_steam_base_url(),
            user_agent: default_user_agent(),
            connect_timeout_ms: default_connect_timeout_ms(),
        }
    }
}

fn default_buff_base_url() -> String {
    "http://127.0.0.1:8700/buff/".into()
}

fn default_steam_base_url() -> String {
    "http://127.0.0.1:8700/steam/".into()
}

fn default_user_agent() -> String {
    concat!("arbscout/", env!("CARGO_PKG_VERSION")).into()
}

const fn default_connect_timeout_ms() -> u64 {
    5_000
}
