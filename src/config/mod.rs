#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use toml_config::TomlConfig;

use serde::{Deserialize, Serialize};

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 20;
pub const ROTTEN_TOMATOES_BASE_URL: &str = "https://www.rottentomatoes.com";
pub const LETTERBOXD_BASE_URL: &str = "https://letterboxd.com";

/// Per-site endpoint settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteSettings {
    /// Empty when a TOML section leaves it out; filled with the site default on load.
    #[serde(default)]
    pub base_url: String,
    /// CORS relay prefix; the percent-encoded target URL is appended to it.
    #[serde(default)]
    pub relay: Option<String>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl SiteSettings {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            relay: None,
            enabled: true,
        }
    }

    pub fn rotten_tomatoes() -> Self {
        Self::new(ROTTEN_TOMATOES_BASE_URL)
    }

    pub fn letterboxd() -> Self {
        Self::new(LETTERBOXD_BASE_URL)
    }

    pub fn with_relay(mut self, relay: impl Into<String>) -> Self {
        self.relay = Some(relay.into());
        self
    }
}
