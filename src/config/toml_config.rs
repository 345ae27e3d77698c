use crate::config::{
    SiteSettings, DEFAULT_TIMEOUT_SECONDS, DEFAULT_USER_AGENT, LETTERBOXD_BASE_URL,
    ROTTEN_TOMATOES_BASE_URL,
};
use crate::domain::model::Site;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{Result, ScoutError};
use crate::utils::validation::{validate_range, validate_url, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub sites: SitesConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SitesConfig {
    #[serde(default = "SiteSettings::rotten_tomatoes")]
    pub rotten_tomatoes: SiteSettings,
    #[serde(default = "SiteSettings::letterboxd")]
    pub letterboxd: SiteSettings,
}

impl SitesConfig {
    /// Gives sections that only set a relay or `enabled` the site's own base URL.
    fn fill_default_base_urls(&mut self) {
        for (settings, default) in [
            (&mut self.rotten_tomatoes, ROTTEN_TOMATOES_BASE_URL),
            (&mut self.letterboxd, LETTERBOXD_BASE_URL),
        ] {
            if settings.base_url.trim().is_empty() {
                settings.base_url = default.to_string();
            }
        }
    }
}

impl Default for SitesConfig {
    fn default() -> Self {
        Self {
            rotten_tomatoes: SiteSettings::rotten_tomatoes(),
            letterboxd: SiteSettings::letterboxd(),
        }
    }
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env var pattern"))
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ScoutError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        let mut config: Self =
            toml::from_str(&processed_content).map_err(|e| ScoutError::ConfigValidationError {
                field: "toml_parsing".to_string(),
                message: format!("TOML parsing error: {}", e),
            })?;
        config.sites.fill_default_base_urls();
        Ok(config)
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are left as-is.
    fn substitute_env_vars(content: &str) -> String {
        env_var_pattern()
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn site_mut(&mut self, site: Site) -> &mut SiteSettings {
        match site {
            Site::RottenTomatoes => &mut self.sites.rotten_tomatoes,
            Site::Letterboxd => &mut self.sites.letterboxd,
        }
    }
}

impl ConfigProvider for TomlConfig {
    fn timeout_seconds(&self) -> u64 {
        self.http.timeout_seconds
    }

    fn user_agent(&self) -> &str {
        &self.http.user_agent
    }

    fn site_settings(&self, site: Site) -> &SiteSettings {
        match site {
            Site::RottenTomatoes => &self.sites.rotten_tomatoes,
            Site::Letterboxd => &self.sites.letterboxd,
        }
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_range("http.timeout_seconds", self.http.timeout_seconds, 1, 300)?;

        if self.http.user_agent.trim().is_empty() {
            return Err(ScoutError::InvalidConfigValueError {
                field: "http.user_agent".to_string(),
                value: self.http.user_agent.clone(),
                reason: "User agent cannot be empty".to_string(),
            });
        }

        for (key, settings) in [
            ("sites.rotten_tomatoes", &self.sites.rotten_tomatoes),
            ("sites.letterboxd", &self.sites.letterboxd),
        ] {
            validate_url(&format!("{}.base_url", key), &settings.base_url)?;
            if let Some(relay) = &settings.relay {
                validate_url(&format!("{}.relay", key), relay)?;
            }
        }

        if !self.sites.rotten_tomatoes.enabled && !self.sites.letterboxd.enabled {
            return Err(ScoutError::ConfigError {
                message: "At least one review site must be enabled".to_string(),
            });
        }

        Ok(())
    }
}
