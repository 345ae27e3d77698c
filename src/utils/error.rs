use crate::domain::model::Site;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScoutError {
    #[error("Movie '{title}' not found on {site}")]
    NotFound { site: Site, title: String },

    #[error("HTTP request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("No score could be extracted from {site} page {url}")]
    NoScoreExtracted { site: Site, url: String },

    #[error("Could not find movie title on this page")]
    MissingTitle,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The site has no result for this movie; never fatal.
    Lookup,
    Network,
    Input,
    Configuration,
    System,
}

impl ScoutError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ScoutError::NotFound { .. } | ScoutError::NoScoreExtracted { .. } => {
                ErrorCategory::Lookup
            }
            ScoutError::Network(_) | ScoutError::HttpStatus { .. } => ErrorCategory::Network,
            ScoutError::MissingTitle | ScoutError::ValidationError { .. } => ErrorCategory::Input,
            ScoutError::ConfigError { .. }
            | ScoutError::ConfigValidationError { .. }
            | ScoutError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            ScoutError::IoError(_) | ScoutError::SerializationError(_) => ErrorCategory::System,
        }
    }

    /// Process exit code used by the CLI.
    pub fn exit_code(&self) -> i32 {
        match self.category() {
            ErrorCategory::Input | ErrorCategory::Configuration => 1,
            ErrorCategory::Lookup | ErrorCategory::Network => 2,
            ErrorCategory::System => 3,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ScoutError::MissingTitle => {
                "Could not find movie title on this page. Please make sure you are on a movie page."
                    .to_string()
            }
            ScoutError::NotFound { site, title } => {
                format!("Movie '{}' not found on {}", title, site)
            }
            ScoutError::NoScoreExtracted { site, .. } => {
                format!("{} page found, but it carries no readable score", site)
            }
            ScoutError::Network(e) => format!("Network request failed: {}", e),
            ScoutError::HttpStatus { status, .. } => {
                format!("Review site answered with HTTP {}", status)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Lookup => {
                "Try refreshing the page or check if the movie exists on Rotten Tomatoes."
            }
            ErrorCategory::Network => "Check your network connection or configure a relay.",
            ErrorCategory::Input => "Pass --title (and optionally --year) or a movie page.",
            ErrorCategory::Configuration => "Check the configuration file and command-line flags.",
            ErrorCategory::System => "Check file permissions and available disk space.",
        }
    }
}

pub type Result<T> = std::result::Result<T, ScoutError>;
