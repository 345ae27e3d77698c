use crate::config::TomlConfig;
use crate::domain::model::{MovieQuery, Site};
use crate::utils::error::{Result, ScoutError};
use crate::utils::validation::{validate_title, validate_year, Validate};
use clap::{Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "film-scores")]
#[command(about = "Look up Rotten Tomatoes and Letterboxd scores for a movie")]
pub struct CliConfig {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Movie title to look up
    #[arg(long)]
    pub title: Option<String>,

    /// Release year, narrows search matches
    #[arg(long)]
    pub year: Option<String>,

    /// Streaming-site movie page (file path or http(s) URL) to read title and year from
    #[arg(long)]
    pub page: Option<String>,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Print the JSON response message instead of the text card
    #[arg(long)]
    pub json: bool,

    #[arg(long)]
    pub timeout_secs: Option<u64>,

    #[arg(long)]
    pub rt_base_url: Option<String>,

    #[arg(long)]
    pub letterboxd_base_url: Option<String>,

    /// CORS relay prefix for Letterboxd requests
    #[arg(long)]
    pub letterboxd_relay: Option<String>,

    #[arg(long)]
    pub skip_rt: bool,

    #[arg(long)]
    pub skip_letterboxd: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Answer JSON-lines `getScores` requests on stdin
    Serve,
}

impl CliConfig {
    /// Loads the configuration file (or defaults) and applies command-line overrides.
    pub fn resolve(&self) -> Result<TomlConfig> {
        let mut config = match &self.config {
            Some(path) => TomlConfig::from_file(path)?,
            None => TomlConfig::default(),
        };

        if let Some(timeout) = self.timeout_secs {
            config.http.timeout_seconds = timeout;
        }
        if let Some(url) = &self.rt_base_url {
            config.site_mut(Site::RottenTomatoes).base_url = url.clone();
        }
        if let Some(url) = &self.letterboxd_base_url {
            config.site_mut(Site::Letterboxd).base_url = url.clone();
        }
        if let Some(relay) = &self.letterboxd_relay {
            config.site_mut(Site::Letterboxd).relay = Some(relay.clone());
        }
        if self.skip_rt {
            config.site_mut(Site::RottenTomatoes).enabled = false;
        }
        if self.skip_letterboxd {
            config.site_mut(Site::Letterboxd).enabled = false;
        }

        config.validate()?;
        Ok(config)
    }

    /// The query given directly with `--title`/`--year`, if any.
    pub fn direct_query(&self) -> Option<MovieQuery> {
        self.title.as_ref().map(|title| MovieQuery {
            title: title.trim().to_string(),
            year: self.year.clone(),
        })
    }

    pub fn is_serve(&self) -> bool {
        matches!(self.command, Some(Command::Serve))
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if self.is_serve() {
            return Ok(());
        }

        match (&self.title, &self.page) {
            (None, None) => {
                return Err(ScoutError::ValidationError {
                    message: "Either --title or --page is required".to_string(),
                })
            }
            (Some(title), _) => validate_title(title)?,
            _ => {}
        }

        if let Some(year) = &self.year {
            validate_year(year)?;
        }

        if self.skip_rt && self.skip_letterboxd {
            return Err(ScoutError::ValidationError {
                message: "--skip-rt and --skip-letterboxd cannot both be set".to_string(),
            });
        }

        Ok(())
    }
}
