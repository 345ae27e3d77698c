use crate::config::SiteSettings;
use crate::core::session::ViewState;
use crate::domain::model::{HasScore, MovieQuery, Site};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Retrieves a page body. Any non-success status is an error.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// Pulls scores out of a fetched document. Must be pure.
pub trait ScoreExtractor: Send + Sync {
    type Scores: HasScore + Send + std::fmt::Debug;

    fn extract(&self, html: &str) -> Self::Scores;
}

/// One site's complete lookup: locate the page, fetch it, extract scores.
#[async_trait]
pub trait ScoreSource: Send + Sync {
    type Scores: Send;

    fn site(&self) -> Site;

    async fn lookup(&self, query: &MovieQuery) -> Result<Self::Scores>;
}

pub trait Presenter {
    fn render(&self, state: &ViewState, query: Option<&MovieQuery>) -> String;
}

pub trait ConfigProvider: Send + Sync {
    fn timeout_seconds(&self) -> u64;
    fn user_agent(&self) -> &str;
    fn site_settings(&self, site: Site) -> &SiteSettings;
}
