use crate::core::extract::{LetterboxdExtractor, RottenTomatoesExtractor};
use crate::core::locator::{SiteLocator, LETTERBOXD, ROTTEN_TOMATOES};
use crate::domain::model::{HasScore, MovieQuery, Site};
use crate::domain::ports::{Fetcher, ScoreExtractor, ScoreSource};
use crate::utils::error::{Result, ScoutError};
use async_trait::async_trait;

/// Locate → fetch → extract for a single site.
pub struct SiteLookup<F: Fetcher, E: ScoreExtractor> {
    locator: SiteLocator,
    fetcher: F,
    extractor: E,
}

impl<F: Fetcher, E: ScoreExtractor> SiteLookup<F, E> {
    pub fn new(locator: SiteLocator, fetcher: F, extractor: E) -> Self {
        Self {
            locator,
            fetcher,
            extractor,
        }
    }
}

impl<F: Fetcher> SiteLookup<F, RottenTomatoesExtractor> {
    pub fn rotten_tomatoes(fetcher: F, base_url: impl Into<String>) -> Self {
        Self::new(
            SiteLocator::new(&ROTTEN_TOMATOES, base_url),
            fetcher,
            RottenTomatoesExtractor,
        )
    }
}

impl<F: Fetcher> SiteLookup<F, LetterboxdExtractor> {
    pub fn letterboxd(fetcher: F, base_url: impl Into<String>) -> Self {
        Self::new(
            SiteLocator::new(&LETTERBOXD, base_url),
            fetcher,
            LetterboxdExtractor,
        )
    }
}

#[async_trait]
impl<F: Fetcher, E: ScoreExtractor> ScoreSource for SiteLookup<F, E> {
    type Scores = E::Scores;

    fn site(&self) -> Site {
        self.locator.site()
    }

    async fn lookup(&self, query: &MovieQuery) -> Result<E::Scores> {
        let located = self.locator.locate(&self.fetcher, query).await?;

        let html = match located.body {
            Some(body) => body,
            None => self.fetcher.fetch(&located.url).await?,
        };

        let scores = self.extractor.extract(&html);
        if !scores.has_score() {
            return Err(ScoutError::NoScoreExtracted {
                site: self.site(),
                url: located.url,
            });
        }

        tracing::info!("{}: {:?} from {}", self.site(), scores, located.url);
        Ok(scores)
    }
}
