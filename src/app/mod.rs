// Application wiring: turns configuration into ready-to-run lookups.

use crate::adapters::http::{build_client, HttpFetcher};
use crate::core::dispatcher::QueryDispatcher;
use crate::core::extract::{LetterboxdExtractor, RottenTomatoesExtractor};
use crate::core::lookup::SiteLookup;
use crate::domain::model::Site;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;

pub type RtLookup = SiteLookup<HttpFetcher, RottenTomatoesExtractor>;
pub type LetterboxdLookup = SiteLookup<HttpFetcher, LetterboxdExtractor>;
pub type Dispatcher = QueryDispatcher<RtLookup, LetterboxdLookup>;

/// Builds both site lookups over one shared HTTP client; disabled sites are left out.
pub fn build_dispatcher<C: ConfigProvider + ?Sized>(config: &C) -> Result<Dispatcher> {
    let client = build_client(config)?;

    let rt_settings = config.site_settings(Site::RottenTomatoes);
    let rt = rt_settings.enabled.then(|| {
        SiteLookup::rotten_tomatoes(
            HttpFetcher::for_site(client.clone(), config, Site::RottenTomatoes),
            rt_settings.base_url.clone(),
        )
    });

    let lb_settings = config.site_settings(Site::Letterboxd);
    let letterboxd = lb_settings.enabled.then(|| {
        SiteLookup::letterboxd(
            HttpFetcher::for_site(client.clone(), config, Site::Letterboxd),
            lb_settings.base_url.clone(),
        )
    });

    tracing::debug!(
        "Configured sites: rotten_tomatoes={} letterboxd={}",
        rt.is_some(),
        letterboxd.is_some()
    );
    Ok(QueryDispatcher::new(rt, letterboxd))
}
