use crate::core::title::{search_terms, significant_words, slugify, title_variants};
use crate::domain::model::{MovieQuery, Site};
use crate::domain::ports::Fetcher;
use crate::utils::error::{Result, ScoutError};
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

/// Bytes of markup inspected on each side of a candidate link.
pub const CONTEXT_RADIUS: usize = 300;

/// How one review site is searched and how its movie URLs are shaped.
#[derive(Debug)]
pub struct LocatorRules {
    pub site: Site,
    /// `{query}` is replaced with the url-encoded search term.
    pub search_path: &'static str,
    pub link_patterns: &'static [&'static str],
    pub slug_separator: char,
    /// `{slug}` and `{year}` are substituted; year templates are skipped without a year.
    pub direct_paths: &'static [&'static str],
}

pub static ROTTEN_TOMATOES: LocatorRules = LocatorRules {
    site: Site::RottenTomatoes,
    search_path: "/search?search={query}",
    link_patterns: &[
        r#"href="(/m/[^"]+)""#,
        r#"href="(/movie/[^"]+)""#,
        r#"href="([^"]*/m/[^"]+)""#,
    ],
    slug_separator: '_',
    direct_paths: &["/m/{slug}", "/m/{slug}_{year}"],
};

pub static LETTERBOXD: LocatorRules = LocatorRules {
    site: Site::Letterboxd,
    search_path: "/search/films/{query}/",
    link_patterns: &[
        r#"href="(/film/[^"/]+/)""#,
        r#"data-target-link="(/film/[^"/]+/)""#,
        r#"href="(https?://letterboxd\.com/film/[^"/]+/)""#,
    ],
    slug_separator: '-',
    direct_paths: &["/film/{slug}/", "/film/{slug}-{year}/"],
};

fn year_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\b(\d{4})\b").expect("valid year pattern"))
}

/// A working movie page. `body` is set when the probe already downloaded it.
#[derive(Debug, Clone, PartialEq)]
pub struct Located {
    pub url: String,
    pub body: Option<String>,
}

pub struct SiteLocator {
    rules: &'static LocatorRules,
    base_url: String,
    link_patterns: Vec<Regex>,
}

impl SiteLocator {
    pub fn new(rules: &'static LocatorRules, base_url: impl Into<String>) -> Self {
        let link_patterns = rules
            .link_patterns
            .iter()
            .map(|p| Regex::new(p).expect("static link pattern"))
            .collect();

        Self {
            rules,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            link_patterns,
        }
    }

    pub fn site(&self) -> Site {
        self.rules.site
    }

    pub fn search_url(&self, term: &str) -> String {
        let encoded: String = url::form_urlencoded::byte_serialize(term.as_bytes()).collect();
        format!(
            "{}{}",
            self.base_url,
            self.rules.search_path.replace("{query}", &encoded)
        )
    }

    /// Candidate page URLs for direct probing, most literal title variant first.
    pub fn direct_urls(&self, query: &MovieQuery) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut urls = Vec::new();

        for variant in title_variants(&query.title) {
            let slug = slugify(&variant, self.rules.slug_separator);
            if slug.is_empty() || !seen.insert(slug.clone()) {
                continue;
            }

            for template in self.rules.direct_paths {
                let path = match (&query.year, template.contains("{year}")) {
                    (_, false) => template.replace("{slug}", &slug),
                    (Some(year), true) => template.replace("{slug}", &slug).replace("{year}", year),
                    (None, true) => continue,
                };
                urls.push(format!("{}{}", self.base_url, path));
            }
        }

        urls
    }

    /// Picks a movie link out of a search result page.
    ///
    /// A link is a title match when the markup around it mentions a significant
    /// title word. A title match whose context also carries the requested year
    /// wins outright; otherwise the first title match is returned.
    pub fn find_movie_url(&self, html: &str, title: &str, year: Option<&str>) -> Option<String> {
        let words = significant_words(title);
        if words.is_empty() {
            return None;
        }

        let mut fallback: Option<&str> = None;

        for pattern in &self.link_patterns {
            for caps in pattern.captures_iter(html) {
                let (Some(whole), Some(link)) = (caps.get(0), caps.get(1)) else {
                    continue;
                };

                let context = context_window(html, whole.start(), CONTEXT_RADIUS).to_lowercase();
                let title_match = words.iter().any(|word| context.contains(word.as_str()));
                if !title_match {
                    continue;
                }

                if let Some(year) = year {
                    let year_match = year_pattern()
                        .captures_iter(&context)
                        .any(|c| c.get(1).is_some_and(|m| m.as_str() == year));
                    if year_match {
                        tracing::debug!("{}: exact year match {}", self.site(), link.as_str());
                        return Some(link.as_str().to_string());
                    }
                }

                if fallback.is_none() {
                    tracing::debug!("{}: title match {}", self.site(), link.as_str());
                    fallback = Some(link.as_str());
                }
            }
        }

        fallback.map(str::to_string)
    }

    fn absolute(&self, link: &str) -> String {
        if link.starts_with("http://") || link.starts_with("https://") {
            link.to_string()
        } else {
            format!("{}{}", self.base_url, link)
        }
    }

    /// Search first, then probe constructed URLs one at a time.
    pub async fn locate<F: Fetcher + ?Sized>(
        &self,
        fetcher: &F,
        query: &MovieQuery,
    ) -> Result<Located> {
        let year = query.year.as_deref();

        for term in search_terms(&query.title, year) {
            let url = self.search_url(&term);
            let html = match fetcher.fetch(&url).await {
                Ok(html) => html,
                Err(e) => {
                    tracing::debug!("{}: search '{}' failed: {}", self.site(), term, e);
                    continue;
                }
            };

            if let Some(link) = self.find_movie_url(&html, &query.title, year) {
                let url = self.absolute(&link);
                tracing::info!("{}: found {} via search '{}'", self.site(), url, term);
                return Ok(Located { url, body: None });
            }
        }

        for url in self.direct_urls(query) {
            match fetcher.fetch(&url).await {
                Ok(body) => {
                    tracing::info!("{}: direct URL {} works", self.site(), url);
                    return Ok(Located {
                        url,
                        body: Some(body),
                    });
                }
                Err(e) => tracing::debug!("{}: direct URL {} failed: {}", self.site(), url, e),
            }
        }

        Err(ScoutError::NotFound {
            site: self.site(),
            title: query.title.clone(),
        })
    }
}

/// Slice of `text` within `radius` bytes of `index`, widened to char boundaries.
fn context_window(text: &str, index: usize, radius: usize) -> &str {
    let mut start = index.saturating_sub(radius);
    while !text.is_char_boundary(start) {
        start -= 1;
    }
    let mut end = (index + radius).min(text.len());
    while !text.is_char_boundary(end) {
        end += 1;
    }
    &text[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Serves canned bodies by exact URL and records every request.
    struct MockFetcher {
        pages: HashMap<String, String>,
        requests: Mutex<Vec<String>>,
    }

    impl MockFetcher {
        fn new(pages: &[(&str, &str)]) -> Self {
            Self {
                pages: pages
                    .iter()
                    .map(|(url, body)| (url.to_string(), body.to_string()))
                    .collect(),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn requests(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Fetcher for MockFetcher {
        async fn fetch(&self, url: &str) -> Result<String> {
            self.requests.lock().unwrap().push(url.to_string());
            self.pages
                .get(url)
                .cloned()
                .ok_or_else(|| ScoutError::HttpStatus {
                    url: url.to_string(),
                    status: 404,
                })
        }
    }

    const RT: &str = "https://rt.test";

    #[test]
    fn test_find_movie_url_prefers_year_match() {
        let locator = SiteLocator::new(&ROTTEN_TOMATOES, RT);
        let filler = " ".repeat(CONTEXT_RADIUS * 2);
        let html = format!(
            r#"<a href="/m/heat_1986">Heat</a> 1986{filler}<a href="/m/heat_1995">Heat</a> 1995"#
        );

        assert_eq!(
            locator.find_movie_url(&html, "Heat", Some("1995")).as_deref(),
            Some("/m/heat_1995")
        );
        assert_eq!(
            locator.find_movie_url(&html, "Heat", None).as_deref(),
            Some("/m/heat_1986")
        );
    }

    #[test]
    fn test_find_movie_url_requires_significant_word() {
        let locator = SiteLocator::new(&ROTTEN_TOMATOES, RT);
        let html = r#"<a href="/m/up">Up</a> 2009"#;

        assert_eq!(locator.find_movie_url(html, "Up", Some("2009")), None);
        assert_eq!(locator.find_movie_url(html, "Heat", None), None);
    }

    #[test]
    fn test_direct_urls_use_site_separator() {
        let query = MovieQuery::new("C'mon C'mon", Some("2021"));

        let rt = SiteLocator::new(&ROTTEN_TOMATOES, RT).direct_urls(&query);
        assert_eq!(
            rt,
            vec![
                "https://rt.test/m/cmon_cmon",
                "https://rt.test/m/cmon_cmon_2021",
                "https://rt.test/m/c_mon_c_mon",
                "https://rt.test/m/c_mon_c_mon_2021",
            ]
        );

        let lb = SiteLocator::new(&LETTERBOXD, "https://lb.test/").direct_urls(&query);
        assert_eq!(lb[0], "https://lb.test/film/cmon-cmon/");
        assert_eq!(lb[1], "https://lb.test/film/cmon-cmon-2021/");
    }

    #[test]
    fn test_direct_urls_without_year_skip_year_templates() {
        let query = MovieQuery::new("Heat", None::<String>);
        let urls = SiteLocator::new(&LETTERBOXD, "https://lb.test").direct_urls(&query);
        assert_eq!(urls, vec!["https://lb.test/film/heat/"]);
    }

    #[test]
    fn test_search_url_encodes_term() {
        let locator = SiteLocator::new(&ROTTEN_TOMATOES, RT);
        assert_eq!(
            locator.search_url("C'mon C'mon 2021"),
            "https://rt.test/search?search=C%27mon+C%27mon+2021"
        );
    }

    #[test]
    fn test_context_window_respects_char_boundaries() {
        let text = "ééééé";
        assert_eq!(context_window(text, 4, 1), "éé");
        assert_eq!(context_window(text, 0, 100), text);
    }

    #[tokio::test]
    async fn test_locate_via_search() {
        let search = r#"<a href="/m/heat_1995">Heat</a> <span>1995</span>"#;
        let fetcher = MockFetcher::new(&[("https://rt.test/search?search=Heat", search)]);
        let locator = SiteLocator::new(&ROTTEN_TOMATOES, RT);

        let located = locator
            .locate(&fetcher, &MovieQuery::new("Heat", Some("1995")))
            .await
            .unwrap();

        assert_eq!(
            located,
            Located {
                url: "https://rt.test/m/heat_1995".to_string(),
                body: None
            }
        );
        assert_eq!(fetcher.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_locate_falls_back_to_normalized_slug() {
        let fetcher = MockFetcher::new(&[("https://rt.test/m/c_mon_c_mon", "<html>movie</html>")]);
        let locator = SiteLocator::new(&ROTTEN_TOMATOES, RT);

        let located = locator
            .locate(&fetcher, &MovieQuery::new("C'mon C'mon", Some("2021")))
            .await
            .unwrap();

        assert_eq!(located.url, "https://rt.test/m/c_mon_c_mon");
        assert_eq!(located.body.as_deref(), Some("<html>movie</html>"));
        assert_eq!(
            fetcher.requests(),
            vec![
                "https://rt.test/search?search=C%27mon+C%27mon",
                "https://rt.test/search?search=C%27mon+C%27mon+2021",
                "https://rt.test/m/cmon_cmon",
                "https://rt.test/m/cmon_cmon_2021",
                "https://rt.test/m/c_mon_c_mon",
            ]
        );
    }

    #[tokio::test]
    async fn test_locate_not_found() {
        let fetcher = MockFetcher::new(&[]);
        let locator = SiteLocator::new(&LETTERBOXD, "https://lb.test");

        let err = locator
            .locate(&fetcher, &MovieQuery::new("Zzyzx Qwerty", None::<String>))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ScoutError::NotFound {
                site: Site::Letterboxd,
                ..
            }
        ));
    }
}
