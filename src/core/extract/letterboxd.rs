use super::{compile, first_plausible, plausible_rating};
use crate::domain::model::LetterboxdScore;
use crate::domain::ports::ScoreExtractor;
use regex::Regex;
use std::sync::OnceLock;

const PATTERNS: &[&str] = &[
    r#"<meta name="twitter:data2" content="([0-9]+(?:\.[0-9]+)?) out of 5""#,
    r#""ratingValue"\s*:\s*"?([0-9]+(?:\.[0-9]+)?)"#,
    r#"(?s)class="[^"]*average-rating[^"]*"[^>]*>.*?([0-9]+\.[0-9]{1,2})"#,
    r"([0-9]+\.[0-9]{1,2}) out of 5",
];

fn compiled() -> &'static [Regex] {
    static COMPILED: OnceLock<Vec<Regex>> = OnceLock::new();
    COMPILED.get_or_init(|| compile(PATTERNS))
}

/// Weighted average member rating, 0.5 to 5 stars.
#[derive(Debug, Clone, Copy, Default)]
pub struct LetterboxdExtractor;

impl ScoreExtractor for LetterboxdExtractor {
    type Scores = LetterboxdScore;

    fn extract(&self, html: &str) -> LetterboxdScore {
        LetterboxdScore {
            rating: first_plausible(html, compiled(), plausible_rating),
        }
    }
}
