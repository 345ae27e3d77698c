use super::{compile, first_plausible, plausible_percentage};
use crate::domain::model::RtScores;
use crate::domain::ports::ScoreExtractor;
use regex::Regex;
use std::sync::OnceLock;

// Ordered from most specific markup to most generic text. Each entry is
// (critics, audience).
const PATTERNS: &[(&str, &str)] = &[
    (
        r"(?s)score-board-deprecated[^>]*>.*?tomatometer[^>]*>.*?counter[^>]*>.*?(\d+)%",
        r"(?s)score-board-deprecated[^>]*>.*?audience[^>]*>.*?counter[^>]*>.*?(\d+)%",
    ),
    (
        r#"data-testid="tomatometer-score"[^>]*>.*?(\d+)%"#,
        r#"data-testid="popcornmeter-score"[^>]*>.*?(\d+)%"#,
    ),
    (
        r#"slot="criticsScore"[^>]*>\s*(\d+)%"#,
        r#"slot="audienceScore"[^>]*>\s*(\d+)%"#,
    ),
    (
        r#"class="[^"]*tomatometer[^"]*"[^>]*>.*?(\d+)%"#,
        r#"class="[^"]*audience[^"]*"[^>]*>.*?(\d+)%"#,
    ),
    (
        r#""criticsScore":\{[^}]*?"score":"?(\d+)"#,
        r#""audienceScore":\{[^}]*?"score":"?(\d+)"#,
    ),
    (r#""tomatometer":\s*(\d+)"#, r#""audience":\s*(\d+)"#),
    (r#""critic":\s*(\d+)"#, r#""audience":\s*(\d+)"#),
    (r"(?i)tomatometer[^}]*?(\d+)%", r"(?i)audience[^}]*?(\d+)%"),
];

struct Compiled {
    critics: Vec<Regex>,
    audience: Vec<Regex>,
}

fn compiled() -> &'static Compiled {
    static COMPILED: OnceLock<Compiled> = OnceLock::new();
    COMPILED.get_or_init(|| {
        let (critics, audience): (Vec<&str>, Vec<&str>) = PATTERNS.iter().copied().unzip();
        Compiled {
            critics: compile(&critics),
            audience: compile(&audience),
        }
    })
}

/// Tomatometer and audience (popcornmeter) percentages.
#[derive(Debug, Clone, Copy, Default)]
pub struct RottenTomatoesExtractor;

impl ScoreExtractor for RottenTomatoesExtractor {
    type Scores = RtScores;

    fn extract(&self, html: &str) -> RtScores {
        let patterns = compiled();
        let percent = |raw: &str| plausible_percentage(raw).map(|value| format!("{}%", value));

        RtScores {
            critics: first_plausible(html, &patterns.critics, percent),
            audience: first_plausible(html, &patterns.audience, percent),
        }
    }
}
