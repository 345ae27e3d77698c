pub mod letterboxd;
pub mod rotten_tomatoes;

pub use letterboxd::LetterboxdExtractor;
pub use rotten_tomatoes::RottenTomatoesExtractor;

use regex::Regex;

/// Plausible range for a percentage score; anything outside is treated as noise.
pub const PERCENT_RANGE: std::ops::RangeInclusive<u32> = 5..=100;
pub const RATING_RANGE: std::ops::RangeInclusive<f64> = 0.5..=5.0;

/// Runs the patterns in order and returns the first capture that `accept` takes.
pub(crate) fn first_plausible<T>(
    html: &str,
    patterns: &[Regex],
    accept: impl Fn(&str) -> Option<T>,
) -> Option<T> {
    patterns.iter().enumerate().find_map(|(index, pattern)| {
        pattern.captures_iter(html).find_map(|caps| {
            let raw = caps.get(1)?.as_str();
            let value = accept(raw);
            if value.is_some() {
                tracing::debug!("pattern #{} matched {}", index + 1, raw);
            }
            value
        })
    })
}

pub fn plausible_percentage(raw: &str) -> Option<u32> {
    raw.parse::<u32>()
        .ok()
        .filter(|value| PERCENT_RANGE.contains(value))
}

pub fn plausible_rating(raw: &str) -> Option<f64> {
    raw.parse::<f64>()
        .ok()
        .filter(|value| RATING_RANGE.contains(value))
}

pub(crate) fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).expect("static extraction pattern"))
        .collect()
}
