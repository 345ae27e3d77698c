use crate::domain::model::MovieQuery;
use chrono::Datelike;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::OnceLock;

const TITLE_SELECTORS: &[&str] = &[
    ".product-title",
    "h3.product-title",
    "h1",
    ".title",
    "[data-testid=\"video-title\"]",
    ".video-title",
    ".movie-title",
    "h1[class*=\"title\"]",
    ".hero-title",
    ".content-title",
];

const YEAR_SELECTORS: &[&str] = &[
    ".product-year",
    ".release-year",
    ".year",
    ".product-meta",
    "[class*=\"year\"]",
    "[class*=\"date\"]",
    ".release-date",
    ".movie-year",
];

struct Patterns {
    title_year: Regex,
    title_year_strip: Regex,
    four_digits: Regex,
    body_year: Regex,
    edge_dashes: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        title_year: Regex::new(r"\((\d{4})\)|\b(\d{4})\b").expect("title year pattern"),
        title_year_strip: Regex::new(r"\s*\(?\d{4}\)?\s*").expect("title year strip pattern"),
        four_digits: Regex::new(r"\b(\d{4})\b").expect("four digit pattern"),
        body_year: Regex::new(r"\b((?:19|20)\d{2})\b").expect("body year pattern"),
        edge_dashes: Regex::new(r"^\s*[-–—]\s*|\s*[-–—]\s*$").expect("edge dash pattern"),
    })
}

/// Text content with inline markup concatenated as-is, whitespace collapsed.
fn element_text(el: &ElementRef) -> String {
    collapse(&el.text().collect::<String>())
}

fn collapse(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn first_text(doc: &Html, selector: &str) -> Option<String> {
    let sel = Selector::parse(selector).ok()?;
    let el = doc.select(&sel).next()?;
    let text = element_text(&el);
    (!text.is_empty()).then_some(text)
}

fn read_title(doc: &Html) -> Option<String> {
    if let Some(title) = TITLE_SELECTORS.iter().find_map(|s| first_text(doc, s)) {
        return Some(title);
    }

    let headings = Selector::parse("h1, h2, h3").ok()?;
    doc.select(&headings).map(|el| element_text(&el)).find(|text| {
        let len = text.chars().count();
        len > 3 && len < 100
    })
}

fn read_meta_year(doc: &Html) -> Option<String> {
    YEAR_SELECTORS.iter().find_map(|selector| {
        let sel = Selector::parse(selector).ok()?;
        let el = doc.select(&sel).next()?;
        let text = element_text(&el);
        patterns()
            .four_digits
            .captures(&text)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
    })
}

fn read_body_year(doc: &Html, current_year: i32) -> Option<String> {
    let body = Selector::parse("body").ok()?;
    // Separate text nodes so digits from neighbouring elements never fuse.
    let text = doc
        .select(&body)
        .next()
        .map(|el| collapse(&el.text().collect::<Vec<_>>().join(" ")))
        .unwrap_or_default();

    patterns()
        .body_year
        .captures_iter(&text)
        .filter_map(|c| c.get(1))
        .find(|m| {
            m.as_str()
                .parse::<i32>()
                .is_ok_and(|year| (1900..=current_year).contains(&year))
        })
        .map(|m| m.as_str().to_string())
}

/// Reads a best-effort title and year from a streaming site's movie page.
///
/// The year comes from the title itself when present (`"Heat (1995)"`), then
/// from year/date metadata elements, then from the first plausible year in the
/// page text. Returns `None` when no title-like element exists.
pub fn read_movie_info(html: &str, current_year: i32) -> Option<MovieQuery> {
    let doc = Html::parse_document(html);
    let p = patterns();

    let mut title = read_title(&doc)?;
    let mut year = None;

    let title_year = p
        .title_year
        .captures(&title)
        .and_then(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|m| m.as_str().to_string());
    if let Some(found) = title_year {
        let cleaned = collapse(&p.title_year_strip.replacen(&title, 1, " "));
        // A bare-year title ("1917") is the title, not its release year.
        if !cleaned.is_empty() {
            title = cleaned;
            year = Some(found);
        }
    }

    if year.is_none() {
        year = read_meta_year(&doc).or_else(|| read_body_year(&doc, current_year));
    }

    let title = p.edge_dashes.replace_all(&title, "").trim().to_string();
    if title.is_empty() {
        return None;
    }

    tracing::debug!("Read movie info: title={:?} year={:?}", title, year);
    Some(MovieQuery { title, year })
}

pub fn read_movie_info_now(html: &str) -> Option<MovieQuery> {
    read_movie_info(html, chrono::Local::now().year())
}
