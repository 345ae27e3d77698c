//! Title normalization shared by the site locators.

const APOSTROPHES: [char; 3] = ['\'', '\u{2019}', '\u{2018}'];
const LEADING_ARTICLES: [&str; 3] = ["the ", "a ", "an "];

/// Lowercased title words longer than two characters.
pub fn significant_words(title: &str) -> Vec<String> {
    title
        .to_lowercase()
        .split_whitespace()
        .filter(|word| word.chars().count() > 2)
        .map(str::to_string)
        .collect()
}

/// Folds common accented Latin letters to ASCII; other characters pass through.
pub fn fold_ascii(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => out.push('a'),
            'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' => out.push('A'),
            'ç' => out.push('c'),
            'Ç' => out.push('C'),
            'è' | 'é' | 'ê' | 'ë' => out.push('e'),
            'È' | 'É' | 'Ê' | 'Ë' => out.push('E'),
            'ì' | 'í' | 'î' | 'ï' => out.push('i'),
            'Ì' | 'Í' | 'Î' | 'Ï' => out.push('I'),
            'ñ' => out.push('n'),
            'Ñ' => out.push('N'),
            'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' => out.push('o'),
            'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' | 'Ø' => out.push('O'),
            'ù' | 'ú' | 'û' | 'ü' => out.push('u'),
            'Ù' | 'Ú' | 'Û' | 'Ü' => out.push('U'),
            'ý' | 'ÿ' => out.push('y'),
            'æ' => out.push_str("ae"),
            'Æ' => out.push_str("AE"),
            'œ' => out.push_str("oe"),
            'Œ' => out.push_str("OE"),
            'ß' => out.push_str("ss"),
            _ => out.push(c),
        }
    }
    out
}

/// Lowercase, strip everything but ASCII letters, digits and whitespace,
/// then join the remaining words with `separator`.
pub fn slugify(title: &str, separator: char) -> String {
    let cleaned: String = fold_ascii(title)
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace())
        .collect();

    let sep = separator.to_string();
    cleaned.split_whitespace().collect::<Vec<_>>().join(&sep)
}

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Search terms tried in order, duplicates removed.
pub fn search_terms(title: &str, year: Option<&str>) -> Vec<String> {
    let mut terms = vec![title.to_string()];
    if let Some(year) = year {
        terms.push(format!("{} {}", title, year));
    }
    terms.push(collapse_whitespace(title));
    dedup(terms)
}

/// Spelling variants of a title used for direct URL probing, most literal first.
pub fn title_variants(title: &str) -> Vec<String> {
    let title = collapse_whitespace(title);
    let mut variants = vec![title.clone()];

    variants.push(collapse_whitespace(&title.replace(&APOSTROPHES[..], "")));
    variants.push(collapse_whitespace(&title.replace(&APOSTROPHES[..], " ")));

    let spaced: String = title
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '&' { c } else { ' ' })
        .collect();
    variants.push(collapse_whitespace(&spaced));

    if title.contains('&') {
        variants.push(collapse_whitespace(&title.replace('&', " and ")));
    }

    let lower = title.to_lowercase();
    if let Some(article) = LEADING_ARTICLES.iter().find(|a| lower.starts_with(*a)) {
        variants.push(title[article.len()..].trim().to_string());
    }

    if let Some(main) = strip_subtitle(&title) {
        variants.push(main);
    }

    dedup(variants.into_iter().filter(|v| !v.is_empty()).collect())
}

fn strip_subtitle(title: &str) -> Option<String> {
    let cut = title.find(':').or_else(|| title.find(" - "))?;
    let main = title[..cut].trim();
    (!main.is_empty()).then(|| main.to_string())
}

fn dedup(items: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}
