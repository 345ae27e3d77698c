use serde::{Deserialize, Serialize};
use std::fmt;

/// A best-effort title/year pair read from a host page or the command line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieQuery {
    pub title: String,
    pub year: Option<String>,
}

impl MovieQuery {
    pub fn new(title: impl Into<String>, year: Option<impl Into<String>>) -> Self {
        Self {
            title: title.into(),
            year: year.map(Into::into),
        }
    }
}

impl fmt::Display for MovieQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.year {
            Some(year) => write!(f, "{} ({})", self.title, year),
            None => write!(f, "{}", self.title),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Site {
    RottenTomatoes,
    Letterboxd,
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Site::RottenTomatoes => write!(f, "Rotten Tomatoes"),
            Site::Letterboxd => write!(f, "Letterboxd"),
        }
    }
}

/// Critics and audience percentages, e.g. `"93%"`. Each field is independently optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RtScores {
    pub critics: Option<String>,
    pub audience: Option<String>,
}

/// Average member rating on a five star scale.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LetterboxdScore {
    pub rating: Option<f64>,
}

/// `None` for a site means its lookup failed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CombinedScores {
    pub rt: Option<RtScores>,
    pub letterboxd: Option<LetterboxdScore>,
}

impl CombinedScores {
    pub fn found_count(&self) -> usize {
        usize::from(self.rt.is_some()) + usize::from(self.letterboxd.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.found_count() == 0
    }
}

/// Whether a set of extracted fields carries anything at all.
pub trait HasScore {
    fn has_score(&self) -> bool;
}

impl HasScore for RtScores {
    fn has_score(&self) -> bool {
        self.critics.is_some() || self.audience.is_some()
    }
}

impl HasScore for LetterboxdScore {
    fn has_score(&self) -> bool {
        self.rating.is_some()
    }
}
