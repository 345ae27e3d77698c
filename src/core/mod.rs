pub mod dispatcher;
pub mod extract;
pub mod locator;
pub mod lookup;
pub mod message;
pub mod page_reader;
pub mod presenter;
pub mod session;
pub mod title;

pub use crate::domain::model::{CombinedScores, LetterboxdScore, MovieQuery, RtScores, Site};
pub use crate::domain::ports::{ConfigProvider, Fetcher, Presenter, ScoreExtractor, ScoreSource};
pub use crate::utils::error::Result;
