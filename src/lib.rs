pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::TomlConfig;

pub use app::{build_dispatcher, Dispatcher};
pub use crate::core::{
    dispatcher::QueryDispatcher, lookup::SiteLookup, presenter::TextPresenter,
    session::{ScoreController, ViewState},
};
pub use domain::model::{CombinedScores, LetterboxdScore, MovieQuery, RtScores, Site};
pub use utils::error::{Result, ScoutError};
