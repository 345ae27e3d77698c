use crate::core::session::ViewState;
use crate::domain::model::{CombinedScores, MovieQuery};
use crate::domain::ports::Presenter;

const NOT_AVAILABLE: &str = "N/A";

/// Renders the overlay card as plain text for a terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextPresenter;

impl TextPresenter {
    fn render_scores(&self, scores: &CombinedScores, query: Option<&MovieQuery>) -> String {
        let rt = scores.rt.as_ref();
        let critics = rt.and_then(|s| s.critics.as_deref()).unwrap_or(NOT_AVAILABLE);
        let audience = rt.and_then(|s| s.audience.as_deref()).unwrap_or(NOT_AVAILABLE);
        let rating = scores
            .letterboxd
            .as_ref()
            .and_then(|s| s.rating)
            .map(|r| format!("{:.2} / 5", r))
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());

        let mut lines = vec![
            "🍅 Movie Scores".to_string(),
            format!("  🍅 Critics:    {}", critics),
            format!("  🍿 Audience:   {}", audience),
            format!("  ★  Letterboxd: {}", rating),
        ];
        if let Some(query) = query {
            lines.push(format!("  {}", query));
        }
        lines.join("\n")
    }
}

impl Presenter for TextPresenter {
    fn render(&self, state: &ViewState, query: Option<&MovieQuery>) -> String {
        match state {
            ViewState::Idle => String::new(),
            ViewState::Loading => "🍅 Loading scores...\n  Searching for scores...".to_string(),
            ViewState::Success(scores) | ViewState::PartialSuccess(scores) => {
                self.render_scores(scores, query)
            }
            ViewState::Error(message) => format!(
                "⚠️ Scores unavailable\n  {}\n  Try refreshing the page or check if the movie exists on Rotten Tomatoes.",
                message
            ),
        }
    }
}
