use crate::core::dispatcher::QueryDispatcher;
use crate::domain::model::{CombinedScores, LetterboxdScore, MovieQuery, RtScores};
use crate::domain::ports::ScoreSource;
use crate::utils::error::ScoutError;
use tokio::sync::Mutex;

/// Per-page presentation state.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    Idle,
    Loading,
    Success(CombinedScores),
    PartialSuccess(CombinedScores),
    Error(String),
}

impl ViewState {
    /// Classifies a finished lookup; `expected` is the number of sites queried.
    pub fn from_outcome(scores: CombinedScores, expected: usize, query: &MovieQuery) -> Self {
        let found = scores.found_count();
        if found == 0 {
            ViewState::Error(format!("No scores found for {}", query))
        } else if found < expected {
            ViewState::PartialSuccess(scores)
        } else {
            ViewState::Success(scores)
        }
    }
}

/// Navigation generation. A result is only applied under the epoch it was started in.
pub type Epoch = u64;

#[derive(Debug)]
pub struct Session {
    epoch: Epoch,
    state: ViewState,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            epoch: 0,
            state: ViewState::Idle,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    /// Page ready or manual trigger: Loading under a fresh epoch.
    pub fn begin(&mut self) -> Epoch {
        self.epoch += 1;
        self.state = ViewState::Loading;
        self.epoch
    }

    /// The user left the page; anything still in flight is stale.
    pub fn navigate(&mut self) {
        self.epoch += 1;
        self.state = ViewState::Idle;
    }

    pub fn dismiss(&mut self) {
        self.state = ViewState::Idle;
    }

    /// Applies `state` if `token` is still current. Returns whether it was applied.
    pub fn apply(&mut self, token: Epoch, state: ViewState) -> bool {
        if token != self.epoch {
            tracing::debug!(
                "Dropping stale result from epoch {} (current {})",
                token,
                self.epoch
            );
            return false;
        }
        self.state = state;
        true
    }

    pub fn fail(&mut self, token: Epoch, message: impl Into<String>) -> bool {
        self.apply(token, ViewState::Error(message.into()))
    }
}

/// Drives one page's lookup flow and guards it against late arrivals.
pub struct ScoreController<R, L> {
    dispatcher: QueryDispatcher<R, L>,
    session: Mutex<Session>,
}

impl<R, L> ScoreController<R, L>
where
    R: ScoreSource<Scores = RtScores>,
    L: ScoreSource<Scores = LetterboxdScore>,
{
    pub fn new(dispatcher: QueryDispatcher<R, L>) -> Self {
        Self {
            dispatcher,
            session: Mutex::new(Session::new()),
        }
    }

    /// Runs a lookup for `query` (None when the page had no title).
    /// Returns the state applied, or None if a navigation made the result stale.
    pub async fn trigger(&self, query: Option<MovieQuery>) -> Option<ViewState> {
        let token = self.session.lock().await.begin();

        let state = match query {
            None => ViewState::Error(ScoutError::MissingTitle.user_friendly_message()),
            Some(query) => {
                let scores = self.dispatcher.dispatch(&query).await;
                ViewState::from_outcome(scores, self.dispatcher.enabled_sites(), &query)
            }
        };

        let mut session = self.session.lock().await;
        session.apply(token, state.clone()).then_some(state)
    }

    pub async fn navigate(&self) {
        self.session.lock().await.navigate();
    }

    pub async fn dismiss(&self) {
        self.session.lock().await.dismiss();
    }

    pub async fn state(&self) -> ViewState {
        self.session.lock().await.state().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::dispatcher::tests::{rt_scores, StubSource};
    use crate::domain::model::Site;
    use std::sync::Arc;
    use std::time::Duration;

    type Controller = ScoreController<StubSource<RtScores>, StubSource<LetterboxdScore>>;

    fn controller(rt_delay: Duration, letterboxd_ok: bool) -> Controller {
        let letterboxd = if letterboxd_ok {
            StubSource::ok(Site::Letterboxd, LetterboxdScore { rating: Some(3.9) })
        } else {
            StubSource::failing(Site::Letterboxd)
        };
        ScoreController::new(QueryDispatcher::new(
            Some(StubSource::ok(Site::RottenTomatoes, rt_scores()).delayed(rt_delay)),
            Some(letterboxd),
        ))
    }

    #[test]
    fn test_session_transitions() {
        let mut session = Session::new();
        assert_eq!(session.state(), &ViewState::Idle);

        let token = session.begin();
        assert_eq!(session.state(), &ViewState::Loading);
        assert!(session.fail(token, "boom"));
        assert_eq!(session.state(), &ViewState::Error("boom".to_string()));

        session.dismiss();
        assert_eq!(session.state(), &ViewState::Idle);
    }

    #[test]
    fn test_stale_token_is_ignored() {
        let mut session = Session::new();
        let first = session.begin();
        session.navigate();
        let second = session.begin();
        assert_eq!(session.epoch(), 3);

        assert!(!session.apply(first, ViewState::Error("late".to_string())));
        assert_eq!(session.state(), &ViewState::Loading);
        assert!(session.apply(second, ViewState::Idle));
    }

    #[test]
    fn test_from_outcome_classification() {
        let query = MovieQuery::new("Heat", Some("1995"));
        let both = CombinedScores {
            rt: Some(rt_scores()),
            letterboxd: Some(LetterboxdScore { rating: Some(4.0) }),
        };
        let partial = CombinedScores {
            rt: Some(rt_scores()),
            letterboxd: None,
        };

        assert!(matches!(
            ViewState::from_outcome(both, 2, &query),
            ViewState::Success(_)
        ));
        assert!(matches!(
            ViewState::from_outcome(partial.clone(), 2, &query),
            ViewState::PartialSuccess(_)
        ));
        assert!(matches!(
            ViewState::from_outcome(partial, 1, &query),
            ViewState::Success(_)
        ));
        assert_eq!(
            ViewState::from_outcome(CombinedScores::default(), 2, &query),
            ViewState::Error("No scores found for Heat (1995)".to_string())
        );
    }

    #[tokio::test]
    async fn test_trigger_without_title_is_error() {
        let controller = controller(Duration::ZERO, true);

        let state = controller.trigger(None).await.unwrap();
        assert!(matches!(state, ViewState::Error(ref msg) if msg.starts_with("Could not find movie title")));
    }

    #[tokio::test]
    async fn test_trigger_partial_success() {
        let controller = controller(Duration::ZERO, false);

        let state = controller
            .trigger(Some(MovieQuery::new("Heat", Some("1995"))))
            .await
            .unwrap();

        assert!(matches!(state, ViewState::PartialSuccess(_)));
        assert_eq!(controller.state().await, state);

        controller.dismiss().await;
        assert_eq!(controller.state().await, ViewState::Idle);
    }

    #[tokio::test]
    async fn test_late_result_after_navigation_is_dropped() {
        let controller = Arc::new(controller(Duration::from_millis(200), true));

        let pending = {
            let controller = Arc::clone(&controller);
            tokio::spawn(async move {
                controller
                    .trigger(Some(MovieQuery::new("Heat", Some("1995"))))
                    .await
            })
        };

        tokio::time::sleep(Duration::from_millis(50)).await;
        controller.navigate().await;

        assert_eq!(pending.await.unwrap(), None);
        assert_eq!(controller.state().await, ViewState::Idle);
    }
}
