use crate::domain::model::{CombinedScores, LetterboxdScore, MovieQuery, RtScores};
use crate::domain::ports::ScoreSource;

/// Fans a query out to both review sites and reports each outcome separately.
pub struct QueryDispatcher<R, L> {
    rt: Option<R>,
    letterboxd: Option<L>,
}

impl<R, L> QueryDispatcher<R, L>
where
    R: ScoreSource<Scores = RtScores>,
    L: ScoreSource<Scores = LetterboxdScore>,
{
    /// A `None` source is a disabled site and always reports absence.
    pub fn new(rt: Option<R>, letterboxd: Option<L>) -> Self {
        Self { rt, letterboxd }
    }

    pub fn enabled_sites(&self) -> usize {
        usize::from(self.rt.is_some()) + usize::from(self.letterboxd.is_some())
    }

    pub async fn dispatch(&self, query: &MovieQuery) -> CombinedScores {
        tracing::debug!("Dispatching lookups for {}", query);

        let (rt, letterboxd) = tokio::join!(
            run_source(self.rt.as_ref(), query),
            run_source(self.letterboxd.as_ref(), query)
        );

        CombinedScores { rt, letterboxd }
    }
}

async fn run_source<S: ScoreSource>(source: Option<&S>, query: &MovieQuery) -> Option<S::Scores> {
    let source = source?;
    match source.lookup(query).await {
        Ok(scores) => Some(scores),
        Err(e) => {
            tracing::warn!("{} lookup for {} failed: {}", source.site(), query, e);
            None
        }
    }
}
