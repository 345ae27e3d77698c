use crate::core::dispatcher::QueryDispatcher;
use crate::core::session::ViewState;
use crate::domain::model::{CombinedScores, LetterboxdScore, MovieQuery, RtScores};
use crate::domain::ports::ScoreSource;
use crate::utils::error::{Result, ScoutError};
use crate::utils::validation::validate_year;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

/// Request sent by the extension's content script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum ScoresRequest {
    #[serde(rename = "getScores")]
    GetScores {
        title: String,
        #[serde(default)]
        year: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoresResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scores: Option<CombinedScores>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ScoresResponse {
    pub fn ok(scores: CombinedScores) -> Self {
        Self {
            success: true,
            scores: Some(scores),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            scores: None,
            error: Some(message.into()),
        }
    }

    pub fn from_state(state: &ViewState) -> Self {
        match state {
            ViewState::Success(scores) | ViewState::PartialSuccess(scores) => {
                Self::ok(scores.clone())
            }
            ViewState::Error(message) => Self::error(message.clone()),
            ViewState::Idle | ViewState::Loading => Self::error("Lookup did not complete"),
        }
    }
}

impl ScoresRequest {
    /// The query carried by the request. A malformed year is dropped rather than rejected.
    pub fn into_query(self) -> Result<MovieQuery> {
        let ScoresRequest::GetScores { title, year } = self;
        let title = title.trim().to_string();
        if title.is_empty() {
            return Err(ScoutError::MissingTitle);
        }

        let year = year.map(|y| y.trim().to_string()).filter(|y| {
            let valid = validate_year(y).is_ok();
            if !valid {
                tracing::warn!("Ignoring malformed year '{}' for {}", y, title);
            }
            valid
        });

        Ok(MovieQuery { title, year })
    }
}

pub async fn handle_request<R, L>(
    dispatcher: &QueryDispatcher<R, L>,
    request: ScoresRequest,
) -> ScoresResponse
where
    R: ScoreSource<Scores = RtScores>,
    L: ScoreSource<Scores = LetterboxdScore>,
{
    let query = match request.into_query() {
        Ok(query) => query,
        Err(e) => return ScoresResponse::error(e.user_friendly_message()),
    };

    let scores = dispatcher.dispatch(&query).await;
    ScoresResponse::from_state(&ViewState::from_outcome(
        scores,
        dispatcher.enabled_sites(),
        &query,
    ))
}

/// Parses one JSON line; anything unparseable becomes an error response.
pub async fn handle_line<R, L>(dispatcher: &QueryDispatcher<R, L>, line: &str) -> ScoresResponse
where
    R: ScoreSource<Scores = RtScores>,
    L: ScoreSource<Scores = LetterboxdScore>,
{
    match serde_json::from_str::<ScoresRequest>(line) {
        Ok(request) => handle_request(dispatcher, request).await,
        Err(e) => {
            tracing::warn!("Rejecting request {}: {}", line, e);
            ScoresResponse::error(format!("Invalid request: {}", e))
        }
    }
}

/// Answers one JSON request per input line with one JSON response line until EOF.
pub async fn serve<R, L, I, O>(dispatcher: &QueryDispatcher<R, L>, input: I, mut output: O) -> Result<()>
where
    R: ScoreSource<Scores = RtScores>,
    L: ScoreSource<Scores = LetterboxdScore>,
    I: AsyncBufRead + Unpin,
    O: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    let mut handled = 0usize;

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let response = handle_line(dispatcher, line).await;
        let mut encoded = serde_json::to_vec(&response)?;
        encoded.push(b'\n');
        output.write_all(&encoded).await?;
        output.flush().await?;
        handled += 1;
    }

    tracing::info!("Input closed after {} request(s)", handled);
    Ok(())
}
