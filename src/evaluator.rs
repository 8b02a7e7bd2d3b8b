use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::cookie::Jar;
use reqwest::{Client, Url};
use tracing::{debug, info, warn};

use crate::error::EvaluatorError;
use crate::outcome::{GameStatsRequest, GameStatsResponse, GuessResponse, Outcome, ScoreReport};

/// Remote oracle that classifies guesses and records final scores.
///
/// Implementations make exactly one request per call: no retries, no caching.
#[async_trait]
pub trait GuessEvaluator: Send + Sync {
    /// Asks the server for a fresh board. Called before every session.
    async fn new_board(&self) -> Result<(), EvaluatorError> {
        Ok(())
    }

    async fn evaluate(&self, word: &str) -> Result<Outcome, EvaluatorError>;

    async fn report_final_score(&self, score: u32) -> Result<ScoreReport, EvaluatorError>;
}

/// Name of the cookie the game server keeps the board in
pub const SESSION_COOKIE: &str = "session";

/// Talks to the game server over HTTP.
///
/// The server keeps the board in its session cookie, so the client carries a
/// cookie jar across `new_board` and the `/guess` calls that follow it. A
/// client joined to an existing session (see [`HttpEvaluator::join_session`])
/// plays the board that session already holds and never asks for a new one.
#[derive(Debug, Clone)]
pub struct HttpEvaluator {
    http: Client,
    server_url: String,
    joined: bool,
}

impl HttpEvaluator {
    pub fn new(server_url: impl Into<String>, timeout: Duration) -> Result<Self, EvaluatorError> {
        Self::build(server_url.into(), timeout, None)
    }

    /// Plays the board held by an existing server session, such as the one a
    /// browser is showing. `cookie` is the value of its `session` cookie.
    pub fn join_session(
        server_url: impl Into<String>,
        timeout: Duration,
        cookie: &str,
    ) -> Result<Self, EvaluatorError> {
        Self::build(server_url.into(), timeout, Some(cookie.trim()))
    }

    fn build(
        server_url: String,
        timeout: Duration,
        cookie: Option<&str>,
    ) -> Result<Self, EvaluatorError> {
        let server_url = server_url.trim_end_matches('/').to_string();
        let base = Url::parse(&server_url)?;

        let jar = Jar::default();
        if let Some(cookie) = cookie {
            jar.add_cookie_str(&format!("{SESSION_COOKIE}={cookie}; Path=/"), &base);
        }
        let http = Client::builder()
            .cookie_provider(Arc::new(jar))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            server_url,
            joined: cookie.is_some(),
        })
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    /// Whether this client plays a board from an existing session
    pub fn is_joined(&self) -> bool {
        self.joined
    }
}

#[async_trait]
impl GuessEvaluator for HttpEvaluator {
    async fn new_board(&self) -> Result<(), EvaluatorError> {
        let server_url = &self.server_url;
        if self.joined {
            debug!(server_url, "oracle: keeping the joined session's board");
            return Ok(());
        }
        self.http
            .get(format!("{server_url}/"))
            .send()
            .await?
            .error_for_status()?;
        info!(server_url, "oracle: new board requested");
        Ok(())
    }

    async fn evaluate(&self, word: &str) -> Result<Outcome, EvaluatorError> {
        let server_url = &self.server_url;
        let body = self
            .http
            .get(format!("{server_url}/guess"))
            .query(&[("guess", word)])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let response: GuessResponse = serde_json::from_str(&body).map_err(|e| {
            warn!(word, error = %e, "oracle: malformed guess response");
            EvaluatorError::UnrecognizedOutcome(format!("{e}: {body}"))
        })?;

        let outcome = Outcome::from_wire(&response.result).ok_or_else(|| {
            warn!(word, kind = %response.result, "oracle: unknown guess result");
            EvaluatorError::UnrecognizedOutcome(format!("result {:?}", response.result))
        })?;
        debug!(word, %outcome, "oracle: guess classified");
        Ok(outcome)
    }

    async fn report_final_score(&self, score: u32) -> Result<ScoreReport, EvaluatorError> {
        let server_url = &self.server_url;
        let body = self
            .http
            .post(format!("{server_url}/game-stats"))
            .json(&GameStatsRequest { score })
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let response: GameStatsResponse = serde_json::from_str(&body)
            .map_err(|e| EvaluatorError::UnrecognizedOutcome(format!("{e}: {body}")))?;
        info!(
            score,
            new_high_score = response.new_high_score,
            "oracle: final score recorded"
        );
        Ok(ScoreReport {
            final_score: score,
            is_new_high_score: response.new_high_score,
        })
    }
}
