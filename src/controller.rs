use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::display::{DisplayEvent, DisplaySink};
use crate::error::EvaluatorError;
use crate::evaluator::GuessEvaluator;
use crate::outcome::{Guess, Outcome, ScoreReport, UNCLASSIFIED_TEXT};
use crate::session::{Session, SessionConfig, Tick};

/// Shown when the final score could not be recorded
pub const REPORT_FAILED_TEXT: &str = "Unable to record your final score.";

/// Completions posted back to the controller by its timer and remote calls.
///
/// Every event carries the id of the session that produced it so that a
/// stray completion from a previous game never touches the current one.
#[derive(Debug)]
pub enum SessionEvent {
    Tick {
        session_id: u64,
    },
    GuessResolved {
        session_id: u64,
        word: String,
        result: Result<Outcome, EvaluatorError>,
    },
    ScoreReported {
        session_id: u64,
        result: Result<ScoreReport, EvaluatorError>,
    },
}

/// Progress of the once-per-session final score submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportState {
    NotRequested,
    Pending,
    Received(ScoreReport),
    Failed,
}

impl ReportState {
    pub fn is_settled(&self) -> bool {
        matches!(self, ReportState::Received(_) | ReportState::Failed)
    }
}

/// Owns the game lifecycle: the countdown, the score, and the two remote calls.
///
/// The controller never blocks. Remote calls and the countdown run as tasks
/// that post [`SessionEvent`]s to the receiver returned by [`SessionController::new`];
/// the owner feeds those back through [`SessionController::handle`]. All
/// session state is mutated from that single loop.
pub struct SessionController<S: DisplaySink> {
    config: SessionConfig,
    evaluator: Arc<dyn GuessEvaluator>,
    sink: S,
    events: UnboundedSender<SessionEvent>,
    session: Option<Session>,
    session_id: u64,
    ticker: Option<JoinHandle<()>>,
    report: ReportState,
    pending_guesses: usize,
}

impl<S: DisplaySink> SessionController<S> {
    pub fn new(
        config: SessionConfig,
        evaluator: Arc<dyn GuessEvaluator>,
        sink: S,
    ) -> (Self, UnboundedReceiver<SessionEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let controller = Self {
            config,
            evaluator,
            sink,
            events,
            session: None,
            session_id: 0,
            ticker: None,
            report: ReportState::NotRequested,
            pending_guesses: 0,
        };
        (controller, rx)
    }

    /// Begins a new session and schedules its countdown. Must be called
    /// from within a tokio runtime.
    pub fn start(&mut self) {
        self.stop_ticker();
        self.session_id += 1;

        let session = Session::new(self.config.duration_secs);
        self.sink
            .show(DisplayEvent::TimeRemaining(session.seconds_remaining()));
        self.sink.show(DisplayEvent::Score(session.score()));
        self.session = Some(session);
        self.report = ReportState::NotRequested;
        self.pending_guesses = 0;

        self.ticker = Some(spawn_ticker(
            self.config.tick_interval,
            self.session_id,
            self.events.clone(),
        ));
        info!(
            session_id = self.session_id,
            duration_secs = self.config.duration_secs,
            "session: started"
        );
    }

    pub fn handle(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::Tick { session_id } => {
                if session_id == self.session_id {
                    self.on_tick();
                } else {
                    debug!(session_id, "session: stale tick dropped");
                }
            }
            SessionEvent::GuessResolved {
                session_id,
                word,
                result,
            } => self.on_guess_resolved(session_id, word, result),
            SessionEvent::ScoreReported { session_id, result } => {
                self.on_score_reported(session_id, result)
            }
        }
    }

    pub fn on_tick(&mut self) {
        let tick = match self.session.as_mut() {
            Some(session) => session.tick(),
            None => return,
        };

        match tick {
            Tick::Running(seconds) => self.sink.show(DisplayEvent::TimeRemaining(seconds)),
            Tick::Expired => {
                self.stop_ticker();
                let final_score = self.score();
                self.sink.show(DisplayEvent::TimeRemaining(0));
                self.sink.show(DisplayEvent::SessionEnded { final_score });
                info!(
                    session_id = self.session_id,
                    final_score,
                    pending_guesses = self.pending_guesses,
                    "session: ended"
                );
                self.request_report(final_score);
            }
            Tick::Ignored => {
                debug!(session_id = self.session_id, "session: tick after end ignored")
            }
        }
    }

    /// Sends a word off for classification. Returns whether a remote call was made.
    pub fn submit_guess(&mut self, word: &str) -> bool {
        let word = word.trim();
        if word.is_empty() || !self.is_active() {
            return false;
        }

        self.pending_guesses += 1;
        debug!(session_id = self.session_id, word, "guess: submitted");

        let evaluator = Arc::clone(&self.evaluator);
        let events = self.events.clone();
        let session_id = self.session_id;
        let word = word.to_string();
        tokio::spawn(async move {
            let result = evaluator.evaluate(&word).await;
            let _ = events.send(SessionEvent::GuessResolved {
                session_id,
                word,
                result,
            });
        });
        true
    }

    fn on_guess_resolved(
        &mut self,
        session_id: u64,
        word: String,
        result: Result<Outcome, EvaluatorError>,
    ) {
        if session_id != self.session_id {
            debug!(session_id, word, "guess: resolved for a previous session");
            return;
        }
        self.pending_guesses = self.pending_guesses.saturating_sub(1);

        let Some(session) = self.session.as_mut().filter(|s| s.is_active()) else {
            warn!(
                session_id,
                word, "guess: resolved after game over; score left unchanged"
            );
            return;
        };

        match result {
            Ok(outcome) => {
                let guess = Guess::new(word, outcome);
                let points = if outcome == Outcome::Accepted {
                    session.award(&guess.word)
                } else {
                    0
                };
                let score = session.score();
                info!(session_id, word = %guess.word, %outcome, points, score, "guess: classified");

                self.sink.show(DisplayEvent::ResultText(guess.result_text()));
                if points > 0 {
                    self.sink.show(DisplayEvent::Score(score));
                }
            }
            Err(e) => {
                warn!(session_id, word, error = %e, "guess: could not be classified");
                self.sink
                    .show(DisplayEvent::ResultText(UNCLASSIFIED_TEXT.to_string()));
            }
        }
    }

    fn request_report(&mut self, final_score: u32) {
        if self.report != ReportState::NotRequested {
            return;
        }
        self.report = ReportState::Pending;

        let evaluator = Arc::clone(&self.evaluator);
        let events = self.events.clone();
        let session_id = self.session_id;
        tokio::spawn(async move {
            let result = evaluator.report_final_score(final_score).await;
            let _ = events.send(SessionEvent::ScoreReported { session_id, result });
        });
    }

    fn on_score_reported(&mut self, session_id: u64, result: Result<ScoreReport, EvaluatorError>) {
        if session_id != self.session_id || self.report != ReportState::Pending {
            debug!(session_id, "report: unexpected completion dropped");
            return;
        }

        match result {
            Ok(report) => {
                self.report = ReportState::Received(report);
                if report.is_new_high_score {
                    self.sink.show(DisplayEvent::NewHighScore);
                }
            }
            Err(e) => {
                warn!(session_id, error = %e, "report: final score not recorded");
                self.report = ReportState::Failed;
                self.sink
                    .show(DisplayEvent::ResultText(REPORT_FAILED_TEXT.to_string()));
            }
        }
    }

    fn stop_ticker(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn session_id(&self) -> u64 {
        self.session_id
    }

    pub fn is_active(&self) -> bool {
        self.session.as_ref().is_some_and(Session::is_active)
    }

    pub fn score(&self) -> u32 {
        self.session.as_ref().map_or(0, Session::score)
    }

    pub fn report(&self) -> ReportState {
        self.report
    }

    pub fn pending_guesses(&self) -> usize {
        self.pending_guesses
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }
}

impl<S: DisplaySink> Drop for SessionController<S> {
    fn drop(&mut self) {
        self.stop_ticker();
    }
}

fn spawn_ticker(
    period: Duration,
    session_id: u64,
    events: UnboundedSender<SessionEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut clock = time::interval_at(Instant::now() + period, period);
        clock.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            clock.tick().await;
            if events.send(SessionEvent::Tick { session_id }).is_err() {
                break;
            }
        }
    })
}
