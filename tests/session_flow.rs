// Drives the session controller against a scripted in-memory oracle and
// checks the game rules end to end: scoring, countdown, and the single
// final score report.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use assert_matches::assert_matches;
use async_trait::async_trait;
use boggler::controller::{ReportState, SessionController, SessionEvent, REPORT_FAILED_TEXT};
use boggler::display::DisplayEvent;
use boggler::error::EvaluatorError;
use boggler::evaluator::GuessEvaluator;
use boggler::outcome::{Outcome, ScoreReport};
use boggler::session::{SessionConfig, SessionStatus};
use tokio::sync::mpsc::UnboundedReceiver;

/// Accepts every word except a few fixed ones
#[derive(Default)]
struct ScriptedEvaluator {
    evaluate_calls: AtomicUsize,
    reported: Mutex<Vec<u32>>,
    new_high_score: bool,
    fail_report: bool,
}

#[async_trait]
impl GuessEvaluator for ScriptedEvaluator {
    async fn evaluate(&self, word: &str) -> Result<Outcome, EvaluatorError> {
        self.evaluate_calls.fetch_add(1, Ordering::SeqCst);
        match word {
            "zzz" => Ok(Outcome::NotAWord),
            "the" => Ok(Outcome::NotOnBoard),
            "again" => Ok(Outcome::AlreadyPlayed),
            "garbled" => Err(EvaluatorError::UnrecognizedOutcome(
                "result \"maybe\"".to_string(),
            )),
            _ => Ok(Outcome::Accepted),
        }
    }

    async fn report_final_score(&self, score: u32) -> Result<ScoreReport, EvaluatorError> {
        self.reported.lock().unwrap().push(score);
        if self.fail_report {
            return Err(EvaluatorError::UnrecognizedOutcome("{}".to_string()));
        }
        Ok(ScoreReport {
            final_score: score,
            is_new_high_score: self.new_high_score,
        })
    }
}

type Controller = SessionController<Vec<DisplayEvent>>;

fn setup(
    evaluator: ScriptedEvaluator,
    duration_secs: u32,
) -> (Controller, UnboundedReceiver<SessionEvent>, Arc<ScriptedEvaluator>) {
    let evaluator = Arc::new(evaluator);
    let config = SessionConfig {
        duration_secs,
        // ticks are driven by hand in these tests
        tick_interval: Duration::from_secs(3600),
    };
    let (mut controller, rx) = SessionController::new(config, evaluator.clone(), Vec::new());
    controller.start();
    controller.sink_mut().clear();
    (controller, rx, evaluator)
}

/// Handles the next `n` completions posted by the controller's tasks
async fn settle(controller: &mut Controller, rx: &mut UnboundedReceiver<SessionEvent>, n: usize) {
    for _ in 0..n {
        let event = rx.recv().await.expect("controller channel closed");
        controller.handle(event);
    }
}

fn result_texts(events: &[DisplayEvent]) -> Vec<String> {
    events
        .iter()
        .filter_map(|e| match e {
            DisplayEvent::ResultText(text) => Some(text.clone()),
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn accepted_guess_adds_word_length() {
    let (mut controller, mut rx, _) = setup(ScriptedEvaluator::default(), 60);

    assert!(controller.submit_guess("cat"));
    settle(&mut controller, &mut rx, 1).await;

    assert_eq!(controller.score(), 3);
    assert_eq!(
        controller.sink(),
        &vec![
            DisplayEvent::ResultText("Nice work, cat is on the board. 3 points added.".to_string()),
            DisplayEvent::Score(3),
        ]
    );
}

#[tokio::test]
async fn invalid_word_leaves_score_unchanged() {
    let (mut controller, mut rx, _) = setup(ScriptedEvaluator::default(), 60);

    controller.submit_guess("zzz");
    settle(&mut controller, &mut rx, 1).await;

    assert_eq!(controller.score(), 0);
    assert_eq!(
        controller.sink(),
        &vec![DisplayEvent::ResultText("Invalid word.".to_string())]
    );
}

#[tokio::test]
async fn only_accepted_outcomes_score() {
    let (mut controller, mut rx, _) = setup(ScriptedEvaluator::default(), 60);

    for word in ["the", "zzz", "again"] {
        controller.submit_guess(word);
        settle(&mut controller, &mut rx, 1).await;
        assert_eq!(controller.score(), 0, "{word} must not score");
    }

    controller.submit_guess("quartz");
    settle(&mut controller, &mut rx, 1).await;
    assert_eq!(controller.score(), 6);

    assert_eq!(
        result_texts(controller.sink()),
        vec![
            "Sorry, that word is not on this board.",
            "Invalid word.",
            "That word has already been played.",
            "Nice work, quartz is on the board. 6 points added.",
        ]
    );
}

#[tokio::test]
async fn guesses_are_trimmed_before_checking() {
    let (mut controller, mut rx, _) = setup(ScriptedEvaluator::default(), 60);

    controller.submit_guess("  dog \t");
    settle(&mut controller, &mut rx, 1).await;

    assert_eq!(controller.score(), 3);
    assert_eq!(
        result_texts(controller.sink()),
        vec!["Nice work, dog is on the board. 3 points added."]
    );
}

#[tokio::test]
async fn empty_guesses_never_reach_the_oracle() {
    let (mut controller, _rx, evaluator) = setup(ScriptedEvaluator::default(), 60);

    assert!(!controller.submit_guess(""));
    assert!(!controller.submit_guess("   "));
    assert!(!controller.submit_guess("\t\n"));
    tokio::task::yield_now().await;

    assert_eq!(evaluator.evaluate_calls.load(Ordering::SeqCst), 0);
    assert_eq!(controller.pending_guesses(), 0);
    assert!(controller.sink().is_empty());
}

#[tokio::test]
async fn unclassified_guess_reports_failure_and_keeps_playing() {
    let (mut controller, mut rx, _) = setup(ScriptedEvaluator::default(), 60);

    controller.submit_guess("garbled");
    settle(&mut controller, &mut rx, 1).await;

    assert_eq!(controller.score(), 0);
    assert!(controller.is_active());
    assert_eq!(
        result_texts(controller.sink()),
        vec!["Unable to check that word right now."]
    );

    controller.on_tick();
    assert_eq!(controller.session().unwrap().seconds_remaining(), 59);
}

#[tokio::test]
async fn countdown_ends_on_the_sixtieth_tick() {
    let (mut controller, mut rx, evaluator) = setup(ScriptedEvaluator::default(), 60);

    for _ in 0..59 {
        controller.on_tick();
    }
    let session = controller.session().unwrap();
    assert_eq!(session.seconds_remaining(), 1);
    assert_eq!(session.status(), SessionStatus::Active);
    assert_eq!(controller.report(), ReportState::NotRequested);

    let countdown: Vec<DisplayEvent> = (1..60).rev().map(DisplayEvent::TimeRemaining).collect();
    assert_eq!(controller.sink(), &countdown);

    controller.on_tick();
    assert_eq!(controller.session().unwrap().status(), SessionStatus::Ended);
    assert_eq!(controller.report(), ReportState::Pending);
    assert_eq!(
        &controller.sink()[59..],
        &[
            DisplayEvent::TimeRemaining(0),
            DisplayEvent::SessionEnded { final_score: 0 },
        ]
    );

    settle(&mut controller, &mut rx, 1).await;
    assert_matches!(controller.report(), ReportState::Received(_));
    assert_eq!(*evaluator.reported.lock().unwrap(), vec![0]);
}

#[tokio::test]
async fn ticks_after_end_are_no_ops() {
    let (mut controller, mut rx, evaluator) = setup(ScriptedEvaluator::default(), 2);

    controller.on_tick();
    controller.on_tick();
    settle(&mut controller, &mut rx, 1).await;
    let events_at_end = controller.sink().len();

    for _ in 0..5 {
        controller.on_tick();
    }
    tokio::task::yield_now().await;

    assert_eq!(controller.sink().len(), events_at_end);
    assert_eq!(controller.session().unwrap().seconds_remaining(), 0);
    assert_eq!(evaluator.reported.lock().unwrap().len(), 1);
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn guesses_after_end_are_ignored() {
    let (mut controller, _rx, evaluator) = setup(ScriptedEvaluator::default(), 1);

    controller.on_tick();
    assert!(!controller.submit_guess("cat"));
    tokio::task::yield_now().await;

    assert_eq!(evaluator.evaluate_calls.load(Ordering::SeqCst), 0);
    assert_eq!(controller.score(), 0);
}

#[tokio::test]
async fn final_score_is_reported_once_with_banner() {
    let evaluator = ScriptedEvaluator {
        new_high_score: true,
        ..ScriptedEvaluator::default()
    };
    let (mut controller, mut rx, evaluator) = setup(evaluator, 3);

    // 10 + 10 + 10 + 10 + 2 = 42
    for word in ["abcdefghij", "klmnopqrst", "uvwxyzabcd", "efghijklmn", "op"] {
        controller.submit_guess(word);
    }
    settle(&mut controller, &mut rx, 5).await;
    assert_eq!(controller.score(), 42);

    for _ in 0..3 {
        controller.on_tick();
    }
    settle(&mut controller, &mut rx, 1).await;

    assert_eq!(*evaluator.reported.lock().unwrap(), vec![42]);
    assert_eq!(
        controller.report(),
        ReportState::Received(ScoreReport {
            final_score: 42,
            is_new_high_score: true,
        })
    );
    let banners = controller
        .sink()
        .iter()
        .filter(|e| **e == DisplayEvent::NewHighScore)
        .count();
    assert_eq!(banners, 1);
    assert!(controller
        .sink()
        .contains(&DisplayEvent::SessionEnded { final_score: 42 }));
}

#[tokio::test]
async fn no_banner_without_new_high_score() {
    let (mut controller, mut rx, _) = setup(ScriptedEvaluator::default(), 1);

    controller.on_tick();
    settle(&mut controller, &mut rx, 1).await;

    assert!(!controller.sink().contains(&DisplayEvent::NewHighScore));
}

#[tokio::test]
async fn failed_report_is_surfaced() {
    let evaluator = ScriptedEvaluator {
        fail_report: true,
        new_high_score: true,
        ..ScriptedEvaluator::default()
    };
    let (mut controller, mut rx, _) = setup(evaluator, 1);

    controller.on_tick();
    settle(&mut controller, &mut rx, 1).await;

    assert_eq!(controller.report(), ReportState::Failed);
    assert!(!controller.sink().contains(&DisplayEvent::NewHighScore));
    assert_eq!(
        controller.sink().last(),
        Some(&DisplayEvent::ResultText(REPORT_FAILED_TEXT.to_string()))
    );
}

// A guess still in flight when the clock runs out must not change the
// score that was already reported.
#[tokio::test]
async fn guess_resolving_after_end_does_not_score() {
    let (mut controller, mut rx, evaluator) = setup(ScriptedEvaluator::default(), 1);

    assert!(controller.submit_guess("cat"));
    controller.on_tick();
    assert_eq!(controller.session().unwrap().status(), SessionStatus::Ended);

    // the late guess and the report, in whichever order they land
    settle(&mut controller, &mut rx, 2).await;

    assert_eq!(controller.score(), 0);
    assert_eq!(controller.session().unwrap().score(), 0);
    assert_eq!(*evaluator.reported.lock().unwrap(), vec![0]);
    assert!(result_texts(controller.sink()).is_empty());
    assert_eq!(controller.pending_guesses(), 0);
}

#[tokio::test]
async fn restart_begins_a_fresh_session() {
    let (mut controller, mut rx, evaluator) = setup(ScriptedEvaluator::default(), 1);

    controller.submit_guess("cat");
    settle(&mut controller, &mut rx, 1).await;
    controller.on_tick();
    settle(&mut controller, &mut rx, 1).await;

    controller.start();

    assert!(controller.is_active());
    assert_eq!(controller.score(), 0);
    assert_eq!(controller.report(), ReportState::NotRequested);
    assert_eq!(controller.session_id(), 2);

    controller.on_tick();
    settle(&mut controller, &mut rx, 1).await;
    assert_eq!(*evaluator.reported.lock().unwrap(), vec![3, 0]);
}

#[tokio::test(start_paused = true)]
async fn real_ticker_counts_down_and_stops() {
    let evaluator = Arc::new(ScriptedEvaluator::default());
    let config = SessionConfig {
        duration_secs: 3,
        tick_interval: Duration::from_secs(1),
    };
    let (mut controller, mut rx) = SessionController::new(config, evaluator.clone(), Vec::new());
    controller.start();

    while !controller.report().is_settled() {
        let event = rx.recv().await.expect("controller channel closed");
        controller.handle(event);
    }

    let countdown: Vec<u32> = controller
        .sink()
        .iter()
        .filter_map(|e| match e {
            DisplayEvent::TimeRemaining(secs) => Some(*secs),
            _ => None,
        })
        .collect();
    assert_eq!(countdown, vec![3, 2, 1, 0]);

    // the ticker was cancelled: nothing else arrives
    let next = tokio::time::timeout(Duration::from_secs(10), rx.recv()).await;
    assert!(next.is_err());
    assert_eq!(evaluator.reported.lock().unwrap().len(), 1);
}
