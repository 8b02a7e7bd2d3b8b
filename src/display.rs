/// Presentation update emitted by the session controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayEvent {
    TimeRemaining(u32),
    SessionEnded { final_score: u32 },
    ResultText(String),
    Score(u32),
    NewHighScore,
}

/// Consumer of display updates: a terminal UI, a log, or a test recorder.
pub trait DisplaySink {
    fn show(&mut self, event: DisplayEvent);
}

/// Recording sink for tests and headless runs
impl DisplaySink for Vec<DisplayEvent> {
    fn show(&mut self, event: DisplayEvent) {
        self.push(event);
    }
}

pub fn time_remaining_text(seconds: u32) -> String {
    format!("Time remaining: {} seconds", seconds)
}

pub fn game_over_text(final_score: u32) -> String {
    format!("Time's up! Final score is {}.", final_score)
}

pub const NEW_HIGH_SCORE_TEXT: &str = "New high score!";

/// Terminal-side view state, folded from display events
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scoreboard {
    pub timer_text: String,
    pub result_text: Option<String>,
    pub score: u32,
    pub game_over: bool,
    pub new_high_score: bool,
    /// Set when the banner arrives, cleared once the UI has celebrated it
    pub celebrate: bool,
}

impl Scoreboard {
    /// Takes the pending celebration, if any
    pub fn take_celebration(&mut self) -> bool {
        std::mem::take(&mut self.celebrate)
    }
}

impl DisplaySink for Scoreboard {
    fn show(&mut self, event: DisplayEvent) {
        match event {
            DisplayEvent::TimeRemaining(seconds) => {
                // the first event of a fresh session resets the board
                if self.game_over {
                    *self = Scoreboard::default();
                }
                self.timer_text = time_remaining_text(seconds);
            }
            DisplayEvent::SessionEnded { final_score } => {
                self.game_over = true;
                self.score = final_score;
                self.timer_text = game_over_text(final_score);
            }
            DisplayEvent::ResultText(text) => self.result_text = Some(text),
            DisplayEvent::Score(score) => self.score = score,
            DisplayEvent::NewHighScore => {
                if !self.new_high_score {
                    self.new_high_score = true;
                    self.celebrate = true;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec_sink_records_in_order() {
        let mut sink: Vec<DisplayEvent> = Vec::new();
        sink.show(DisplayEvent::TimeRemaining(59));
        sink.show(DisplayEvent::Score(3));

        assert_eq!(
            sink,
            vec![DisplayEvent::TimeRemaining(59), DisplayEvent::Score(3)]
        );
    }

    #[test]
    fn test_texts() {
        assert_eq!(time_remaining_text(42), "Time remaining: 42 seconds");
        assert_eq!(game_over_text(17), "Time's up! Final score is 17.");
    }

    #[test]
    fn test_scoreboard_folds_events() {
        let mut board = Scoreboard::default();
        board.show(DisplayEvent::TimeRemaining(60));
        board.show(DisplayEvent::ResultText("Invalid word.".to_string()));
        board.show(DisplayEvent::Score(7));

        assert_eq!(board.timer_text, "Time remaining: 60 seconds");
        assert_eq!(board.result_text.as_deref(), Some("Invalid word."));
        assert_eq!(board.score, 7);
        assert!(!board.game_over);
    }

    #[test]
    fn test_scoreboard_game_over_and_banner() {
        let mut board = Scoreboard::default();
        board.show(DisplayEvent::SessionEnded { final_score: 42 });
        board.show(DisplayEvent::NewHighScore);

        assert!(board.game_over);
        assert!(board.new_high_score);
        assert_eq!(board.timer_text, "Time's up! Final score is 42.");
        assert!(board.take_celebration());
        assert!(!board.take_celebration());
    }

    #[test]
    fn test_scoreboard_celebrates_once() {
        let mut board = Scoreboard::default();
        board.show(DisplayEvent::NewHighScore);
        assert!(board.take_celebration());

        board.show(DisplayEvent::NewHighScore);
        assert!(!board.take_celebration());
    }

    #[test]
    fn test_scoreboard_resets_for_new_session() {
        let mut board = Scoreboard::default();
        board.show(DisplayEvent::ResultText("Invalid word.".to_string()));
        board.show(DisplayEvent::SessionEnded { final_score: 5 });
        board.show(DisplayEvent::NewHighScore);

        board.show(DisplayEvent::TimeRemaining(60));

        assert!(!board.game_over);
        assert!(!board.new_high_score);
        assert_eq!(board.result_text, None);
        assert_eq!(board.timer_text, "Time remaining: 60 seconds");
    }
}
