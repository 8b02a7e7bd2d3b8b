use serde::{Deserialize, Serialize};

/// Classification of a guess by the game server
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Outcome {
    #[strum(serialize = "ok")]
    Accepted,
    #[strum(serialize = "not-on-board")]
    NotOnBoard,
    #[strum(serialize = "not-word")]
    NotAWord,
    #[strum(serialize = "played-word")]
    AlreadyPlayed,
}

impl Outcome {
    /// Maps the server's `result` string onto an outcome. Unknown kinds are `None`.
    pub fn from_wire(kind: &str) -> Option<Self> {
        match kind {
            "ok" => Some(Outcome::Accepted),
            "not-on-board" => Some(Outcome::NotOnBoard),
            "not-word" => Some(Outcome::NotAWord),
            "played-word" => Some(Outcome::AlreadyPlayed),
            _ => None,
        }
    }
}

/// A classified word submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guess {
    pub word: String,
    pub outcome: Outcome,
}

impl Guess {
    pub fn new(word: impl Into<String>, outcome: Outcome) -> Self {
        Self {
            word: word.into(),
            outcome,
        }
    }

    /// Points this guess is worth: its length in characters when accepted.
    pub fn points(&self) -> u32 {
        match self.outcome {
            Outcome::Accepted => self.word.chars().count() as u32,
            _ => 0,
        }
    }

    pub fn result_text(&self) -> String {
        match self.outcome {
            Outcome::Accepted => format!(
                "Nice work, {} is on the board. {} points added.",
                self.word,
                self.points()
            ),
            Outcome::NotOnBoard => "Sorry, that word is not on this board.".to_string(),
            Outcome::NotAWord => "Invalid word.".to_string(),
            Outcome::AlreadyPlayed => "That word has already been played.".to_string(),
        }
    }
}

/// Shown when a guess could not be classified
pub const UNCLASSIFIED_TEXT: &str = "Unable to check that word right now.";

/// Server's answer to a final score submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreReport {
    pub final_score: u32,
    pub is_new_high_score: bool,
}

// Wire shapes of the game server's JSON endpoints

#[derive(Debug, Deserialize)]
pub(crate) struct GuessResponse {
    pub result: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct GameStatsRequest {
    pub score: u32,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GameStatsResponse {
    #[serde(rename = "newHighScore")]
    pub new_high_score: bool,
}
