use std::time::Duration;

/// Length of a standard game.
pub const DEFAULT_SESSION_SECS: u32 = 60;

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub duration_secs: u32,
    /// Real time between countdown ticks. One second outside of tests.
    pub tick_interval: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            duration_secs: DEFAULT_SESSION_SECS,
            tick_interval: Duration::from_secs(1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum SessionStatus {
    Active,
    Ended,
}

/// Result of advancing the countdown by one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Session still running, with this many seconds left
    Running(u32),
    /// This tick consumed the last second; the session is now over
    Expired,
    /// Session had already ended
    Ignored,
}

/// One play-through: a score and a countdown.
///
/// Only the countdown and accepted guesses mutate it, and nothing mutates it
/// after the status becomes [`SessionStatus::Ended`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    score: u32,
    seconds_remaining: u32,
    status: SessionStatus,
}

impl Session {
    pub fn new(duration_secs: u32) -> Self {
        Self {
            score: 0,
            seconds_remaining: duration_secs,
            status: SessionStatus::Active,
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn seconds_remaining(&self) -> u32 {
        self.seconds_remaining
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn is_active(&self) -> bool {
        self.status == SessionStatus::Active
    }

    pub fn tick(&mut self) -> Tick {
        if !self.is_active() {
            return Tick::Ignored;
        }

        self.seconds_remaining = self.seconds_remaining.saturating_sub(1);

        if self.seconds_remaining == 0 {
            self.status = SessionStatus::Ended;
            Tick::Expired
        } else {
            Tick::Running(self.seconds_remaining)
        }
    }

    /// Credits an accepted word. Returns the points added, zero once ended.
    pub fn award(&mut self, word: &str) -> u32 {
        if !self.is_active() {
            return 0;
        }

        let points = word.chars().count() as u32;
        self.score += points;
        points
    }
}
