use chrono::Local;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::warn;

use crate::celebration::Celebration;
use crate::controller::{ReportState, SessionController, SessionEvent};
use crate::display::Scoreboard;
use crate::history::{GameHistory, GameRecord};

/// What the event loop should do after the app handled an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    Redraw,
    NewGame,
    Quit,
}

/// Which screen is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Game,
    History,
}

/// Terminal application state: the controller plus everything only the UI needs
pub struct App {
    pub controller: SessionController<Scoreboard>,
    pub input: String,
    pub celebration: Celebration,
    pub view: View,
    /// Past games, loaded when the history screen opens
    pub past_games: Vec<GameRecord>,
    history: Option<GameHistory>,
    recorded_session: u64,
}

impl App {
    pub fn new(controller: SessionController<Scoreboard>, history: Option<GameHistory>) -> Self {
        Self {
            controller,
            input: String::new(),
            celebration: Celebration::new(),
            view: View::Game,
            past_games: Vec::new(),
            history,
            recorded_session: 0,
        }
    }

    pub fn scoreboard(&self) -> &Scoreboard {
        self.controller.sink()
    }

    /// A session was played and is over
    pub fn is_game_over(&self) -> bool {
        self.controller.session().is_some() && !self.controller.is_active()
    }

    pub fn on_key(&mut self, key: KeyEvent) -> Action {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Action::Quit;
        }

        if self.view == View::History {
            return match key.code {
                KeyCode::Esc => Action::Quit,
                KeyCode::Char('n') => Action::NewGame,
                KeyCode::Char('b') | KeyCode::Backspace => {
                    self.view = View::Game;
                    Action::Redraw
                }
                _ => Action::None,
            };
        }

        match key.code {
            KeyCode::Esc => Action::Quit,
            KeyCode::Enter if self.controller.is_active() => {
                let word = std::mem::take(&mut self.input);
                self.controller.submit_guess(&word);
                Action::Redraw
            }
            KeyCode::Backspace if self.controller.is_active() => {
                self.input.pop();
                Action::Redraw
            }
            KeyCode::Char(c) if self.controller.is_active() => {
                if c.is_control() {
                    return Action::None;
                }
                self.input.push(c);
                Action::Redraw
            }
            KeyCode::Char('n') if self.is_game_over() => Action::NewGame,
            KeyCode::Char('h') if self.is_game_over() && self.history.is_some() => {
                self.show_history();
                Action::Redraw
            }
            _ => Action::None,
        }
    }

    /// Feeds a controller completion back in. `size` is the terminal size,
    /// used to lay out the celebration.
    pub fn on_session_event(&mut self, event: SessionEvent, size: (u16, u16)) {
        self.controller.handle(event);

        if self.is_game_over() {
            self.input.clear();
        }
        if self.controller.sink_mut().take_celebration() {
            self.celebration.start(size.0, size.1);
        }
        self.record_if_settled();
    }

    /// Advances animations. Returns true when a redraw is needed.
    pub fn on_frame(&mut self) -> bool {
        if self.celebration.is_active {
            self.celebration.update();
            true
        } else {
            false
        }
    }

    pub fn has_history(&self) -> bool {
        self.history.is_some()
    }

    fn show_history(&mut self) {
        let Some(history) = &self.history else {
            return;
        };
        match history.load() {
            Ok(mut records) => {
                records.reverse();
                self.past_games = records;
            }
            Err(e) => {
                warn!(path = %history.path().display(), error = %e, "history: load failed");
                self.past_games.clear();
            }
        }
        self.view = View::History;
    }

    pub fn new_game(&mut self) {
        self.view = View::Game;
        self.input.clear();
        self.celebration.stop();
        self.controller.start();
    }

    fn record_if_settled(&mut self) {
        let session_id = self.controller.session_id();
        if session_id == self.recorded_session || !self.controller.report().is_settled() {
            return;
        }
        self.recorded_session = session_id;

        let Some(history) = &self.history else {
            return;
        };
        let new_high_score = match self.controller.report() {
            ReportState::Received(report) => Some(report.is_new_high_score),
            _ => None,
        };
        let record = GameRecord {
            played_at: Local::now(),
            duration_secs: self.controller.config().duration_secs,
            score: self.controller.score(),
            new_high_score,
        };
        if let Err(e) = history.append(&record) {
            warn!(path = %history.path().display(), error = %e, "history: append failed");
        }
    }
}
