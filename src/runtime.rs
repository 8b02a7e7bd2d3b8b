use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind};
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::time::{self, Instant, Interval, MissedTickBehavior};

use crate::controller::SessionEvent;

/// Terminal input forwarded to the app
#[derive(Clone, Debug)]
pub enum InputEvent {
    Key(KeyEvent),
    Resize,
}

/// Unified event type consumed by the app loop
#[derive(Debug)]
pub enum AppEvent {
    Input(InputEvent),
    Session(SessionEvent),
    /// Redraw opportunity for animations
    Frame,
}

/// Reads crossterm events on a background thread.
///
/// crossterm's `read` blocks, so it lives on its own OS thread and hands events
/// to the single-threaded app loop over a channel.
pub fn spawn_terminal_input() -> UnboundedReceiver<InputEvent> {
    let (tx, rx) = mpsc::unbounded_channel();

    std::thread::spawn(move || loop {
        let event = match event::read() {
            Ok(CtEvent::Key(key)) if key.kind == KeyEventKind::Press => InputEvent::Key(key),
            Ok(CtEvent::Resize(_, _)) => InputEvent::Resize,
            Ok(_) => continue,
            Err(_) => break,
        };
        if tx.send(event).is_err() {
            break;
        }
    });

    rx
}

/// Configurable ticker interface
pub trait Ticker: Send + Sync + 'static {
    fn interval(&self) -> Duration;
}

/// Fixed interval ticker
#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Runner that advances the application one event at a time.
///
/// Controller completions take priority over input so that a submitted guess
/// is reflected before the next keystroke is processed.
pub struct Runner {
    input: UnboundedReceiver<InputEvent>,
    session: UnboundedReceiver<SessionEvent>,
    frame: Interval,
}

impl Runner {
    /// Must be called from within a tokio runtime.
    pub fn new<T: Ticker>(
        input: UnboundedReceiver<InputEvent>,
        session: UnboundedReceiver<SessionEvent>,
        ticker: T,
    ) -> Self {
        let period = ticker.interval();
        let mut frame = time::interval_at(Instant::now() + period, period);
        frame.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Self {
            input,
            session,
            frame,
        }
    }

    /// Waits for the next event, or a frame tick if nothing else arrives first
    pub async fn step(&mut self) -> AppEvent {
        tokio::select! {
            biased;
            Some(event) = self.session.recv() => AppEvent::Session(event),
            Some(event) = self.input.recv() => AppEvent::Input(event),
            _ = self.frame.tick() => AppEvent::Frame,
        }
    }
}
