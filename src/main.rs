use boggler::{
    app::{Action, App},
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    controller::{SessionController, SessionEvent},
    display::Scoreboard,
    evaluator::{GuessEvaluator, HttpEvaluator},
    history::GameHistory,
    logging,
    runtime::{spawn_terminal_input, AppEvent, FixedTicker, InputEvent, Runner},
};
use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    sync::Arc,
    time::Duration,
};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{info, warn};

const FRAME_RATE_MS: u64 = 100;

/// terminal boggle client: find words before the clock runs out
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A terminal client for a boggle server. Type words you find on the board, press enter to check them, and beat your high score before the countdown ends."
)]
pub struct Cli {
    /// base url of the boggle server
    #[clap(short = 'u', long)]
    server_url: Option<String>,

    /// number of seconds per game
    #[clap(short = 's', long)]
    secs: Option<u32>,

    /// request timeout in milliseconds
    #[clap(long)]
    timeout_ms: Option<u64>,

    /// join the game a browser is showing: the value of its `session` cookie
    #[clap(long, value_name = "VALUE")]
    session_cookie: Option<String>,

    /// do not write finished games to the local history file
    #[clap(long)]
    no_history: bool,

    /// save the effective settings as the new defaults
    #[clap(long)]
    save_config: bool,

    /// increase log verbosity (-v info, -vv debug, -vvv trace)
    #[clap(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    /// Overlay command line values on the stored configuration
    fn apply(&self, mut config: Config) -> Config {
        if let Some(url) = &self.server_url {
            config.server_url = url.clone();
        }
        if let Some(secs) = self.secs {
            config.duration_secs = secs;
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config.request_timeout_ms = timeout_ms;
        }
        if self.no_history {
            config.record_history = false;
        }
        config
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if let Some(path) = AppDirs::log_path() {
        if let Err(e) = logging::init_logging(&path, cli.verbose) {
            eprintln!(
                "warning: logging disabled, cannot open {}: {}",
                path.display(),
                e
            );
        }
    }

    let store = FileConfigStore::new();
    let config = cli.apply(store.load());
    if let Err(e) = config.validate() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::ValueValidation, e).exit();
    }
    if cli.save_config {
        store.save(&config)?;
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let server_url = config.server_url.clone();
    let evaluator = Arc::new(match &cli.session_cookie {
        Some(cookie) => HttpEvaluator::join_session(server_url, config.request_timeout(), cookie)?,
        None => HttpEvaluator::new(server_url, config.request_timeout())?,
    });
    let history = if config.record_history {
        AppDirs::history_path().map(GameHistory::with_path)
    } else {
        None
    };
    let (controller, session_rx) = SessionController::new(
        config.session_config(),
        evaluator.clone(),
        Scoreboard::default(),
    );
    let mut app = App::new(controller, history);
    info!(
        server_url = %config.server_url,
        joined = evaluator.is_joined(),
        "boggler starting"
    );

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app, evaluator.as_ref(), session_rx).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn start_tui<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    evaluator: &dyn GuessEvaluator,
    session_rx: UnboundedReceiver<SessionEvent>,
) -> Result<(), Box<dyn Error>> {
    start_game(app, evaluator).await;

    let mut runner = Runner::new(
        spawn_terminal_input(),
        session_rx,
        FixedTicker::new(Duration::from_millis(FRAME_RATE_MS)),
    );
    terminal.draw(|f| f.render_widget(&*app, f.area()))?;

    loop {
        let redraw = match runner.step().await {
            AppEvent::Session(event) => {
                let size = terminal.size()?;
                app.on_session_event(event, (size.width, size.height));
                true
            }
            AppEvent::Input(InputEvent::Resize) => true,
            AppEvent::Input(InputEvent::Key(key)) => match app.on_key(key) {
                Action::Quit => break,
                Action::NewGame => {
                    start_game(app, evaluator).await;
                    true
                }
                Action::Redraw => true,
                Action::None => false,
            },
            AppEvent::Frame => app.on_frame(),
        };

        if redraw {
            terminal.draw(|f| f.render_widget(&*app, f.area()))?;
        }
    }

    Ok(())
}

/// Asks the server for a fresh board, unless playing a joined session's
/// board, then starts the countdown
async fn start_game(app: &mut App, evaluator: &dyn GuessEvaluator) {
    if let Err(e) = evaluator.new_board().await {
        warn!(error = %e, "could not fetch a new board; guesses will likely fail");
    }
    app.new_game();
}
