//! Log setup for the terminal client.
//!
//! The TUI owns stdout and stderr while it runs, so log lines go to a file
//! in the state directory. `BOGGLER_LOG` overrides the verbosity flag.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "BOGGLER_LOG";

/// Maps `-v` occurrences to a tracing directive.
///
/// - 0 → `"warn"`
/// - 1 → `"info"`
/// - 2 → `"debug"`
/// - 3+ → `"trace"`
pub const fn verbosity_to_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Installs the global subscriber writing to `path`.
///
/// Uses `try_init()`, so a second call is a no-op.
pub fn init_logging(path: &Path, verbosity: u8) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(verbosity_to_directive(verbosity)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(verbosity >= 2)
        .with_writer(Mutex::new(file))
        .try_init();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn verbosity_mapping() {
        assert_eq!(verbosity_to_directive(0), "warn");
        assert_eq!(verbosity_to_directive(1), "info");
        assert_eq!(verbosity_to_directive(2), "debug");
        assert_eq!(verbosity_to_directive(3), "trace");
        assert_eq!(verbosity_to_directive(200), "trace");
    }

    #[test]
    fn init_creates_log_file_and_is_repeatable() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("logs").join("boggler.log");

        init_logging(&path, 1).unwrap();
        init_logging(&path, 1).unwrap();

        assert!(path.exists());
    }

    #[test]
    fn init_reports_unusable_log_location() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("state");
        fs::write(&blocker, b"").unwrap();

        let result = init_logging(&blocker.join("boggler.log"), 0);
        assert!(result.is_err());
    }
}
