use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

/// One finished game as written to the local history file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub played_at: DateTime<Local>,
    pub duration_secs: u32,
    pub score: u32,
    /// `None` when the server could not be reached to record the score
    pub new_high_score: Option<bool>,
}

/// Append-only CSV log of played games.
///
/// This is a local diary only; the authoritative high score lives on the server.
#[derive(Debug, Clone)]
pub struct GameHistory {
    path: PathBuf,
}

impl GameHistory {
    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, record: &GameRecord) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        // a header is only written into a fresh file
        let needs_header = fs::metadata(&self.path).map_or(true, |m| m.len() == 0);

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(file);
        writer.serialize(record).map_err(io::Error::other)?;
        writer.flush()
    }

    pub fn load(&self) -> io::Result<Vec<GameRecord>> {
        let file = match fs::File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        csv::Reader::from_reader(file)
            .deserialize()
            .collect::<Result<Vec<GameRecord>, _>>()
            .map_err(io::Error::other)
    }
}
