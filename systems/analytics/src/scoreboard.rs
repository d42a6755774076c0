//! Local top-score table persisted with bincode.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum number of entries kept by a [`Scoreboard`].
pub const SCOREBOARD_CAPACITY: usize = 50;

/// Failures while persisting or restoring a scoreboard.
#[derive(Debug, Error)]
pub enum ScoreboardError {
    /// Reading or writing the backing file failed.
    #[error("scoreboard i/o failed for {}", path.display())]
    Io {
        /// File that was accessed.
        path: PathBuf,
        /// Underlying i/o error.
        #[source]
        source: io::Error,
    },
    /// The scoreboard could not be serialized.
    #[error("failed to encode scoreboard")]
    Encode(#[source] bincode::Error),
    /// The stored bytes are not a scoreboard.
    #[error("failed to decode scoreboard")]
    Decode(#[source] bincode::Error),
}

/// One finished run recorded on the scoreboard.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    /// Display name of the player.
    pub name: String,
    /// Final score.
    pub score: u32,
    /// Elapsed run time in milliseconds.
    pub time_ms: u64,
    /// Enemies neutralized.
    pub kills: u32,
    /// Identifier of the level.
    pub level_id: u32,
    /// Display name of the level.
    pub level_name: String,
    /// Identifier of the selected role.
    pub role: String,
    /// Identifier of the selected difficulty.
    pub difficulty: String,
}

/// Entries ordered by descending score, never longer than [`SCOREBOARD_CAPACITY`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scoreboard {
    entries: Vec<ScoreEntry>,
}

impl Scoreboard {
    /// Creates an empty scoreboard.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries from best to worst.
    #[must_use]
    pub fn entries(&self) -> &[ScoreEntry] {
        &self.entries
    }

    /// Best entry, if any.
    #[must_use]
    pub fn best(&self) -> Option<&ScoreEntry> {
        self.entries.first()
    }

    /// Records an entry and returns its zero-based rank, or `None` when it
    /// did not make the table. Ties rank below existing entries.
    pub fn record(&mut self, entry: ScoreEntry) -> Option<usize> {
        let rank = self
            .entries
            .iter()
            .position(|existing| existing.score < entry.score)
            .unwrap_or(self.entries.len());
        if rank >= SCOREBOARD_CAPACITY {
            return None;
        }
        self.entries.insert(rank, entry);
        self.entries.truncate(SCOREBOARD_CAPACITY);
        Some(rank)
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Serializes the table.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ScoreboardError> {
        bincode::serialize(self).map_err(ScoreboardError::Encode)
    }

    /// Restores a table, re-establishing ordering and capacity.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ScoreboardError> {
        let mut board: Self = bincode::deserialize(bytes).map_err(ScoreboardError::Decode)?;
        board
            .entries
            .sort_by(|left, right| right.score.cmp(&left.score));
        board.entries.truncate(SCOREBOARD_CAPACITY);
        Ok(board)
    }

    /// Loads a table from `path`; a missing file yields an empty table.
    pub fn load(path: &Path) -> Result<Self, ScoreboardError> {
        match fs::read(path) {
            Ok(bytes) => Self::from_bytes(&bytes),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(Self::new()),
            Err(source) => Err(ScoreboardError::Io {
                path: path.to_owned(),
                source,
            }),
        }
    }

    /// Writes the table to `path`.
    pub fn save(&self, path: &Path) -> Result<(), ScoreboardError> {
        let bytes = self.to_bytes()?;
        fs::write(path, bytes).map_err(|source| ScoreboardError::Io {
            path: path.to_owned(),
            source,
        })
    }
}

/// Destination for entries of finished runs.
pub trait ScoreSink {
    /// Stores `entry`.
    fn submit(&mut self, entry: ScoreEntry) -> Result<(), ScoreboardError>;
}

impl ScoreSink for Scoreboard {
    fn submit(&mut self, entry: ScoreEntry) -> Result<(), ScoreboardError> {
        let _ = self.record(entry);
        Ok(())
    }
}

/// Sink that keeps a scoreboard in a file, reloading it on every submission.
#[derive(Clone, Debug)]
pub struct FileScoreSink {
    path: PathBuf,
}

impl FileScoreSink {
    /// Creates a sink backed by `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// File backing the sink.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScoreSink for FileScoreSink {
    fn submit(&mut self, entry: ScoreEntry) -> Result<(), ScoreboardError> {
        let mut board = Scoreboard::load(&self.path)?;
        if let Some(rank) = board.record(entry) {
            log::info!("new local score at rank {}", rank + 1);
        }
        board.save(&self.path)
    }
}
