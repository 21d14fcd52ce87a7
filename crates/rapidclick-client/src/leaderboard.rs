//! Device-local top-5 leaderboard, independent of the server record.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use tracing::{debug, info, warn};

use rapidclick_shared::constants::{LEADERBOARD_STORAGE_KEY, MAX_LEADERBOARD_ENTRIES};
use rapidclick_shared::types::{Difficulty, LeaderboardEntry};

use crate::error::ClientError;

#[derive(Debug, Clone, Default)]
pub struct Leaderboard {
    /// `None` keeps the board in memory only.
    path: Option<PathBuf>,
    entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// `<platform data dir>/rapidclick_leaderboard.json`
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "rapidclick")
            .map(|dirs| dirs.data_dir().join(LEADERBOARD_STORAGE_KEY))
    }

    /// Load the board from `path`. A missing or unreadable file yields an
    /// empty board that will be written back to `path` on the next save.
    pub fn load(path: PathBuf) -> Self {
        let entries = match read_entries(&path) {
            Ok(Some(mut entries)) => {
                entries.sort_by(|a, b| b.score.cmp(&a.score));
                entries.truncate(MAX_LEADERBOARD_ENTRIES);
                info!(count = entries.len(), path = %path.display(), "Loaded leaderboard");
                entries
            }
            Ok(None) => {
                debug!(path = %path.display(), "No leaderboard yet, starting fresh");
                Vec::new()
            }
            Err(e) => {
                warn!(error = %e, path = %path.display(), "Unreadable leaderboard, starting fresh");
                Vec::new()
            }
        };
        Self {
            path: Some(path),
            entries,
        }
    }

    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn qualifies(&self, score: u32) -> bool {
        if self.entries.len() < MAX_LEADERBOARD_ENTRIES {
            return true;
        }
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Insert a finished session. Returns the 1-based rank, or `None` when the
    /// score falls off the bottom of a full board.
    pub fn record(
        &mut self,
        score: u32,
        difficulty: Difficulty,
        at: DateTime<Utc>,
    ) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }

        let entry = LeaderboardEntry {
            score,
            difficulty,
            date: at.format("%Y-%m-%d %H:%M").to_string(),
            timestamp: at.timestamp_millis(),
        };

        // Equal scores keep the earlier entry ahead.
        let pos = self
            .entries
            .iter()
            .position(|e| score > e.score)
            .unwrap_or(self.entries.len());
        self.entries.insert(pos, entry);
        self.entries.truncate(MAX_LEADERBOARD_ENTRIES);

        Some(pos + 1)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn save(&self) -> Result<(), ClientError> {
        let Some(ref path) = self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.entries)?;
        std::fs::write(path, json)?;
        debug!(count = self.entries.len(), path = %path.display(), "Saved leaderboard");
        Ok(())
    }
}

fn read_entries(path: &Path) -> Result<Option<Vec<LeaderboardEntry>>, ClientError> {
    match std::fs::read_to_string(path) {
        Ok(json) => Ok(Some(serde_json::from_str(&json)?)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}
