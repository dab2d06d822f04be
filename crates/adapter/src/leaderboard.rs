//! Shared leaderboard backed by a JSON file
//!
//! Entries are kept sorted by score descending and truncated to the
//! configured capacity on every submit.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use mergedrop_core::store::{ScoreBoard, StoreError};
use mergedrop_types::ScoreEntry;

use crate::AdapterError;

/// Default number of entries retained.
pub const DEFAULT_CAPACITY: usize = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredEntry {
    name: String,
    score: u32,
    is_ai: bool,
}

impl From<StoredEntry> for ScoreEntry {
    fn from(entry: StoredEntry) -> Self {
        ScoreEntry {
            name: entry.name,
            score: entry.score,
            is_ai: entry.is_ai,
        }
    }
}

/// Capacity-bounded leaderboard in a single JSON document.
#[derive(Debug, Clone)]
pub struct JsonScoreBoard {
    path: PathBuf,
    capacity: usize,
}

impl JsonScoreBoard {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_capacity(path, DEFAULT_CAPACITY)
    }

    pub fn with_capacity(path: impl Into<PathBuf>, capacity: usize) -> Self {
        Self {
            path: path.into(),
            capacity: capacity.max(1),
        }
    }

    fn read_entries(&self) -> Result<Vec<StoredEntry>, AdapterError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&self.path).map_err(|source| AdapterError::FileRead {
            path: self.path.clone(),
            source,
        })?;
        Ok(serde_json::from_str(&content)?)
    }

    fn write_entries(&self, entries: &[StoredEntry]) -> Result<(), AdapterError> {
        let body = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, body).map_err(|source| AdapterError::FileWrite {
            path: self.path.clone(),
            source,
        })
    }
}

impl ScoreBoard for JsonScoreBoard {
    fn submit(&mut self, name: &str, score: u32, is_ai: bool) -> Result<(), StoreError> {
        let mut entries = self.read_entries()?;
        entries.push(StoredEntry {
            name: name.to_string(),
            score,
            is_ai,
        });
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries.truncate(self.capacity);
        self.write_entries(&entries)?;
        Ok(())
    }

    fn top(&self, n: usize) -> Result<Vec<ScoreEntry>, StoreError> {
        let entries = self.read_entries()?;
        Ok(entries.into_iter().take(n).map(ScoreEntry::from).collect())
    }
}
