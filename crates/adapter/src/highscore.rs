//! Local best-score cache backed by a JSON file

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use mergedrop_core::store::{HighScoreStore, StoreError};

use crate::AdapterError;

#[derive(Debug, Default, Serialize, Deserialize)]
struct HighScoreRecord {
    best: u32,
}

/// Persists the best score in a single JSON document.
#[derive(Debug, Clone)]
pub struct HighScoreFile {
    path: PathBuf,
}

impl HighScoreFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    fn read_record(&self) -> Result<HighScoreRecord, AdapterError> {
        if !self.path.exists() {
            return Ok(HighScoreRecord::default());
        }
        let content = fs::read_to_string(&self.path).map_err(|source| AdapterError::FileRead {
            path: self.path.clone(),
            source,
        })?;
        Ok(serde_json::from_str(&content)?)
    }
}

impl HighScoreStore for HighScoreFile {
    fn load(&mut self) -> u32 {
        // A missing or corrupt cache reads as zero; the session only ever
        // raises the value from there.
        self.read_record().map(|r| r.best).unwrap_or(0)
    }

    fn save(&mut self, score: u32) -> Result<(), StoreError> {
        let record = HighScoreRecord { best: score };
        let body = serde_json::to_string_pretty(&record).map_err(AdapterError::from)?;
        fs::write(&self.path, body).map_err(|source| AdapterError::FileWrite {
            path: self.path.clone(),
            source,
        })?;
        Ok(())
    }
}
