//! Adapter module - concrete collaborator stores
//!
//! Implements the core's storage boundary traits with JSON files: a local
//! best-score cache and a capacity-bounded leaderboard. The core never
//! sees a file path or a serialization format; it only talks to the
//! [`HighScoreStore`] and [`ScoreBoard`] traits, and it treats every
//! failure from here as recoverable.
//!
//! [`HighScoreStore`]: mergedrop_core::store::HighScoreStore
//! [`ScoreBoard`]: mergedrop_core::store::ScoreBoard

use std::path::PathBuf;

pub mod highscore;
pub mod leaderboard;

pub use highscore::HighScoreFile;
pub use leaderboard::JsonScoreBoard;

/// Errors from the JSON file stores.
#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    #[error("failed to read {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    FileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed store file: {0}")]
    Malformed(#[from] serde_json::Error),
}
