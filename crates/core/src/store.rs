//! Collaborator boundary traits - persistence and leaderboard
//!
//! The core only ever talks to these traits; concrete storage (files,
//! network, whatever) lives with the collaborator. Failures surface as
//! errors here and are swallowed by the session: a failed save or submit
//! never affects game state.

use mergedrop_types::ScoreEntry;

/// Boxed error type so implementors can use whatever error stack they like.
pub type StoreError = Box<dyn std::error::Error + Send + Sync>;

/// Persistent best-score cache.
pub trait HighScoreStore {
    /// Best score seen so far; implementations report 0 when nothing is
    /// stored yet.
    fn load(&mut self) -> u32;

    /// Persist a new best score.
    fn save(&mut self, score: u32) -> Result<(), StoreError>;
}

/// Shared leaderboard.
pub trait ScoreBoard {
    /// Record a finished session.
    fn submit(&mut self, name: &str, score: u32, is_ai: bool) -> Result<(), StoreError>;

    /// Top entries, ordered by score descending.
    fn top(&self, n: usize) -> Result<Vec<ScoreEntry>, StoreError>;
}
