//! Core game logic module - pure, deterministic, and testable
//!
//! This module contains all the game rules, state management, and merge
//! resolution logic. It has **zero dependencies** on UI, networking, or
//! I/O, making it:
//!
//! - **Deterministic**: Same seed produces identical games
//! - **Testable**: Comprehensive unit tests for all game rules
//! - **Portable**: Can run in any environment (terminal, GUI, headless)
//!
//! # Module Structure
//!
//! - [`board`]: 5x8 value grid with gravity compaction and terminal detection
//! - [`generator`]: next-block generation weighted by the board maximum
//! - [`landing`]: landing resolution including the top-merge sentinel
//! - [`merge`]: the cascade engine (triples, L-shapes, pairs, residual scans)
//! - [`session`]: turn-level state machine owning board, score and preview
//! - [`snapshot`]: copy-out session view for presentation layers
//! - [`rng`]: injectable random source with a deterministic default
//! - [`store`]: collaborator traits for high-score and leaderboard storage
//!
//! # Game Rules
//!
//! Blocks carry powers of two and fall into one of five columns. Equal
//! adjacent values combine; three-in-a-line and L-shaped triples pay
//! `value*4`, pairs pay `value*2`. Merges cascade under gravity until the
//! board is stable. A full column whose top cell matches the incoming
//! value merges in place instead of blocking the drop. The game ends when
//! the board is full and no adjacent pair remains.
//!
//! # Example
//!
//! ```
//! use mergedrop_core::GameSession;
//!
//! let mut session = GameSession::new(12345);
//! let report = session.drop_column(2).expect("column is open");
//!
//! // The cascade's snapshots are what a UI would animate between.
//! for _board in report.resolution.snapshots() {}
//! assert!(!session.is_over());
//! ```

pub mod board;
pub mod generator;
pub mod landing;
pub mod merge;
pub mod rng;
pub mod session;
pub mod snapshot;
pub mod store;

pub use board::Board;
pub use generator::BlockGenerator;
pub use landing::landing_row;
pub use merge::{CascadeStep, MergeEvent, Resolution};
pub use rng::{RandomSource, SimpleRng};
pub use session::{DropError, DropReport, GameSession, Phase, Preview};
pub use snapshot::SessionSnapshot;
pub use store::{HighScoreStore, ScoreBoard, StoreError};
