//! Move evaluation - column selection for automatic play
//!
//! Scores every open column for a (current, next) block pair with a sum
//! of independent board-structure heuristics plus a one-ply lookahead,
//! and picks the best. Pure functions over immutable board snapshots;
//! nothing here mutates session state.

pub mod evaluate;

pub use evaluate::{best_column, score_column};
