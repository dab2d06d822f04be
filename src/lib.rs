//! Mergedrop (workspace facade crate).
//!
//! This package keeps the `mergedrop::{core,engine,adapter,types}` public
//! API stable while the implementation lives in dedicated crates under `crates/`.

pub use mergedrop_adapter as adapter;
pub use mergedrop_core as core;
pub use mergedrop_engine as engine;
pub use mergedrop_types as types;
