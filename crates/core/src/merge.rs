//! Merge resolution engine
//!
//! Applies the cascade that follows one drop. Each iteration probes a
//! single active cell against the merge patterns in strict priority
//! order, applies the first match, settles gravity, re-locates the active
//! cell, and loops until nothing matches. At most one pattern fires per
//! iteration even when several would.
//!
//! Priority order:
//! 1. triple-line through the active cell (clears 3, target gets value*4)
//! 2. L-shape containing the active cell (clears 3, target gets value*4)
//! 3. pairwise horizontal, left neighbor first (value*2)
//! 4. pairwise vertical, below first (value*2)
//! 5. board-wide vertical residual pair, column by column from the bottom
//! 6. board-wide horizontal residual pair, bottom row first
//!
//! The board-wide scans (5-6) detect adjacent pairs only. They never look
//! for triple or L patterns away from the active cell; that asymmetry is
//! part of the contract, not an oversight.

use arrayvec::ArrayVec;
use mergedrop_types::{BOARD_COLS, BOARD_ROWS};

use crate::board::Board;

/// One resolved pattern: the cells consumed, the single cell that receives
/// the new value, and that value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeEvent {
    pub sources: ArrayVec<(i8, i8), 3>,
    pub target: (i8, i8),
    pub value: u32,
}

/// One cascade iteration: the merge event plus the board right after the
/// collapse and again after gravity. Presentation layers animate between
/// these two snapshots.
#[derive(Debug, Clone, PartialEq)]
pub struct CascadeStep {
    pub event: MergeEvent,
    pub after_merge: Board,
    pub after_gravity: Board,
}

/// Everything a single resolve call produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    /// Sum of all merge target values in this cascade.
    pub score_gained: u32,
    pub steps: Vec<CascadeStep>,
}

impl Resolution {
    /// Ordered board snapshots for the render sink.
    pub fn snapshots(&self) -> impl Iterator<Item = &Board> {
        self.steps
            .iter()
            .flat_map(|s| [&s.after_merge, &s.after_gravity])
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Run the cascade loop starting from the cell at (x, y).
///
/// The caller must already have written the placed (or top-merged) value
/// into the board at that position. The board is settled when this
/// returns.
pub fn resolve(board: &mut Board, x: i8, y: i8) -> Resolution {
    let mut resolution = Resolution::default();
    let mut active = (x, y);

    while let Some(event) = probe(board, active.0, active.1) {
        for &(sx, sy) in &event.sources {
            board.set(sx, sy, None);
        }
        board.set(event.target.0, event.target.1, Some(event.value));
        let after_merge = board.clone();

        board.settle();
        let after_gravity = board.clone();

        resolution.score_gained += event.value;

        // Re-derive the active cell: the merged value's post-gravity row in
        // its column. Board-wide merges move the active column with them.
        let column = event.target.0;
        let relocated = board.find_from_bottom(column, event.value);

        resolution.steps.push(CascadeStep {
            event,
            after_merge,
            after_gravity,
        });

        match relocated {
            Some(row) => active = (column, row),
            None => {
                debug_assert!(false, "merged value missing from its column after gravity");
                break;
            }
        }
    }

    debug_assert!(board.is_settled());
    resolution
}

/// Probe the patterns in priority order; first match wins.
fn probe(board: &Board, x: i8, y: i8) -> Option<MergeEvent> {
    find_triple(board, x, y)
        .or_else(|| find_l_shape(board, x, y))
        .or_else(|| find_pair_horizontal(board, x, y))
        .or_else(|| find_pair_vertical(board, x, y))
        .or_else(|| find_residual_vertical(board))
        .or_else(|| find_residual_horizontal(board))
}

fn event(sources: [(i8, i8); 3], target: (i8, i8), value: u32) -> MergeEvent {
    MergeEvent {
        sources: sources.into_iter().collect(),
        target,
        value,
    }
}

fn pair_event(source: (i8, i8), target: (i8, i8), value: u32) -> MergeEvent {
    let mut sources = ArrayVec::new();
    sources.push(source);
    sources.push(target);
    MergeEvent {
        sources,
        target,
        value,
    }
}

/// Straight 3-cell run through the active cell, all equal. Six sub-cases:
/// centered (horizontal, vertical), then the active cell at either end of
/// a horizontal or vertical run.
fn find_triple(board: &Board, x: i8, y: i8) -> Option<MergeEvent> {
    let v = board.value(x, y)?;

    let runs: [[(i8, i8); 3]; 6] = [
        [(x - 1, y), (x, y), (x + 1, y)],
        [(x, y - 1), (x, y), (x, y + 1)],
        [(x, y), (x + 1, y), (x + 2, y)],
        [(x - 2, y), (x - 1, y), (x, y)],
        [(x, y), (x, y + 1), (x, y + 2)],
        [(x, y - 2), (x, y - 1), (x, y)],
    ];

    for run in runs {
        if run.iter().all(|&(px, py)| board.value(px, py) == Some(v)) {
            return Some(event(run, (x, y), v * 4));
        }
    }
    None
}

/// The two companion offsets for each of the 12 right-angle shapes the
/// active cell can participate in: 4 with the active cell on the corner,
/// 8 with it at the end of an arm.
const L_ARMS: [[(i8, i8); 2]; 12] = [
    [(1, 0), (0, 1)],
    [(-1, 0), (0, 1)],
    [(1, 0), (0, -1)],
    [(-1, 0), (0, -1)],
    [(0, 1), (1, 1)],
    [(0, 1), (-1, 1)],
    [(0, -1), (1, -1)],
    [(0, -1), (-1, -1)],
    [(1, 0), (1, 1)],
    [(1, 0), (1, -1)],
    [(-1, 0), (-1, 1)],
    [(-1, 0), (-1, -1)],
];

fn find_l_shape(board: &Board, x: i8, y: i8) -> Option<MergeEvent> {
    let v = board.value(x, y)?;

    for [a, b] in L_ARMS {
        let first = (x + a.0, y + a.1);
        let second = (x + b.0, y + b.1);
        if board.value(first.0, first.1) == Some(v) && board.value(second.0, second.1) == Some(v) {
            return Some(event([(x, y), first, second], (x, y), v * 4));
        }
    }
    None
}

/// Active cell matches its left (checked first) or right neighbor; both
/// collapse into the active cell's position.
fn find_pair_horizontal(board: &Board, x: i8, y: i8) -> Option<MergeEvent> {
    let v = board.value(x, y)?;

    for nx in [x - 1, x + 1] {
        if board.value(nx, y) == Some(v) {
            return Some(pair_event((nx, y), (x, y), v * 2));
        }
    }
    None
}

/// Active cell matches the cell below (checked first) or above; collapse
/// into the active cell.
fn find_pair_vertical(board: &Board, x: i8, y: i8) -> Option<MergeEvent> {
    let v = board.value(x, y)?;

    for ny in [y + 1, y - 1] {
        if board.value(x, ny) == Some(v) {
            return Some(pair_event((x, ny), (x, y), v * 2));
        }
    }
    None
}

/// First adjacent equal vertical pair anywhere, scanning column by column
/// from the bottom up. The upper cell collapses into the lower one.
fn find_residual_vertical(board: &Board) -> Option<MergeEvent> {
    for x in 0..BOARD_COLS as i8 {
        for y in (1..BOARD_ROWS as i8).rev() {
            let Some(v) = board.value(x, y) else {
                continue;
            };
            if board.value(x, y - 1) == Some(v) {
                return Some(pair_event((x, y - 1), (x, y), v * 2));
            }
        }
    }
    None
}

/// First adjacent equal horizontal pair anywhere, scanning the bottom row
/// first, left to right. The right cell collapses into the left one.
fn find_residual_horizontal(board: &Board) -> Option<MergeEvent> {
    for y in (0..BOARD_ROWS as i8).rev() {
        for x in 0..BOARD_COLS as i8 - 1 {
            let Some(v) = board.value(x, y) else {
                continue;
            };
            if board.value(x + 1, y) == Some(v) {
                return Some(pair_event((x + 1, y), (x, y), v * 2));
            }
        }
    }
    None
}
