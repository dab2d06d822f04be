//! Heuristic column scoring
//!
//! Every term is additive and independently computable from the board;
//! the weights live in `mergedrop-types`. Ties break to the lowest column
//! index, matching a first-scan-wins loop.

use mergedrop_core::{landing_row, Board};
use mergedrop_types::{
    Landing, ADJACENT_BREAK_PENALTY, ADJACENT_DISRUPT_PENALTY, ADJACENT_KEEP_BONUS,
    ADJACENT_OVERFLOW_PENALTY, BOARD_COLS, COLUMN_ORDER_FACTOR, COLUMN_ORDER_STEP_BONUS,
    COLUMN_ORDER_STEP_PENALTY, DIRECT_MERGE_BONUS, LOOKAHEAD_FACTOR, L_POTENTIAL_BONUS,
    L_POTENTIAL_NEIGHBORS, MERGE_SUPPORT_BONUS, ROW_DEPTH_WEIGHT, STACK_ORDER_BONUS,
    STACK_ORDER_PENALTY, TOP_MERGE_BONUS, TOP_ROWS_PENALTY, TOP_ROWS_THRESHOLD,
};

/// Pick the best open column for dropping `current`, given that `next`
/// follows. Returns None only when every column is blocked, which the
/// terminal check should have caught already.
pub fn best_column(board: &Board, current: u32, next: u32) -> Option<i8> {
    let mut best: Option<(i8, f32)> = None;
    let mut first_open: Option<i8> = None;

    for x in 0..BOARD_COLS as i8 {
        let Some(score) = score_column(board, x, current, next) else {
            continue;
        };
        if first_open.is_none() {
            first_open = Some(x);
        }
        if !score.is_finite() {
            continue;
        }
        match best {
            None => best = Some((x, score)),
            Some((_, top)) if score > top => best = Some((x, score)),
            _ => {}
        }
    }

    best.map(|(x, _)| x).or(first_open)
}

/// Score one candidate column; None when the column is blocked.
pub fn score_column(board: &Board, x: i8, current: u32, next: u32) -> Option<f32> {
    let landing = landing_row(board, x, current);
    let row = landing.effective_row()?;

    let mut total = merge_terms(board, x, landing, current);
    total += horizontal_adjacency(board, x, row, current);
    total += lookahead(board, x, landing, current, next);
    total += positional_bias(x, row);
    total += l_shape_potential(board, x, row, current);
    total += column_structure(board, x, landing, current);

    Some(total)
}

/// Direct-merge bonus plus stacking preference. Shared with the lookahead
/// pass, which evaluates candidate columns with only these two terms.
fn merge_terms(board: &Board, x: i8, landing: Landing, value: u32) -> f32 {
    let mut total = 0.0;

    match landing {
        Landing::TopMerge => {
            total += TOP_MERGE_BONUS;
            // The doubled cell stays at row 0; row 1 is its support.
            if support_keeps_order(board, x, 1, value * 2) {
                total += MERGE_SUPPORT_BONUS;
            }
        }
        Landing::Row(row) => {
            let below = board.value(x, row + 1);

            if below == Some(value) {
                total += DIRECT_MERGE_BONUS;
                // The pair collapses onto the support's row; the cell
                // beneath that decides the follow-up bonus.
                if support_keeps_order(board, x, row + 2, value * 2) {
                    total += MERGE_SUPPORT_BONUS;
                }
            }

            if let Some(support) = below {
                total += if value <= support {
                    STACK_ORDER_BONUS
                } else {
                    STACK_ORDER_PENALTY
                };
            }
        }
        Landing::Blocked => {}
    }

    total
}

/// True when the cell at (x, y) keeps a freshly merged value well placed:
/// empty, off the board, or at least double the merged value.
fn support_keeps_order(board: &Board, x: i8, y: i8, merged: u32) -> bool {
    if board.is_out_of_bounds(x, y) {
        return true;
    }
    match board.value(x, y) {
        None => true,
        Some(v) => v >= merged * 2,
    }
}

/// Adjustment for landing next to an equal value: merging sideways can
/// disrupt the columns it touches.
fn horizontal_adjacency(board: &Board, x: i8, row: i8, value: u32) -> f32 {
    let mut total = 0.0;

    for nx in [x - 1, x + 1] {
        if board.value(nx, row) != Some(value) {
            continue;
        }

        let merged = value * 2;
        let below = board.value(x, row + 1);
        let neighbor_below = board.value(nx, row + 1);

        if matches!(below, Some(support) if merged > support) {
            total += ADJACENT_OVERFLOW_PENALTY;
        } else if matches!(neighbor_below, Some(support) if merged > support) {
            total += ADJACENT_DISRUPT_PENALTY;
        }

        let keeps = match below {
            None => true,
            Some(support) => merged <= support,
        };
        total += if keeps {
            ADJACENT_KEEP_BONUS
        } else {
            ADJACENT_BREAK_PENALTY
        };
    }

    total
}

/// One-ply lookahead: place `current` at its landing cell (no cascade),
/// then take the best reduced-term score for `next` over all columns.
fn lookahead(board: &Board, x: i8, landing: Landing, current: u32, next: u32) -> f32 {
    let mut sim = board.clone();
    match landing {
        Landing::Row(row) => {
            sim.set(x, row, Some(current));
        }
        Landing::TopMerge => {
            sim.set(x, 0, Some(current * 2));
        }
        Landing::Blocked => return 0.0,
    }

    let mut top = f32::NEG_INFINITY;
    for nx in 0..BOARD_COLS as i8 {
        let next_landing = landing_row(&sim, nx, next);
        if next_landing.is_blocked() {
            continue;
        }
        let score = merge_terms(&sim, nx, next_landing, next);
        if score > top {
            top = score;
        }
    }

    if top.is_finite() {
        LOOKAHEAD_FACTOR * top
    } else {
        0.0
    }
}

/// Reward deep landings near the center; punish landings in the top rows.
fn positional_bias(x: i8, row: i8) -> f32 {
    let center = BOARD_COLS as i8 / 2;
    let mut total = ROW_DEPTH_WEIGHT * row as f32;
    total -= (x - center).abs() as f32;
    if row < TOP_ROWS_THRESHOLD {
        total += TOP_ROWS_PENALTY;
    }
    total
}

/// Two or more matching orthogonal neighbors set up an L-merge on the
/// next cascade.
fn l_shape_potential(board: &Board, x: i8, row: i8, value: u32) -> f32 {
    let neighbors = [(x - 1, row), (x + 1, row), (x, row - 1), (x, row + 1)];
    let matching = neighbors
        .iter()
        .filter(|&&(nx, ny)| board.value(nx, ny) == Some(value))
        .count();
    if matching >= L_POTENTIAL_NEIGHBORS {
        L_POTENTIAL_BONUS
    } else {
        0.0
    }
}

/// Bottom-to-top ordering of the landing column, with the incoming block
/// counted as the new topmost step. Well-ordered columns (small on big)
/// score positive.
fn column_structure(board: &Board, x: i8, landing: Landing, value: u32) -> f32 {
    let mut total = 0.0;
    let mut deeper: Option<u32> = None;

    for y in (0..board.height() as i8).rev() {
        let Some(v) = board.value(x, y) else {
            break;
        };
        if let Some(d) = deeper {
            total += order_step(v, d);
        }
        deeper = Some(v);
    }

    if let (Landing::Row(_), Some(d)) = (landing, deeper) {
        total += order_step(value, d);
    }

    total * COLUMN_ORDER_FACTOR
}

fn order_step(upper: u32, deeper: u32) -> f32 {
    if upper <= deeper {
        COLUMN_ORDER_STEP_BONUS
    } else {
        COLUMN_ORDER_STEP_PENALTY
    }
}
