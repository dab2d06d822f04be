//! Landing resolution - where an incoming block comes to rest
//!
//! Scans a column from the top for the first occupied cell. A full column
//! whose top cell matches the incoming value yields the top-merge
//! sentinel; a full mismatched column blocks the drop.

use mergedrop_types::{Landing, BOARD_ROWS};

use crate::board::Board;

/// Resolve where a block of `value` dropped into column `x` would rest.
pub fn landing_row(board: &Board, x: i8, value: u32) -> Landing {
    if board.is_out_of_bounds(x, 0) {
        return Landing::Blocked;
    }

    for y in 0..BOARD_ROWS as i8 {
        if board.is_occupied(x, y) {
            if y > 0 {
                return Landing::Row(y - 1);
            }
            return if board.value(x, 0) == Some(value) {
                Landing::TopMerge
            } else {
                Landing::Blocked
            };
        }
    }

    Landing::Row(BOARD_ROWS as i8 - 1)
}
