//! Block generation - the value of the next falling block
//!
//! Generation is a pure function of the board state and the injected
//! random source. While the board maximum is small a fixed distribution
//! applies; afterwards a weighted pool skews toward the smaller powers of
//! two up to the generation ceiling.

use mergedrop_types::{GENERATION_CEILING, STARTER_DISTRIBUTION, STARTER_MAX_VALUE};

use crate::board::Board;
use crate::rng::RandomSource;

/// Produces the next falling block value from the current board state
#[derive(Debug, Clone)]
pub struct BlockGenerator<R> {
    rng: R,
}

impl<R: RandomSource> BlockGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Generate the next block value for this board
    pub fn generate(&mut self, board: &Board) -> u32 {
        let max_value = board
            .max_value()
            .map(|v| v.min(GENERATION_CEILING))
            .unwrap_or(2);

        if max_value <= STARTER_MAX_VALUE {
            self.draw_starter()
        } else {
            self.draw_weighted(max_value)
        }
    }

    /// Draw from the fixed cumulative starter distribution
    fn draw_starter(&mut self) -> u32 {
        let roll = self.rng.next_f32();
        let mut cumulative = 0.0f32;
        for (value, probability) in STARTER_DISTRIBUTION {
            cumulative += probability;
            if roll < cumulative {
                return value;
            }
        }
        // Float accumulation can fall just short of 1.0; the tail absorbs it.
        STARTER_DISTRIBUTION[STARTER_DISTRIBUTION.len() - 1].0
    }

    /// Draw uniformly from a pool where the i-th smallest power of two
    /// (0-indexed) appears max(1, 3 - i/2) times.
    fn draw_weighted(&mut self, max_value: u32) -> u32 {
        let mut pool = Vec::new();
        let mut value = 2u32;
        let mut i = 0u32;
        while value <= max_value {
            let weight = (3i32 - (i / 2) as i32).max(1) as usize;
            for _ in 0..weight {
                pool.push(value);
            }
            value *= 2;
            i += 1;
        }

        assert!(!pool.is_empty(), "weighted generation pool must not be empty");

        let idx = ((self.rng.next_f32() * pool.len() as f32) as usize).min(pool.len() - 1);
        pool[idx]
    }
}
