//! Fitness scoring for candidate grids.
//!
//! Each unit (row, column or block) scores `(1 / k) / 9`, where `k` is the
//! number of distinct occurrence counts among the digits 1-9 in that unit.
//! A unit holding every digit once has counts that are all 1, so `k = 1`
//! and nine such units sum to 1.0. Any duplicate introduces counts of 0 and
//! 2+, which raises `k` and lowers the unit's share.
//!
//! Rows are permutations by construction, so the partial score only
//! multiplies the column and block sums. A grid scores exactly 1.0 only
//! when all three sums reach 1.

use crate::grid::{Grid, SIZE};

/// Score a fully assigned grid in [0, 1]
pub fn evaluate(grid: &Grid) -> f64 {
    let row_sum = unit_sum(|i| *grid.row(i));
    let col_sum = unit_sum(|i| grid.column(i));
    let block_sum = unit_sum(|i| grid.block(i));

    // Truncation: accumulated ninths can land a hair above 1.0
    if row_sum as i64 == 1 && col_sum as i64 == 1 && block_sum as i64 == 1 {
        1.0
    } else {
        col_sum * block_sum
    }
}

fn unit_sum(unit: impl Fn(usize) -> [u8; SIZE]) -> f64 {
    let mut sum = 0.0;
    for i in 0..SIZE {
        sum += (1.0 / distinct_counts(&unit(i)) as f64) / SIZE as f64;
    }
    sum
}

/// Number of distinct values in the occurrence-count array of digits 1-9
fn distinct_counts(values: &[u8; SIZE]) -> usize {
    let mut counts = [0usize; SIZE];
    for &v in values {
        debug_assert!((1..=SIZE as u8).contains(&v), "unassigned cell in candidate");
        counts[(v as usize).saturating_sub(1)] += 1;
    }

    let mut seen = [false; SIZE + 1];
    let mut distinct = 0;
    for count in counts {
        if !seen[count] {
            seen[count] = true;
            distinct += 1;
        }
    }
    distinct
}
