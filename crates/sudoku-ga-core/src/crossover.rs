use crate::candidate::Candidate;
use crate::grid::SIZE;
use rand::Rng;

/// Default probability of recombining two parents
pub const DEFAULT_CROSSOVER_RATE: f64 = 0.9;

/// Row-wise cycle crossover.
///
/// Every row of both parents is a permutation of 1-9, and cycle crossover
/// only ever moves whole value cycles between the two rows, so both
/// children keep that property. Cells where the parents agree form
/// one-element cycles and pass through unchanged, which keeps shared fixed
/// cells in place.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleCrossover {
    pub crossover_rate: f64,
}

impl Default for CycleCrossover {
    fn default() -> Self {
        Self::new(DEFAULT_CROSSOVER_RATE)
    }
}

impl CycleCrossover {
    pub fn new(crossover_rate: f64) -> Self {
        Self { crossover_rate }
    }

    /// Produce two children. Each starts as a copy of its parent; with
    /// probability `crossover_rate` the rows in a random band `[lo, hi)` are
    /// recombined. Children carry their parent's fitness until rescored.
    pub fn crossover<R: Rng + ?Sized>(
        &self,
        parent1: &Candidate,
        parent2: &Candidate,
        rng: &mut R,
    ) -> (Candidate, Candidate) {
        let mut child1 = parent1.clone();
        let mut child2 = parent2.clone();

        if rng.gen::<f64>() >= self.crossover_rate {
            return (child1, child2);
        }

        let (lo, hi) = crossover_band(rng);
        for row in lo..hi {
            let (row1, row2) = crossover_rows(child1.grid.row(row), child2.grid.row(row));
            child1.grid.set_row(row, row1);
            child2.grid.set_row(row, row2);
        }

        (child1, child2)
    }
}

/// Two distinct row indices in 0..9, ordered
fn crossover_band<R: Rng + ?Sized>(rng: &mut R) -> (usize, usize) {
    let a = rng.gen_range(0..SIZE);
    let mut b = rng.gen_range(0..SIZE);
    while b == a {
        b = rng.gen_range(0..SIZE);
    }
    (a.min(b), a.max(b))
}

/// Cycle crossover of two permutation rows.
///
/// Cycles are found by scanning for the first unassigned position and
/// following `row2[i]` back to its position in `row1` until the walk reaches
/// an assigned position. Even cycles (0, 2, ...) copy straight through; odd
/// cycles swap which parent each child takes its values from.
///
/// Rows that are not permutations still terminate: each child cell is taken
/// from one of the parents at that position, but the children need not be
/// permutations.
pub fn crossover_rows(row1: &[u8; SIZE], row2: &[u8; SIZE]) -> ([u8; SIZE], [u8; SIZE]) {
    // position_in_row1[v] = index of value v in row1
    let mut position_in_row1 = [0usize; SIZE + 1];
    for (i, &v) in row1.iter().enumerate() {
        if let Some(slot) = position_in_row1.get_mut(v as usize) {
            *slot = i;
        }
    }

    let mut child1 = [0u8; SIZE];
    let mut child2 = [0u8; SIZE];
    let mut assigned = [false; SIZE];
    let mut cycle = 0;

    for start in 0..SIZE {
        if assigned[start] {
            continue;
        }

        let flip = cycle % 2 == 1;
        let mut index = start;
        loop {
            assigned[index] = true;
            if flip {
                child1[index] = row2[index];
                child2[index] = row1[index];
            } else {
                child1[index] = row1[index];
                child2[index] = row2[index];
            }

            index = position_in_row1
                .get(row2[index] as usize)
                .copied()
                .unwrap_or(start);
            if assigned[index] {
                break;
            }
        }
        cycle += 1;
    }

    (child1, child2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{is_permutation, Grid};
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;

    fn random_row(rng: &mut StdRng) -> [u8; SIZE] {
        let mut row = [1, 2, 3, 4, 5, 6, 7, 8, 9];
        row.shuffle(rng);
        row
    }

    #[test]
    fn test_rows_stay_permutations() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..500 {
            let row1 = random_row(&mut rng);
            let row2 = random_row(&mut rng);
            let (child1, child2) = crossover_rows(&row1, &row2);
            assert!(is_permutation(&child1), "{:?} x {:?} -> {:?}", row1, row2, child1);
            assert!(is_permutation(&child2), "{:?} x {:?} -> {:?}", row1, row2, child2);
        }
    }

    #[test]
    fn test_known_cycles() {
        let row1 = [1, 2, 3, 4, 5, 6, 7, 8, 9];
        let row2 = [2, 1, 4, 3, 5, 6, 7, 9, 8];
        // Cycles: {0,1} even, {2,3} odd, {4} even, {5} odd, {6} even, {7,8} odd
        let (child1, child2) = crossover_rows(&row1, &row2);
        assert_eq!(child1, [1, 2, 4, 3, 5, 6, 7, 9, 8]);
        assert_eq!(child2, [2, 1, 3, 4, 5, 6, 7, 8, 9]);
    }

    #[test]
    fn test_single_cycle_passes_through() {
        // One cycle covering every position: children equal their parents
        let row1 = [1, 2, 3, 4, 5, 6, 7, 8, 9];
        let row2 = [2, 3, 4, 5, 6, 7, 8, 9, 1];
        let (child1, child2) = crossover_rows(&row1, &row2);
        assert_eq!(child1, row1);
        assert_eq!(child2, row2);
    }

    #[test]
    fn test_identical_rows() {
        let row = [4, 7, 1, 9, 2, 5, 8, 3, 6];
        assert_eq!(crossover_rows(&row, &row), (row, row));
    }

    #[test]
    fn test_non_permutation_rows_terminate() {
        let row1 = [1, 2, 3, 4, 5, 6, 7, 8, 9];
        let row2 = [1, 1, 3, 4, 5, 6, 7, 8, 9];
        let (child1, child2) = crossover_rows(&row1, &row2);
        for i in 0..SIZE {
            let (a, b) = (row1[i], row2[i]);
            assert!((child1[i] == a && child2[i] == b) || (child1[i] == b && child2[i] == a));
        }

        // Out-of-range values must not index past the lookup table
        let row2 = [0, 2, 3, 4, 5, 6, 7, 8, 12];
        let (child1, _) = crossover_rows(&row1, &row2);
        assert_eq!(child1[0], 1);
    }

    fn candidate(rng: &mut StdRng) -> Candidate {
        let mut grid = Grid::new();
        for row in 0..SIZE {
            grid.set_row(row, random_row(rng));
        }
        Candidate::new(grid)
    }

    #[test]
    fn test_zero_rate_copies_parents() {
        let mut rng = StdRng::seed_from_u64(5);
        let parent1 = candidate(&mut rng);
        let parent2 = candidate(&mut rng);
        let crossover = CycleCrossover::new(0.0);

        for _ in 0..50 {
            let (child1, child2) = crossover.crossover(&parent1, &parent2, &mut rng);
            assert_eq!(child1, parent1);
            assert_eq!(child2, parent2);
        }
    }

    #[test]
    fn test_full_rate_keeps_rows_and_shared_cells() {
        let mut rng = StdRng::seed_from_u64(8);
        let crossover = CycleCrossover::new(1.0);

        for _ in 0..100 {
            let parent1 = candidate(&mut rng);
            let parent2 = candidate(&mut rng);
            let (child1, child2) = crossover.crossover(&parent1, &parent2, &mut rng);

            for row in 0..SIZE {
                assert!(child1.grid.is_row_permutation(row));
                assert!(child2.grid.is_row_permutation(row));
                for col in 0..SIZE {
                    let a = parent1.grid.get(row, col);
                    let b = parent2.grid.get(row, col);
                    // Every child cell comes from one of the parents at that position
                    let c1 = child1.grid.get(row, col);
                    let c2 = child2.grid.get(row, col);
                    assert!((c1 == a && c2 == b) || (c1 == b && c2 == a));
                }
            }
            // The last row is never inside the band [lo, hi)
            assert_eq!(child1.grid.row(SIZE - 1), parent1.grid.row(SIZE - 1));
        }
    }

    #[test]
    fn test_band_is_ordered_and_distinct() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..200 {
            let (lo, hi) = crossover_band(&mut rng);
            assert!(lo < hi && hi < SIZE);
        }
    }
}
