use crate::candidate::Candidate;
use crate::given::Given;
use crate::grid::SIZE;
use rand::Rng;
use tracing::debug;

/// Default cap on swap attempts per mutation
pub const DEFAULT_MAX_ATTEMPTS: usize = 10_000;

/// Swaps two free cells within one row of a candidate.
///
/// A swap is legal when neither moved value is already fixed in its
/// destination column or block. Rows stay permutations because values only
/// move within the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mutator {
    /// Attempts before giving up on finding a legal swap
    pub max_attempts: usize,
}

impl Default for Mutator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS)
    }
}

impl Mutator {
    pub fn new(max_attempts: usize) -> Self {
        Self { max_attempts }
    }

    /// Mutate with probability `mutation_rate`. Returns true iff a swap was applied.
    ///
    /// Rates above 1 always mutate. The candidate's fitness is left for the
    /// caller to recompute.
    pub fn mutate<R: Rng + ?Sized>(
        &self,
        candidate: &mut Candidate,
        mutation_rate: f64,
        given: &Given,
        rng: &mut R,
    ) -> bool {
        if rng.gen::<f64>() >= mutation_rate {
            return false;
        }

        if !given.has_swappable_row() {
            debug!("mutation deadlock: no row has two free cells");
            return false;
        }

        for _ in 0..self.max_attempts {
            let row = rng.gen_range(0..SIZE);
            let from = rng.gen_range(0..SIZE);
            let mut to = rng.gen_range(0..SIZE);
            while to == from {
                to = rng.gen_range(0..SIZE);
            }

            if is_legal_swap(candidate, given, row, from, to) {
                candidate.grid.swap_in_row(row, from, to);
                return true;
            }
        }

        debug!(attempts = self.max_attempts, "mutation deadlock: no legal swap found");
        false
    }
}

/// Both cells free, and neither value already fixed in the column or block it moves into
fn is_legal_swap(candidate: &Candidate, given: &Given, row: usize, from: usize, to: usize) -> bool {
    if !(given.is_free(row, from) && given.is_free(row, to)) {
        return false;
    }

    let moving_right = candidate.grid.get(row, from);
    let moving_left = candidate.grid.get(row, to);

    !given.is_column_duplicate(to, moving_right)
        && !given.is_column_duplicate(from, moving_left)
        && !given.is_block_duplicate(row, to, moving_right)
        && !given.is_block_duplicate(row, from, moving_left)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;
    use crate::seeder::Seeder;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const PUZZLE: &str =
        "530070000600195000098000060800060003400803001700020006060000280000419005000080079";
    const SOLUTION: &str =
        "534678912672195348198342567859761423426853791713924856961537284287419635345286179";

    fn setup(seed: u64) -> (Given, Candidate, StdRng) {
        let given = Given::new(Grid::from_string(PUZZLE).unwrap());
        let mut rng = StdRng::seed_from_u64(seed);
        let candidate = Seeder::new(&given).unwrap().seed_one(&mut rng);
        (given, candidate, rng)
    }

    #[test]
    fn test_zero_rate_never_mutates() {
        let (given, mut candidate, mut rng) = setup(1);
        let before = candidate.clone();
        for _ in 0..100 {
            assert!(!Mutator::default().mutate(&mut candidate, 0.0, &given, &mut rng));
        }
        assert_eq!(candidate, before);
    }

    #[test]
    fn test_swap_stays_in_one_row_on_free_cells() {
        let (given, mut candidate, mut rng) = setup(2);
        let mutator = Mutator::default();

        for _ in 0..200 {
            let before = candidate.grid;
            // A rate above 1 always mutates
            assert!(mutator.mutate(&mut candidate, 1.5, &given, &mut rng));

            let changed: Vec<(usize, usize)> = (0..SIZE)
                .flat_map(|r| (0..SIZE).map(move |c| (r, c)))
                .filter(|&(r, c)| before.get(r, c) != candidate.grid.get(r, c))
                .collect();
            // Swapping two equal values is impossible in a permutation row
            assert_eq!(changed.len(), 2);
            let ((r1, c1), (r2, c2)) = (changed[0], changed[1]);
            assert_eq!(r1, r2);
            assert!(given.is_free(r1, c1) && given.is_free(r2, c2));
            assert_eq!(before.get(r1, c1), candidate.grid.get(r2, c2));

            for row in 0..SIZE {
                assert!(candidate.grid.is_row_permutation(row));
            }
        }
    }

    #[test]
    fn test_moved_values_avoid_given_clashes() {
        let (given, mut candidate, mut rng) = setup(3);
        let mutator = Mutator::default();

        for _ in 0..200 {
            let before = candidate.grid;
            mutator.mutate(&mut candidate, 1.0, &given, &mut rng);
            for row in 0..SIZE {
                for col in 0..SIZE {
                    let value = candidate.grid.get(row, col);
                    if value != before.get(row, col) {
                        assert!(!given.is_column_duplicate(col, value));
                        assert!(!given.is_block_duplicate(row, col, value));
                    }
                }
            }
        }
    }

    #[test]
    fn test_fully_given_puzzle_does_not_hang() {
        let given = Given::new(Grid::from_string(SOLUTION).unwrap());
        let mut candidate = Candidate::new(*given.grid());
        let mut rng = StdRng::seed_from_u64(4);
        assert!(!Mutator::default().mutate(&mut candidate, 2.0, &given, &mut rng));
        assert!(candidate.is_solution());
    }

    #[test]
    fn test_no_legal_swap_gives_up() {
        // Only (0, 7) = 1 and (0, 8) = 2 are free; column 8 fixes a 1 at (4, 8),
        // so the one possible swap is illegal
        let solution = Grid::from_string(SOLUTION).unwrap();
        let mut puzzle = solution;
        puzzle.set(0, 7, 0);
        puzzle.set(0, 8, 0);
        let given = Given::new(puzzle);
        let mut candidate = Candidate::new(solution);
        let mut rng = StdRng::seed_from_u64(6);

        assert!(!is_legal_swap(&candidate, &given, 0, 7, 8));
        assert!(!Mutator::new(50).mutate(&mut candidate, 2.0, &given, &mut rng));
        assert_eq!(candidate.grid, solution);
    }
}
