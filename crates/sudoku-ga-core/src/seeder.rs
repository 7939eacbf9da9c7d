use crate::candidate::{Candidate, Population};
use crate::error::Conflict;
use crate::given::Given;
use crate::grid::{Grid, Position, SIZE};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::info;

/// Builds initial populations whose rows are permutations of 1-9 and whose
/// fixed cells match the puzzle.
#[derive(Debug, Clone)]
pub struct Seeder {
    given: Given,
    /// Admissible values per cell, row-major
    domains: Vec<Vec<u8>>,
}

impl Seeder {
    /// Compute per-cell domains, failing fast on a puzzle that can never be completed
    pub fn new(given: &Given) -> Result<Self, Conflict> {
        given.check_duplicates()?;

        let mut domains = Vec::with_capacity(SIZE * SIZE);
        for pos in Position::all() {
            let domain: Vec<u8> = if given.is_fixed(pos.row, pos.col) {
                vec![given.value(pos.row, pos.col)]
            } else {
                (1..=SIZE as u8)
                    .filter(|&v| given.admits(pos.row, pos.col, v))
                    .collect()
            };
            if domain.is_empty() {
                return Err(Conflict::EmptyDomain(pos));
            }
            domains.push(domain);
        }

        let seeder = Self {
            given: given.clone(),
            domains,
        };
        for row in 0..SIZE {
            if !seeder.row_fillable(row) {
                return Err(Conflict::UnfillableRow(row));
            }
        }
        Ok(seeder)
    }

    pub fn given(&self) -> &Given {
        &self.given
    }

    /// Admissible values of a cell
    pub fn domain(&self, row: usize, col: usize) -> &[u8] {
        &self.domains[row * SIZE + col]
    }

    /// Build `size` fresh candidates, each with its fitness computed
    pub fn seed<R: Rng + ?Sized>(&self, size: usize, rng: &mut R) -> Population {
        let candidates: Vec<Candidate> = (0..size).map(|_| self.seed_one(rng)).collect();
        info!(size, "seeding complete");
        Population::new(candidates)
    }

    /// Build one candidate row by row
    pub fn seed_one<R: Rng + ?Sized>(&self, rng: &mut R) -> Candidate {
        let mut grid = Grid::new();
        for row in 0..SIZE {
            grid.set_row(row, self.sample_row(row, rng));
        }
        Candidate::new(grid)
    }

    /// Resample every free cell of the row from its domain until the row is a permutation
    fn sample_row<R: Rng + ?Sized>(&self, row: usize, rng: &mut R) -> [u8; SIZE] {
        let mut values = [0u8; SIZE];
        for (col, value) in values.iter_mut().enumerate() {
            if self.given.is_fixed(row, col) {
                *value = self.given.value(row, col);
            }
        }

        loop {
            for (col, value) in values.iter_mut().enumerate() {
                if self.given.is_free(row, col) {
                    // Domains are never empty once `new` has succeeded
                    *value = self.domain(row, col).choose(rng).copied().unwrap_or(0);
                }
            }
            if crate::grid::is_permutation(&values) {
                return values;
            }
        }
    }

    /// Whether the row's domains admit at least one assignment of distinct digits
    fn row_fillable(&self, row: usize) -> bool {
        let domains: Vec<&[u8]> = (0..SIZE).map(|col| self.domain(row, col)).collect();
        let mut used = [false; SIZE + 1];
        assign(&domains, 0, &mut used)
    }
}

fn assign(domains: &[&[u8]], col: usize, used: &mut [bool; SIZE + 1]) -> bool {
    if col == domains.len() {
        return true;
    }
    for &value in domains[col] {
        if used[value as usize] {
            continue;
        }
        used[value as usize] = true;
        if assign(domains, col + 1, used) {
            return true;
        }
        used[value as usize] = false;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const PUZZLE: &str =
        "530070000600195000098000060800060003400803001700020006060000280000419005000080079";

    fn given() -> Given {
        Given::new(Grid::from_string(PUZZLE).unwrap())
    }

    #[test]
    fn test_domains() {
        let seeder = Seeder::new(&given()).unwrap();
        assert_eq!(seeder.domain(0, 0), &[5]);
        assert_eq!(seeder.domain(0, 2), &[1, 2, 4]);
    }

    #[test]
    fn test_seed_respects_givens_and_rows() {
        let given = given();
        let seeder = Seeder::new(&given).unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        let population = seeder.seed(50, &mut rng);

        assert_eq!(population.len(), 50);
        for candidate in population.candidates() {
            for row in 0..SIZE {
                assert!(candidate.grid.is_row_permutation(row));
                for col in 0..SIZE {
                    if given.is_fixed(row, col) {
                        assert_eq!(candidate.grid.get(row, col), given.value(row, col));
                    }
                }
            }
            assert_eq!(candidate.fitness, crate::fitness::evaluate(&candidate.grid));
        }
    }

    #[test]
    fn test_seed_is_deterministic_for_a_seed() {
        let seeder = Seeder::new(&given()).unwrap();
        let a = seeder.seed(5, &mut StdRng::seed_from_u64(9));
        let b = seeder.seed(5, &mut StdRng::seed_from_u64(9));
        assert_eq!(a, b);
    }

    #[test]
    fn test_duplicate_givens_rejected() {
        let mut grid = Grid::from_string(PUZZLE).unwrap();
        grid.set(0, 8, 5);
        let err = Seeder::new(&Given::new(grid)).unwrap_err();
        assert!(matches!(err, Conflict::DuplicateGiven { value: 5, .. }));
    }

    #[test]
    fn test_empty_domain_rejected() {
        // (0, 0) is free, but its row, column and block already use every digit
        let mut grid = Grid::new();
        for (col, v) in (1..=4).enumerate() {
            grid.set(0, col + 1, v);
        }
        for (row, v) in (5..=8).enumerate() {
            grid.set(row + 1, 0, v);
        }
        grid.set(1, 1, 9);
        let err = Seeder::new(&Given::new(grid)).unwrap_err();
        assert_eq!(err, Conflict::EmptyDomain(Position::new(0, 0)));
    }

    #[test]
    fn test_unfillable_row_rejected() {
        // Row 0 fixes 1-7; columns 7 and 8 both fix a 9, so both free cells only admit 8
        let mut grid = Grid::new();
        for col in 0..7 {
            grid.set(0, col, col as u8 + 1);
        }
        grid.set(3, 7, 9);
        grid.set(6, 8, 9);
        let err = Seeder::new(&Given::new(grid)).unwrap_err();
        assert_eq!(err, Conflict::UnfillableRow(0));
    }
}
