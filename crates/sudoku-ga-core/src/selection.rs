use crate::candidate::{Candidate, Population};
use rand::Rng;

/// Default probability of picking the fitter of two competitors
pub const DEFAULT_SELECTION_RATE: f64 = 0.85;

/// Two-way tournament selection.
///
/// The fitter competitor wins with probability `selection_rate`; otherwise
/// the weaker one goes through, which keeps some diversity in the pool.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tournament {
    pub selection_rate: f64,
}

impl Default for Tournament {
    fn default() -> Self {
        Self::new(DEFAULT_SELECTION_RATE)
    }
}

impl Tournament {
    pub fn new(selection_rate: f64) -> Self {
        Self { selection_rate }
    }

    /// Draw two candidates uniformly (with replacement) and let them compete.
    ///
    /// Panics on an empty population.
    pub fn compete<'a, R: Rng + ?Sized>(
        &self,
        population: &'a Population,
        rng: &mut R,
    ) -> &'a Candidate {
        let candidates = population.candidates();
        let first = &candidates[rng.gen_range(0..candidates.len())];
        let second = &candidates[rng.gen_range(0..candidates.len())];
        self.duel(first, second, rng)
    }

    /// Pick between two competitors. Ties keep `first` as the fitter one.
    pub fn duel<'a, R: Rng + ?Sized>(
        &self,
        first: &'a Candidate,
        second: &'a Candidate,
        rng: &mut R,
    ) -> &'a Candidate {
        let (fittest, weakest) = if second.fitness > first.fitness {
            (second, first)
        } else {
            (first, second)
        };

        if rng.gen::<f64>() < self.selection_rate {
            fittest
        } else {
            weakest
        }
    }
}
