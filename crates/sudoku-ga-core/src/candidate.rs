use crate::fitness;
use crate::grid::Grid;
use serde::{Deserialize, Serialize};

/// One proposed solution: a fully assigned grid and its fitness
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub grid: Grid,
    pub fitness: f64,
}

impl Candidate {
    /// Wrap a grid and score it
    pub fn new(grid: Grid) -> Self {
        let mut candidate = Self { grid, fitness: 0.0 };
        candidate.update_fitness();
        candidate
    }

    /// Recompute fitness after the grid changed
    pub fn update_fitness(&mut self) {
        self.fitness = fitness::evaluate(&self.grid);
    }

    pub fn is_solution(&self) -> bool {
        self.fitness == 1.0
    }
}

/// The candidates of one generation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Population {
    candidates: Vec<Candidate>,
}

impl Population {
    pub fn new(candidates: Vec<Candidate>) -> Self {
        Self { candidates }
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Candidate> {
        self.candidates.get(index)
    }

    /// Sort by fitness, fittest first. Stable, so ties keep their order.
    pub fn sort(&mut self) {
        self.candidates.sort_by(|a, b| b.fitness.total_cmp(&a.fitness));
    }

    /// Recompute the fitness of every candidate
    pub fn update_fitness(&mut self) {
        for candidate in &mut self.candidates {
            candidate.update_fitness();
        }
    }

    /// The fittest candidate (first one on ties)
    pub fn best(&self) -> Option<&Candidate> {
        self.candidates
            .iter()
            .reduce(|best, c| if c.fitness > best.fitness { c } else { best })
    }

    /// The first candidate with fitness exactly 1.0
    pub fn solution(&self) -> Option<&Candidate> {
        self.candidates.iter().find(|c| c.is_solution())
    }

    pub fn mean_fitness(&self) -> f64 {
        if self.candidates.is_empty() {
            return 0.0;
        }
        self.candidates.iter().map(|c| c.fitness).sum::<f64>() / self.candidates.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOLUTION: &str =
        "534678912672195348198342567859761423426853791713924856961537284287419635345286179";

    fn scored(fitness: f64) -> Candidate {
        Candidate {
            grid: Grid::new(),
            fitness,
        }
    }

    #[test]
    fn test_new_scores_grid() {
        let candidate = Candidate::new(Grid::from_string(SOLUTION).unwrap());
        assert_eq!(candidate.fitness, 1.0);
        assert!(candidate.is_solution());
    }

    #[test]
    fn test_sort_descending() {
        let mut population = Population::new(vec![scored(0.2), scored(0.9), scored(0.5)]);
        population.sort();
        let order: Vec<f64> = population.candidates().iter().map(|c| c.fitness).collect();
        assert_eq!(order, vec![0.9, 0.5, 0.2]);
    }

    #[test]
    fn test_best_and_solution() {
        let population = Population::new(vec![scored(0.2), scored(0.7), scored(0.7)]);
        assert_eq!(population.best().map(|c| c.fitness), Some(0.7));
        assert!(population.solution().is_none());
        assert!((population.mean_fitness() - 1.6 / 3.0).abs() < 1e-12);
        assert!(Population::default().best().is_none());
    }
}
