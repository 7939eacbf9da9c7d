use crate::crossover::DEFAULT_CROSSOVER_RATE;
use crate::error::{Error, Result};
use crate::mutation::DEFAULT_MAX_ATTEMPTS;
use crate::selection::DEFAULT_SELECTION_RATE;
use serde::{Deserialize, Serialize};

/// Tunables for one evolutionary run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    /// Number of candidates per generation
    pub population_size: usize,
    /// Share of each generation copied unchanged into the next
    pub elite_fraction: f64,
    /// Generation budget before giving up
    pub max_generations: usize,
    /// Probability that the fitter tournament competitor wins
    pub selection_rate: f64,
    /// Probability that two parents are recombined
    pub crossover_rate: f64,
    /// Mutation rate at the start of a run and after each reseed
    pub initial_mutation_rate: f64,
    /// Spread of the mutation-rate draw at the start and after each reseed
    pub initial_sigma: f64,
    /// Share of improving mutations that keeps the spread unchanged
    pub target_success_rate: f64,
    /// Multiplier applied to sigma when mutations improve too rarely
    pub sigma_factor: f64,
    /// Generations with the top two fitnesses tied before reseeding
    pub stale_limit: usize,
    /// Swap attempts before a mutation gives up
    pub mutation_attempts: usize,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 500,
            elite_fraction: 0.1,
            max_generations: 500,
            selection_rate: DEFAULT_SELECTION_RATE,
            crossover_rate: DEFAULT_CROSSOVER_RATE,
            initial_mutation_rate: 0.1,
            initial_sigma: 1.0,
            target_success_rate: 0.2,
            sigma_factor: 0.998,
            stale_limit: 50,
            mutation_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl EvolutionConfig {
    /// Bigger population and budget with fewer elites and gentler mutation
    pub fn large() -> Self {
        Self {
            population_size: 1000,
            elite_fraction: 0.05,
            max_generations: 1000,
            initial_mutation_rate: 0.06,
            ..Self::default()
        }
    }

    /// Number of elites carried over each generation
    pub fn elite_count(&self) -> usize {
        (self.elite_fraction * self.population_size as f64) as usize
    }

    pub fn validate(&self) -> Result<()> {
        if self.population_size < 2 {
            return Err(invalid("population_size must be at least 2"));
        }
        if !(0.0..=1.0).contains(&self.elite_fraction) {
            return Err(invalid("elite_fraction must be within [0, 1]"));
        }
        if self.elite_count() >= self.population_size {
            return Err(invalid("elite count must leave room for offspring"));
        }
        for (name, rate) in [
            ("selection_rate", self.selection_rate),
            ("crossover_rate", self.crossover_rate),
            ("target_success_rate", self.target_success_rate),
        ] {
            if !(0.0..=1.0).contains(&rate) {
                return Err(invalid(&format!("{} must be within [0, 1]", name)));
            }
        }
        if self.initial_mutation_rate.is_nan() || self.initial_mutation_rate < 0.0 {
            return Err(invalid("initial_mutation_rate must not be negative"));
        }
        if self.initial_sigma.is_nan() || self.initial_sigma <= 0.0 {
            return Err(invalid("initial_sigma must be positive"));
        }
        if self.sigma_factor.is_nan() || self.sigma_factor <= 0.0 {
            return Err(invalid("sigma_factor must be positive"));
        }
        if self.stale_limit == 0 {
            return Err(invalid("stale_limit must be at least 1"));
        }
        if self.mutation_attempts == 0 {
            return Err(invalid("mutation_attempts must be at least 1"));
        }
        Ok(())
    }
}

fn invalid(message: &str) -> Error {
    Error::InvalidConfig(message.to_string())
}
