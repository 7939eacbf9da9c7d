use crate::candidate::{Candidate, Population};
use crate::config::EvolutionConfig;
use crate::crossover::CycleCrossover;
use crate::error::Result;
use crate::given::Given;
use crate::mutation::Mutator;
use crate::observer::{GenerationReport, ProgressObserver};
use crate::rng::half_normal;
use crate::seeder::Seeder;
use crate::selection::Tournament;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Adaptive parameters and counters carried from one generation to the next
#[derive(Debug, Clone, PartialEq)]
pub struct EvolutionState {
    pub generation: usize,
    /// Consecutive generations whose two fittest candidates tied
    pub stale: usize,
    pub mutation_rate: f64,
    /// Spread of the half-normal mutation-rate draw
    pub sigma: f64,
    /// Successful mutations this generation
    pub mutations: usize,
    /// Successful mutations this generation that raised fitness
    pub improvements: usize,
    /// Times the population has been reseeded this run
    pub reseeds: usize,
}

impl EvolutionState {
    pub fn new(config: &EvolutionConfig) -> Self {
        Self {
            generation: 0,
            stale: 0,
            mutation_rate: config.initial_mutation_rate,
            sigma: config.initial_sigma,
            mutations: 0,
            improvements: 0,
            reseeds: 0,
        }
    }

    /// Back to the initial adaptive parameters. Generation and reseed counts survive.
    pub fn reset_adaptive(&mut self, config: &EvolutionConfig) {
        self.stale = 0;
        self.sigma = config.initial_sigma;
        self.mutation_rate = config.initial_mutation_rate;
        self.mutations = 0;
        self.improvements = 0;
    }

    /// Share of this generation's successful mutations that improved fitness
    pub fn success_rate(&self) -> f64 {
        if self.mutations == 0 {
            0.0
        } else {
            self.improvements as f64 / self.mutations as f64
        }
    }

    /// Widen or narrow sigma around the target success rate, then draw the
    /// next mutation rate. The draw is not clamped; anything above 1 means
    /// every child is mutated.
    pub fn adapt<R: Rng + ?Sized>(&mut self, config: &EvolutionConfig, rng: &mut R) {
        let phi = self.success_rate();
        if phi > config.target_success_rate {
            self.sigma /= config.sigma_factor;
        } else if phi < config.target_success_rate {
            self.sigma *= config.sigma_factor;
        }

        self.mutation_rate = half_normal(rng, self.sigma);
        self.mutations = 0;
        self.improvements = 0;
    }

    /// Count a tied or untied generation. Returns true once the stale limit is reached.
    pub fn record_stagnation(&mut self, top_two_tied: bool, stale_limit: usize) -> bool {
        if top_two_tied {
            self.stale += 1;
        } else {
            self.stale = 0;
        }
        self.stale >= stale_limit
    }
}

/// Where the engine is in its run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Running,
    Solved,
    Exhausted,
}

/// How a run ended
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// A candidate reached fitness 1.0
    Solved {
        solution: Candidate,
        generation: usize,
        reseeds: usize,
        elapsed: Duration,
    },
    /// The generation budget ran out; `best` is the fittest candidate seen
    Exhausted {
        best: Option<Candidate>,
        generations: usize,
        reseeds: usize,
        elapsed: Duration,
    },
}

impl Outcome {
    pub fn is_solved(&self) -> bool {
        matches!(self, Outcome::Solved { .. })
    }

    /// The winning candidate, or the best one seen when exhausted
    pub fn candidate(&self) -> Option<&Candidate> {
        match self {
            Outcome::Solved { solution, .. } => Some(solution),
            Outcome::Exhausted { best, .. } => best.as_ref(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        match self {
            Outcome::Solved { elapsed, .. } | Outcome::Exhausted { elapsed, .. } => *elapsed,
        }
    }

    pub fn reseeds(&self) -> usize {
        match self {
            Outcome::Solved { reseeds, .. } | Outcome::Exhausted { reseeds, .. } => *reseeds,
        }
    }

    pub fn status(&self) -> Status {
        match self {
            Outcome::Solved { .. } => Status::Solved,
            Outcome::Exhausted { .. } => Status::Exhausted,
        }
    }
}

/// Drives the generational search for one puzzle.
///
/// Each generation: stop if any candidate is a solution, keep the elites,
/// breed the rest through tournament selection, cycle crossover and
/// mutation, adapt the mutation rate, and reseed after too many
/// generations with the top two fitnesses tied.
pub struct EvolutionEngine<R: Rng = StdRng> {
    config: EvolutionConfig,
    seeder: Seeder,
    tournament: Tournament,
    crossover: CycleCrossover,
    mutator: Mutator,
    population: Population,
    state: EvolutionState,
    rng: R,
    best: Option<Candidate>,
    started: Option<Instant>,
    outcome: Option<Outcome>,
}

impl EvolutionEngine<StdRng> {
    /// Engine with a reproducible generator
    pub fn with_seed(given: Given, config: EvolutionConfig, seed: u64) -> Result<Self> {
        Self::new(given, config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> EvolutionEngine<R> {
    /// Validate the configuration and puzzle, then seed the first population
    pub fn new(given: Given, config: EvolutionConfig, mut rng: R) -> Result<Self> {
        config.validate()?;
        let seeder = Seeder::new(&given)?;
        let population = seeder.seed(config.population_size, &mut rng);

        Ok(Self {
            tournament: Tournament::new(config.selection_rate),
            crossover: CycleCrossover::new(config.crossover_rate),
            mutator: Mutator::new(config.mutation_attempts),
            state: EvolutionState::new(&config),
            config,
            seeder,
            population,
            rng,
            best: None,
            started: None,
            outcome: None,
        })
    }

    pub fn config(&self) -> &EvolutionConfig {
        &self.config
    }

    pub fn given(&self) -> &Given {
        self.seeder.given()
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn state(&self) -> &EvolutionState {
        &self.state
    }

    /// Fittest candidate seen so far in the run
    pub fn best(&self) -> Option<&Candidate> {
        self.best.as_ref()
    }

    pub fn status(&self) -> Status {
        self.outcome
            .as_ref()
            .map(Outcome::status)
            .unwrap_or(Status::Running)
    }

    /// Run generations until solved or out of budget
    pub fn run(&mut self, observer: &mut dyn ProgressObserver) -> Outcome {
        loop {
            if let Some(outcome) = self.step(observer) {
                return outcome;
            }
        }
    }

    /// Run one generation. Returns the outcome once the run has ended.
    pub fn step(&mut self, observer: &mut dyn ProgressObserver) -> Option<Outcome> {
        if let Some(outcome) = &self.outcome {
            return Some(outcome.clone());
        }
        if self.started.is_none() {
            self.started = Some(Instant::now());
            observer.on_seeded(self.population.len());
        }

        self.track_best();
        if self.state.generation < self.config.max_generations {
            self.report(observer);
        }

        // A solution bred in the final generation is still caught here
        if let Some(solution) = self.population.solution().cloned() {
            let outcome = Outcome::Solved {
                solution,
                generation: self.state.generation,
                reseeds: self.state.reseeds,
                elapsed: self.elapsed(),
            };
            return Some(self.finish(outcome, observer));
        }
        if self.state.generation >= self.config.max_generations {
            let outcome = Outcome::Exhausted {
                best: self.best.clone(),
                generations: self.state.generation,
                reseeds: self.state.reseeds,
                elapsed: self.elapsed(),
            };
            return Some(self.finish(outcome, observer));
        }

        self.breed_next_generation();
        self.state.adapt(&self.config, &mut self.rng);
        self.check_stagnation(observer);
        self.state.generation += 1;
        None
    }

    /// Replace the population with bred offspring followed by this generation's elites
    fn breed_next_generation(&mut self) {
        let elite_count = self.config.elite_count();
        let offspring_count = self.config.population_size - elite_count;

        self.population.sort();
        let elites: Vec<Candidate> = self.population.candidates()[..elite_count].to_vec();

        let mut next = Vec::with_capacity(self.config.population_size);
        while next.len() < offspring_count {
            let parent1 = self.tournament.compete(&self.population, &mut self.rng);
            let parent2 = self.tournament.compete(&self.population, &mut self.rng);
            let (child1, child2) = self.crossover.crossover(parent1, parent2, &mut self.rng);

            for mut child in [child1, child2] {
                if next.len() == offspring_count {
                    break;
                }
                self.mutate_child(&mut child);
                next.push(child);
            }
        }
        next.extend(elites);

        self.population = Population::new(next);
        self.population.update_fitness();
    }

    fn mutate_child(&mut self, child: &mut Candidate) {
        child.update_fitness();
        let before = child.fitness;

        let mutated = self.mutator.mutate(
            child,
            self.state.mutation_rate,
            self.seeder.given(),
            &mut self.rng,
        );
        if mutated {
            child.update_fitness();
            self.state.mutations += 1;
            if child.fitness > before {
                self.state.improvements += 1;
            }
        }
    }

    /// Reseed once the two fittest candidates have tied for `stale_limit` generations
    fn check_stagnation(&mut self, observer: &mut dyn ProgressObserver) {
        self.population.sort();
        let tied = match self.population.candidates() {
            [first, second, ..] => first.fitness == second.fitness,
            _ => false,
        };

        if self.state.record_stagnation(tied, self.config.stale_limit) {
            self.reseed(observer);
        }
    }

    fn reseed(&mut self, observer: &mut dyn ProgressObserver) {
        self.state.reseeds += 1;
        warn!(
            generation = self.state.generation,
            reseeds = self.state.reseeds,
            "stagnation detected, reseeding"
        );
        observer.on_reseed(self.state.generation, self.state.reseeds);

        self.population = self.seeder.seed(self.config.population_size, &mut self.rng);
        self.state.reset_adaptive(&self.config);
        observer.on_seeded(self.population.len());
    }

    fn track_best(&mut self) {
        if let Some(candidate) = self.population.best() {
            let improved = self
                .best
                .as_ref()
                .map_or(true, |best| candidate.fitness > best.fitness);
            if improved {
                self.best = Some(candidate.clone());
            }
        }
    }

    fn report(&self, observer: &mut dyn ProgressObserver) {
        let Some(best) = self.population.best() else {
            return;
        };
        let report = GenerationReport {
            generation: self.state.generation,
            best_fitness: best.fitness,
            mean_fitness: self.population.mean_fitness(),
            mutation_rate: self.state.mutation_rate,
            sigma: self.state.sigma,
            stale: self.state.stale,
            reseeds: self.state.reseeds,
            best: &best.grid,
        };
        debug!(
            generation = report.generation,
            best = report.best_fitness,
            mean = report.mean_fitness,
            mutation_rate = report.mutation_rate,
            sigma = report.sigma,
            stale = report.stale,
            "generation"
        );
        observer.on_generation(&report);
    }

    fn elapsed(&self) -> Duration {
        self.started.map(|t| t.elapsed()).unwrap_or_default()
    }

    fn finish(&mut self, outcome: Outcome, observer: &mut dyn ProgressObserver) -> Outcome {
        match &outcome {
            Outcome::Solved {
                generation,
                elapsed,
                ..
            } => info!(
                generation,
                elapsed_ms = elapsed.as_millis() as u64,
                "solution found"
            ),
            Outcome::Exhausted {
                best,
                generations,
                ..
            } => info!(
                generations,
                best = best.as_ref().map_or(0.0, |c| c.fitness),
                "no solution within the generation budget"
            ),
        }
        observer.on_finish(&outcome);
        self.outcome = Some(outcome.clone());
        outcome
    }
}
