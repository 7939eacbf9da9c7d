//! Progress hooks the engine calls while it runs.
//!
//! Observers only receive data; nothing they do feeds back into the search.
//! The engine logs its own lifecycle through `tracing`, so an observer is
//! only needed for live display.

use crate::engine::Outcome;
use crate::grid::Grid;

/// Snapshot of one generation, emitted before it is checked and bred
#[derive(Debug, Clone, Copy)]
pub struct GenerationReport<'a> {
    pub generation: usize,
    pub best_fitness: f64,
    pub mean_fitness: f64,
    pub mutation_rate: f64,
    pub sigma: f64,
    pub stale: usize,
    pub reseeds: usize,
    /// Fittest grid of this generation
    pub best: &'a Grid,
}

/// Receives progress events from the evolution engine
pub trait ProgressObserver {
    /// A population was (re)built by the seeder
    fn on_seeded(&mut self, _population_size: usize) {}

    fn on_generation(&mut self, _report: &GenerationReport<'_>) {}

    /// The population stagnated and was replaced
    fn on_reseed(&mut self, _generation: usize, _reseeds: usize) {}

    fn on_finish(&mut self, _outcome: &Outcome) {}
}

/// Ignores every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl ProgressObserver for NoopObserver {}
