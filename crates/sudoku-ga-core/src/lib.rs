//! Genetic-algorithm Sudoku solver.
//!
//! A population of candidate grids is evolved toward a valid solution.
//! Every candidate keeps the puzzle's given digits and has each row as a
//! permutation of 1-9, so the search only has to repair columns and blocks.
//!
//! ```no_run
//! use sudoku_ga_core::{EvolutionConfig, EvolutionEngine, Given, Grid, NoopObserver};
//!
//! let grid = Grid::from_string(
//!     "530070000600195000098000060800060003400803001700020006060000280000419005000080079",
//! )
//! .expect("81 digits");
//! let mut engine = EvolutionEngine::with_seed(Given::new(grid), EvolutionConfig::default(), 7)?;
//! let outcome = engine.run(&mut NoopObserver);
//! println!("solved: {}", outcome.is_solved());
//! # Ok::<(), sudoku_ga_core::Error>(())
//! ```

pub mod candidate;
pub mod config;
pub mod crossover;
pub mod engine;
pub mod error;
pub mod fitness;
pub mod given;
pub mod grid;
pub mod mutation;
pub mod observer;
pub mod puzzle;
pub mod rng;
pub mod seeder;
pub mod selection;

pub use candidate::{Candidate, Population};
pub use config::EvolutionConfig;
pub use crossover::CycleCrossover;
pub use engine::{EvolutionEngine, EvolutionState, Outcome, Status};
pub use error::{Conflict, Error, ParseError, Result, Unit};
pub use given::Given;
pub use grid::{Grid, Position, BOX_SIZE, SIZE};
pub use mutation::Mutator;
pub use observer::{GenerationReport, NoopObserver, ProgressObserver};
pub use puzzle::{format_solution, parse_puzzle};
pub use rng::{entropy_seed, half_normal};
pub use seeder::Seeder;
pub use selection::Tournament;
