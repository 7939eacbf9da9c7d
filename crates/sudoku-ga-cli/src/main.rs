#![allow(clippy::needless_range_loop)]

mod render;
mod theme;

use anyhow::{Context, Result};
use clap::Parser;
use render::TerminalObserver;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use sudoku_ga_core::{
    entropy_seed, format_solution, parse_puzzle, EvolutionConfig, EvolutionEngine, Given,
    NoopObserver, Outcome,
};
use theme::{Theme, ThemeName};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "sudoku-ga",
    version,
    about = "Solve a Sudoku puzzle with a genetic algorithm"
)]
struct Cli {
    /// Puzzle file: two header lines, then 9 rows of 9 values (-1 for free cells)
    puzzle: PathBuf,

    /// Write the solution here
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Seed for a reproducible run (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// JSON file with evolution settings; missing fields use defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Start from the large preset (1000 candidates, 1000 generations)
    #[arg(long, conflicts_with = "config")]
    large: bool,

    /// Override the population size
    #[arg(long)]
    population: Option<usize>,

    /// Override the generation budget
    #[arg(long)]
    generations: Option<usize>,

    /// Print a progress line every N generations
    #[arg(long, default_value_t = 10)]
    every: usize,

    /// Colour theme
    #[arg(long, value_enum, default_value_t = ThemeName::Dark)]
    theme: ThemeName,

    /// Only print the final result
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn evolution_config(&self) -> Result<EvolutionConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("Cannot read config file {}", path.display()))?;
                serde_json::from_str(&text)
                    .with_context(|| format!("Invalid config file {}", path.display()))?
            }
            None if self.large => EvolutionConfig::large(),
            None => EvolutionConfig::default(),
        };

        if let Some(population) = self.population {
            config.population_size = population;
        }
        if let Some(generations) = self.generations {
            config.max_generations = generations;
        }
        Ok(config)
    }
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("sudoku_ga=info".parse()?))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let text = fs::read_to_string(&cli.puzzle)
        .with_context(|| format!("Cannot read puzzle file {}", cli.puzzle.display()))?;
    let grid = parse_puzzle(&text)
        .with_context(|| format!("Malformed puzzle file {}", cli.puzzle.display()))?;
    let given = Given::new(grid);

    let config = cli.evolution_config()?;
    let seed = cli.seed.unwrap_or_else(entropy_seed);
    info!(
        puzzle = %cli.puzzle.display(),
        seed,
        population = config.population_size,
        generations = config.max_generations,
        "starting run"
    );

    let mut engine = EvolutionEngine::with_seed(given.clone(), config, seed)
        .context("Cannot start the solver")?;

    let theme = Theme::from(cli.theme);
    let outcome = if cli.quiet {
        let outcome = engine.run(&mut NoopObserver);
        print_quiet(&outcome);
        outcome
    } else {
        let mut observer = TerminalObserver::new(io::stdout(), theme, given, cli.every);
        if cli.seed.is_none() {
            observer.note(&format!("seed {} (pass --seed {} to replay)\n", seed, seed));
        }
        let outcome = engine.run(&mut observer);
        observer.finish().context("Cannot write progress output")?;
        outcome
    };

    match outcome {
        Outcome::Solved { solution, .. } => {
            if let Some(path) = &cli.output {
                fs::write(path, format_solution(&solution.grid))
                    .with_context(|| format!("Cannot write solution to {}", path.display()))?;
                info!(path = %path.display(), "solution written");
            }
            Ok(ExitCode::SUCCESS)
        }
        Outcome::Exhausted { .. } => {
            eprintln!("no solution found");
            Ok(ExitCode::FAILURE)
        }
    }
}

fn print_quiet(outcome: &Outcome) {
    if let Outcome::Solved { solution, .. } = outcome {
        print!("{}", format_solution(&solution.grid));
    }
}
