//! Basic example of using the genetic-algorithm solver

use sudoku_ga_core::{
    entropy_seed, EvolutionConfig, EvolutionEngine, GenerationReport, Given, Grid, Outcome,
    ProgressObserver,
};

/// Prints every tenth generation
struct EveryTenth;

impl ProgressObserver for EveryTenth {
    fn on_generation(&mut self, report: &GenerationReport<'_>) {
        if report.generation % 10 == 0 {
            println!(
                "generation {:>4}  best {:.4}  mean {:.4}  mutation rate {:.3}",
                report.generation, report.best_fitness, report.mean_fitness, report.mutation_rate
            );
        }
    }

    fn on_reseed(&mut self, generation: usize, reseeds: usize) {
        println!("generation {:>4}  stuck, reseeding (#{})", generation, reseeds);
    }
}

fn main() {
    let puzzle_string = "530070000600195000098000060800060003400803001700020006060000280000419005000080079";
    let Some(grid) = Grid::from_string(puzzle_string) else {
        eprintln!("could not parse puzzle");
        return;
    };

    println!("Puzzle:");
    println!("{}", grid);
    println!("Given cells: {}", grid.filled_count());
    println!("Empty cells: {}\n", grid.empty_count());

    let seed = entropy_seed();
    println!("Seed: {}\n", seed);

    let mut engine = match EvolutionEngine::with_seed(Given::new(grid), EvolutionConfig::default(), seed)
    {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("cannot solve this puzzle: {}", e);
            return;
        }
    };

    match engine.run(&mut EveryTenth) {
        Outcome::Solved {
            solution,
            generation,
            elapsed,
            ..
        } => {
            println!("\nSolved at generation {} in {:.2?}:", generation, elapsed);
            println!("{}", solution.grid);
        }
        Outcome::Exhausted { best, .. } => {
            println!("\nNo solution found");
            if let Some(best) = best {
                println!("Best candidate (fitness {:.4}):", best.fitness);
                println!("{}", best.grid);
            }
        }
    }
}
