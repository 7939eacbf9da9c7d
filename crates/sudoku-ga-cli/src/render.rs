use crate::theme::Theme;
use crossterm::{
    queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
};
use std::fmt::Display;
use std::io::{self, Write};
use sudoku_ga_core::{GenerationReport, Given, Grid, Outcome, ProgressObserver, BOX_SIZE, SIZE};

/// Print `text` in `color`. The reset colour prints without escape codes.
fn paint<W: Write>(out: &mut W, color: Color, text: impl Display) -> io::Result<()> {
    if color == Color::Reset {
        queue!(out, Print(text))
    } else {
        queue!(out, SetForegroundColor(color), Print(text), ResetColor)
    }
}

/// Cells whose value appears again in their column or block
pub fn conflicts(grid: &Grid) -> [[bool; SIZE]; SIZE] {
    let mut marked = [[false; SIZE]; SIZE];
    for row in 0..SIZE {
        for col in 0..SIZE {
            let value = grid.get(row, col);
            if value == 0 {
                continue;
            }
            let in_column = (0..SIZE).any(|r| r != row && grid.get(r, col) == value);
            let block_row = row / BOX_SIZE * BOX_SIZE;
            let block_col = col / BOX_SIZE * BOX_SIZE;
            let in_block = (block_row..block_row + BOX_SIZE)
                .flat_map(|r| (block_col..block_col + BOX_SIZE).map(move |c| (r, c)))
                .any(|(r, c)| (r, c) != (row, col) && grid.get(r, c) == value);
            marked[row][col] = in_column || in_block;
        }
    }
    marked
}

/// Draw a grid with 3x3 separators. Given cells, evolved cells and clashes
/// get distinct colours; a solved grid is drawn in the success colour.
pub fn render_grid<W: Write>(
    out: &mut W,
    grid: &Grid,
    given: &Given,
    theme: &Theme,
    solved: bool,
) -> io::Result<()> {
    let clashes = conflicts(grid);

    for row in 0..SIZE {
        if row > 0 && row % BOX_SIZE == 0 {
            paint(out, theme.border, "───────┼───────┼──────\n")?;
        }
        for col in 0..SIZE {
            if col > 0 && col % BOX_SIZE == 0 {
                paint(out, theme.border, " │")?;
            }
            let value = grid.get(row, col);
            if value == 0 {
                paint(out, theme.border, " ·")?;
                continue;
            }

            let color = if given.is_fixed(row, col) {
                theme.given
            } else if solved {
                theme.success
            } else if clashes[row][col] {
                theme.conflict
            } else {
                theme.evolved
            };
            paint(out, color, format!(" {}", value))?;
        }
        queue!(out, Print("\n"))?;
    }
    out.flush()
}

/// Prints progress lines while the engine runs and the final grid at the end.
///
/// Observer callbacks cannot fail, so the first write error is kept and
/// returned by [`TerminalObserver::finish`].
pub struct TerminalObserver<W: Write> {
    out: W,
    theme: Theme,
    given: Given,
    every: usize,
    best: f64,
    error: Option<io::Error>,
}

impl<W: Write> TerminalObserver<W> {
    /// Report every `every`-th generation and any generation that improves the best fitness
    pub fn new(out: W, theme: Theme, given: Given, every: usize) -> Self {
        Self {
            out,
            theme,
            given,
            every: every.max(1),
            best: 0.0,
            error: None,
        }
    }

    /// Hand back the writer, or the first error hit while writing
    pub fn finish(self) -> io::Result<W> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.out),
        }
    }

    /// Print a free-form info line
    pub fn note(&mut self, text: &str) {
        let result = paint(&mut self.out, self.theme.info, text);
        self.record(result);
    }

    fn record(&mut self, result: io::Result<()>) {
        if let Err(e) = result {
            self.error.get_or_insert(e);
        }
    }

    fn write_generation(&mut self, report: &GenerationReport<'_>) -> io::Result<()> {
        let theme = &self.theme;
        let out = &mut self.out;
        paint(out, theme.info, "gen ")?;
        paint(out, theme.key, format!("{:>5}", report.generation))?;
        paint(out, theme.info, "  best ")?;
        paint(out, theme.key, format!("{:.4}", report.best_fitness))?;
        paint(
            out,
            theme.info,
            format!(
                "  mean {:.4}  rate {:.3}  sigma {:.3}  stale {:>3}\n",
                report.mean_fitness, report.mutation_rate, report.sigma, report.stale
            ),
        )?;
        out.flush()
    }

    fn write_outcome(&mut self, outcome: &Outcome) -> io::Result<()> {
        let theme = self.theme.clone();
        queue!(self.out, Print("\n"))?;
        match outcome {
            Outcome::Solved {
                solution,
                generation,
                reseeds,
                elapsed,
            } => {
                paint(
                    &mut self.out,
                    theme.success,
                    format!(
                        "Solved at generation {} ({} reseeds, {:.2?})\n\n",
                        generation, reseeds, elapsed
                    ),
                )?;
                render_grid(&mut self.out, &solution.grid, &self.given, &theme, true)?;
            }
            Outcome::Exhausted {
                best,
                generations,
                reseeds,
                elapsed,
            } => {
                paint(
                    &mut self.out,
                    theme.error,
                    format!(
                        "No solution found after {} generations ({} reseeds, {:.2?})\n",
                        generations, reseeds, elapsed
                    ),
                )?;
                if let Some(best) = best {
                    paint(
                        &mut self.out,
                        theme.info,
                        format!("Best candidate, fitness {:.4}:\n\n", best.fitness),
                    )?;
                    render_grid(&mut self.out, &best.grid, &self.given, &theme, false)?;
                }
            }
        }
        self.out.flush()
    }
}

impl<W: Write> ProgressObserver for TerminalObserver<W> {
    fn on_seeded(&mut self, population_size: usize) {
        self.best = 0.0;
        let result = paint(
            &mut self.out,
            self.theme.info,
            format!("seeded {} candidates\n", population_size),
        );
        self.record(result);
    }

    fn on_generation(&mut self, report: &GenerationReport<'_>) {
        let improved = report.best_fitness > self.best;
        if improved {
            self.best = report.best_fitness;
        }
        if improved || report.generation % self.every == 0 {
            let result = self.write_generation(report);
            self.record(result);
        }
    }

    fn on_reseed(&mut self, generation: usize, reseeds: usize) {
        let result = paint(
            &mut self.out,
            self.theme.error,
            format!(
                "gen {:>5}  population stagnated, reseeding (#{})\n",
                generation, reseeds
            ),
        );
        self.record(result);
    }

    fn on_finish(&mut self, outcome: &Outcome) {
        let result = self.write_outcome(outcome);
        self.record(result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sudoku_ga_core::{Candidate, EvolutionConfig, EvolutionEngine};

    const PUZZLE: &str =
        "530070000600195000098000060800060003400803001700020006060000280000419005000080079";
    const SOLUTION: &str =
        "534678912672195348198342567859761423426853791713924856961537284287419635345286179";

    fn given() -> Given {
        Given::new(Grid::from_string(PUZZLE).unwrap())
    }

    fn text(bytes: Vec<u8>) -> String {
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_conflicts() {
        let solution = Grid::from_string(SOLUTION).unwrap();
        assert!(conflicts(&solution).iter().flatten().all(|&c| !c));

        // Swapping two cells of row 0 across blocks breaks both columns
        let mut grid = solution;
        grid.swap_in_row(0, 0, 8);
        let marked = conflicts(&grid);
        assert!(marked[0][0] && marked[0][8]);
        assert!(!marked[4][4]);
    }

    #[test]
    fn test_render_plain_grid() {
        let mut out = Vec::new();
        let solution = Grid::from_string(SOLUTION).unwrap();
        render_grid(&mut out, &solution, &given(), &Theme::plain(), true).unwrap();

        let text = text(out);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 11);
        assert_eq!(lines[0], " 5 3 4 │ 6 7 8 │ 9 1 2");
        assert_eq!(lines[3], "───────┼───────┼──────");
    }

    #[test]
    fn test_render_marks_free_cells() {
        let mut out = Vec::new();
        render_grid(&mut out, given().grid(), &given(), &Theme::plain(), false).unwrap();
        assert!(text(out).starts_with(" 5 3 · │ · 7 · │ · · ·\n"));
    }

    #[test]
    fn test_colored_output_has_escape_codes() {
        let mut out = Vec::new();
        let solution = Grid::from_string(SOLUTION).unwrap();
        render_grid(&mut out, &solution, &given(), &Theme::dark(), true).unwrap();
        assert!(text(out).contains('\u{1b}'));
    }

    #[test]
    fn test_observer_reports_run() {
        let config = EvolutionConfig {
            population_size: 20,
            max_generations: 5,
            ..Default::default()
        };
        let mut engine = EvolutionEngine::with_seed(given(), config, 3).unwrap();
        let mut observer = TerminalObserver::new(Vec::new(), Theme::plain(), given(), 1);
        let outcome = engine.run(&mut observer);

        let text = text(observer.finish().unwrap());
        assert!(text.starts_with("seeded 20 candidates\n"));
        if !outcome.is_solved() {
            assert_eq!(text.matches("gen ").count(), 5);
            assert!(text.contains("No solution found after 5 generations"));
        }
    }

    #[test]
    fn test_solved_outcome() {
        let solution = Candidate::new(Grid::from_string(SOLUTION).unwrap());
        let outcome = Outcome::Solved {
            solution,
            generation: 12,
            reseeds: 0,
            elapsed: std::time::Duration::from_millis(5),
        };
        let mut observer = TerminalObserver::new(Vec::new(), Theme::plain(), given(), 10);
        observer.on_finish(&outcome);

        let text = text(observer.finish().unwrap());
        assert!(text.contains("Solved at generation 12"));
        assert!(text.contains(" 5 3 4 │ 6 7 8 │ 9 1 2"));
    }

    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_errors_surface_on_finish() {
        let mut observer = TerminalObserver::new(Broken, Theme::plain(), given(), 1);
        observer.on_seeded(10);
        observer.on_reseed(3, 1);
        let err = observer.finish().err().unwrap();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }
}
