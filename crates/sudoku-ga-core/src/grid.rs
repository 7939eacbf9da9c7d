use crate::error::ParseError;
use serde::{Deserialize, Serialize};

/// Side length of the grid
pub const SIZE: usize = 9;
/// Side length of a 3x3 block
pub const BOX_SIZE: usize = 3;

/// A cell position on the grid (0-indexed)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Index of the 3x3 block containing this position (0-8, row-major)
    pub fn block(&self) -> usize {
        (self.row / BOX_SIZE) * BOX_SIZE + self.col / BOX_SIZE
    }

    /// Iterate over all 81 positions in row-major order
    pub fn all() -> impl Iterator<Item = Position> {
        (0..SIZE).flat_map(|row| (0..SIZE).map(move |col| Position::new(row, col)))
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// A 9x9 grid of digits.
///
/// `0` marks an unknown cell. Puzzles use it for free cells; evolved
/// candidates are always fully assigned with digits 1-9.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Grid {
    cells: [[u8; SIZE]; SIZE],
}

impl Grid {
    /// Create an empty grid (every cell unknown)
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a grid from rows, rejecting any value above 9
    pub fn from_rows(rows: [[u8; SIZE]; SIZE]) -> Result<Self, ParseError> {
        for (row, values) in rows.iter().enumerate() {
            for (col, &value) in values.iter().enumerate() {
                if value as usize > SIZE {
                    return Err(ParseError::OutOfRange {
                        row,
                        col,
                        value: value as i64,
                    });
                }
            }
        }
        Ok(Self { cells: rows })
    }

    /// Parse the one-line 81 character form. `0` or `.` marks an unknown cell.
    pub fn from_string(s: &str) -> Option<Self> {
        let chars: Vec<char> = s.chars().filter(|c| !c.is_whitespace()).collect();
        if chars.len() != SIZE * SIZE {
            return None;
        }

        let mut grid = Self::new();
        for (i, c) in chars.into_iter().enumerate() {
            let value = match c {
                '.' => 0,
                '0'..='9' => c as u8 - b'0',
                _ => return None,
            };
            grid.cells[i / SIZE][i % SIZE] = value;
        }
        Some(grid)
    }

    pub fn get(&self, row: usize, col: usize) -> u8 {
        self.cells[row][col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: u8) {
        self.cells[row][col] = value;
    }

    pub fn row(&self, row: usize) -> &[u8; SIZE] {
        &self.cells[row]
    }

    pub fn set_row(&mut self, row: usize, values: [u8; SIZE]) {
        self.cells[row] = values;
    }

    pub fn column(&self, col: usize) -> [u8; SIZE] {
        let mut values = [0; SIZE];
        for (row, value) in values.iter_mut().enumerate() {
            *value = self.cells[row][col];
        }
        values
    }

    /// Values of a 3x3 block, row-major inside the block
    pub fn block(&self, block: usize) -> [u8; SIZE] {
        let start_row = (block / BOX_SIZE) * BOX_SIZE;
        let start_col = (block % BOX_SIZE) * BOX_SIZE;
        let mut values = [0; SIZE];
        for (i, value) in values.iter_mut().enumerate() {
            *value = self.cells[start_row + i / BOX_SIZE][start_col + i % BOX_SIZE];
        }
        values
    }

    /// Swap two cells of the same row
    pub fn swap_in_row(&mut self, row: usize, a: usize, b: usize) {
        self.cells[row].swap(a, b);
    }

    /// Number of known (non-zero) cells
    pub fn filled_count(&self) -> usize {
        self.cells.iter().flatten().filter(|&&v| v != 0).count()
    }

    /// Number of unknown cells
    pub fn empty_count(&self) -> usize {
        SIZE * SIZE - self.filled_count()
    }

    /// Check whether the given row holds each of 1-9 exactly once
    pub fn is_row_permutation(&self, row: usize) -> bool {
        is_permutation(&self.cells[row])
    }

    /// Check whether every row, column and block holds each of 1-9 exactly once
    pub fn is_solved(&self) -> bool {
        (0..SIZE).all(|i| {
            is_permutation(&self.cells[i])
                && is_permutation(&self.column(i))
                && is_permutation(&self.block(i))
        })
    }
}

/// Check whether a unit holds each of 1-9 exactly once
pub fn is_permutation(values: &[u8; SIZE]) -> bool {
    let mut seen = [false; SIZE + 1];
    for &v in values {
        if v == 0 || v as usize > SIZE || seen[v as usize] {
            return false;
        }
        seen[v as usize] = true;
    }
    true
}

impl std::fmt::Display for Grid {
    /// Nine lines of nine space-separated digits
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in &self.cells {
            let line: Vec<String> = row.iter().map(|v| v.to_string()).collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}
