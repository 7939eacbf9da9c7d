//! Plain-text puzzle files.
//!
//! A puzzle file starts with two header lines (free-form, skipped), followed
//! by nine rows of nine whitespace-separated integers. `-1` marks a free
//! cell. Blank lines are ignored.

use crate::error::ParseError;
use crate::grid::{Grid, SIZE};

const HEADER_LINES: usize = 2;
const FREE_MARKER: i64 = -1;

/// Parse puzzle text into a grid with `0` for free cells
pub fn parse_puzzle(text: &str) -> Result<Grid, ParseError> {
    let mut lines = text.lines();
    for _ in 0..HEADER_LINES {
        lines.next().ok_or(ParseError::MissingHeader)?;
    }

    let rows: Vec<&str> = lines.filter(|line| !line.trim().is_empty()).collect();
    if rows.len() != SIZE {
        return Err(ParseError::RowCount { found: rows.len() });
    }

    let mut cells = [[0u8; SIZE]; SIZE];
    for (row, line) in rows.iter().enumerate() {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() != SIZE {
            return Err(ParseError::ColumnCount {
                row,
                found: tokens.len(),
            });
        }

        for (col, token) in tokens.iter().enumerate() {
            let value: i64 = token.parse().map_err(|_| ParseError::NotAnInteger {
                row,
                col,
                token: token.to_string(),
            })?;
            cells[row][col] = match value {
                FREE_MARKER => 0,
                1..=9 => value as u8,
                _ => return Err(ParseError::OutOfRange { row, col, value }),
            };
        }
    }

    Grid::from_rows(cells)
}

/// Nine lines of nine space-separated digits, newline-terminated
pub fn format_solution(grid: &Grid) -> String {
    grid.to_string()
}
