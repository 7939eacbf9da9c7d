use crate::error::{Conflict, Unit};
use crate::grid::{Grid, Position, BOX_SIZE, SIZE};

/// The fixed cells of the puzzle being solved.
///
/// Duplicate queries only look at the givens, never at an evolving
/// candidate. Seeding and mutation therefore avoid clashes with the
/// puzzle's digits but may still produce clashes between evolved digits;
/// the fitness function is what pushes those out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Given {
    grid: Grid,
}

impl Given {
    pub fn new(grid: Grid) -> Self {
        Self { grid }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn value(&self, row: usize, col: usize) -> u8 {
        self.grid.get(row, col)
    }

    pub fn is_fixed(&self, row: usize, col: usize) -> bool {
        self.grid.get(row, col) != 0
    }

    pub fn is_free(&self, row: usize, col: usize) -> bool {
        self.grid.get(row, col) == 0
    }

    /// Number of free cells in a row
    pub fn free_in_row(&self, row: usize) -> usize {
        self.grid.row(row).iter().filter(|&&v| v == 0).count()
    }

    /// Whether any row has two free cells, i.e. whether an in-row swap can exist at all
    pub fn has_swappable_row(&self) -> bool {
        (0..SIZE).any(|row| self.free_in_row(row) >= 2)
    }

    /// Whether `value` is already fixed somewhere in `row`
    pub fn is_row_duplicate(&self, row: usize, value: u8) -> bool {
        value != 0 && self.grid.row(row).contains(&value)
    }

    /// Whether `value` is already fixed somewhere in `col`
    pub fn is_column_duplicate(&self, col: usize, value: u8) -> bool {
        value != 0 && (0..SIZE).any(|row| self.grid.get(row, col) == value)
    }

    /// Whether `value` is already fixed in the block containing (`row`, `col`)
    pub fn is_block_duplicate(&self, row: usize, col: usize, value: u8) -> bool {
        if value == 0 {
            return false;
        }
        let start_row = BOX_SIZE * (row / BOX_SIZE);
        let start_col = BOX_SIZE * (col / BOX_SIZE);
        (start_row..start_row + BOX_SIZE)
            .any(|r| (start_col..start_col + BOX_SIZE).any(|c| self.grid.get(r, c) == value))
    }

    /// Whether `value` may go in the free cell (`row`, `col`) without clashing with a given
    pub fn admits(&self, row: usize, col: usize, value: u8) -> bool {
        !(self.is_row_duplicate(row, value)
            || self.is_column_duplicate(col, value)
            || self.is_block_duplicate(row, col, value))
    }

    /// Check that no row, column or block holds the same given twice
    pub fn check_duplicates(&self) -> Result<(), Conflict> {
        for index in 0..SIZE {
            check_unit(Unit::Row, index, (0..SIZE).map(|col| Position::new(index, col)), &self.grid)?;
            check_unit(Unit::Column, index, (0..SIZE).map(|row| Position::new(row, index)), &self.grid)?;

            let start_row = (index / BOX_SIZE) * BOX_SIZE;
            let start_col = (index % BOX_SIZE) * BOX_SIZE;
            let cells = (0..SIZE).map(|i| Position::new(start_row + i / BOX_SIZE, start_col + i % BOX_SIZE));
            check_unit(Unit::Block, index, cells, &self.grid)?;
        }
        Ok(())
    }
}

fn check_unit(
    unit: Unit,
    index: usize,
    cells: impl Iterator<Item = Position>,
    grid: &Grid,
) -> Result<(), Conflict> {
    let mut seen: [Option<Position>; SIZE + 1] = [None; SIZE + 1];
    for pos in cells {
        let value = grid.get(pos.row, pos.col);
        if value == 0 {
            continue;
        }
        if let Some(first) = seen[value as usize] {
            return Err(Conflict::DuplicateGiven {
                unit,
                index,
                value,
                first,
                second: pos,
            });
        }
        seen[value as usize] = Some(pos);
    }
    Ok(())
}
