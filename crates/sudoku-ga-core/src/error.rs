use crate::grid::Position;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the solver
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("malformed puzzle: {0}")]
    Parse(#[from] ParseError),

    #[error("unsatisfiable constraints: {0}")]
    UnsatisfiableConstraints(#[from] Conflict),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Malformed puzzle text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("expected two header lines before the grid")]
    MissingHeader,

    #[error("expected 9 rows, found {found}")]
    RowCount { found: usize },

    #[error("row {row} has {found} values, expected 9")]
    ColumnCount { row: usize, found: usize },

    #[error("row {row}, column {col}: '{token}' is not an integer")]
    NotAnInteger {
        row: usize,
        col: usize,
        token: String,
    },

    #[error("row {row}, column {col}: {value} is not -1 or a digit 1-9")]
    OutOfRange { row: usize, col: usize, value: i64 },
}

/// A kind of Sudoku unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unit {
    Row,
    Column,
    Block,
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Unit::Row => write!(f, "row"),
            Unit::Column => write!(f, "column"),
            Unit::Block => write!(f, "block"),
        }
    }
}

/// Why a puzzle's givens can never be completed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Conflict {
    #[error("value {value} is given twice in {unit} {index} (at {first} and {second})")]
    DuplicateGiven {
        unit: Unit,
        index: usize,
        value: u8,
        first: Position,
        second: Position,
    },

    #[error("free cell {0} has no admissible value")]
    EmptyDomain(Position),

    #[error("free cells of row {0} cannot be filled with distinct digits")]
    UnfillableRow(usize),
}
