//! Error types for tabula-core

use thiserror::Error;

use crate::Position;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Structural failures.
///
/// These reject an operation in full: the sheet is left exactly as it was
/// before the call. Evaluation problems are never reported here; they travel
/// as [`crate::FormulaError`] inside a [`crate::Value`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Position outside the addressable grid
    #[error("Invalid position: row {row}, column {col}")]
    InvalidPosition { row: i32, col: i32 },

    /// The edit would make a cell depend on itself
    #[error("Circular dependency detected involving cell {0}")]
    CircularDependency(Position),

    /// Formula text could not be parsed
    #[error("Formula parse error: {0}")]
    FormulaParse(String),

    /// Malformed A1 address
    #[error("Invalid cell address: {0}")]
    InvalidAddress(String),
}

impl Error {
    /// Create an invalid position error for `pos`
    pub fn invalid_position(pos: Position) -> Self {
        Error::InvalidPosition {
            row: pos.row,
            col: pos.col,
        }
    }
}
