//! # tabula
//!
//! An in-memory spreadsheet whose cells form a dependency-tracked graph.
//!
//! Cells hold plain text or arithmetic formulas over other cells. Each edit
//! is validated against the existing graph before it is committed, so a
//! formula that would read its own result is rejected with nothing changed.
//! Formula results are memoized and invalidated along reverse edges when a
//! cell they read changes.
//!
//! ## Features
//!
//! - A1 addressing on a 16384 x 16384 grid
//! - Formulas with `+ - * /`, unary signs, parentheses and cell references
//! - Circular reference detection with transactional rollback
//! - Lazy, cached evaluation with targeted invalidation
//! - Incrementally maintained printable area and tab-separated dumps
//!
//! ## Example
//!
//! ```rust
//! use tabula::prelude::*;
//!
//! let mut sheet = Sheet::new();
//! let a1: Position = "A1".parse().unwrap();
//! let b1: Position = "B1".parse().unwrap();
//!
//! sheet.set_cell(a1, "5").unwrap();
//! sheet.set_cell(b1, "=A1 * 2").unwrap();
//! assert_eq!(sheet.value(b1).unwrap(), Value::Number(10.0));
//! assert_eq!(sheet.text(b1).unwrap(), "=A1*2");
//!
//! sheet.set_cell(a1, "abc").unwrap();
//! assert_eq!(sheet.value(b1).unwrap(), Value::Error(FormulaError::Value));
//!
//! assert_eq!(sheet.dump_values(), "abc\t#VALUE!\n");
//! ```

mod cell;
mod dependency;
pub mod options;
pub mod prelude;
mod sheet;

pub use cell::{Cell, CellContent, CellKind};
pub use options::{EmptyReference, SheetOptions};
pub use sheet::{CellHandle, Sheet};

// Re-export core types
pub use tabula_core::{
    Error, FormulaError, Position, Result, Size, Value, ESCAPE_SIGN, FORMULA_SIGN, MAX_COLS,
    MAX_ROWS,
};

// Re-export the formula engine
pub use tabula_formula::{Formula, ParseError};
