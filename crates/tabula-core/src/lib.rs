//! # tabula-core
//!
//! Core data types for the tabula spreadsheet engine.
//!
//! This crate provides the fundamental types shared by the formula engine and
//! the sheet:
//! - [`Position`] and [`Size`] - Grid coordinates and printable dimensions
//! - [`Value`] - What a cell evaluates to (number, text or error)
//! - [`FormulaError`] - Value-level evaluation failures (`#REF!`, `#VALUE!`, ...)
//! - [`Error`] - Structural failures that reject an edit
//!
//! ## Example
//!
//! ```rust
//! use tabula_core::{Position, Value, FormulaError};
//!
//! let pos: Position = "B3".parse().unwrap();
//! assert_eq!(pos, Position::new(2, 1));
//! assert_eq!(pos.to_string(), "B3");
//!
//! assert_eq!(Value::Number(10.0).to_string(), "10");
//! assert_eq!(Value::Error(FormulaError::Div0).to_string(), "#DIV/0!");
//! ```

pub mod error;
pub mod position;
pub mod value;

pub use error::{Error, Result};
pub use position::{Position, Size};
pub use value::{FormulaError, Value};

/// Maximum number of rows in a sheet
pub const MAX_ROWS: i32 = 16_384;

/// Maximum number of columns in a sheet
pub const MAX_COLS: i32 = 16_384;

/// Leading character that marks cell text as a formula
pub const FORMULA_SIGN: char = '=';

/// Leading character that forces cell text to be taken literally
pub const ESCAPE_SIGN: char = '\'';
