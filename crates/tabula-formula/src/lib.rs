//! # tabula-formula
//!
//! Arithmetic formula engine for tabula.
//!
//! This crate provides:
//! - Formula parsing (text → AST)
//! - Canonical printing (AST → text with minimal parentheses)
//! - Formula evaluation against a cell lookup
//! - Reference extraction for dependency tracking
//!
//! ## Example
//!
//! ```rust
//! use tabula_core::{FormulaError, Position};
//! use tabula_formula::Formula;
//!
//! let formula = Formula::parse("(A1 + 2) * B1").unwrap();
//! assert_eq!(formula.expression(), "(A1+2)*B1");
//! assert_eq!(
//!     formula.referenced_cells(),
//!     vec![Position::new(0, 0), Position::new(0, 1)]
//! );
//!
//! let lookup = |pos: Position| -> Result<f64, FormulaError> {
//!     Ok(if pos.col == 0 { 3.0 } else { 4.0 })
//! };
//! assert_eq!(formula.evaluate(&lookup), Ok(20.0));
//! ```

pub mod ast;
pub mod error;
pub mod evaluator;
pub mod formula;
pub mod parser;

pub use ast::{BinaryOperator, FormulaExpr, UnaryOperator};
pub use error::{ParseError, ParseResult};
pub use evaluator::{evaluate, CellLookup};
pub use formula::Formula;
pub use parser::{parse_expression, MAX_DEPTH};
