//! Parsed formula handle

use crate::ast::FormulaExpr;
use crate::error::ParseResult;
use crate::evaluator::{evaluate, CellLookup};
use crate::parser::parse_expression;
use std::fmt;
use tabula_core::{FormulaError, Position};

/// A parsed formula expression
///
/// This is the handle the sheet stores in formula cells. It is immutable:
/// editing a cell replaces the whole formula.
#[derive(Debug, Clone, PartialEq)]
pub struct Formula {
    ast: FormulaExpr,
}

impl Formula {
    /// Parse expression text (without the leading `=`)
    pub fn parse(expression: &str) -> ParseResult<Self> {
        Ok(Self {
            ast: parse_expression(expression)?,
        })
    }

    /// Evaluate against `lookup`
    pub fn evaluate<L>(&self, lookup: &L) -> Result<f64, FormulaError>
    where
        L: CellLookup + ?Sized,
    {
        evaluate(&self.ast, lookup)
    }

    /// Every referenced position in source order, duplicates and off-grid
    /// references included
    pub fn referenced_cells(&self) -> Vec<Position> {
        let mut cells = Vec::new();
        self.ast.collect_references(&mut cells);
        cells
    }

    /// Canonical expression text
    pub fn expression(&self) -> String {
        self.ast.to_string()
    }

    pub fn ast(&self) -> &FormulaExpr {
        &self.ast
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ast)
    }
}
