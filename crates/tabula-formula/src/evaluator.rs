//! Formula evaluator
//!
//! Evaluates formula ASTs to numbers. Failures short-circuit through `?` as
//! [`FormulaError`] and are returned to the caller as data.

use crate::ast::{BinaryOperator, FormulaExpr, UnaryOperator};
use tabula_core::{FormulaError, Position};

/// Source of referenced cell values during evaluation
///
/// Implementations resolve a position to a number, or to the error the
/// formula should evaluate to: [`FormulaError::Ref`] for a position off the
/// grid, [`FormulaError::Value`] for text that is not a number, or whatever
/// error the referenced cell itself holds.
pub trait CellLookup {
    fn lookup(&self, pos: Position) -> Result<f64, FormulaError>;
}

impl<F> CellLookup for F
where
    F: Fn(Position) -> Result<f64, FormulaError>,
{
    fn lookup(&self, pos: Position) -> Result<f64, FormulaError> {
        self(pos)
    }
}

/// Evaluate a formula expression
pub fn evaluate<L>(expr: &FormulaExpr, lookup: &L) -> Result<f64, FormulaError>
where
    L: CellLookup + ?Sized,
{
    match expr {
        FormulaExpr::Number(n) => Ok(*n),

        FormulaExpr::CellRef(pos) => lookup.lookup(*pos),

        FormulaExpr::UnaryOp { op, operand } => {
            let value = evaluate(operand, lookup)?;
            Ok(match op {
                UnaryOperator::Plus => value,
                UnaryOperator::Negate => -value,
            })
        }

        FormulaExpr::BinaryOp { op, left, right } => {
            let l = evaluate(left, lookup)?;
            let r = evaluate(right, lookup)?;
            evaluate_binary_op(*op, l, r)
        }
    }
}

/// Evaluate a binary operation
fn evaluate_binary_op(op: BinaryOperator, l: f64, r: f64) -> Result<f64, FormulaError> {
    let result = match op {
        BinaryOperator::Add => l + r,
        BinaryOperator::Subtract => l - r,
        BinaryOperator::Multiply => l * r,
        BinaryOperator::Divide => {
            if r == 0.0 {
                return Err(FormulaError::Div0);
            }
            l / r
        }
    };

    if result.is_finite() {
        Ok(result)
    } else {
        Err(FormulaError::Arithmetic)
    }
}
