//! Formula Abstract Syntax Tree types

use std::fmt;
use tabula_core::Position;

/// Binding strength of unary operators; tighter than any binary operator
const UNARY_PRECEDENCE: u8 = 3;

/// Binding strength of literals and references
const ATOM_PRECEDENCE: u8 = 4;

/// Formula expression AST
#[derive(Debug, Clone, PartialEq)]
pub enum FormulaExpr {
    /// Numeric literal
    Number(f64),

    /// Single cell reference ([`Position::NONE`] when it points off the grid)
    CellRef(Position),

    /// Binary operation
    BinaryOp {
        op: BinaryOperator,
        left: Box<FormulaExpr>,
        right: Box<FormulaExpr>,
    },

    /// Unary operation
    UnaryOp {
        op: UnaryOperator,
        operand: Box<FormulaExpr>,
    },
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl BinaryOperator {
    pub fn precedence(&self) -> u8 {
        match self {
            BinaryOperator::Add | BinaryOperator::Subtract => 1,
            BinaryOperator::Multiply | BinaryOperator::Divide => 2,
        }
    }

    /// Whether `a op (b op' c)` differs from `a op b op' c` for an operator of
    /// equal precedence
    fn groups_right_operand(&self) -> bool {
        matches!(self, BinaryOperator::Subtract | BinaryOperator::Divide)
    }

    pub fn symbol(&self) -> char {
        match self {
            BinaryOperator::Add => '+',
            BinaryOperator::Subtract => '-',
            BinaryOperator::Multiply => '*',
            BinaryOperator::Divide => '/',
        }
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Plus,
    Negate,
}

impl UnaryOperator {
    pub fn symbol(&self) -> char {
        match self {
            UnaryOperator::Plus => '+',
            UnaryOperator::Negate => '-',
        }
    }
}

impl FormulaExpr {
    fn precedence(&self) -> u8 {
        match self {
            FormulaExpr::Number(_) | FormulaExpr::CellRef(_) => ATOM_PRECEDENCE,
            FormulaExpr::UnaryOp { .. } => UNARY_PRECEDENCE,
            FormulaExpr::BinaryOp { op, .. } => op.precedence(),
        }
    }

    /// Collect every cell reference in source order, duplicates included
    pub fn collect_references(&self, out: &mut Vec<Position>) {
        match self {
            FormulaExpr::Number(_) => {}
            FormulaExpr::CellRef(pos) => out.push(*pos),
            FormulaExpr::UnaryOp { operand, .. } => operand.collect_references(out),
            FormulaExpr::BinaryOp { left, right, .. } => {
                left.collect_references(out);
                right.collect_references(out);
            }
        }
    }

    fn write_operand(
        &self,
        f: &mut fmt::Formatter<'_>,
        needs_parens: bool,
    ) -> fmt::Result {
        if needs_parens {
            write!(f, "({})", self)
        } else {
            write!(f, "{}", self)
        }
    }
}

/// Canonical expression text: no whitespace, only the parentheses that
/// precedence and associativity require.
impl fmt::Display for FormulaExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormulaExpr::Number(n) => write!(f, "{}", n),
            FormulaExpr::CellRef(pos) => write!(f, "{}", pos),
            FormulaExpr::UnaryOp { op, operand } => {
                write!(f, "{}", op.symbol())?;
                operand.write_operand(f, operand.precedence() < UNARY_PRECEDENCE)
            }
            FormulaExpr::BinaryOp { op, left, right } => {
                let prec = op.precedence();
                left.write_operand(f, left.precedence() < prec)?;
                write!(f, "{}", op.symbol())?;
                let right_prec = right.precedence();
                right.write_operand(
                    f,
                    right_prec < prec || (right_prec == prec && op.groups_right_operand()),
                )
            }
        }
    }
}
