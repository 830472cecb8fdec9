//! Cell value types

use std::fmt;
use thiserror::Error;

/// What a cell evaluates to
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    /// Numeric result of a formula
    Number(f64),
    /// Text content (escape marker already stripped); empty for empty cells
    Text(String),
    /// Formula evaluation failure
    Error(FormulaError),
}

impl Value {
    /// The value of an empty cell
    pub fn empty() -> Self {
        Value::Text(String::new())
    }

    /// Check if this is the empty text
    pub fn is_empty(&self) -> bool {
        matches!(self, Value::Text(s) if s.is_empty())
    }

    /// Check if this is an error
    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }

    /// Get the number if this is one
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Get the text if this is text
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get the error if this is one
    pub fn as_error(&self) -> Option<FormulaError> {
        match self {
            Value::Error(e) => Some(*e),
            _ => None,
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::empty()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => f.write_str(s),
            Value::Error(e) => write!(f, "{}", e),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<FormulaError> for Value {
    fn from(e: FormulaError) -> Self {
        Value::Error(e)
    }
}

impl From<Result<f64, FormulaError>> for Value {
    fn from(result: Result<f64, FormulaError>) -> Self {
        match result {
            Ok(n) => Value::Number(n),
            Err(e) => Value::Error(e),
        }
    }
}

/// Formula evaluation error categories
///
/// These are data, not failures of an operation: a formula that cannot be
/// computed evaluates to one of these, and formulas reading it inherit it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FormulaError {
    /// #REF! - Reference to a position outside the grid
    #[error("#REF!")]
    Ref,
    /// #VALUE! - Operand cannot be read as a number
    #[error("#VALUE!")]
    Value,
    /// #DIV/0! - Division by zero
    #[error("#DIV/0!")]
    Div0,
    /// #ARITH! - Any other non-finite arithmetic result
    #[error("#ARITH!")]
    Arithmetic,
}

impl FormulaError {
    /// Get the display string for this error
    pub fn as_str(&self) -> &'static str {
        match self {
            FormulaError::Ref => "#REF!",
            FormulaError::Value => "#VALUE!",
            FormulaError::Div0 => "#DIV/0!",
            FormulaError::Arithmetic => "#ARITH!",
        }
    }

    /// Parse an error string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "#REF!" => Some(FormulaError::Ref),
            "#VALUE!" => Some(FormulaError::Value),
            "#DIV/0!" => Some(FormulaError::Div0),
            "#ARITH!" => Some(FormulaError::Arithmetic),
            _ => None,
        }
    }
}
