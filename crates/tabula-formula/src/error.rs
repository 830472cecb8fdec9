//! Formula parse errors

use thiserror::Error;

/// Result type for formula parsing
pub type ParseResult<T> = std::result::Result<T, ParseError>;

/// Errors that can occur while parsing formula text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Nothing to parse
    #[error("Empty expression")]
    Empty,

    /// Character that cannot start any token
    #[error("Unexpected character '{ch}' at offset {offset}")]
    UnexpectedCharacter { ch: char, offset: usize },

    /// Malformed numeric literal
    #[error("Invalid number: {0}")]
    InvalidNumber(String),

    /// Word that is neither a cell reference nor anything else we know
    #[error("Unknown identifier: {0}")]
    UnknownIdentifier(String),

    /// Token that does not fit the grammar at this point
    #[error("Unexpected token: {0}")]
    UnexpectedToken(String),

    /// Input ended in the middle of an expression
    #[error("Unexpected end of expression")]
    UnexpectedEnd,

    /// Expression nested past [`crate::parser::MAX_DEPTH`]
    #[error("Expression nested deeper than {0} levels")]
    TooDeep(usize),

    /// Input left over after a complete expression
    #[error("Unexpected characters after expression: '{0}'")]
    TrailingInput(String),
}

impl From<ParseError> for tabula_core::Error {
    fn from(e: ParseError) -> Self {
        tabula_core::Error::FormulaParse(e.to_string())
    }
}
