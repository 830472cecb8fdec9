//! Sheet configuration

use tabula_core::FormulaError;

/// How a formula reads a referenced cell that holds nothing
///
/// The rule applies equally to a cell that was materialized but is empty
/// and to a position that has never been stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EmptyReference {
    /// Read as `0`
    #[default]
    Zero,
    /// Read as `#REF!`
    RefError,
}

impl EmptyReference {
    pub(crate) fn resolve(self) -> Result<f64, FormulaError> {
        match self {
            EmptyReference::Zero => Ok(0.0),
            EmptyReference::RefError => Err(FormulaError::Ref),
        }
    }
}

/// Options for a [`crate::Sheet`]
#[derive(Debug, Clone, Default)]
pub struct SheetOptions {
    /// Numeric reading of empty referenced cells (default: `Zero`)
    pub empty_reference: EmptyReference,
}

impl SheetOptions {
    pub fn with_empty_reference(mut self, empty_reference: EmptyReference) -> Self {
        self.empty_reference = empty_reference;
        self
    }
}
