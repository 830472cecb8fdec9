//! Prelude module - common imports for tabula users
//!
//! ```rust
//! use tabula::prelude::*;
//! ```

pub use crate::{
    // Cell types
    CellHandle,
    CellKind,
    // Error types
    Error,
    FormulaError,
    Position,
    Result,
    // Main types
    Sheet,
    SheetOptions,
    EmptyReference,
    Size,
    Value,
};
