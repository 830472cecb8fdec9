//! Cell content and per-cell graph bookkeeping
//!
//! A [`Cell`] owns its content, the set of positions its formula reads
//! (children), the set of positions whose formulas read it (parents), and a
//! memoized numeric result. Cells never point at each other directly: every
//! relation is a set of [`Position`]s resolved through the owning
//! [`Sheet`](crate::Sheet).

use ahash::AHashSet;
use std::collections::BTreeSet;
use tabula_core::{FormulaError, Position, Result, Value, ESCAPE_SIGN, FORMULA_SIGN};
use tabula_formula::Formula;

use crate::sheet::Sheet;

/// The content variant of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellKind {
    Empty,
    Text,
    Formula,
}

/// What a cell holds
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellContent {
    #[default]
    Empty,
    /// Raw text, escape marker included
    Text(String),
    /// Parsed formula (the leading `=` is not stored)
    Formula(Formula),
}

impl CellContent {
    /// Classify raw cell text
    ///
    /// Text longer than one character starting with `=` is a formula; any
    /// other non-empty text is literal text. A lone `=` is text.
    pub fn from_text(text: String) -> Result<Self> {
        if text.len() > 1 && text.starts_with(FORMULA_SIGN) {
            let formula = Formula::parse(&text[FORMULA_SIGN.len_utf8()..])?;
            Ok(CellContent::Formula(formula))
        } else if !text.is_empty() {
            Ok(CellContent::Text(text))
        } else {
            Ok(CellContent::Empty)
        }
    }

    pub fn kind(&self) -> CellKind {
        match self {
            CellContent::Empty => CellKind::Empty,
            CellContent::Text(_) => CellKind::Text,
            CellContent::Formula(_) => CellKind::Formula,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellContent::Empty)
    }

    /// Text as the user would edit it
    pub fn text(&self) -> String {
        match self {
            CellContent::Empty => String::new(),
            CellContent::Text(text) => text.clone(),
            CellContent::Formula(formula) => {
                format!("{}{}", FORMULA_SIGN, formula.expression())
            }
        }
    }

    /// Deduplicated, sorted in-grid positions the content reads
    ///
    /// Off-grid references are left out: they have no cell to link to and
    /// surface as `#REF!` when evaluated.
    pub fn references(&self) -> BTreeSet<Position> {
        match self {
            CellContent::Formula(formula) => formula
                .referenced_cells()
                .into_iter()
                .filter(Position::is_valid)
                .collect(),
            CellContent::Empty | CellContent::Text(_) => BTreeSet::new(),
        }
    }
}

/// Memoized numeric result of a formula cell
///
/// Starts dirty. Only successful numeric results are stored; errors are
/// recomputed on every read.
#[derive(Debug)]
struct ValueCache {
    value: std::cell::Cell<f64>,
    dirty: std::cell::Cell<bool>,
}

impl ValueCache {
    fn new() -> Self {
        Self {
            value: std::cell::Cell::new(0.0),
            dirty: std::cell::Cell::new(true),
        }
    }

    fn get(&self) -> Option<f64> {
        (!self.dirty.get()).then(|| self.value.get())
    }

    fn store(&self, value: f64) {
        self.value.set(value);
        self.dirty.set(false);
    }

    /// Mark dirty, returning whether a value was held
    fn invalidate(&self) -> bool {
        !self.dirty.replace(true)
    }
}

/// A single cell of a sheet
#[derive(Debug)]
pub struct Cell {
    content: CellContent,
    /// Positions the current formula reads
    children: BTreeSet<Position>,
    /// Positions whose formulas read this cell
    parents: AHashSet<Position>,
    cache: ValueCache,
}

impl Cell {
    pub(crate) fn new() -> Self {
        Self {
            content: CellContent::Empty,
            children: BTreeSet::new(),
            parents: AHashSet::new(),
            cache: ValueCache::new(),
        }
    }

    pub fn content(&self) -> &CellContent {
        &self.content
    }

    pub fn kind(&self) -> CellKind {
        self.content.kind()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn text(&self) -> String {
        self.content.text()
    }

    /// Positions this cell's formula reads, sorted ascending
    pub fn referenced_cells(&self) -> Vec<Position> {
        self.children.iter().copied().collect()
    }

    /// Positions of the cells whose formulas read this one, sorted ascending
    pub fn dependents(&self) -> Vec<Position> {
        let mut parents: Vec<Position> = self.parents.iter().copied().collect();
        parents.sort_unstable();
        parents
    }

    pub(crate) fn children(&self) -> &BTreeSet<Position> {
        &self.children
    }

    pub(crate) fn parents(&self) -> &AHashSet<Position> {
        &self.parents
    }

    pub(crate) fn has_dependents(&self) -> bool {
        !self.parents.is_empty()
    }

    /// Whether the cache currently holds a result
    pub fn is_cached(&self) -> bool {
        self.cache.get().is_some()
    }

    /// Evaluate the cell, reading referenced cells through `sheet`
    pub(crate) fn value(&self, sheet: &Sheet) -> Value {
        match &self.content {
            CellContent::Empty => Value::empty(),
            CellContent::Text(text) => {
                let literal = text.strip_prefix(ESCAPE_SIGN).unwrap_or(text.as_str());
                Value::Text(literal.to_string())
            }
            CellContent::Formula(formula) => {
                if let Some(cached) = self.cache.get() {
                    return Value::Number(cached);
                }
                let result = sheet.evaluate_formula(formula, &self.children);
                self.remember(result);
                Value::from(result)
            }
        }
    }

    /// The formula, if this is a formula cell without a cached result
    pub(crate) fn stale_formula(&self) -> Option<&Formula> {
        match &self.content {
            CellContent::Formula(formula) if !self.is_cached() => Some(formula),
            _ => None,
        }
    }

    /// Cache a successful evaluation
    pub(crate) fn remember(&self, result: std::result::Result<f64, FormulaError>) {
        if let Ok(number) = result {
            self.cache.store(number);
        }
    }

    /// Swap in new content and its reference set, returning the old references
    pub(crate) fn replace_content(
        &mut self,
        content: CellContent,
        children: BTreeSet<Position>,
    ) -> BTreeSet<Position> {
        self.content = content;
        std::mem::replace(&mut self.children, children)
    }

    pub(crate) fn add_dependent(&mut self, pos: Position) {
        self.parents.insert(pos);
    }

    pub(crate) fn remove_dependent(&mut self, pos: Position) {
        self.parents.remove(&pos);
    }

    pub(crate) fn invalidate_cache(&self) -> bool {
        self.cache.invalidate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabula_core::Error;

    #[test]
    fn test_classify_text() {
        assert_eq!(CellContent::from_text(String::new()).unwrap(), CellContent::Empty);
        assert_eq!(
            CellContent::from_text("hello".into()).unwrap(),
            CellContent::Text("hello".into())
        );
        // A lone formula sign is just text
        assert_eq!(
            CellContent::from_text("=".into()).unwrap(),
            CellContent::Text("=".into())
        );
        assert_eq!(
            CellContent::from_text("=1+2".into()).unwrap().kind(),
            CellKind::Formula
        );
        assert_eq!(
            CellContent::from_text("'=1+2".into()).unwrap().kind(),
            CellKind::Text
        );
    }

    #[test]
    fn test_classify_parse_failure() {
        assert!(matches!(
            CellContent::from_text("=1+".into()),
            Err(Error::FormulaParse(_))
        ));
    }

    #[test]
    fn test_content_text() {
        let formula = CellContent::from_text("= (1 + 2) * A1".into()).unwrap();
        assert_eq!(formula.text(), "=(1+2)*A1");

        let escaped = CellContent::from_text("'=1+2".into()).unwrap();
        assert_eq!(escaped.text(), "'=1+2");
    }

    #[test]
    fn test_references_deduplicated_and_sorted() {
        let content = CellContent::from_text("=C1+A2+C1+B1+ZZZZ1".into()).unwrap();
        let refs: Vec<_> = content.references().into_iter().collect();
        assert_eq!(
            refs,
            vec![Position::new(0, 1), Position::new(0, 2), Position::new(1, 0)]
        );
        assert!(CellContent::Text("A1".into()).references().is_empty());
    }

    #[test]
    fn test_value_cache() {
        let cache = ValueCache::new();
        assert_eq!(cache.get(), None);
        assert!(!cache.invalidate());

        cache.store(4.5);
        assert_eq!(cache.get(), Some(4.5));
        assert!(cache.invalidate());
        assert_eq!(cache.get(), None);
    }
}
