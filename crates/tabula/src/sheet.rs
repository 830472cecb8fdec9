//! Sheet - cell storage, edits and the occupied bounding box

use ahash::AHashMap;
use log::{debug, trace};
use std::collections::BTreeSet;
use std::io;
use tabula_core::{Error, FormulaError, Position, Result, Size, Value};
use tabula_formula::Formula;

use crate::cell::{Cell, CellContent, CellKind};
use crate::dependency::{self, CellMap};
use crate::options::SheetOptions;

/// Results of formulas evaluated earlier in the same read
type Resolved = AHashMap<Position, std::result::Result<f64, FormulaError>>;

/// A single spreadsheet
///
/// Owns every cell keyed by [`Position`] and keeps per-row and per-column
/// counts of non-empty cells, so the printable area (the minimal rectangle
/// anchored at A1 covering all non-empty cells) is maintained without a scan.
///
/// Edits are transactional: a rejected [`set_cell`](Sheet::set_cell) leaves
/// content, references, caches and the printable area untouched.
///
/// # Example
///
/// ```rust
/// use tabula::{Position, Sheet, Value};
///
/// let mut sheet = Sheet::new();
/// sheet.set_cell(Position::new(0, 0), "5").unwrap();
/// sheet.set_cell(Position::new(0, 1), "=A1*2").unwrap();
///
/// assert_eq!(sheet.value(Position::new(0, 1)).unwrap(), Value::Number(10.0));
/// assert!(sheet.set_cell(Position::new(0, 0), "=B1").is_err());
/// ```
#[derive(Debug, Default)]
pub struct Sheet {
    cells: CellMap,
    /// Non-empty cells per row; length is the printable row count
    row_counts: Vec<u32>,
    /// Non-empty cells per column; length is the printable column count
    col_counts: Vec<u32>,
    options: SheetOptions,
}

impl Sheet {
    /// Create an empty sheet with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty sheet with the given options
    pub fn with_options(options: SheetOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Options this sheet was created with
    pub fn options(&self) -> &SheetOptions {
        &self.options
    }

    // === Editing ===

    /// Set the text of the cell at `pos`
    ///
    /// Text starting with `=` (and longer than that sign) is parsed as a
    /// formula. Fails without changing anything if the position is off the
    /// grid, the formula does not parse, or the formula would make the cell
    /// depend on itself.
    pub fn set_cell(&mut self, pos: Position, text: impl Into<String>) -> Result<()> {
        check_position(pos)?;
        let content = CellContent::from_text(text.into())?;
        self.commit(pos, content)
    }

    /// Clear the cell at `pos`
    ///
    /// A no-op for a position that was never stored.
    pub fn clear_cell(&mut self, pos: Position) -> Result<()> {
        check_position(pos)?;
        if !self.cells.contains_key(&pos) {
            return Ok(());
        }
        debug!("clear {}", pos);
        self.commit(pos, CellContent::Empty)
    }

    fn commit(&mut self, pos: Position, content: CellContent) -> Result<()> {
        let references = content.references();
        if dependency::creates_cycle(&self.cells, pos, &references) {
            debug!("rejected edit of {}: circular dependency", pos);
            return Err(Error::CircularDependency(pos));
        }

        let kind = content.kind();
        let was_empty = self.cells.get(&pos).map_or(true, Cell::is_empty);
        let is_empty = content.is_empty();

        let old_references = self
            .cells
            .entry(pos)
            .or_insert_with(Cell::new)
            .replace_content(content, references.clone());
        let dropped = dependency::relink(&mut self.cells, pos, &old_references, &references);
        dependency::invalidate(&self.cells, pos);

        match (was_empty, is_empty) {
            (true, false) => self.occupy(pos),
            (false, true) => self.vacate(pos),
            _ => {}
        }

        for candidate in dropped.into_iter().chain(std::iter::once(pos)) {
            self.prune(candidate);
        }

        debug!(
            "set {} to {:?} reading {} cell(s)",
            pos,
            kind,
            references.len()
        );
        Ok(())
    }

    // === Bounding box ===

    /// Dimensions of the minimal rectangle covering every non-empty cell
    pub fn printable_size(&self) -> Size {
        Size::new(self.row_counts.len() as i32, self.col_counts.len() as i32)
    }

    fn occupy(&mut self, pos: Position) {
        let (row, col) = (pos.row as usize, pos.col as usize);
        if self.row_counts.len() <= row {
            self.row_counts.resize(row + 1, 0);
        }
        if self.col_counts.len() <= col {
            self.col_counts.resize(col + 1, 0);
        }
        self.row_counts[row] += 1;
        self.col_counts[col] += 1;
    }

    fn vacate(&mut self, pos: Position) {
        let (row, col) = (pos.row as usize, pos.col as usize);
        if let Some(count) = self.row_counts.get_mut(row) {
            *count = count.saturating_sub(1);
        }
        if let Some(count) = self.col_counts.get_mut(col) {
            *count = count.saturating_sub(1);
        }

        let before = self.printable_size();
        trim_trailing_zeros(&mut self.row_counts);
        trim_trailing_zeros(&mut self.col_counts);
        let after = self.printable_size();

        if after != before {
            debug!(
                "printable area shrank from {}x{} to {}x{}",
                before.rows, before.cols, after.rows, after.cols
            );
            let before_len = self.cells.len();
            self.cells
                .retain(|pos, cell| after.contains(*pos) || !cell.is_empty() || cell.has_dependents());
            trace!(
                "dropped {} empty cell(s) outside the printable area",
                before_len - self.cells.len()
            );
        }
    }

    /// Drop the cell at `pos` if it is empty, unreferenced and outside the
    /// printable area
    fn prune(&mut self, pos: Position) {
        let orphaned = self
            .cells
            .get(&pos)
            .is_some_and(|cell| cell.is_empty() && !cell.has_dependents());
        if orphaned && !self.printable_size().contains(pos) {
            self.cells.remove(&pos);
            trace!("pruned orphaned empty cell {}", pos);
        }
    }

    // === Lookup ===

    /// Look up the cell at `pos` without allocating
    pub fn cell(&self, pos: Position) -> Result<Option<CellHandle<'_>>> {
        check_position(pos)?;
        Ok(self.handle(pos))
    }

    /// Look up the cell at `pos`
    ///
    /// Positions inside the printable area are always addressable: a
    /// missing cell there is materialized as empty. Outside the area a
    /// missing cell is reported as `None`.
    pub fn get_cell(&mut self, pos: Position) -> Result<Option<CellHandle<'_>>> {
        check_position(pos)?;
        if self.printable_size().contains(pos) {
            self.cells.entry(pos).or_insert_with(Cell::new);
        }
        let sheet: &Sheet = self;
        Ok(sheet.handle(pos))
    }

    fn handle(&self, pos: Position) -> Option<CellHandle<'_>> {
        self.cells.get(&pos).map(|cell| CellHandle {
            sheet: self,
            position: pos,
            cell,
        })
    }

    /// Value of the cell at `pos` (empty text when nothing is stored)
    pub fn value(&self, pos: Position) -> Result<Value> {
        check_position(pos)?;
        Ok(self
            .cells
            .get(&pos)
            .map_or_else(Value::empty, |cell| cell.value(self)))
    }

    /// Text of the cell at `pos` (empty when nothing is stored)
    pub fn text(&self, pos: Position) -> Result<String> {
        check_position(pos)?;
        Ok(self.cells.get(&pos).map(Cell::text).unwrap_or_default())
    }

    /// Every stored cell in row-major order
    pub fn iter_cells(&self) -> impl Iterator<Item = CellHandle<'_>> + '_ {
        let mut positions: Vec<Position> = self.cells.keys().copied().collect();
        positions.sort_unstable();
        positions.into_iter().filter_map(move |pos| self.handle(pos))
    }

    /// Number of stored cells, empty ones included
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Evaluate `formula`, whose direct references are `children`
    ///
    /// Stale formulas below it are evaluated first, leaves up, with an
    /// explicit stack, so the depth of a reference chain never turns into
    /// call depth. Their results (errors included) are kept for the rest of
    /// this evaluation; successful ones also land in the cells' caches.
    pub(crate) fn evaluate_formula(
        &self,
        formula: &Formula,
        children: &BTreeSet<Position>,
    ) -> std::result::Result<f64, FormulaError> {
        let mut resolved: Resolved = AHashMap::new();
        let mut stack: Vec<(Position, bool)> = children.iter().map(|pos| (*pos, false)).collect();

        while let Some((pos, ready)) = stack.pop() {
            if resolved.contains_key(&pos) {
                continue;
            }
            let Some(cell) = self.cells.get(&pos) else {
                continue;
            };
            let Some(stale) = cell.stale_formula() else {
                continue;
            };

            if ready {
                let result = stale.evaluate(&|p: Position| self.resolve_reference(p, &resolved));
                cell.remember(result);
                resolved.insert(pos, result);
            } else {
                stack.push((pos, true));
                stack.extend(
                    cell.children()
                        .iter()
                        .filter(|child| !resolved.contains_key(*child))
                        .map(|child| (*child, false)),
                );
            }
        }

        if !resolved.is_empty() {
            trace!("evaluated {} stale formula(s) below", resolved.len());
        }
        formula.evaluate(&|p: Position| self.resolve_reference(p, &resolved))
    }

    /// Numeric reading of a referenced cell during formula evaluation
    fn resolve_reference(
        &self,
        pos: Position,
        resolved: &Resolved,
    ) -> std::result::Result<f64, FormulaError> {
        if !pos.is_valid() {
            return Err(FormulaError::Ref);
        }
        if let Some(result) = resolved.get(&pos) {
            return *result;
        }
        let value = match self.cells.get(&pos) {
            Some(cell) => cell.value(self),
            None => Value::empty(),
        };
        match value {
            Value::Number(n) => Ok(n),
            Value::Text(text) if text.is_empty() => self.options.empty_reference.resolve(),
            Value::Text(text) => text
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .ok_or(FormulaError::Value),
            Value::Error(err) => Err(err),
        }
    }

    // === Output ===

    /// Values of the printable area, tab separated, one line per row
    pub fn dump_values(&self) -> String {
        self.render(|cell| cell.value(self).to_string())
    }

    /// Texts of the printable area, tab separated, one line per row
    pub fn dump_texts(&self) -> String {
        self.render(Cell::text)
    }

    /// Write [`dump_values`](Sheet::dump_values) to `output`
    pub fn print_values<W: io::Write>(&self, output: &mut W) -> io::Result<()> {
        output.write_all(self.dump_values().as_bytes())
    }

    /// Write [`dump_texts`](Sheet::dump_texts) to `output`
    pub fn print_texts<W: io::Write>(&self, output: &mut W) -> io::Result<()> {
        output.write_all(self.dump_texts().as_bytes())
    }

    fn render<F>(&self, render_cell: F) -> String
    where
        F: Fn(&Cell) -> String,
    {
        let size = self.printable_size();
        let mut out = String::new();
        for row in 0..size.rows {
            for col in 0..size.cols {
                if col != 0 {
                    out.push('\t');
                }
                if let Some(cell) = self.cells.get(&Position::new(row, col)) {
                    out.push_str(&render_cell(cell));
                }
            }
            out.push('\n');
        }
        out
    }
}

fn check_position(pos: Position) -> Result<()> {
    if pos.is_valid() {
        Ok(())
    } else {
        Err(Error::invalid_position(pos))
    }
}

fn trim_trailing_zeros(counts: &mut Vec<u32>) {
    while counts.last() == Some(&0) {
        counts.pop();
    }
}

/// Read-only view of a stored cell
#[derive(Debug, Clone, Copy)]
pub struct CellHandle<'a> {
    sheet: &'a Sheet,
    position: Position,
    cell: &'a Cell,
}

impl<'a> CellHandle<'a> {
    pub fn position(&self) -> Position {
        self.position
    }

    pub fn kind(&self) -> CellKind {
        self.cell.kind()
    }

    pub fn is_empty(&self) -> bool {
        self.cell.is_empty()
    }

    /// Evaluated value, served from the cache when clean
    pub fn value(&self) -> Value {
        self.cell.value(self.sheet)
    }

    pub fn text(&self) -> String {
        self.cell.text()
    }

    /// Positions this cell's formula reads, sorted and deduplicated
    pub fn referenced_cells(&self) -> Vec<Position> {
        self.cell.referenced_cells()
    }

    /// Positions of the cells whose formulas read this one, sorted
    pub fn dependents(&self) -> Vec<Position> {
        self.cell.dependents()
    }

    pub fn is_cached(&self) -> bool {
        self.cell.is_cached()
    }

    pub fn cell(&self) -> &'a Cell {
        self.cell
    }
}
