//! Dependency graph algorithms
//!
//! The graph lives inside the cells themselves: every [`Cell`] stores the
//! positions it reads (children) and the positions that read it (parents).
//! These functions walk and rewire those edges over the sheet's cell map.

use ahash::{AHashMap, AHashSet};
use log::trace;
use std::collections::{BTreeSet, VecDeque};
use tabula_core::Position;

use crate::cell::{Cell, CellKind};

pub(crate) type CellMap = AHashMap<Position, Cell>;

/// Whether making `origin` read `references` would close a cycle
///
/// Walks children edges depth first from each new reference and reports a
/// cycle only on reaching `origin`. Nodes are visited once, so shared
/// sub-graphs (diamonds) are not mistaken for cycles. Nothing is modified.
pub(crate) fn creates_cycle(
    cells: &CellMap,
    origin: Position,
    references: &BTreeSet<Position>,
) -> bool {
    let mut visited = AHashSet::new();
    let mut stack: Vec<Position> = references.iter().copied().collect();

    while let Some(pos) = stack.pop() {
        if pos == origin {
            return true;
        }
        if !visited.insert(pos) {
            continue;
        }
        if let Some(cell) = cells.get(&pos) {
            stack.extend(cell.children().iter().copied());
        }
    }

    false
}

/// Rewire parent edges after `origin` changed its references from `old` to
/// `new`
///
/// Missing cells in `new` are materialized as empty so they can record the
/// back edge. Returns the positions `origin` stopped reading.
pub(crate) fn relink(
    cells: &mut CellMap,
    origin: Position,
    old: &BTreeSet<Position>,
    new: &BTreeSet<Position>,
) -> Vec<Position> {
    let dropped: Vec<Position> = old.difference(new).copied().collect();
    for pos in &dropped {
        if let Some(cell) = cells.get_mut(pos) {
            cell.remove_dependent(origin);
        }
    }

    for pos in new.difference(old) {
        cells
            .entry(*pos)
            .or_insert_with(Cell::new)
            .add_dependent(origin);
    }

    dropped
}

/// Clear cached values of `origin` and every cell that transitively reads it
///
/// A formula is only cached once everything below it is, so the walk stops
/// at formulas that were already stale: their readers are stale as well.
/// Returns the number of caches that actually held a value.
pub(crate) fn invalidate(cells: &CellMap, origin: Position) -> usize {
    let mut visited = AHashSet::new();
    let mut queue = VecDeque::new();
    let mut cleared = 0;

    visited.insert(origin);
    queue.push_back(origin);

    while let Some(pos) = queue.pop_front() {
        let Some(cell) = cells.get(&pos) else {
            continue;
        };
        if cell.invalidate_cache() {
            cleared += 1;
        } else if pos != origin && cell.kind() == CellKind::Formula {
            continue;
        }
        for parent in cell.parents() {
            if visited.insert(*parent) {
                queue.push_back(*parent);
            }
        }
    }

    trace!("invalidated {} cached value(s) from {}", cleared, origin);
    cleared
}
