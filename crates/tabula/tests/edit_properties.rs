// Property-based tests over random edit sequences on a small grid.
// CI: 128 cases (default). Soak: PROPTEST_CASES=10000 cargo test --release

use proptest::prelude::*;
use tabula::prelude::*;

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(128),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

const GRID: i32 = 4;

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
enum Edit {
    Set(Position, String),
    Clear(Position),
}

fn arb_position() -> impl Strategy<Value = Position> {
    (0..GRID, 0..GRID).prop_map(|(row, col)| Position::new(row, col))
}

/// Cell text: mostly formulas over the grid, sometimes literals or nothing
fn arb_text() -> impl Strategy<Value = String> {
    prop_oneof![
        2 => (-100i32..100).prop_map(|n| n.to_string()),
        1 => Just(String::new()),
        1 => Just("abc".to_string()),
        4 => prop::collection::vec(arb_position(), 1..4).prop_map(|refs| {
            let terms: Vec<String> = refs.iter().map(|pos| pos.to_string()).collect();
            format!("={}", terms.join("+"))
        }),
    ]
}

fn arb_edit() -> impl Strategy<Value = Edit> {
    prop_oneof![
        4 => (arb_position(), arb_text()).prop_map(|(pos, text)| Edit::Set(pos, text)),
        1 => arb_position().prop_map(Edit::Clear),
    ]
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

type Snapshot = Vec<(Position, String, Vec<Position>, Vec<Position>)>;

fn snapshot(sheet: &Sheet) -> Snapshot {
    sheet
        .iter_cells()
        .map(|cell| {
            (
                cell.position(),
                cell.text(),
                cell.referenced_cells(),
                cell.dependents(),
            )
        })
        .collect()
}

fn values(sheet: &Sheet) -> Vec<(Position, Value)> {
    sheet
        .iter_cells()
        .map(|cell| (cell.position(), cell.value()))
        .collect()
}

/// Minimal rectangle covering every non-empty cell, by full scan
fn scanned_size(sheet: &Sheet) -> Size {
    sheet
        .iter_cells()
        .filter(|cell| !cell.is_empty())
        .fold(Size::new(0, 0), |size, cell| {
            let pos = cell.position();
            Size::new(size.rows.max(pos.row + 1), size.cols.max(pos.col + 1))
        })
}

/// Whether `target` is reachable from `start` along referenced-cell edges
fn reaches(sheet: &Sheet, start: Position, target: Position) -> bool {
    let mut stack = vec![start];
    let mut seen = std::collections::HashSet::new();
    while let Some(pos) = stack.pop() {
        if !seen.insert(pos) {
            continue;
        }
        if let Ok(Some(cell)) = sheet.cell(pos) {
            for child in cell.referenced_cells() {
                if child == target {
                    return true;
                }
                stack.push(child);
            }
        }
    }
    false
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config())]

    #[test]
    fn rejected_edits_change_nothing(edits in prop::collection::vec(arb_edit(), 1..40)) {
        let mut sheet = Sheet::new();
        for edit in edits {
            let before = snapshot(&sheet);
            let size = sheet.printable_size();
            let result = match &edit {
                Edit::Set(pos, text) => sheet.set_cell(*pos, text.clone()),
                Edit::Clear(pos) => sheet.clear_cell(*pos),
            };
            if let Err(err) = result {
                prop_assert!(matches!(err, Error::CircularDependency(_)), "{:?}", err);
                prop_assert_eq!(snapshot(&sheet), before);
                prop_assert_eq!(sheet.printable_size(), size);
            }
        }
    }

    #[test]
    fn graph_stays_acyclic(edits in prop::collection::vec(arb_edit(), 1..40)) {
        let mut sheet = Sheet::new();
        for edit in edits {
            let _ = match edit {
                Edit::Set(pos, text) => sheet.set_cell(pos, text),
                Edit::Clear(pos) => sheet.clear_cell(pos),
            };
        }
        for cell in sheet.iter_cells() {
            prop_assert!(!reaches(&sheet, cell.position(), cell.position()));
        }
    }

    #[test]
    fn references_mirror_dependents(edits in prop::collection::vec(arb_edit(), 1..40)) {
        let mut sheet = Sheet::new();
        for edit in edits {
            let _ = match edit {
                Edit::Set(pos, text) => sheet.set_cell(pos, text),
                Edit::Clear(pos) => sheet.clear_cell(pos),
            };
        }
        for cell in sheet.iter_cells() {
            for child in cell.referenced_cells() {
                let child = sheet.cell(child).unwrap();
                prop_assert!(child.is_some());
                prop_assert!(child.unwrap().dependents().contains(&cell.position()));
            }
            for parent in cell.dependents() {
                let parent = sheet.cell(parent).unwrap();
                prop_assert!(parent.is_some());
                prop_assert!(parent.unwrap().referenced_cells().contains(&cell.position()));
            }
        }
    }

    #[test]
    fn printable_size_is_minimal(edits in prop::collection::vec(arb_edit(), 1..40)) {
        let mut sheet = Sheet::new();
        for edit in edits {
            let _ = match edit {
                Edit::Set(pos, text) => sheet.set_cell(pos, text),
                Edit::Clear(pos) => sheet.clear_cell(pos),
            };
            prop_assert_eq!(sheet.printable_size(), scanned_size(&sheet));
        }
    }

    #[test]
    fn cached_values_match_fresh_evaluation(edits in prop::collection::vec(arb_edit(), 1..40)) {
        let mut sheet = Sheet::new();
        for edit in edits {
            let _ = match edit {
                Edit::Set(pos, text) => sheet.set_cell(pos, text),
                Edit::Clear(pos) => sheet.clear_cell(pos),
            };
            // Reading fills caches; a rebuilt sheet evaluates from scratch
            let cached = values(&sheet);

            let mut fresh = Sheet::new();
            let mut pending: Vec<(Position, String)> = sheet
                .iter_cells()
                .filter(|cell| !cell.is_empty())
                .map(|cell| (cell.position(), cell.text()))
                .collect();
            // Replay in dependency order so no edit is rejected
            while !pending.is_empty() {
                let before = pending.len();
                pending.retain(|(pos, text)| fresh.set_cell(*pos, text.clone()).is_err());
                prop_assert!(pending.len() < before);
            }

            for (pos, value) in cached {
                prop_assert_eq!(fresh.value(pos).unwrap(), value);
            }
        }
    }
}
