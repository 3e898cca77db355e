// Property-based tests for the grid model under random edit sequences.
// CI: 128 cases (default). Soak: PROPTEST_CASES=10000 cargo test --release

use std::collections::BTreeMap;

use gridspan::{AutofillEngine, CellId, CellRect, Grid, MergeSpans, Selection};
use proptest::prelude::*;

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

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
enum Edit {
    Merge(CellId, CellId),
    Unmerge(CellId),
    Blank(CellId, CellId),
    Unblank(CellId, CellId),
    SetValue(CellId, String),
    ToggleBlocked(CellId),
    Fill(CellId, CellId),
    AddRow,
    AddColumn,
}

/// Coordinates may fall one past the grid edge, to exercise the no-op path
fn arb_cell() -> impl Strategy<Value = CellId> {
    (1usize..=7, 1usize..=7).prop_map(|(r, c)| CellId::new(r, c))
}

fn arb_value() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => (-50i64..50).prop_map(|n| n.to_string()),
        1 => Just("-".to_string()),
        1 => r"[a-z]{1,4}",
    ]
}

fn arb_edit() -> impl Strategy<Value = Edit> {
    prop_oneof![
        4 => (arb_cell(), arb_cell()).prop_map(|(a, b)| Edit::Merge(a, b)),
        1 => arb_cell().prop_map(Edit::Unmerge),
        2 => (arb_cell(), arb_cell()).prop_map(|(a, b)| Edit::Blank(a, b)),
        1 => (arb_cell(), arb_cell()).prop_map(|(a, b)| Edit::Unblank(a, b)),
        3 => (arb_cell(), arb_value()).prop_map(|(c, v)| Edit::SetValue(c, v)),
        1 => arb_cell().prop_map(Edit::ToggleBlocked),
        2 => (arb_cell(), arb_cell()).prop_map(|(a, b)| Edit::Fill(a, b)),
        1 => Just(Edit::AddRow),
        1 => Just(Edit::AddColumn),
    ]
}

fn arb_session() -> impl Strategy<Value = (usize, usize, Vec<Edit>)> {
    (1usize..=6, 1usize..=6, prop::collection::vec(arb_edit(), 0..24))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn rect_selection(grid: &Grid, a: CellId, b: CellId) -> Selection {
    Selection::of(grid, CellRect::new(a, b).cells())
}

fn apply(grid: &mut Grid, edit: &Edit) {
    match edit {
        Edit::Merge(a, b) => {
            let before = grid.clone();
            let selection = rect_selection(grid, *a, *b);
            if grid.merge(&selection).is_err() {
                assert_eq!(*grid, before, "failed merge mutated the grid");
            }
        }
        Edit::Unmerge(c) => {
            let selection = Selection::of(grid, [*c]);
            grid.unmerge(&selection);
        }
        Edit::Blank(a, b) => {
            let selection = rect_selection(grid, *a, *b);
            grid.blank(&selection);
        }
        Edit::Unblank(a, b) => {
            let selection = rect_selection(grid, *a, *b);
            grid.unblank(&selection);
        }
        Edit::SetValue(c, v) => {
            grid.set_cell_value(c.row, c.col, v.clone());
        }
        Edit::ToggleBlocked(c) => {
            grid.toggle_blocked(c.row, c.col);
        }
        Edit::Fill(source, target) => {
            let mut engine = AutofillEngine::new();
            if engine.begin(grid, *source) {
                engine.update(*target);
                engine.commit(grid);
            }
        }
        Edit::AddRow => {
            let _ = grid.add_row();
        }
        Edit::AddColumn => {
            let _ = grid.add_column();
        }
    }
}

/// Cells grouped by merge id
fn groups(grid: &Grid) -> BTreeMap<String, Vec<CellId>> {
    let mut groups: BTreeMap<String, Vec<CellId>> = BTreeMap::new();
    for cell in grid.cells() {
        if let Some(id) = cell.merge_id() {
            groups.entry(id.to_string()).or_default().push(cell.id);
        }
    }
    groups
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config())]

    #[test]
    fn span_index_is_pure_and_current((rows, cols, edits) in arb_session()) {
        let mut grid = Grid::new(rows, cols).unwrap();
        for edit in &edits {
            apply(&mut grid, edit);

            let first = MergeSpans::compute(grid.rows());
            let second = MergeSpans::compute(grid.rows());
            prop_assert_eq!(&first, &second);
            prop_assert_eq!(&first, grid.spans());
        }
    }

    #[test]
    fn merge_groups_share_values((rows, cols, edits) in arb_session()) {
        let mut grid = Grid::new(rows, cols).unwrap();
        for edit in &edits {
            apply(&mut grid, edit);

            for (merge_id, members) in groups(&grid) {
                let first = grid.cell_by_id(members[0]).unwrap();
                for id in &members[1..] {
                    let cell = grid.cell_by_id(*id).unwrap();
                    prop_assert_eq!(&cell.sequence_number, &first.sequence_number, "{} after {:?}", merge_id, edit);
                    prop_assert_eq!(cell.blocked, first.blocked, "{} after {:?}", merge_id, edit);
                    prop_assert_eq!(cell.blank, first.blank, "{} after {:?}", merge_id, edit);
                }
            }
        }
    }

    #[test]
    fn hidden_cells_per_group((rows, cols, edits) in arb_session()) {
        let mut grid = Grid::new(rows, cols).unwrap();
        for edit in &edits {
            apply(&mut grid, edit);
        }

        let groups = groups(&grid);
        prop_assert_eq!(groups.len(), grid.spans().len());
        for (merge_id, members) in &groups {
            let span = grid.spans().get(merge_id).unwrap();
            let hidden = members.iter().filter(|id| grid.is_hidden(**id)).count();
            prop_assert_eq!(hidden, span.row_span * span.col_span - 1);
            prop_assert!(!grid.is_hidden(span.anchor()));
        }
    }

    #[test]
    fn grid_stays_rectangular((rows, cols, edits) in arb_session()) {
        let mut grid = Grid::new(rows, cols).unwrap();
        for edit in &edits {
            apply(&mut grid, edit);
        }

        prop_assert_eq!(grid.rows().len(), grid.row_count());
        for (r, row) in grid.rows().iter().enumerate() {
            prop_assert_eq!(row.index, r + 1);
            prop_assert_eq!(row.len(), grid.column_count());
            for (c, cell) in row.cells().iter().enumerate() {
                prop_assert_eq!(cell.id, CellId::new(r + 1, c + 1));
            }
        }
    }

    #[test]
    fn snapshot_restores_grid((rows, cols, edits) in arb_session()) {
        let mut grid = Grid::new(rows, cols).unwrap();
        for edit in &edits {
            apply(&mut grid, edit);
        }

        let json = grid.snapshot().to_json();
        let restored = Grid::load_or_create(Some(&json), 1, 1).unwrap();
        prop_assert_eq!(&restored, &grid);
        prop_assert_eq!(restored.stats(), grid.stats());
    }
}
