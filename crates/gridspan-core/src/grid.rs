//! Grid type - the ground truth of the editor

use ahash::AHashMap;

use crate::cell::{Cell, CellId, CellRect, MergeId};
use crate::error::{Axis, Error, Result};
use crate::row::Row;
use crate::span::MergeSpans;
use crate::stats::GridStats;
use crate::{MAX_DIMENSION, MIN_DIMENSION};

/// Check that a row or column count lies in `[MIN_DIMENSION, MAX_DIMENSION]`
pub fn validate_dimension(value: usize) -> Result<usize> {
    if (MIN_DIMENSION..=MAX_DIMENSION).contains(&value) {
        Ok(value)
    } else {
        Err(Error::InvalidDimension(format!(
            "{} is outside {}..={}",
            value, MIN_DIMENSION, MAX_DIMENSION
        )))
    }
}

/// Parse a user-entered row or column count
///
/// # Examples
/// ```
/// use gridspan_core::parse_dimension;
///
/// assert_eq!(parse_dimension(" 12 ").unwrap(), 12);
/// assert!(parse_dimension("101").is_err());
/// assert!(parse_dimension("ten").is_err());
/// ```
pub fn parse_dimension(input: &str) -> Result<usize> {
    let trimmed = input.trim();
    let value: usize = trimmed
        .parse()
        .map_err(|_| Error::InvalidDimension(format!("'{}' is not a number", trimmed)))?;
    validate_dimension(value)
}

/// A rectangular grid of cells
///
/// Besides the rows themselves the grid keeps two derived structures:
/// the [`MergeSpans`] index, recomputed after every mutation, and a
/// `merge id -> cells` index used to propagate changes across a group.
#[derive(Debug, Clone)]
pub struct Grid {
    /// Rows in index order
    rows: Vec<Row>,
    /// Number of cells in every row
    column_count: usize,
    /// Derived merge spans
    spans: MergeSpans,
    /// Members of each merge group
    groups: AHashMap<MergeId, Vec<CellId>>,
}

impl Grid {
    /// Create a grid of default cells
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        validate_dimension(rows)?;
        validate_dimension(cols)?;
        Ok(Self::from_rows((1..=rows).map(|r| Row::new(r, cols)).collect(), cols))
    }

    /// Build a grid from already-shaped rows and derive its indexes
    pub(crate) fn from_rows(rows: Vec<Row>, column_count: usize) -> Self {
        let mut grid = Self {
            rows,
            column_count,
            spans: MergeSpans::default(),
            groups: AHashMap::new(),
        };
        grid.rebuild_groups();
        grid.refresh();
        grid
    }

    /// Number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.column_count
    }

    /// All rows
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Get a row by index (1-based)
    pub fn row(&self, index: usize) -> Option<&Row> {
        index.checked_sub(1).and_then(|i| self.rows.get(i))
    }

    /// Get a cell by row and column (1-based)
    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.row(row).and_then(|r| r.cell(col))
    }

    /// Get a cell by id
    pub fn cell_by_id(&self, id: CellId) -> Option<&Cell> {
        self.cell(id.row, id.col)
    }

    /// Iterate over every cell, hidden ones included, row by row
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.rows.iter().flat_map(|r| r.cells().iter())
    }

    /// Iterate over cells that are not hidden by a merge
    pub fn visible_cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells().filter(move |c| !self.spans.is_hidden(c))
    }

    /// The merge-span index
    pub fn spans(&self) -> &MergeSpans {
        &self.spans
    }

    /// Cells sharing a merge id
    pub fn group_members(&self, merge_id: &str) -> &[CellId] {
        self.groups
            .get(merge_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Whether the cell exists and is hidden by a merge
    pub fn is_hidden(&self, id: CellId) -> bool {
        self.cell_by_id(id)
            .map_or(false, |cell| self.spans.is_hidden(cell))
    }

    /// Whether the cell exists and is not hidden
    pub fn is_visible(&self, id: CellId) -> bool {
        self.cell_by_id(id)
            .map_or(false, |cell| !self.spans.is_hidden(cell))
    }

    /// Whether autofill may write to the cell: exists, not blank, not hidden
    pub fn is_fillable(&self, id: CellId) -> bool {
        self.cell_by_id(id)
            .map_or(false, |cell| !cell.blank && !self.spans.is_hidden(cell))
    }

    /// Anchor of the merge group the cell belongs to
    pub fn anchor_of(&self, id: CellId) -> Option<CellId> {
        self.cell_by_id(id)
            .and_then(|cell| self.spans.span_for(cell))
            .map(|span| span.anchor())
    }

    /// Statistics over visible cells
    pub fn stats(&self) -> GridStats {
        GridStats::collect(self)
    }

    /// Append one row of default cells
    pub fn add_row(&mut self) -> Result<()> {
        if self.rows.len() + 1 > MAX_DIMENSION {
            return Err(Error::DimensionLimitExceeded {
                axis: Axis::Rows,
                limit: MAX_DIMENSION,
            });
        }
        let index = self.rows.len() + 1;
        self.rows.push(Row::new(index, self.column_count));
        self.refresh();
        log::debug!("added row {}", index);
        Ok(())
    }

    /// Append one column of default cells to every row
    pub fn add_column(&mut self) -> Result<()> {
        if self.column_count + 1 > MAX_DIMENSION {
            return Err(Error::DimensionLimitExceeded {
                axis: Axis::Columns,
                limit: MAX_DIMENSION,
            });
        }
        for row in &mut self.rows {
            row.push_cell();
        }
        self.column_count += 1;
        self.refresh();
        log::debug!("added column {}", self.column_count);
        Ok(())
    }

    /// Set a cell's sequence number, propagating across its merge group
    ///
    /// Returns `false` (and changes nothing) when the cell does not exist.
    pub fn set_cell_value<V: Into<String>>(&mut self, row: usize, col: usize, value: V) -> bool {
        let value = value.into();
        self.update_group(CellId::new(row, col), |cell| {
            cell.sequence_number.clone_from(&value);
        })
    }

    /// Set a cell's blocked flag, propagating across its merge group
    pub fn set_cell_blocked(&mut self, row: usize, col: usize, blocked: bool) -> bool {
        self.update_group(CellId::new(row, col), |cell| cell.blocked = blocked)
    }

    /// Flip a cell's blocked flag, propagating across its merge group
    pub fn toggle_blocked(&mut self, row: usize, col: usize) -> bool {
        match self.cell(row, col) {
            Some(cell) => {
                let blocked = !cell.blocked;
                self.set_cell_blocked(row, col, blocked)
            }
            None => false,
        }
    }

    /// Set a cell's blank flag, propagating across its merge group
    pub fn set_cell_blank(&mut self, row: usize, col: usize, blank: bool) -> bool {
        self.update_group(CellId::new(row, col), |cell| cell.blank = blank)
    }

    /// Apply `apply` to the cell and, if merged, to every member of its group
    pub(crate) fn update_group<F>(&mut self, id: CellId, mut apply: F) -> bool
    where
        F: FnMut(&mut Cell),
    {
        let merge_id = match self.cell_by_id(id) {
            Some(cell) => cell.merge_id().map(str::to_owned),
            None => return false,
        };

        match merge_id.as_deref().and_then(|m| self.groups.get(m)) {
            Some(members) => {
                for member in members {
                    if let Some(cell) = cell_in(&mut self.rows, *member) {
                        apply(cell);
                    }
                }
            }
            None => {
                if let Some(cell) = cell_in(&mut self.rows, id) {
                    apply(cell);
                }
            }
        }
        true
    }

    /// Remove a merge group, leaving its cells unmerged
    pub(crate) fn dissolve_group(&mut self, merge_id: &str) {
        let Some(members) = self.groups.remove(merge_id) else {
            return;
        };
        for member in members {
            if let Some(cell) = cell_in(&mut self.rows, member) {
                cell.set_merge_id(None);
            }
        }
    }

    /// Tag every cell of `rect` with `merge_id`
    ///
    /// Cells must already be free of any other group.
    pub(crate) fn join_group(&mut self, rect: CellRect, merge_id: MergeId) {
        let mut members = Vec::with_capacity(rect.cell_count());
        for id in rect.cells() {
            if let Some(cell) = cell_in(&mut self.rows, id) {
                cell.set_merge_id(Some(merge_id.clone()));
                members.push(id);
            }
        }
        self.groups.insert(merge_id, members);
    }

    pub(crate) fn cell_mut(&mut self, id: CellId) -> Option<&mut Cell> {
        cell_in(&mut self.rows, id)
    }

    /// Recompute the merge-span index from the cells
    pub(crate) fn refresh(&mut self) {
        self.spans = MergeSpans::compute(&self.rows);
    }

    fn rebuild_groups(&mut self) {
        self.groups.clear();
        for cell in self.rows.iter().flat_map(|r| r.cells().iter()) {
            if let Some(merge_id) = cell.merge_id() {
                self.groups
                    .entry(merge_id.to_string())
                    .or_default()
                    .push(cell.id);
            }
        }
    }
}

impl PartialEq for Grid {
    fn eq(&self, other: &Self) -> bool {
        // Indexes are derived from the rows
        self.column_count == other.column_count && self.rows == other.rows
    }
}

impl Eq for Grid {}

fn cell_in(rows: &mut [Row], id: CellId) -> Option<&mut Cell> {
    id.row
        .checked_sub(1)
        .and_then(move |i| rows.get_mut(i))
        .and_then(|row| row.cell_mut(id.col))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::merge_id_for;

    fn merged_grid() -> Grid {
        let mut grid = Grid::new(3, 3).unwrap();
        let rect = CellId::new(1, 1).to(CellId::new(2, 2));
        grid.join_group(rect, merge_id_for(rect.start, rect.end));
        grid.refresh();
        grid
    }

    #[test]
    fn test_new_grid() {
        let grid = Grid::new(3, 4).unwrap();
        assert_eq!(grid.row_count(), 3);
        assert_eq!(grid.column_count(), 4);
        assert_eq!(grid.cells().count(), 12);
        assert!(grid.cells().all(Cell::is_default));
        assert!(grid.spans().is_empty());

        for (r, row) in grid.rows().iter().enumerate() {
            assert_eq!(row.index, r + 1);
            for (c, cell) in row.cells().iter().enumerate() {
                assert_eq!(cell.id, CellId::new(r + 1, c + 1));
            }
        }
    }

    #[test]
    fn test_dimension_bounds() {
        assert!(Grid::new(1, 1).is_ok());
        assert!(Grid::new(100, 100).is_ok());
        assert!(matches!(Grid::new(0, 5), Err(Error::InvalidDimension(_))));
        assert!(matches!(Grid::new(5, 101), Err(Error::InvalidDimension(_))));
    }

    #[test]
    fn test_parse_dimension() {
        assert_eq!(parse_dimension("1").unwrap(), 1);
        assert_eq!(parse_dimension("100").unwrap(), 100);
        assert!(parse_dimension("0").is_err());
        assert!(parse_dimension("101").is_err());
        assert!(parse_dimension("-3").is_err());
        assert!(parse_dimension("").is_err());
    }

    #[test]
    fn test_add_row_and_column() {
        let mut grid = Grid::new(2, 2).unwrap();
        grid.add_row().unwrap();
        grid.add_column().unwrap();

        assert_eq!(grid.row_count(), 3);
        assert_eq!(grid.column_count(), 3);
        assert!(grid.rows().iter().all(|r| r.len() == 3));
        assert_eq!(grid.cell(3, 3).unwrap().id, CellId::new(3, 3));
        assert_eq!(grid.cell(1, 3).unwrap().id, CellId::new(1, 3));
    }

    #[test]
    fn test_add_beyond_limit() {
        let mut grid = Grid::new(100, 100).unwrap();
        assert_eq!(
            grid.add_row(),
            Err(Error::DimensionLimitExceeded {
                axis: Axis::Rows,
                limit: 100
            })
        );
        assert_eq!(
            grid.add_column(),
            Err(Error::DimensionLimitExceeded {
                axis: Axis::Columns,
                limit: 100
            })
        );
        assert_eq!(grid.row_count(), 100);
        assert_eq!(grid.column_count(), 100);
    }

    #[test]
    fn test_add_column_keeps_spans() {
        let mut grid = merged_grid();
        let before = grid.spans().clone();
        grid.add_column().unwrap();
        assert_eq!(grid.spans(), &before);
        assert!(grid.rows().iter().all(|r| r.cell(4).unwrap().is_default()));
    }

    #[test]
    fn test_set_value_propagates() {
        let mut grid = merged_grid();
        assert!(grid.set_cell_value(1, 1, "42"));

        for id in CellId::new(1, 1).to(CellId::new(2, 2)).cells() {
            assert_eq!(grid.cell_by_id(id).unwrap().sequence_number, "42");
        }
        assert_eq!(grid.cell(3, 3).unwrap().sequence_number, "-");
    }

    #[test]
    fn test_set_value_through_hidden_cell_propagates() {
        let mut grid = merged_grid();
        assert!(grid.set_cell_value(2, 2, "7"));
        assert_eq!(grid.cell(1, 1).unwrap().sequence_number, "7");
    }

    #[test]
    fn test_toggle_blocked() {
        let mut grid = merged_grid();
        assert!(grid.toggle_blocked(1, 1));
        assert!(grid.cell(2, 1).unwrap().blocked);
        assert!(grid.toggle_blocked(2, 1));
        assert!(!grid.cell(1, 1).unwrap().blocked);
    }

    #[test]
    fn test_missing_coordinates_are_noops() {
        let mut grid = Grid::new(2, 2).unwrap();
        let before = grid.clone();

        assert!(!grid.set_cell_value(5, 1, "1"));
        assert!(!grid.set_cell_value(0, 1, "1"));
        assert!(!grid.set_cell_blocked(1, 9, true));
        assert!(!grid.toggle_blocked(3, 3));
        assert_eq!(grid, before);
    }

    #[test]
    fn test_visibility_queries() {
        let grid = merged_grid();
        assert!(grid.is_visible(CellId::new(1, 1)));
        assert!(grid.is_hidden(CellId::new(1, 2)));
        assert!(!grid.is_visible(CellId::new(1, 2)));
        assert!(!grid.is_visible(CellId::new(9, 9)));
        assert_eq!(grid.anchor_of(CellId::new(2, 2)), Some(CellId::new(1, 1)));
        assert_eq!(grid.anchor_of(CellId::new(3, 3)), None);
        assert_eq!(grid.visible_cells().count(), 6);
        assert_eq!(grid.group_members("merge-1-1-2-2").len(), 4);
    }
}
