//! Grid statistics handed to the host after every committed change

use serde::{Deserialize, Serialize};

use crate::grid::Grid;

/// Cell counts over visible cells
///
/// Hidden (non-anchor merged) cells are not counted, so a merge group
/// contributes exactly one cell to each count it matches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridStats {
    /// Visible cells
    pub total_cells: usize,
    /// Visible cells flagged as blocked
    pub blocked_cells: usize,
    /// Visible merged cells (one per merge group)
    pub merged_cells: usize,
    /// Visible cells flagged as blank
    pub blank_cells: usize,
}

impl GridStats {
    /// Count the visible cells of a grid
    pub fn collect(grid: &Grid) -> Self {
        grid.visible_cells().fold(Self::default(), |mut stats, cell| {
            stats.total_cells += 1;
            stats.blocked_cells += usize::from(cell.blocked);
            stats.merged_cells += usize::from(cell.is_merged());
            stats.blank_cells += usize::from(cell.blank);
            stats
        })
    }
}
