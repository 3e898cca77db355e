//! Row type

use crate::cell::Cell;

/// A grid row: cells ordered by column, starting at column 1
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// Row index (1-based)
    pub index: usize,
    /// Cells in column order
    pub(crate) cells: Vec<Cell>,
}

impl Row {
    /// Create a row of `cols` default cells
    pub fn new(index: usize, cols: usize) -> Self {
        Self {
            index,
            cells: (1..=cols).map(|col| Cell::new(index, col)).collect(),
        }
    }

    /// Cells in this row
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Get a cell by column index (1-based)
    pub fn cell(&self, col: usize) -> Option<&Cell> {
        col.checked_sub(1).and_then(|i| self.cells.get(i))
    }

    pub(crate) fn cell_mut(&mut self, col: usize) -> Option<&mut Cell> {
        col.checked_sub(1).and_then(move |i| self.cells.get_mut(i))
    }

    /// Append one default cell at the next column index
    pub(crate) fn push_cell(&mut self) {
        let col = self.cells.len() + 1;
        self.cells.push(Cell::new(self.index, col));
    }

    /// Number of cells in this row
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check if row has no cells
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
