//! Selection-driven mutations: merge, unmerge, blank, unblank
//!
//! Each operation validates before touching any cell and recomputes the
//! merge-span index before returning. Clearing the selection afterwards is
//! left to whoever owns it.

use std::collections::BTreeSet;

use crate::cell::{merge_id_for, CellRect};
use crate::error::Result;
use crate::grid::Grid;
use crate::selection::Selection;

impl Grid {
    /// Merge the rectangle described by `selection`
    ///
    /// Any merge group touched by the rectangle is dissolved first, including
    /// its cells outside the rectangle. The new group takes the top-left
    /// cell's sequence number and flags.
    pub fn merge(&mut self, selection: &Selection) -> Result<CellRect> {
        let rect = selection.merge_rect(self)?;

        let stale: BTreeSet<String> = rect
            .cells()
            .filter_map(|id| self.cell_by_id(id))
            .filter_map(|cell| cell.merge_id().map(str::to_owned))
            .collect();
        for merge_id in &stale {
            self.dissolve_group(merge_id);
        }

        let Some(top_left) = self.cell_by_id(rect.start).cloned() else {
            // Selection cells always exist, so the rectangle corner does too
            return Ok(rect);
        };

        let merge_id = merge_id_for(rect.start, rect.end);
        self.join_group(rect, merge_id.clone());
        for id in rect.cells() {
            if let Some(cell) = self.cell_mut(id) {
                cell.sequence_number.clone_from(&top_left.sequence_number);
                cell.blocked = top_left.blocked;
                cell.blank = top_left.blank;
            }
        }
        self.refresh();

        log::debug!(
            "merged {} as {} (dissolved {} group(s))",
            rect,
            merge_id,
            stale.len()
        );
        Ok(rect)
    }

    /// Dissolve the merge group of the first selected cell
    ///
    /// Returns `false` when that cell is not merged.
    pub fn unmerge(&mut self, selection: &Selection) -> bool {
        let merge_id = selection
            .first()
            .and_then(|id| self.cell_by_id(id))
            .and_then(|cell| cell.merge_id().map(str::to_owned));

        let Some(merge_id) = merge_id else {
            return false;
        };
        self.dissolve_group(&merge_id);
        self.refresh();
        log::debug!("unmerged {}", merge_id);
        true
    }

    /// Mark every visible selected cell (and its merge group) as blank
    ///
    /// Returns the number of selected cells the change was applied to.
    pub fn blank(&mut self, selection: &Selection) -> usize {
        self.apply_blank(selection, true)
    }

    /// Clear the blank flag on every visible selected cell and its group
    pub fn unblank(&mut self, selection: &Selection) -> usize {
        self.apply_blank(selection, false)
    }

    fn apply_blank(&mut self, selection: &Selection, blank: bool) -> usize {
        let mut applied = 0;
        for id in selection.iter().copied() {
            if self.is_visible(id) && self.set_cell_blank(id.row, id.col, blank) {
                applied += 1;
            }
        }
        self.refresh();
        log::debug!("set blank={} on {} cell(s)", blank, applied);
        applied
    }
}
