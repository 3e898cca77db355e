//! Merge-span index
//!
//! Spans are derived from the per-cell merge tags and never patched in
//! place. The grid recomputes the whole index after every mutation that can
//! change merge membership or shape.

use std::collections::BTreeMap;

use crate::cell::{Cell, CellId, CellRect, MergeId};
use crate::row::Row;

/// Bounding box of one merge group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeSpan {
    /// Row of the top-left (anchor) cell
    pub anchor_row: usize,
    /// Column of the top-left (anchor) cell
    pub anchor_col: usize,
    /// Number of rows covered
    pub row_span: usize,
    /// Number of columns covered
    pub col_span: usize,
}

impl MergeSpan {
    /// The anchor cell id
    pub fn anchor(&self) -> CellId {
        CellId::new(self.anchor_row, self.anchor_col)
    }

    /// The covered rectangle
    pub fn rect(&self) -> CellRect {
        CellRect::new(
            self.anchor(),
            CellId::new(
                self.anchor_row + self.row_span - 1,
                self.anchor_col + self.col_span - 1,
            ),
        )
    }

    fn from_rect(rect: CellRect) -> Self {
        Self {
            anchor_row: rect.start.row,
            anchor_col: rect.start.col,
            row_span: rect.row_count(),
            col_span: rect.col_count(),
        }
    }
}

/// All merge spans of a grid, keyed by merge id
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeSpans {
    spans: BTreeMap<MergeId, MergeSpan>,
}

impl MergeSpans {
    /// Derive spans from the cells of `rows`
    ///
    /// Each span is the bounding box of the cells sharing a merge id. The box
    /// is not checked for being completely filled by the group.
    pub fn compute(rows: &[Row]) -> Self {
        let mut bounds: BTreeMap<MergeId, CellRect> = BTreeMap::new();

        for cell in rows.iter().flat_map(|row| row.cells()) {
            let Some(merge_id) = cell.merge_id() else {
                continue;
            };
            bounds
                .entry(merge_id.to_string())
                .and_modify(|rect| {
                    rect.start.row = rect.start.row.min(cell.row());
                    rect.start.col = rect.start.col.min(cell.col());
                    rect.end.row = rect.end.row.max(cell.row());
                    rect.end.col = rect.end.col.max(cell.col());
                })
                .or_insert_with(|| CellRect::single(cell.id));
        }

        Self {
            spans: bounds
                .into_iter()
                .map(|(id, rect)| (id, MergeSpan::from_rect(rect)))
                .collect(),
        }
    }

    /// Span for a merge id
    pub fn get(&self, merge_id: &str) -> Option<&MergeSpan> {
        self.spans.get(merge_id)
    }

    /// Span the cell belongs to, if it is merged
    pub fn span_for(&self, cell: &Cell) -> Option<&MergeSpan> {
        cell.merge_id().and_then(|id| self.spans.get(id))
    }

    /// A cell is hidden when it is merged and not its span's anchor
    pub fn is_hidden(&self, cell: &Cell) -> bool {
        self.span_for(cell)
            .map_or(false, |span| span.anchor() != cell.id)
    }

    /// Whether the cell is the anchor of a merge span
    pub fn is_anchor(&self, cell: &Cell) -> bool {
        self.span_for(cell)
            .map_or(false, |span| span.anchor() == cell.id)
    }

    /// Rendered `(row_span, col_span)` of a cell: the full span for an
    /// anchor, `(1, 1)` for everything else
    pub fn span_of(&self, cell: &Cell) -> (usize, usize) {
        match self.span_for(cell) {
            Some(span) if span.anchor() == cell.id => (span.row_span, span.col_span),
            _ => (1, 1),
        }
    }

    /// Number of merge groups
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    /// Check if there are no merge groups
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Iterate over `(merge_id, span)` pairs in merge id order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &MergeSpan)> {
        self.spans.iter().map(|(id, span)| (id.as_str(), span))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn rows_with_group(rows: usize, cols: usize, merge_id: &str, rect: CellRect) -> Vec<Row> {
        let mut out: Vec<Row> = (1..=rows).map(|r| Row::new(r, cols)).collect();
        for id in rect.cells() {
            if let Some(cell) = out[id.row - 1].cell_mut(id.col) {
                cell.set_merge_id(Some(merge_id.to_string()));
            }
        }
        out
    }

    #[test]
    fn test_compute_bounding_box() {
        let rect = CellId::new(2, 2).to(CellId::new(3, 4));
        let rows = rows_with_group(4, 4, "g", rect);

        let spans = MergeSpans::compute(&rows);
        assert_eq!(spans.len(), 1);
        assert_eq!(
            spans.get("g").copied(),
            Some(MergeSpan {
                anchor_row: 2,
                anchor_col: 2,
                row_span: 2,
                col_span: 3,
            })
        );
        assert_eq!(spans.get("g").unwrap().rect(), rect);
    }

    #[test]
    fn test_hidden_and_span_of() {
        let rows = rows_with_group(3, 3, "g", CellId::new(1, 1).to(CellId::new(2, 2)));
        let spans = MergeSpans::compute(&rows);

        let anchor = rows[0].cell(1).unwrap();
        assert!(!spans.is_hidden(anchor));
        assert!(spans.is_anchor(anchor));
        assert_eq!(spans.span_of(anchor), (2, 2));

        let hidden = rows[1].cell(2).unwrap();
        assert!(spans.is_hidden(hidden));
        assert_eq!(spans.span_of(hidden), (1, 1));

        let plain = rows[2].cell(3).unwrap();
        assert!(!spans.is_hidden(plain));
        assert_eq!(spans.span_of(plain), (1, 1));

        let hidden_count = rows
            .iter()
            .flat_map(|r| r.cells())
            .filter(|c| spans.is_hidden(c))
            .count();
        assert_eq!(hidden_count, 3);
    }

    #[test]
    fn test_compute_is_pure() {
        let rows = rows_with_group(5, 5, "x", CellId::new(3, 1).to(CellId::new(5, 2)));
        assert_eq!(MergeSpans::compute(&rows), MergeSpans::compute(&rows));
    }

    #[test]
    fn test_non_rectangular_tags_do_not_panic() {
        let mut rows: Vec<Row> = (1..=3).map(|r| Row::new(r, 3)).collect();
        for (r, c) in [(1, 1), (2, 2), (3, 3)] {
            rows[r - 1]
                .cell_mut(c)
                .unwrap()
                .set_merge_id(Some("diag".into()));
        }

        let spans = MergeSpans::compute(&rows);
        let span = spans.get("diag").unwrap();
        assert_eq!((span.row_span, span.col_span), (3, 3));
    }
}
