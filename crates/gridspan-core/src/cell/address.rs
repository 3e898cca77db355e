//! Cell identifiers and rectangles

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// A cell identifier (1-based row and column)
///
/// Displays as `R{row}C{col}`. Parsing also accepts the `row,col` form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId {
    /// Row index (1-based)
    pub row: usize,
    /// Column index (1-based)
    pub col: usize,
}

impl CellId {
    /// Create a new cell id
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Parse a cell id from `R3C4` or `3,4` notation
    ///
    /// # Examples
    /// ```
    /// use gridspan_core::CellId;
    ///
    /// assert_eq!(CellId::parse("R2C5").unwrap(), CellId::new(2, 5));
    /// assert_eq!(CellId::parse("2,5").unwrap(), CellId::new(2, 5));
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::InvalidCellId("empty id".into()));
        }

        let (row_str, col_str) = if let Some((r, c)) = s.split_once(',') {
            (r.trim(), c.trim())
        } else {
            let upper = s.to_ascii_uppercase();
            let rest = upper
                .strip_prefix('R')
                .ok_or_else(|| Error::InvalidCellId(format!("expected R<row>C<col> in '{}'", s)))?;
            let c_pos = rest
                .find('C')
                .ok_or_else(|| Error::InvalidCellId(format!("no column in '{}'", s)))?;
            // Offsets in `upper` line up with `s` since both are ASCII-cased copies
            (&s[1..1 + c_pos], &s[2 + c_pos..])
        };

        let row: usize = row_str
            .parse()
            .map_err(|_| Error::InvalidCellId(format!("invalid row in '{}'", s)))?;
        let col: usize = col_str
            .parse()
            .map_err(|_| Error::InvalidCellId(format!("invalid column in '{}'", s)))?;

        if row == 0 || col == 0 {
            return Err(Error::InvalidCellId(format!(
                "row and column are 1-based in '{}'",
                s
            )));
        }

        Ok(Self { row, col })
    }

    /// Create a rectangle from this cell to another
    pub fn to(&self, other: CellId) -> CellRect {
        CellRect::new(*self, other)
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R{}C{}", self.row, self.col)
    }
}

impl FromStr for CellId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<(usize, usize)> for CellId {
    fn from((row, col): (usize, usize)) -> Self {
        Self::new(row, col)
    }
}

/// A rectangle of cells, always normalized so `start` is top-left
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRect {
    /// Top-left corner
    pub start: CellId,
    /// Bottom-right corner
    pub end: CellId,
}

impl CellRect {
    /// Create a new rectangle from any two opposite corners
    pub fn new(a: CellId, b: CellId) -> Self {
        Self {
            start: CellId::new(a.row.min(b.row), a.col.min(b.col)),
            end: CellId::new(a.row.max(b.row), a.col.max(b.col)),
        }
    }

    /// Create a single-cell rectangle
    pub fn single(id: CellId) -> Self {
        Self { start: id, end: id }
    }

    /// Bounding rectangle of a set of cells, `None` when the set is empty
    pub fn bounding<'a, I>(ids: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a CellId>,
    {
        let mut iter = ids.into_iter();
        let first = *iter.next()?;
        let mut rect = Self::single(first);
        for id in iter {
            rect.start.row = rect.start.row.min(id.row);
            rect.start.col = rect.start.col.min(id.col);
            rect.end.row = rect.end.row.max(id.row);
            rect.end.col = rect.end.col.max(id.col);
        }
        Some(rect)
    }

    /// Check if a cell is within this rectangle
    pub fn contains(&self, id: &CellId) -> bool {
        id.row >= self.start.row
            && id.row <= self.end.row
            && id.col >= self.start.col
            && id.col <= self.end.col
    }

    /// Number of rows in the rectangle
    pub fn row_count(&self) -> usize {
        self.end.row - self.start.row + 1
    }

    /// Number of columns in the rectangle
    pub fn col_count(&self) -> usize {
        self.end.col - self.start.col + 1
    }

    /// Total number of cells in the rectangle
    pub fn cell_count(&self) -> usize {
        self.row_count() * self.col_count()
    }

    /// Iterate over all cell ids in the rectangle (row by row)
    pub fn cells(&self) -> CellRectIter {
        CellRectIter {
            rect: *self,
            current_row: self.start.row,
            current_col: self.start.col,
        }
    }
}

impl fmt::Display for CellRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}:{}", self.start, self.end)
        }
    }
}

/// Iterator over cells in a rectangle
pub struct CellRectIter {
    rect: CellRect,
    current_row: usize,
    current_col: usize,
}

impl Iterator for CellRectIter {
    type Item = CellId;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current_row > self.rect.end.row {
            return None;
        }

        let id = CellId::new(self.current_row, self.current_col);

        self.current_col += 1;
        if self.current_col > self.rect.end.col {
            self.current_col = self.rect.start.col;
            self.current_row += 1;
        }

        Some(id)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.current_row > self.rect.end.row {
            return (0, Some(0));
        }
        let full_rows = self.rect.end.row - self.current_row;
        let remaining =
            full_rows * self.rect.col_count() + (self.rect.end.col - self.current_col + 1);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for CellRectIter {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_id_parse() {
        assert_eq!(CellId::parse("R1C1").unwrap(), CellId::new(1, 1));
        assert_eq!(CellId::parse("r12c3").unwrap(), CellId::new(12, 3));
        assert_eq!(CellId::parse(" 4, 7 ").unwrap(), CellId::new(4, 7));
    }

    #[test]
    fn test_cell_id_parse_errors() {
        assert!(CellId::parse("").is_err());
        assert!(CellId::parse("R1").is_err());
        assert!(CellId::parse("C1").is_err());
        assert!(CellId::parse("R0C1").is_err()); // 1-based
        assert!(CellId::parse("1,x").is_err());
        assert!(CellId::parse("A1").is_err());
    }

    #[test]
    fn test_cell_id_display() {
        assert_eq!(CellId::new(3, 10).to_string(), "R3C10");
        assert_eq!(CellId::new(3, 10).to(CellId::new(1, 1)).to_string(), "R1C1:R3C10");
    }

    #[test]
    fn test_rect_normalizes() {
        let rect = CellRect::new(CellId::new(4, 1), CellId::new(2, 3));
        assert_eq!(rect.start, CellId::new(2, 1));
        assert_eq!(rect.end, CellId::new(4, 3));
        assert_eq!(rect.row_count(), 3);
        assert_eq!(rect.col_count(), 3);
        assert_eq!(rect.cell_count(), 9);
    }

    #[test]
    fn test_bounding() {
        let ids = [CellId::new(2, 5), CellId::new(1, 3), CellId::new(3, 4)];
        let rect = CellRect::bounding(&ids).unwrap();
        assert_eq!(rect, CellRect::new(CellId::new(1, 3), CellId::new(3, 5)));
        let empty: [CellId; 0] = [];
        assert!(CellRect::bounding(&empty).is_none());
    }

    #[test]
    fn test_rect_iterator() {
        let rect = CellId::new(1, 1).to(CellId::new(2, 2));
        let cells: Vec<_> = rect.cells().collect();

        assert_eq!(
            cells,
            vec![
                CellId::new(1, 1),
                CellId::new(1, 2),
                CellId::new(2, 1),
                CellId::new(2, 2),
            ]
        );
        assert_eq!(rect.cells().len(), 4);
    }
}
