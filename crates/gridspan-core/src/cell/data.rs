//! Cell data

use super::CellId;

/// Placeholder shown in cells that have no sequence number yet
pub const EMPTY_SEQUENCE: &str = "-";

/// Identifier shared by every cell of one merge group
pub type MergeId = String;

/// Build the merge id for a rectangle from its corner coordinates
pub fn merge_id_for(start: CellId, end: CellId) -> MergeId {
    format!("merge-{}-{}-{}-{}", start.row, start.col, end.row, end.col)
}

/// Parse a sequence number as a base-10 integer with an optional sign
///
/// Anything else (including `"-"` and empty strings) is not a number.
pub fn parse_sequence(value: &str) -> Option<i64> {
    let digits = value
        .strip_prefix('-')
        .or_else(|| value.strip_prefix('+'))
        .unwrap_or(value);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse().ok()
}

/// A single grid cell
///
/// The merge flag is derived from `merge_id`, so a cell can never be flagged
/// as merged without an id (or carry an id while unmerged).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    /// Position (1-based)
    pub id: CellId,
    /// Display value, may or may not be an integer
    pub sequence_number: String,
    /// Blocked flag, independent of the value
    pub blocked: bool,
    /// Hidden-but-present flag
    pub blank: bool,
    /// Merge group this cell belongs to
    merge_id: Option<MergeId>,
}

impl Cell {
    /// Create a default cell at the given position
    pub fn new(row: usize, col: usize) -> Self {
        Self {
            id: CellId::new(row, col),
            sequence_number: EMPTY_SEQUENCE.to_string(),
            blocked: false,
            blank: false,
            merge_id: None,
        }
    }

    /// Row index (1-based)
    pub fn row(&self) -> usize {
        self.id.row
    }

    /// Column index (1-based)
    pub fn col(&self) -> usize {
        self.id.col
    }

    /// Whether the cell belongs to a merge group
    pub fn is_merged(&self) -> bool {
        self.merge_id.is_some()
    }

    /// Merge group id, if merged
    pub fn merge_id(&self) -> Option<&str> {
        self.merge_id.as_deref()
    }

    /// The sequence number as an integer, if it parses as one
    pub fn sequence_value(&self) -> Option<i64> {
        parse_sequence(&self.sequence_number)
    }

    /// Whether the cell carries only default values
    pub fn is_default(&self) -> bool {
        self.sequence_number == EMPTY_SEQUENCE && !self.blocked && !self.blank && !self.is_merged()
    }

    // Merge membership is owned by the grid so its group index stays in sync.
    pub(crate) fn set_merge_id(&mut self, merge_id: Option<MergeId>) {
        self.merge_id = merge_id.filter(|id| !id.is_empty());
    }
}
