//! Plain serializable snapshot exchanged with the external store
//!
//! Loading is lenient about fields (missing flags default to `false`, a
//! missing sequence number to `"-"`, stored indices are ignored) but strict
//! about shape: an empty or ragged table is rejected.

use serde::{Deserialize, Deserializer, Serialize};

use crate::cell::{Cell, EMPTY_SEQUENCE};
use crate::error::{Error, Result};
use crate::grid::Grid;
use crate::row::Row;
use crate::MAX_DIMENSION;

/// Whole-grid snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridSnapshot {
    #[serde(default)]
    pub rows: usize,
    #[serde(default)]
    pub columns: usize,
    #[serde(default)]
    pub table_rows: Vec<RowSnapshot>,
}

/// One row of a snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowSnapshot {
    #[serde(default)]
    pub row_index: usize,
    #[serde(default)]
    pub cells: Vec<CellSnapshot>,
}

/// One cell of a snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellSnapshot {
    #[serde(default = "default_sequence", deserialize_with = "lenient_sequence")]
    pub sequence_number: String,
    #[serde(default)]
    pub is_blocked: bool,
    #[serde(default)]
    pub is_merged: bool,
    #[serde(default)]
    pub merge_id: String,
    #[serde(default)]
    pub is_blank: bool,
    #[serde(default)]
    pub row_index: usize,
    #[serde(default)]
    pub column_index: usize,
}

impl Default for CellSnapshot {
    fn default() -> Self {
        Self {
            sequence_number: default_sequence(),
            is_blocked: false,
            is_merged: false,
            merge_id: String::new(),
            is_blank: false,
            row_index: 0,
            column_index: 0,
        }
    }
}

fn default_sequence() -> String {
    EMPTY_SEQUENCE.to_string()
}

/// Accept a string, an integer, or null for the sequence number
fn lenient_sequence<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Text(String),
        Integer(i64),
    }

    Ok(match Option::<Repr>::deserialize(deserializer)? {
        Some(Repr::Text(text)) => text,
        Some(Repr::Integer(n)) => n.to_string(),
        None => default_sequence(),
    })
}

impl From<&Cell> for CellSnapshot {
    fn from(cell: &Cell) -> Self {
        Self {
            sequence_number: cell.sequence_number.clone(),
            is_blocked: cell.blocked,
            is_merged: cell.is_merged(),
            merge_id: cell.merge_id().unwrap_or_default().to_string(),
            is_blank: cell.blank,
            row_index: cell.row(),
            column_index: cell.col(),
        }
    }
}

impl GridSnapshot {
    /// Parse a snapshot from the store's JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::MalformedSnapshot(e.to_string()))
    }

    /// Serialize to the store's JSON string
    pub fn to_json(&self) -> String {
        // Plain structs of strings, integers and booleans always serialize
        serde_json::to_string(self).unwrap_or_default()
    }
}

impl From<&Grid> for GridSnapshot {
    fn from(grid: &Grid) -> Self {
        Self {
            rows: grid.row_count(),
            columns: grid.column_count(),
            table_rows: grid
                .rows()
                .iter()
                .map(|row| RowSnapshot {
                    row_index: row.index,
                    cells: row.cells().iter().map(CellSnapshot::from).collect(),
                })
                .collect(),
        }
    }
}

impl Grid {
    /// Take a snapshot of the grid
    pub fn snapshot(&self) -> GridSnapshot {
        GridSnapshot::from(self)
    }

    /// Rebuild a grid from a snapshot
    ///
    /// Row and column indices are re-derived from array positions. The
    /// declared `rows`/`columns` must match the table, every row must have
    /// the same non-zero length, and neither count may exceed the
    /// dimension ceiling.
    pub fn from_snapshot(snapshot: &GridSnapshot) -> Result<Self> {
        let row_count = snapshot.table_rows.len();
        let column_count = snapshot.table_rows.first().map_or(0, |r| r.cells.len());

        if row_count == 0 || column_count == 0 || snapshot.rows == 0 || snapshot.columns == 0 {
            return Err(Error::MalformedSnapshot(format!(
                "empty grid ({} x {} declared, {} x {} present)",
                snapshot.rows, snapshot.columns, row_count, column_count
            )));
        }
        if snapshot.rows != row_count || snapshot.columns != column_count {
            return Err(Error::MalformedSnapshot(format!(
                "declared {} x {} but table is {} x {}",
                snapshot.rows, snapshot.columns, row_count, column_count
            )));
        }
        if row_count > MAX_DIMENSION || column_count > MAX_DIMENSION {
            return Err(Error::MalformedSnapshot(format!(
                "{} x {} exceeds {} x {}",
                row_count, column_count, MAX_DIMENSION, MAX_DIMENSION
            )));
        }
        if let Some((i, row)) = snapshot
            .table_rows
            .iter()
            .enumerate()
            .find(|(_, r)| r.cells.len() != column_count)
        {
            return Err(Error::MalformedSnapshot(format!(
                "row {} has {} cells, expected {}",
                i + 1,
                row.cells.len(),
                column_count
            )));
        }

        let rows = snapshot
            .table_rows
            .iter()
            .enumerate()
            .map(|(r, row_snapshot)| {
                let index = r + 1;
                let cells = row_snapshot
                    .cells
                    .iter()
                    .enumerate()
                    .map(|(c, stored)| {
                        let mut cell = Cell::new(index, c + 1);
                        cell.sequence_number.clone_from(&stored.sequence_number);
                        cell.blocked = stored.is_blocked;
                        cell.blank = stored.is_blank;
                        if stored.is_merged {
                            cell.set_merge_id(Some(stored.merge_id.clone()));
                        }
                        cell
                    })
                    .collect();
                Row { index, cells }
            })
            .collect();

        Ok(Self::from_rows(rows, column_count))
    }

    /// Load the stored grid, or create a fresh one when there is none
    ///
    /// An absent or empty string creates a `rows x cols` grid. A stored
    /// string that fails to load is logged and also replaced by a fresh
    /// grid. Only an invalid fallback size is an error.
    pub fn load_or_create(stored: Option<&str>, rows: usize, cols: usize) -> Result<Self> {
        match stored.map(str::trim).filter(|s| !s.is_empty()) {
            Some(json) => match GridSnapshot::from_json(json).and_then(|s| Self::from_snapshot(&s)) {
                Ok(grid) => Ok(grid),
                Err(err) => {
                    log::warn!("discarding stored grid: {}", err);
                    Self::new(rows, cols)
                }
            },
            None => Self::new(rows, cols),
        }
    }
}
