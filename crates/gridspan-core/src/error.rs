//! Error types for gridspan-core

use std::fmt;

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Grid axis, used to report which dimension hit a limit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Rows,
    Columns,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Rows => write!(f, "rows"),
            Axis::Columns => write!(f, "columns"),
        }
    }
}

/// Errors that can occur in gridspan-core
///
/// Lookups on coordinates that do not exist are not errors; those operations
/// silently do nothing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Dimension outside `[1, MAX_DIMENSION]` or not a number
    #[error("Invalid dimension: {0}")]
    InvalidDimension(String),

    /// Adding a row or column would exceed the dimension ceiling
    #[error("Cannot add more {axis}: limit is {limit}")]
    DimensionLimitExceeded { axis: Axis, limit: usize },

    /// Merge attempted on a selection that does not fill its bounding rectangle
    #[error("Selection is not rectangular: {cell} is inside {range} but not selected")]
    NonRectangularSelection { range: String, cell: String },

    /// Merge attempted with fewer than two selected cells
    #[error("At least 2 cells must be selected to merge (got {0})")]
    SelectionTooSmall(usize),

    /// Snapshot could not be parsed or has an unusable shape
    #[error("Malformed snapshot: {0}")]
    MalformedSnapshot(String),

    /// Cell identifier could not be parsed
    #[error("Invalid cell id: {0}")]
    InvalidCellId(String),
}
