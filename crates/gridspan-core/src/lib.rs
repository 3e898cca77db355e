//! # gridspan-core
//!
//! Core state model for the gridspan grid editor.
//!
//! This crate provides the pure state transitions of the editor:
//! - [`Grid`] - The rows x columns matrix of cells and its dimension changes
//! - [`MergeSpans`] - Merged rectangles derived from per-cell merge tags
//! - [`SelectionEngine`] - Click, modifier-click and drag-rectangle selection
//! - [`Grid::merge`], [`Grid::unmerge`], [`Grid::blank`], [`Grid::unblank`] - Selection-driven mutations
//! - [`AutofillEngine`] - Drag-to-extend integer sequences
//! - [`GridSnapshot`] - The plain snapshot handed to an external store
//!
//! ## Example
//!
//! ```rust
//! use gridspan_core::{CellId, Grid, Selection};
//!
//! let mut grid = Grid::new(3, 3).unwrap();
//! grid.set_cell_value(1, 1, "5");
//!
//! let block = Selection::of(&grid, CellId::new(1, 1).to(CellId::new(2, 2)).cells());
//! grid.merge(&block).unwrap();
//!
//! let span = grid.spans().get("merge-1-1-2-2").unwrap();
//! assert_eq!((span.row_span, span.col_span), (2, 2));
//! assert!(grid.is_hidden(CellId::new(2, 2)));
//! ```

pub mod autofill;
pub mod cell;
pub mod error;
pub mod grid;
mod ops;
pub mod row;
pub mod selection;
pub mod snapshot;
pub mod span;
pub mod stats;

// Re-exports for convenience
pub use autofill::{fill_run, infer_direction, AutofillDrag, AutofillEngine, FillDirection, FillStep};
pub use cell::{merge_id_for, parse_sequence, Cell, CellId, CellRect, MergeId, EMPTY_SEQUENCE};
pub use error::{Axis, Error, Result};
pub use grid::{parse_dimension, validate_dimension, Grid};
pub use row::Row;
pub use selection::{Selection, SelectionEngine, SelectionMode};
pub use snapshot::{CellSnapshot, GridSnapshot, RowSnapshot};
pub use span::{MergeSpan, MergeSpans};
pub use stats::GridStats;

/// Smallest allowed row or column count
pub const MIN_DIMENSION: usize = 1;

/// Largest allowed row or column count
pub const MAX_DIMENSION: usize = 100;
