//! # gridspan
//!
//! An interactive grid editor engine: a rectangular table of cells that can
//! be merged into rectangular spans, blanked without losing data, and
//! extended with an incrementing integer sequence by dragging a fill handle.
//!
//! The pure state model lives in [`gridspan_core`] and is re-exported here.
//! This crate adds the [`Editor`], which wires that model to a host:
//!
//! - Feature flags and bound dimensions ([`EditorConfig`])
//! - Pointer events routed to selection or autofill drags
//! - Committed changes pushed to a [`GridSink`], with echo suppression
//! - Host updates deferred while a drag is running
//!
//! ## Example
//!
//! ```rust
//! use gridspan::prelude::*;
//!
//! let mut editor = Editor::new(EditorConfig::default(), MemorySink::new()).unwrap();
//!
//! editor.set_cell_value(CellId::new(1, 1), "1").unwrap();
//! editor.begin_fill(CellId::new(1, 1));
//! editor.update_fill(CellId::new(4, 1));
//! editor.end_fill();
//!
//! assert_eq!(editor.grid().cell(4, 1).unwrap().sequence_number, "4");
//! let change = editor.sink().last().unwrap();
//! assert_eq!(change.stats.total_cells, 100);
//! ```

pub mod config;
pub mod editor;
pub mod error;
pub mod persistence;
pub mod prelude;

pub use config::{Bound, DimensionInput, EditorConfig, Feature, DEFAULT_COLUMNS, DEFAULT_ROWS};
pub use editor::{Editor, ExternalUpdate, PointerTarget};
pub use error::{Error, Result};
pub use gridspan_core::Error as GridError;
pub use persistence::{GridChange, GridSink, MemorySink, NullSink};

// Re-export core types
pub use gridspan_core::{
    fill_run, infer_direction, merge_id_for, parse_dimension, parse_sequence, validate_dimension,
    AutofillDrag, AutofillEngine, Axis, Cell, CellId, CellRect, CellSnapshot, FillDirection,
    FillStep, Grid, GridSnapshot, GridStats, MergeId, MergeSpan, MergeSpans, Row, RowSnapshot,
    Selection, SelectionEngine, SelectionMode, EMPTY_SEQUENCE, MAX_DIMENSION, MIN_DIMENSION,
};
