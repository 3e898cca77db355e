//! Cell-related types
//!
//! This module contains:
//! - [`Cell`] - A cell's value and flags
//! - [`CellId`] - A cell's location (1-based row and column)
//! - [`CellRect`] - A rectangle of cells

mod address;
mod data;

pub use address::{CellId, CellRect, CellRectIter};
pub use data::{merge_id_for, parse_sequence, Cell, MergeId, EMPTY_SEQUENCE};
