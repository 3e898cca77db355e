//! Prelude module - common imports for gridspan users
//!
//! ```rust
//! use gridspan::prelude::*;
//! ```

pub use crate::{
    // Cell types
    Cell,
    CellId,
    CellRect,

    // Editor
    Editor,
    EditorConfig,
    ExternalUpdate,
    Feature,
    PointerTarget,

    // Error types
    Error,
    Result,

    // Autofill
    FillDirection,
    FillStep,

    // Grid types
    Grid,
    GridSnapshot,
    GridStats,
    MergeSpan,

    // Persistence
    GridChange,
    GridSink,
    MemorySink,
    NullSink,

    // Selection
    Selection,
    SelectionMode,
};
