//! Editor state machine
//!
//! [`Editor`] owns the grid, the selection and autofill engines, and the
//! connection to the external store. Adapters forward pointer events and
//! toolbar actions to it and receive committed changes through a
//! [`GridSink`].
//!
//! # Example
//!
//! ```rust
//! use gridspan::prelude::*;
//!
//! let config = EditorConfig::default().with_dimensions(3, 3);
//! let mut editor = Editor::new(config, MemorySink::new()).unwrap();
//!
//! // Drag-select a 2x2 block and merge it
//! editor.pointer_down(PointerTarget::Cell(CellId::new(1, 1)), false);
//! editor.pointer_enter(CellId::new(2, 2));
//! editor.pointer_up();
//! editor.merge().unwrap();
//!
//! assert_eq!(editor.stats().merged_cells, 1);
//! assert!(editor.selection().is_empty());
//! // The fresh grid and the merge were both pushed
//! assert_eq!(editor.sink().changes.len(), 2);
//! ```

use gridspan_core::{
    validate_dimension, AutofillDrag, AutofillEngine, CellId, CellRect, FillStep, Grid,
    GridSnapshot, GridStats, Selection, SelectionEngine, SelectionMode,
};

use crate::config::{EditorConfig, Feature};
use crate::error::{Error, Result};
use crate::persistence::{EchoGuard, GridChange, GridSink, NullSink};

/// What a pointer press landed on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    /// The cell body
    Cell(CellId),
    /// An input control embedded in the cell (value editor, checkbox)
    Control(CellId),
    /// The autofill handle of the cell
    FillHandle(CellId),
}

/// Outcome of a change pushed in by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExternalUpdate {
    /// Nothing to do
    Unchanged,
    /// The grid was replaced or resized
    Applied,
    /// The incoming snapshot was unusable; a fresh grid was created instead
    Recreated,
    /// A drag is in progress; the update will be applied when it ends
    Deferred,
    /// The snapshot is the one the editor just wrote
    Echo,
}

/// Interactive grid editor
#[derive(Debug)]
pub struct Editor<S: GridSink = NullSink> {
    grid: Grid,
    config: EditorConfig,
    selection: SelectionEngine,
    autofill: AutofillEngine,
    sink: S,
    echo: EchoGuard,
    pending_dimensions: Option<(usize, usize)>,
    pending_snapshot: Option<String>,
    pending_change: Option<GridChange>,
    revision: u64,
}

impl<S: GridSink> Editor<S> {
    /// Create an editor with a fresh grid sized from the configuration
    pub fn new(config: EditorConfig, sink: S) -> Result<Self> {
        Self::load(config, None, sink)
    }

    /// Create an editor from the store's current value
    ///
    /// An absent, empty or unusable stored snapshot falls back to a fresh
    /// grid sized from the configuration, and that grid is committed so the
    /// store catches up. A valid snapshot is taken as is and nothing is
    /// written; the configured dimensions are then not consulted.
    pub fn load(config: EditorConfig, stored: Option<&str>, sink: S) -> Result<Self> {
        let loaded = match stored.map(str::trim).filter(|s| !s.is_empty()) {
            Some(json) => match GridSnapshot::from_json(json).and_then(|s| Grid::from_snapshot(&s)) {
                Ok(grid) => Some(grid),
                Err(err) => {
                    log::warn!("discarding stored grid: {}", err);
                    None
                }
            },
            None => None,
        };

        let (grid, fresh) = match loaded {
            Some(grid) => (grid, false),
            None => {
                let (rows, cols) = config.desired_dimensions()?;
                (Grid::new(rows, cols)?, true)
            }
        };

        let mut editor = Self {
            grid,
            config,
            selection: SelectionEngine::new(),
            autofill: AutofillEngine::new(),
            sink,
            echo: EchoGuard::default(),
            pending_dimensions: None,
            pending_snapshot: None,
            pending_change: None,
            revision: 0,
        };
        if fresh {
            editor.commit();
        }
        Ok(editor)
    }

    /// Replace the grid with a fresh `rows x cols` grid
    ///
    /// Invalid dimensions leave the current grid untouched.
    pub fn reset(&mut self, rows: usize, cols: usize) -> Result<()> {
        let grid = Grid::new(rows, cols)?;
        self.cancel_drags();
        self.selection.clear();
        self.grid = grid;
        self.commit();
        Ok(())
    }

    /// The current grid
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// The active configuration
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Replace the configuration
    ///
    /// Turning off both merging and blanking drops the current selection.
    pub fn set_config(&mut self, config: EditorConfig) {
        self.config = config;
        if !self.config.selection_enabled() {
            self.selection.clear();
        }
    }

    /// Cells currently selected
    pub fn selection(&self) -> &Selection {
        self.selection.selection()
    }

    /// Where the selection state machine stands
    pub fn selection_mode(&self) -> SelectionMode {
        self.selection.mode()
    }

    /// State of the autofill drag
    pub fn autofill_drag(&self) -> AutofillDrag {
        self.autofill.drag()
    }

    /// Whether a selection or autofill drag is in progress
    pub fn is_dragging(&self) -> bool {
        self.selection.is_dragging() || self.autofill.is_active()
    }

    /// Cell counts of the current grid
    pub fn stats(&self) -> GridStats {
        self.grid.stats()
    }

    /// Number of changes committed so far
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Whether a committed change is waiting for [`flush`](Self::flush)
    pub fn is_dirty(&self) -> bool {
        self.pending_change.is_some()
    }

    /// The sink receiving committed changes
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Mutable access to the sink
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Consume the editor, returning its sink
    pub fn into_sink(self) -> S {
        self.sink
    }

    // === Grid edits ===

    /// Append an empty row
    pub fn add_row(&mut self) -> Result<()> {
        self.grid.add_row()?;
        self.commit();
        Ok(())
    }

    /// Append an empty column
    pub fn add_column(&mut self) -> Result<()> {
        self.grid.add_column()?;
        self.commit();
        Ok(())
    }

    /// Set a cell's sequence number, propagating across its merge group
    ///
    /// Returns `Ok(false)` when the cell does not exist.
    pub fn set_cell_value<V: Into<String>>(&mut self, id: CellId, value: V) -> Result<bool> {
        self.require(Feature::Editing)?;
        let changed = self.grid.set_cell_value(id.row, id.col, value);
        if changed {
            self.commit();
        }
        Ok(changed)
    }

    /// Flip a cell's blocked flag, propagating across its merge group
    pub fn toggle_blocked(&mut self, id: CellId) -> Result<bool> {
        self.require(Feature::Checkbox)?;
        let changed = self.grid.toggle_blocked(id.row, id.col);
        if changed {
            self.commit();
        }
        Ok(changed)
    }

    // === Pointer input ===

    /// Pointer pressed
    ///
    /// A press on a cell body starts a selection drag when selection is
    /// enabled and no autofill drag is running. Presses on embedded controls
    /// never select. A press on a fill handle starts an autofill drag.
    pub fn pointer_down(&mut self, target: PointerTarget, modifier: bool) -> bool {
        match target {
            PointerTarget::Cell(id) => {
                if !self.config.selection_enabled() || self.autofill.is_active() {
                    return false;
                }
                self.selection.press(&self.grid, id, modifier)
            }
            PointerTarget::Control(_) => false,
            PointerTarget::FillHandle(id) => self.begin_fill(id),
        }
    }

    /// Pointer entered a cell
    pub fn pointer_enter(&mut self, id: CellId) -> bool {
        if self.autofill.is_active() {
            self.autofill.update(id)
        } else {
            self.selection.drag_over(&self.grid, id)
        }
    }

    /// Pointer released anywhere
    ///
    /// Commits a running autofill drag and ends a selection drag. Returns
    /// the cells the autofill wrote.
    pub fn pointer_up(&mut self) -> Vec<FillStep> {
        let filled = self.end_fill();
        if self.selection.release() {
            self.apply_pending();
        }
        filled
    }

    // === Selection ===

    /// Click without drag
    pub fn click(&mut self, id: CellId, modifier: bool) -> bool {
        if !self.config.selection_enabled() {
            return false;
        }
        self.selection.click(&self.grid, id, modifier)
    }

    /// Select every visible cell
    pub fn select_all(&mut self) {
        if self.config.selection_enabled() {
            self.selection.select_all(&self.grid);
        }
    }

    /// Drop the selection
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    // === Mutations ===

    /// Merge the selected rectangle
    ///
    /// On error nothing changes, including the selection.
    pub fn merge(&mut self) -> Result<CellRect> {
        self.require(Feature::Merging)?;
        let rect = self.grid.merge(self.selection.selection())?;
        self.selection.clear();
        self.commit();
        Ok(rect)
    }

    /// Dissolve the merge group of the first selected cell
    pub fn unmerge(&mut self) -> Result<bool> {
        self.require(Feature::Merging)?;
        let changed = self.grid.unmerge(self.selection.selection());
        if changed {
            self.commit();
        }
        Ok(changed)
    }

    /// Blank every selected visible cell
    pub fn blank(&mut self) -> Result<usize> {
        self.require(Feature::Blanking)?;
        let count = self.grid.blank(self.selection.selection());
        self.finish_blanking(count);
        Ok(count)
    }

    /// Unblank every selected visible cell
    pub fn unblank(&mut self) -> Result<usize> {
        self.require(Feature::Blanking)?;
        let count = self.grid.unblank(self.selection.selection());
        self.finish_blanking(count);
        Ok(count)
    }

    fn finish_blanking(&mut self, count: usize) {
        self.selection.clear();
        if count > 0 {
            self.commit();
        }
    }

    // === Autofill ===

    /// Start an autofill drag from `source`
    ///
    /// Silently ignored when editing is disabled, a selection drag is
    /// running, or the source does not hold an integer.
    pub fn begin_fill(&mut self, source: CellId) -> bool {
        if !self.config.is_enabled(Feature::Editing) || self.selection.is_dragging() {
            return false;
        }
        self.autofill.begin(&self.grid, source)
    }

    /// Move the autofill target to `hovered`
    pub fn update_fill(&mut self, hovered: CellId) -> bool {
        self.autofill.update(hovered)
    }

    /// Cells the running autofill drag would write on release
    pub fn fill_preview(&self) -> Vec<FillStep> {
        self.autofill.preview(&self.grid)
    }

    /// End the autofill drag and write its run
    ///
    /// A snapshot the store pushed during the drag predates the run, so it
    /// is dropped once the run has been written.
    pub fn end_fill(&mut self) -> Vec<FillStep> {
        if !self.autofill.is_active() {
            return Vec::new();
        }
        let filled = self.autofill.commit(&mut self.grid);
        if !filled.is_empty() {
            if self.pending_snapshot.take().is_some() {
                log::warn!("dropping external grid superseded by autofill");
            }
            self.commit();
        }
        self.apply_pending();
        filled
    }

    /// Abandon any drag whose release was lost
    ///
    /// A selection drag reverts to the selection it started from; an
    /// autofill drag is discarded without writing.
    pub fn cancel_drags(&mut self) -> bool {
        let selection = self.selection.cancel_drag();
        let autofill = self.autofill.cancel();
        if selection || autofill {
            self.apply_pending();
        }
        selection || autofill
    }

    // === Host sync ===

    /// Grow the grid to the host's desired dimensions
    ///
    /// There is no delete operation, so a smaller request is ignored. While
    /// a drag is running the request is held until it ends.
    pub fn sync_dimensions(&mut self, rows: usize, cols: usize) -> Result<ExternalUpdate> {
        validate_dimension(rows)?;
        validate_dimension(cols)?;

        if self.is_dragging() {
            self.pending_dimensions = Some((rows, cols));
            return Ok(ExternalUpdate::Deferred);
        }
        self.grow_to(rows, cols)
    }

    /// Re-read the desired dimensions from the configuration
    pub fn sync_from_config(&mut self) -> Result<ExternalUpdate> {
        let (rows, cols) = self.config.desired_dimensions()?;
        self.sync_dimensions(rows, cols)
    }

    /// Take a snapshot the store pushed in
    ///
    /// The editor's own last write is recognized and skipped. An unusable
    /// snapshot is replaced by a fresh grid. A local change that was not
    /// flushed yet is discarded in favour of the incoming one.
    pub fn apply_external_snapshot(&mut self, json: &str) -> Result<ExternalUpdate> {
        if self.echo.is_echo(json) {
            return Ok(ExternalUpdate::Echo);
        }
        if self.is_dragging() {
            self.pending_snapshot = Some(json.to_string());
            return Ok(ExternalUpdate::Deferred);
        }

        let loaded = GridSnapshot::from_json(json).and_then(|s| Grid::from_snapshot(&s));
        match loaded {
            Ok(grid) if grid == self.grid => Ok(ExternalUpdate::Unchanged),
            Ok(grid) => {
                self.grid = grid;
                self.selection.clear();
                self.pending_change = None;
                self.echo.clear();
                log::debug!(
                    "applied external grid {}x{}",
                    self.grid.row_count(),
                    self.grid.column_count()
                );
                Ok(ExternalUpdate::Applied)
            }
            Err(err) => {
                log::warn!("discarding external grid: {}", err);
                let (rows, cols) = self.config.desired_dimensions()?;
                self.grid = Grid::new(rows, cols)?;
                self.selection.clear();
                self.commit();
                Ok(ExternalUpdate::Recreated)
            }
        }
    }

    /// Push the pending change when auto-save is off
    pub fn flush(&mut self) -> bool {
        match self.pending_change.take() {
            Some(change) => {
                self.push(change);
                true
            }
            None => false,
        }
    }

    fn require(&self, feature: Feature) -> Result<()> {
        if self.config.is_enabled(feature) {
            Ok(())
        } else {
            Err(Error::FeatureDisabled(feature))
        }
    }

    fn grow_to(&mut self, rows: usize, cols: usize) -> Result<ExternalUpdate> {
        if rows < self.grid.row_count() || cols < self.grid.column_count() {
            log::warn!(
                "ignoring shrink to {}x{} (grid is {}x{})",
                rows,
                cols,
                self.grid.row_count(),
                self.grid.column_count()
            );
        }

        let mut grew = false;
        while self.grid.row_count() < rows {
            self.grid.add_row()?;
            grew = true;
        }
        while self.grid.column_count() < cols {
            self.grid.add_column()?;
            grew = true;
        }

        if grew {
            self.commit();
            Ok(ExternalUpdate::Applied)
        } else {
            Ok(ExternalUpdate::Unchanged)
        }
    }

    /// Apply host updates held back while a drag was running
    fn apply_pending(&mut self) {
        if self.is_dragging() {
            return;
        }
        if let Some(json) = self.pending_snapshot.take() {
            if let Err(err) = self.apply_external_snapshot(&json) {
                log::warn!("deferred snapshot not applied: {}", err);
            }
        }
        if let Some((rows, cols)) = self.pending_dimensions.take() {
            if let Err(err) = self.grow_to(rows, cols) {
                log::warn!("deferred resize not applied: {}", err);
            }
        }
    }

    fn commit(&mut self) {
        self.revision += 1;
        let change = GridChange {
            snapshot_json: self.grid.snapshot().to_json(),
            stats: self.grid.stats(),
            revision: self.revision,
        };
        log::debug!(
            "commit r{}: {} cells, {} merged, {} blank, {} blocked",
            change.revision,
            change.stats.total_cells,
            change.stats.merged_cells,
            change.stats.blank_cells,
            change.stats.blocked_cells
        );

        if self.config.is_enabled(Feature::AutoSave) {
            self.push(change);
        } else {
            self.pending_change = Some(change);
        }
    }

    fn push(&mut self, change: GridChange) {
        self.echo.mark(&change.snapshot_json);
        self.sink.grid_changed(&change);
    }
}
