//! Autofill: drag a cell's fill handle to extend an integer sequence
//!
//! The drag is a small state machine (`begin` / `update` / `commit`), with
//! `cancel` for a release the host lost track of. Nothing is written to the
//! grid until `commit`.

use crate::cell::CellId;
use crate::grid::Grid;

/// Axis the fill runs along
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillDirection {
    Horizontal,
    Vertical,
}

/// Infer the fill axis from the source cell and the hovered cell
///
/// When both row and column differ the larger delta wins, with ties going
/// to horizontal. Hovering the source itself leaves the axis unresolved.
pub fn infer_direction(source: CellId, hovered: CellId) -> Option<FillDirection> {
    let row_delta = source.row.abs_diff(hovered.row);
    let col_delta = source.col.abs_diff(hovered.col);

    match (row_delta, col_delta) {
        (0, 0) => None,
        (0, _) => Some(FillDirection::Horizontal),
        (_, 0) => Some(FillDirection::Vertical),
        _ if col_delta >= row_delta => Some(FillDirection::Horizontal),
        _ => Some(FillDirection::Vertical),
    }
}

/// One cell the fill writes to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FillStep {
    /// Target cell
    pub cell: CellId,
    /// Value written
    pub value: i64,
}

/// Compute the run from `source` towards `target` along `direction`
///
/// Only the coordinate of `target` on the active axis matters. The walk
/// stops before the first cell that is missing, blank or hidden. Values
/// always increase away from the source, whichever way the walk goes.
pub fn fill_run(
    grid: &Grid,
    source: CellId,
    direction: FillDirection,
    target: CellId,
) -> Vec<FillStep> {
    let Some(start) = grid.cell_by_id(source).and_then(|c| c.sequence_value()) else {
        return Vec::new();
    };

    let (from, to) = match direction {
        FillDirection::Horizontal => (source.col, target.col),
        FillDirection::Vertical => (source.row, target.row),
    };
    let forward = to >= from;
    let distance = from.abs_diff(to);

    let mut run = Vec::new();
    for step in 1..=distance {
        let position = if forward {
            from + step
        } else {
            match from.checked_sub(step) {
                Some(p) => p,
                None => break,
            }
        };
        let cell = match direction {
            FillDirection::Horizontal => CellId::new(source.row, position),
            FillDirection::Vertical => CellId::new(position, source.col),
        };
        if !grid.is_fillable(cell) {
            break;
        }
        let Some(value) = i64::try_from(step).ok().and_then(|s| start.checked_add(s)) else {
            break;
        };
        run.push(FillStep { cell, value });
    }
    run
}

/// Ephemeral drag state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AutofillDrag {
    #[default]
    Inactive,
    Active {
        /// Cell whose handle was pressed
        source: CellId,
        /// Resolved axis, `None` while hovering the source
        direction: Option<FillDirection>,
        /// Last hovered cell
        current: CellId,
    },
}

/// Owner of the autofill drag state
#[derive(Debug, Clone, Default)]
pub struct AutofillEngine {
    drag: AutofillDrag,
}

impl AutofillEngine {
    /// Create an inactive engine
    pub fn new() -> Self {
        Self::default()
    }

    /// Current drag state
    pub fn drag(&self) -> AutofillDrag {
        self.drag
    }

    /// Whether a drag is in progress
    pub fn is_active(&self) -> bool {
        matches!(self.drag, AutofillDrag::Active { .. })
    }

    /// Handle pressed on `source`
    ///
    /// Ignored unless the source is visible and holds an integer, and no
    /// other drag is running.
    pub fn begin(&mut self, grid: &Grid, source: CellId) -> bool {
        if self.is_active() || !grid.is_visible(source) {
            return false;
        }
        if grid
            .cell_by_id(source)
            .and_then(|c| c.sequence_value())
            .is_none()
        {
            return false;
        }

        self.drag = AutofillDrag::Active {
            source,
            direction: None,
            current: source,
        };
        true
    }

    /// Pointer entered `hovered` during the drag
    pub fn update(&mut self, hovered: CellId) -> bool {
        match &mut self.drag {
            AutofillDrag::Active {
                source,
                direction,
                current,
            } => {
                *direction = infer_direction(*source, hovered);
                *current = hovered;
                true
            }
            AutofillDrag::Inactive => false,
        }
    }

    /// Cells the drag would fill if released now
    pub fn preview(&self, grid: &Grid) -> Vec<FillStep> {
        match self.drag {
            AutofillDrag::Active {
                source,
                direction: Some(direction),
                current,
            } => fill_run(grid, source, direction, current),
            _ => Vec::new(),
        }
    }

    /// Release: write the run to the grid and reset the drag
    ///
    /// Returns the steps written; empty when there was no drag or nothing
    /// to fill, in which case the grid is untouched.
    pub fn commit(&mut self, grid: &mut Grid) -> Vec<FillStep> {
        let run = self.preview(grid);
        self.drag = AutofillDrag::Inactive;
        if run.is_empty() {
            return run;
        }

        for step in &run {
            grid.set_cell_value(step.cell.row, step.cell.col, step.value.to_string());
        }
        grid.refresh();
        log::debug!("autofilled {} cell(s)", run.len());
        run
    }

    /// Drop the drag without writing anything
    pub fn cancel(&mut self) -> bool {
        let was_active = self.is_active();
        self.drag = AutofillDrag::Inactive;
        was_active
    }
}
