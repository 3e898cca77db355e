//! Selection set and the pointer-driven selection state machine
//!
//! Hidden cells never enter a [`Selection`]: every way of adding cells checks
//! visibility against the grid at insertion time.

use ahash::AHashSet;

use crate::cell::{CellId, CellRect};
use crate::error::{Error, Result};
use crate::grid::Grid;

/// An insertion-ordered set of visible cells
#[derive(Debug, Clone, Default)]
pub struct Selection {
    order: Vec<CellId>,
    members: AHashSet<CellId>,
}

impl Selection {
    /// Create an empty selection
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a selection from `ids`, skipping cells that are hidden or missing
    pub fn of<I>(grid: &Grid, ids: I) -> Self
    where
        I: IntoIterator<Item = CellId>,
    {
        let mut selection = Self::new();
        for id in ids {
            selection.insert_visible(grid, id);
        }
        selection
    }

    /// Number of selected cells
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check if nothing is selected
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Check if a cell is selected
    pub fn contains(&self, id: &CellId) -> bool {
        self.members.contains(id)
    }

    /// The earliest selected cell still in the set
    pub fn first(&self) -> Option<CellId> {
        self.order.first().copied()
    }

    /// Iterate in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &CellId> {
        self.order.iter()
    }

    /// Bounding rectangle of the selected cells
    pub fn bounding_rect(&self) -> Option<CellRect> {
        CellRect::bounding(&self.order)
    }

    /// Rectangle to merge, if this selection describes a valid one
    ///
    /// Every cell inside the bounding rectangle must either be selected, or
    /// be a hidden cell whose merge anchor is selected. The second rule lets
    /// an existing merged block take part through its anchor alone.
    pub fn merge_rect(&self, grid: &Grid) -> Result<CellRect> {
        if self.len() < 2 {
            return Err(Error::SelectionTooSmall(self.len()));
        }
        let rect = self
            .bounding_rect()
            .ok_or(Error::SelectionTooSmall(0))?;

        for id in rect.cells() {
            if self.contains(&id) {
                continue;
            }
            let covered_by_anchor = grid.is_hidden(id)
                && grid
                    .anchor_of(id)
                    .map_or(false, |anchor| self.contains(&anchor));
            if !covered_by_anchor {
                return Err(Error::NonRectangularSelection {
                    range: rect.to_string(),
                    cell: id.to_string(),
                });
            }
        }
        Ok(rect)
    }

    fn insert_visible(&mut self, grid: &Grid, id: CellId) -> bool {
        grid.is_visible(id) && self.insert(id)
    }

    fn insert(&mut self, id: CellId) -> bool {
        if self.members.insert(id) {
            self.order.push(id);
            true
        } else {
            false
        }
    }

    fn remove(&mut self, id: &CellId) -> bool {
        if self.members.remove(id) {
            self.order.retain(|c| c != id);
            true
        } else {
            false
        }
    }
}

impl PartialEq for Selection {
    fn eq(&self, other: &Self) -> bool {
        self.members == other.members
    }
}

impl Eq for Selection {}

/// Whether the user is currently building a selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionMode {
    #[default]
    Idle,
    Selecting,
}

#[derive(Debug, Clone)]
struct SelectionDrag {
    /// Cell the drag started on
    origin: CellId,
    /// Selection the drag rectangle is unioned onto
    base: Selection,
    /// Selection before the press, restored on cancel
    before: Selection,
}

/// Selection state machine driven by press / drag-over / release / click
#[derive(Debug, Clone, Default)]
pub struct SelectionEngine {
    selection: Selection,
    mode: SelectionMode,
    drag: Option<SelectionDrag>,
}

impl SelectionEngine {
    /// Create an idle engine with nothing selected
    pub fn new() -> Self {
        Self::default()
    }

    /// Current selection
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Current mode
    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    /// Whether a drag is in progress
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Pointer pressed on a cell
    ///
    /// With `modifier` held the pressed cell is added to the selection;
    /// otherwise the selection becomes exactly that cell. Hidden or missing
    /// cells are ignored.
    pub fn press(&mut self, grid: &Grid, id: CellId, modifier: bool) -> bool {
        if !grid.is_visible(id) {
            return false;
        }

        let before = self.selection.clone();
        let base = if modifier {
            before.clone()
        } else {
            Selection::new()
        };

        let mut selection = base.clone();
        selection.insert(id);

        self.selection = selection;
        self.mode = SelectionMode::Selecting;
        self.drag = Some(SelectionDrag {
            origin: id,
            base,
            before,
        });
        true
    }

    /// Pointer entered a cell while dragging
    ///
    /// The rectangle between the drag origin and `id` is taken on raw
    /// coordinates and unioned onto the selection the drag started from.
    pub fn drag_over(&mut self, grid: &Grid, id: CellId) -> bool {
        let Some(drag) = &self.drag else {
            return false;
        };

        let mut selection = drag.base.clone();
        for cell in CellRect::new(drag.origin, id).cells() {
            selection.insert_visible(grid, cell);
        }
        self.selection = selection;
        true
    }

    /// Pointer released: keep the accumulated selection
    pub fn release(&mut self) -> bool {
        self.drag.take().is_some()
    }

    /// Abandon a drag whose release was lost, restoring the prior selection
    pub fn cancel_drag(&mut self) -> bool {
        match self.drag.take() {
            Some(drag) => {
                self.mode = if drag.before.is_empty() {
                    SelectionMode::Idle
                } else {
                    SelectionMode::Selecting
                };
                self.selection = drag.before;
                true
            }
            None => false,
        }
    }

    /// Click without drag
    ///
    /// Outside selection mode the click selects exactly `id` and enters
    /// selection mode. Inside it a plain click adds `id`; a modifier click
    /// toggles `id`, except that the last selected cell is never removed.
    pub fn click(&mut self, grid: &Grid, id: CellId, modifier: bool) -> bool {
        if !grid.is_visible(id) {
            return false;
        }

        match self.mode {
            SelectionMode::Idle => {
                let mut selection = Selection::new();
                selection.insert(id);
                self.selection = selection;
                self.mode = SelectionMode::Selecting;
                true
            }
            SelectionMode::Selecting => {
                if modifier && self.selection.contains(&id) {
                    if self.selection.len() > 1 {
                        self.selection.remove(&id)
                    } else {
                        false
                    }
                } else {
                    self.selection.insert(id)
                }
            }
        }
    }

    /// Select every visible cell
    pub fn select_all(&mut self, grid: &Grid) {
        self.selection = Selection::of(grid, grid.visible_cells().map(|c| c.id));
        self.mode = SelectionMode::Selecting;
        self.drag = None;
    }

    /// Empty the selection and leave selection mode
    pub fn clear(&mut self) {
        self.selection = Selection::new();
        self.mode = SelectionMode::Idle;
        self.drag = None;
    }
}
