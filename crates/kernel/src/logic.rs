use pushbox_common::{Cell, GridPos, Level};
use std::sync::Arc;

/// Read side of the puzzle logic, as consumed by the renderer and session.
///
/// Implementations own the mutable cell states for one level. The renderer
/// never mutates them; it only queries cells and drains the changed list.
pub trait Logic {
    /// Construct the logic for a freshly started level.
    fn from_level(level: Arc<Level>) -> Self
    where
        Self: Sized;

    /// Grid size in cells.
    fn dimensions(&self) -> GridPos;

    /// Current state of the cell at `pos`. Positions outside the grid
    /// report `Cell::Unrenderable`.
    fn cell_at(&self, pos: GridPos) -> Cell;

    /// Current player position.
    fn player(&self) -> GridPos;

    /// Cells changed since the previous call. Draining: a second call with
    /// no intervening mutation returns an empty list.
    fn take_changed_cells(&mut self) -> Vec<GridPos>;
}
