use pushbox_common::{Cell, GridPos, Level};
use std::sync::Arc;

use crate::logic::Logic;

/// Mutable cell grid seeded from a level.
///
/// All mutations go through explicit operations, and each one appends the
/// positions it touched to the changed list. Moving the player records the
/// old position so a renderer can erase the stale sprite.
#[derive(Debug, Clone)]
pub struct Board {
    level: Arc<Level>,
    cells: Vec<Cell>,
    player: GridPos,
    changed: Vec<GridPos>,
}

impl Board {
    /// Start from the level's initial cells and player position.
    pub fn new(level: Arc<Level>) -> Self {
        Self {
            cells: level.cells().to_vec(),
            player: level.player_start(),
            changed: Vec::new(),
            level,
        }
    }

    /// The level this board was seeded from.
    pub fn level(&self) -> &Arc<Level> {
        &self.level
    }

    /// Overwrite the cell at `pos`. Returns `false` if `pos` is outside the
    /// grid. Writing the value already present records nothing.
    pub fn set_cell(&mut self, pos: GridPos, cell: Cell) -> bool {
        let Some(i) = self.level.index(pos) else {
            return false;
        };
        if self.cells[i] != cell {
            self.cells[i] = cell;
            self.changed.push(pos);
        }
        true
    }

    /// Move the player to `pos`. Returns `false` if `pos` is outside the grid.
    pub fn set_player(&mut self, pos: GridPos) -> bool {
        if self.level.index(pos).is_none() {
            return false;
        }
        if self.player != pos {
            tracing::trace!(from = ?self.player, to = ?pos, "player moved");
            self.changed.push(self.player);
            self.player = pos;
        }
        true
    }

    /// True once no container is left off a plate.
    pub fn is_solved(&self) -> bool {
        !self.cells.iter().any(|c| *c == Cell::Container)
    }

    /// Number of changes waiting to be drained.
    pub fn pending_changes(&self) -> usize {
        self.changed.len()
    }
}

impl Logic for Board {
    fn from_level(level: Arc<Level>) -> Self {
        Self::new(level)
    }

    fn dimensions(&self) -> GridPos {
        self.level.size()
    }

    fn cell_at(&self, pos: GridPos) -> Cell {
        self.level
            .index(pos)
            .map(|i| self.cells[i])
            .unwrap_or(Cell::Unrenderable(u8::MAX))
    }

    fn player(&self) -> GridPos {
        self.player
    }

    fn take_changed_cells(&mut self) -> Vec<GridPos> {
        std::mem::take(&mut self.changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level() -> Arc<Level> {
        // ###
        // @$.
        Arc::new(
            Level::new(
                "row",
                GridPos::new(3, 2),
                vec![
                    Cell::Wall,
                    Cell::Wall,
                    Cell::Wall,
                    Cell::Empty,
                    Cell::Container,
                    Cell::Plate,
                ],
                GridPos::new(0, 1),
            )
            .unwrap(),
        )
    }

    #[test]
    fn board_starts_from_level() {
        let board = Board::new(level());
        assert_eq!(board.dimensions(), GridPos::new(3, 2));
        assert_eq!(board.player(), GridPos::new(0, 1));
        assert_eq!(board.cell_at(GridPos::new(1, 1)), Cell::Container);
        assert_eq!(board.pending_changes(), 0);
    }

    #[test]
    fn out_of_range_cells_are_unrenderable() {
        let board = Board::new(level());
        assert_eq!(board.cell_at(GridPos::new(3, 0)), Cell::Unrenderable(255));
    }

    #[test]
    fn set_cell_records_change_once() {
        let mut board = Board::new(level());
        assert!(board.set_cell(GridPos::new(1, 1), Cell::Empty));
        assert!(board.set_cell(GridPos::new(1, 1), Cell::Empty));
        assert_eq!(board.take_changed_cells(), vec![GridPos::new(1, 1)]);
        assert!(board.take_changed_cells().is_empty());
    }

    #[test]
    fn set_cell_outside_grid_is_rejected() {
        let mut board = Board::new(level());
        assert!(!board.set_cell(GridPos::new(0, 5), Cell::Wall));
        assert_eq!(board.pending_changes(), 0);
    }

    #[test]
    fn moving_player_records_old_position() {
        let mut board = Board::new(level());
        assert!(board.set_player(GridPos::new(1, 1)));
        assert_eq!(board.player(), GridPos::new(1, 1));
        assert_eq!(board.take_changed_cells(), vec![GridPos::new(0, 1)]);
    }

    #[test]
    fn solved_when_every_container_is_on_a_plate() {
        let mut board = Board::new(level());
        assert!(!board.is_solved());
        board.set_cell(GridPos::new(1, 1), Cell::Empty);
        board.set_cell(GridPos::new(2, 1), Cell::ContainerOnPlate);
        assert!(board.is_solved());
    }

    #[test]
    fn level_is_shared_not_copied() {
        let shared = level();
        let board = Board::from_level(Arc::clone(&shared));
        assert!(Arc::ptr_eq(board.level(), &shared));
    }
}
