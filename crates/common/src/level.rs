use crate::types::{Cell, GridPos, LevelId};

/// Errors from building a level out of raw parts.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LevelError {
    #[error("level has no cells")]
    Empty,
    #[error("cell count mismatch: {width}x{height} grid needs {expected}, got {actual}")]
    CellCountMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
    #[error("player start ({x}, {y}) outside {width}x{height} grid")]
    PlayerOutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
}

/// An immutable level definition: grid size, initial cells, player start.
///
/// Cells are stored row-major. Equality is identity: two levels compare equal
/// only if they share a [`LevelId`].
#[derive(Debug, Clone)]
pub struct Level {
    id: LevelId,
    name: String,
    size: GridPos,
    cells: Vec<Cell>,
    player_start: GridPos,
}

impl Level {
    /// Build a level, validating that `cells` fills the grid and the player
    /// starts inside it.
    pub fn new(
        name: impl Into<String>,
        size: GridPos,
        cells: Vec<Cell>,
        player_start: GridPos,
    ) -> Result<Self, LevelError> {
        if size.x == 0 || size.y == 0 {
            return Err(LevelError::Empty);
        }
        let expected = size.x as usize * size.y as usize;
        if cells.len() != expected {
            return Err(LevelError::CellCountMismatch {
                width: size.x,
                height: size.y,
                expected,
                actual: cells.len(),
            });
        }
        if player_start.x >= size.x || player_start.y >= size.y {
            return Err(LevelError::PlayerOutOfBounds {
                x: player_start.x,
                y: player_start.y,
                width: size.x,
                height: size.y,
            });
        }
        Ok(Self {
            id: LevelId::new(),
            name: name.into(),
            size,
            cells,
            player_start,
        })
    }

    pub fn id(&self) -> LevelId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Grid size in cells.
    pub fn size(&self) -> GridPos {
        self.size
    }

    pub fn width(&self) -> u32 {
        self.size.x
    }

    pub fn height(&self) -> u32 {
        self.size.y
    }

    pub fn player_start(&self) -> GridPos {
        self.player_start
    }

    /// Row-major initial cells.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Flat index of `pos`, or `None` if it lies outside the grid.
    pub fn index(&self, pos: GridPos) -> Option<usize> {
        (pos.x < self.size.x && pos.y < self.size.y)
            .then(|| pos.y as usize * self.size.x as usize + pos.x as usize)
    }

    /// Initial cell at `pos`.
    pub fn cell(&self, pos: GridPos) -> Option<Cell> {
        self.index(pos).map(|i| self.cells[i])
    }
}

impl PartialEq for Level {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Level {}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_by_two() -> Level {
        Level::new(
            "tiny",
            GridPos::new(2, 2),
            vec![Cell::Wall, Cell::Empty, Cell::Container, Cell::Plate],
            GridPos::new(1, 0),
        )
        .unwrap()
    }

    #[test]
    fn cells_are_row_major() {
        let level = two_by_two();
        assert_eq!(level.cell(GridPos::new(0, 0)), Some(Cell::Wall));
        assert_eq!(level.cell(GridPos::new(1, 0)), Some(Cell::Empty));
        assert_eq!(level.cell(GridPos::new(0, 1)), Some(Cell::Container));
        assert_eq!(level.cell(GridPos::new(1, 1)), Some(Cell::Plate));
        assert_eq!(level.cell(GridPos::new(2, 0)), None);
    }

    #[test]
    fn rejects_wrong_cell_count() {
        let err = Level::new("bad", GridPos::new(3, 2), vec![Cell::Empty; 5], GridPos::ZERO)
            .unwrap_err();
        assert_eq!(
            err,
            LevelError::CellCountMismatch {
                width: 3,
                height: 2,
                expected: 6,
                actual: 5
            }
        );
    }

    #[test]
    fn rejects_player_outside_grid() {
        let err = Level::new("bad", GridPos::new(1, 1), vec![Cell::Empty], GridPos::new(1, 0))
            .unwrap_err();
        assert!(matches!(err, LevelError::PlayerOutOfBounds { .. }));
    }

    #[test]
    fn rejects_empty_grid() {
        let err = Level::new("bad", GridPos::ZERO, Vec::new(), GridPos::ZERO).unwrap_err();
        assert_eq!(err, LevelError::Empty);
    }

    #[test]
    fn equality_is_identity() {
        let a = two_by_two();
        let b = two_by_two();
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }
}
