use pushbox_common::{Cell, GridPos};
use pushbox_kernel::Logic;

use crate::atlas::{MAX_CELL_SIZE, Sprite, SpriteAtlas, effective_cell_size};
use crate::canvas::Canvas;
use crate::config::Palette;
use crate::glyph::{draw_glyph, glyph_size};

/// Largest canvas edge, in pixels, a surface may be allocated with.
pub const MAX_SURFACE_EDGE: u32 = 16_384;

/// Errors from render surface management.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RenderError {
    #[error("surface {width}x{height} exceeds the {max}px edge limit")]
    SurfaceTooLarge { width: u64, height: u64, max: u32 },
    #[error("cell size {requested} exceeds the {max}px limit")]
    CellSizeTooLarge { requested: u32, max: u32 },
}

/// Everything that depends on the cell size: the canvas, the atlas, and the
/// derived geometry. Built and replaced as one value.
#[derive(Debug, Clone)]
pub struct RenderSurface {
    canvas: Canvas,
    atlas: SpriteAtlas,
    cell_size: u32,
    shift: u32,
}

impl RenderSurface {
    /// Allocate a surface for a `grid`-sized field at `cell_size` (clamped).
    ///
    /// The canvas is `grid * z + z / 2` on each axis: a `z / 4` inset on the
    /// leading edge and the same on the trailing edge. Cell sizes above
    /// [`MAX_CELL_SIZE`] are rejected, since the atlas strip is `6 * z` wide.
    pub fn new(grid: GridPos, cell_size: u32, palette: &Palette) -> Result<Self, RenderError> {
        if cell_size > MAX_CELL_SIZE {
            return Err(RenderError::CellSizeTooLarge {
                requested: cell_size,
                max: MAX_CELL_SIZE,
            });
        }
        let z = effective_cell_size(cell_size);
        let border = (z / 2) as u64;
        let width = grid.x as u64 * z as u64 + border;
        let height = grid.y as u64 * z as u64 + border;
        let max = MAX_SURFACE_EDGE as u64;
        if width > max || height > max {
            return Err(RenderError::SurfaceTooLarge {
                width,
                height,
                max: MAX_SURFACE_EDGE,
            });
        }

        Ok(Self {
            canvas: Canvas::new(width as u32, height as u32),
            atlas: SpriteAtlas::generate(z, palette),
            cell_size: z,
            shift: z / 4,
        })
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn atlas(&self) -> &SpriteAtlas {
        &self.atlas
    }

    /// Effective cell size in pixels.
    pub fn cell_size(&self) -> u32 {
        self.cell_size
    }

    /// Border inset in pixels.
    pub fn shift(&self) -> u32 {
        self.shift
    }

    /// Canvas position of the top-left corner of a cell, or `None` if it
    /// lies beyond pixel coordinate range.
    pub fn cell_origin(&self, pos: GridPos) -> Option<(i32, i32)> {
        let axis = |v: u32| {
            i32::try_from(v)
                .ok()?
                .checked_mul(self.cell_size as i32)?
                .checked_add(self.shift as i32)
        };
        Some((axis(pos.x)?, axis(pos.y)?))
    }

    fn paint_cell(&mut self, pos: GridPos, cell: Cell, palette: &Palette) {
        if let Cell::Unrenderable(_) = cell {
            return;
        }
        let Some((x, y)) = self.cell_origin(pos) else {
            return;
        };
        match cell {
            Cell::Glyph(ch) => {
                let size = glyph_size(self.cell_size);
                let inset = ((self.cell_size - size) / 2) as i32;
                draw_glyph(&mut self.canvas, ch, x + inset, y + inset, size, palette.glyph);
            }
            Cell::Unrenderable(_) => {}
            cell => {
                for sprite in Sprite::layers_for(cell) {
                    self.atlas.blit_to(&mut self.canvas, *sprite, x, y);
                }
            }
        }
    }

    fn paint_sprite(&mut self, pos: GridPos, sprite: Sprite) {
        if let Some((x, y)) = self.cell_origin(pos) {
            self.atlas.blit_to(&mut self.canvas, sprite, x, y);
        }
    }
}

/// Paints a level's cells and the player onto a persistent canvas.
///
/// The renderer starts detached: until [`FieldRenderer::resize`] allocates a
/// surface, every draw call is a no-op. Steady-state redraw goes through
/// [`FieldRenderer::update_cells`], which touches only the cells the logic
/// reports as changed.
#[derive(Debug)]
pub struct FieldRenderer {
    grid: GridPos,
    palette: Palette,
    surface: Option<RenderSurface>,
    generation: u64,
}

impl FieldRenderer {
    /// Renderer for a `grid`-sized field with the default palette.
    pub fn new(grid: GridPos) -> Self {
        Self::with_palette(grid, Palette::default())
    }

    pub fn with_palette(grid: GridPos, palette: Palette) -> Self {
        Self {
            grid,
            palette,
            surface: None,
            generation: 0,
        }
    }

    /// Grid size this renderer is bound to.
    pub fn grid(&self) -> GridPos {
        self.grid
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Replace the surface with one at `cell_size` (clamped to the atlas
    /// minimum).
    ///
    /// The previous surface is released first. If the new one cannot be
    /// allocated the error is returned and the renderer stays detached.
    pub fn resize(&mut self, cell_size: u32) -> Result<(), RenderError> {
        self.surface = None;
        let surface = RenderSurface::new(self.grid, cell_size, &self.palette)?;
        tracing::debug!(
            requested = cell_size,
            z = surface.cell_size(),
            width = surface.canvas().width(),
            height = surface.canvas().height(),
            "render surface allocated"
        );
        self.surface = Some(surface);
        self.generation += 1;
        Ok(())
    }

    /// Drop the surface, detaching the renderer.
    pub fn release(&mut self) {
        if self.surface.take().is_some() {
            tracing::debug!("render surface released");
        }
    }

    pub fn is_attached(&self) -> bool {
        self.surface.is_some()
    }

    pub fn surface(&self) -> Option<&RenderSurface> {
        self.surface.as_ref()
    }

    /// The off-screen canvas for the host to present.
    pub fn canvas(&self) -> Option<&Canvas> {
        self.surface.as_ref().map(RenderSurface::canvas)
    }

    /// Effective cell size, if attached.
    pub fn cell_size(&self) -> Option<u32> {
        self.surface.as_ref().map(RenderSurface::cell_size)
    }

    /// Number of surfaces allocated so far. Bumps on every successful resize.
    pub fn surface_generation(&self) -> u64 {
        self.generation
    }

    /// Redraw one cell from the logic's current state.
    pub fn draw_cell<L: Logic + ?Sized>(&mut self, logic: &L, pos: GridPos) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        surface.paint_cell(pos, logic.cell_at(pos), &self.palette);
    }

    /// Redraw the cell under the player, then the player on top.
    pub fn draw_player<L: Logic + ?Sized>(&mut self, logic: &L) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        let pos = logic.player();
        surface.paint_cell(pos, logic.cell_at(pos), &self.palette);
        surface.paint_sprite(pos, Sprite::Player);
    }

    /// Redraw only the cells changed since the last call, then optionally the
    /// player. Returns the number of cells redrawn.
    ///
    /// While detached the changed list is drained and discarded; the full
    /// redraw that follows attachment covers it.
    pub fn update_cells<L: Logic + ?Sized>(&mut self, logic: &mut L, update_player: bool) -> usize {
        if self.surface.is_none() {
            let dropped = logic.take_changed_cells().len();
            tracing::trace!(dropped, "detached, changes discarded");
            return 0;
        }
        let changed = logic.take_changed_cells();
        for pos in &changed {
            self.draw_cell(&*logic, *pos);
        }
        if update_player {
            self.draw_player(&*logic);
        }
        tracing::trace!(cells = changed.len(), update_player, "incremental redraw");
        changed.len()
    }

    /// Clear to the background and redraw every cell plus the player.
    pub fn draw_field<L: Logic + ?Sized>(&mut self, logic: &L) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        surface.canvas.clear(self.palette.background);
        for y in 0..self.grid.y {
            for x in 0..self.grid.x {
                let pos = GridPos::new(x, y);
                surface.paint_cell(pos, logic.cell_at(pos), &self.palette);
            }
        }
        self.draw_player(logic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Rgba;
    use pushbox_common::Level;
    use pushbox_kernel::Board;
    use std::sync::Arc;

    // #####
    // #@$.#
    // #*  #
    // #####
    fn board() -> Board {
        let rows = [
            [Cell::Wall; 5],
            [Cell::Wall, Cell::Empty, Cell::Container, Cell::Plate, Cell::Wall],
            [Cell::Wall, Cell::ContainerOnPlate, Cell::Empty, Cell::Empty, Cell::Wall],
            [Cell::Wall; 5],
        ];
        let level = Level::new(
            "fixture",
            GridPos::new(5, 4),
            rows.concat(),
            GridPos::new(1, 1),
        )
        .unwrap();
        Board::new(Arc::new(level))
    }

    fn attached(board: &Board, z: u32) -> FieldRenderer {
        let mut renderer = FieldRenderer::new(board.dimensions());
        renderer.resize(z).unwrap();
        renderer.draw_field(board);
        renderer
    }

    fn at(renderer: &FieldRenderer, pos: GridPos, dx: u32, dy: u32) -> Rgba {
        let surface = renderer.surface().unwrap();
        let (x, y) = surface.cell_origin(pos).unwrap();
        surface.canvas().get(x as u32 + dx, y as u32 + dy).unwrap()
    }

    #[test]
    fn canvas_size_follows_grid_and_cell_size() {
        let renderer = attached(&board(), 20);
        let canvas = renderer.canvas().unwrap();
        assert_eq!(canvas.width(), 5 * 20 + 10);
        assert_eq!(canvas.height(), 4 * 20 + 10);
        assert_eq!(renderer.surface().unwrap().shift(), 5);
    }

    #[test]
    fn small_cell_sizes_clamp_to_ten() {
        let board = board();
        let mut renderer = FieldRenderer::new(board.dimensions());
        for requested in [0, 3, 9] {
            renderer.resize(requested).unwrap();
            assert_eq!(renderer.cell_size(), Some(10));
            assert_eq!(renderer.canvas().unwrap().width(), 5 * 10 + 5);
        }
    }

    #[test]
    fn draws_before_resize_are_noops() {
        let mut board = board();
        let mut renderer = FieldRenderer::new(board.dimensions());
        renderer.draw_field(&board);
        renderer.draw_cell(&board, GridPos::new(1, 1));
        renderer.draw_player(&board);
        board.set_cell(GridPos::new(2, 2), Cell::Wall);
        assert_eq!(renderer.update_cells(&mut board, true), 0);
        assert!(renderer.canvas().is_none());
    }

    #[test]
    fn detached_update_discards_changes() {
        let mut board = board();
        let mut renderer = FieldRenderer::new(board.dimensions());
        for x in 1..4 {
            board.set_cell(GridPos::new(x, 2), Cell::Wall);
            renderer.update_cells(&mut board, false);
        }
        assert_eq!(board.pending_changes(), 0);

        renderer.resize(20).unwrap();
        renderer.draw_field(&board);
        let wall = renderer.palette().wall;
        assert_eq!(at(&renderer, GridPos::new(2, 2), 2, 5), wall);
    }

    #[test]
    fn repeated_resize_regenerates_identical_atlas() {
        let board = board();
        let mut renderer = FieldRenderer::new(board.dimensions());
        renderer.resize(24).unwrap();
        let first = renderer.surface().unwrap().atlas().clone();
        renderer.resize(24).unwrap();
        assert_eq!(renderer.surface().unwrap().atlas(), &first);
        assert_eq!(renderer.surface_generation(), 2);
    }

    #[test]
    fn draws_reuse_the_atlas() {
        let mut board = board();
        let mut renderer = attached(&board, 20);
        let generation = renderer.surface_generation();
        board.set_cell(GridPos::new(2, 2), Cell::Container);
        renderer.update_cells(&mut board, true);
        renderer.draw_field(&board);
        assert_eq!(renderer.surface_generation(), generation);
    }

    #[test]
    fn empty_update_keeps_canvas_identical() {
        let mut board = board();
        let mut renderer = attached(&board, 20);
        let before = renderer.canvas().unwrap().clone();
        assert_eq!(renderer.update_cells(&mut board, true), 0);
        assert_eq!(renderer.canvas().unwrap(), &before);
    }

    #[test]
    fn update_redraws_only_reported_cells() {
        let mut board = board();
        let mut renderer = attached(&board, 20);
        let p = *renderer.palette();

        board.set_cell(GridPos::new(2, 2), Cell::Wall);
        board.set_cell(GridPos::new(3, 2), Cell::Wall);
        // Swallow the second change so the renderer never hears about it.
        let mut changes = board.take_changed_cells();
        changes.pop();
        for pos in changes {
            renderer.draw_cell(&board, pos);
        }
        assert_eq!(renderer.update_cells(&mut board, false), 0);

        assert_eq!(at(&renderer, GridPos::new(2, 2), 2, 5), p.wall);
        assert_eq!(at(&renderer, GridPos::new(3, 2), 2, 5), p.background);
    }

    #[test]
    fn update_picks_up_changed_cells() {
        let mut board = board();
        let mut renderer = attached(&board, 20);
        let p = *renderer.palette();

        board.set_cell(GridPos::new(2, 1), Cell::Empty);
        board.set_cell(GridPos::new(3, 1), Cell::ContainerOnPlate);
        assert_eq!(renderer.update_cells(&mut board, true), 2);

        assert_eq!(at(&renderer, GridPos::new(2, 1), 10, 10), p.background);
        assert_eq!(at(&renderer, GridPos::new(3, 1), 10, 10), p.container_marker);
    }

    #[test]
    fn player_move_erases_old_sprite() {
        let mut board = board();
        let mut renderer = attached(&board, 20);
        let p = *renderer.palette();
        assert_eq!(at(&renderer, GridPos::new(1, 1), 10, 15), p.player);

        board.set_player(GridPos::new(2, 2));
        renderer.update_cells(&mut board, true);

        assert_eq!(at(&renderer, GridPos::new(1, 1), 10, 15), p.background);
        assert_eq!(at(&renderer, GridPos::new(2, 2), 10, 15), p.player);
    }

    #[test]
    fn container_on_plate_shows_plate_underneath() {
        let board = board();
        let renderer = attached(&board, 20);
        let p = *renderer.palette();
        let pos = GridPos::new(1, 2);
        // Corner: only the plate sprite covers it.
        assert_eq!(at(&renderer, pos, 0, 0), p.plate_stripe);
        // Centre: the container's marker sits on top.
        assert_eq!(at(&renderer, pos, 10, 10), p.container_marker);
    }

    #[test]
    fn glyph_cells_paint_label_pixels() {
        let mut board = board();
        let mut renderer = attached(&board, 20);
        let pos = GridPos::new(2, 2);
        board.set_cell(pos, Cell::Glyph('W'));
        renderer.update_cells(&mut board, false);

        let glyph = renderer.palette().glyph;
        let surface = renderer.surface().unwrap();
        let (x, y) = surface.cell_origin(pos).unwrap();
        let lit = (0..20u32)
            .flat_map(|dy| (0..20u32).map(move |dx| (dx, dy)))
            .filter(|(dx, dy)| surface.canvas().get(x as u32 + dx, y as u32 + dy) == Some(glyph))
            .count();
        assert!(lit > 0);
    }

    #[test]
    fn unrenderable_cells_leave_pixels_alone() {
        let mut board = board();
        let mut renderer = attached(&board, 20);
        let before = renderer.canvas().unwrap().clone();
        board.set_cell(GridPos::new(2, 2), Cell::Unrenderable(6));
        board.set_cell(GridPos::new(3, 2), Cell::Unrenderable(255));
        assert_eq!(renderer.update_cells(&mut board, false), 2);
        assert_eq!(renderer.canvas().unwrap(), &before);
    }

    #[test]
    fn oversized_surface_fails_and_detaches() {
        let mut renderer = FieldRenderer::new(GridPos::new(1000, 10));
        renderer.resize(10).unwrap();
        let err = renderer.resize(20).unwrap_err();
        assert!(matches!(err, RenderError::SurfaceTooLarge { width: 20_010, .. }));
        assert!(!renderer.is_attached());
        assert_eq!(renderer.surface_generation(), 1);
    }

    /// Logic that reports positions far outside its 2x2 grid.
    struct StrayLogic {
        player: GridPos,
        changed: Vec<GridPos>,
        stray_cell: Cell,
    }

    impl Logic for StrayLogic {
        fn from_level(_: Arc<Level>) -> Self {
            unreachable!()
        }

        fn dimensions(&self) -> GridPos {
            GridPos::new(2, 2)
        }

        fn cell_at(&self, pos: GridPos) -> Cell {
            if pos.x < 2 && pos.y < 2 {
                Cell::Empty
            } else {
                self.stray_cell
            }
        }

        fn player(&self) -> GridPos {
            self.player
        }

        fn take_changed_cells(&mut self) -> Vec<GridPos> {
            std::mem::take(&mut self.changed)
        }
    }

    fn stray(stray_cell: Cell, player: GridPos) -> StrayLogic {
        StrayLogic {
            player,
            changed: vec![
                GridPos::new(200_000_000, 0),
                GridPos::new(0, 200_000_000),
                GridPos::new(u32::MAX, u32::MAX),
                GridPos::new(3, 3),
            ],
            stray_cell,
        }
    }

    #[test]
    fn out_of_grid_changes_are_skipped() {
        let mut logic = stray(Cell::Unrenderable(u8::MAX), GridPos::new(0, 0));
        let mut renderer = FieldRenderer::new(logic.dimensions());
        renderer.resize(20).unwrap();
        renderer.draw_field(&logic);
        let before = renderer.canvas().unwrap().clone();

        assert_eq!(renderer.update_cells(&mut logic, false), 4);
        assert_eq!(renderer.canvas().unwrap(), &before);
    }

    #[test]
    fn unreachable_origins_are_skipped_for_any_cell() {
        let mut logic = stray(Cell::Wall, GridPos::new(u32::MAX, 200_000_000));
        let mut renderer = FieldRenderer::new(logic.dimensions());
        renderer.resize(20).unwrap();
        renderer.draw_field(&logic);
        assert_eq!(renderer.update_cells(&mut logic, true), 4);

        let surface = renderer.surface().unwrap();
        assert_eq!(surface.cell_origin(GridPos::new(200_000_000, 0)), None);
        assert_eq!(surface.cell_origin(GridPos::new(1, 2)), Some((25, 45)));
    }

    #[test]
    fn huge_cell_size_is_rejected() {
        let mut renderer = FieldRenderer::new(GridPos::new(1, 1));
        let err = renderer.resize(3000).unwrap_err();
        assert_eq!(
            err,
            RenderError::CellSizeTooLarge {
                requested: 3000,
                max: MAX_CELL_SIZE
            }
        );
        assert!(!renderer.is_attached());
        assert!(matches!(
            RenderSurface::new(GridPos::new(1, 1), u32::MAX, &Palette::default()),
            Err(RenderError::CellSizeTooLarge { .. })
        ));
    }

    #[test]
    fn release_detaches() {
        let board = board();
        let mut renderer = attached(&board, 16);
        renderer.release();
        assert!(!renderer.is_attached());
        renderer.draw_field(&board);
        assert!(renderer.canvas().is_none());
    }

    #[test]
    fn draw_field_starts_from_background() {
        let board = board();
        let renderer = attached(&board, 20);
        let p = *renderer.palette();
        let canvas = renderer.canvas().unwrap();
        assert_eq!(canvas.get(0, 0), Some(p.background));
        assert_eq!(canvas.get(canvas.width() - 1, canvas.height() - 1), Some(p.background));
    }
}
