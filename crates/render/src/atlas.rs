//! Procedurally generated sprite atlas.
//!
//! One horizontal strip of six `z x z` tiles in fixed slot order. Tiles are
//! drawn from shape primitives scaled by `z`, so the atlas stays crisp at any
//! cell size without image assets.

use pushbox_common::Cell;

use crate::canvas::{Canvas, PixelRect};
use crate::config::Palette;
use crate::field::MAX_SURFACE_EDGE;

/// Smallest cell size the atlas is generated at. Smaller requests are raised
/// to this floor.
pub const MIN_CELL_SIZE: u32 = 10;

/// Largest cell size whose atlas strip fits within [`MAX_SURFACE_EDGE`].
pub const MAX_CELL_SIZE: u32 = MAX_SURFACE_EDGE / Sprite::COUNT as u32;

/// Clamp a requested cell size to `MIN_CELL_SIZE..=MAX_CELL_SIZE`.
pub fn effective_cell_size(requested: u32) -> u32 {
    requested.clamp(MIN_CELL_SIZE, MAX_CELL_SIZE)
}

/// Atlas slots, in strip order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sprite {
    Empty,
    Wall,
    Container,
    Plate,
    ContainerOnPlate,
    Player,
}

impl Sprite {
    pub const COUNT: usize = 6;

    pub const ALL: [Sprite; Self::COUNT] = [
        Sprite::Empty,
        Sprite::Wall,
        Sprite::Container,
        Sprite::Plate,
        Sprite::ContainerOnPlate,
        Sprite::Player,
    ];

    /// Slot position in the strip.
    pub fn index(self) -> u32 {
        self as u32
    }

    /// Sprite layers for a cell, bottom first. Glyph and unrenderable cells
    /// have none.
    ///
    /// A container on a plate composites the plate underneath: its own sprite
    /// leaves the plate visible around the edges.
    pub fn layers_for(cell: Cell) -> &'static [Sprite] {
        match cell {
            Cell::Empty => &[Sprite::Empty],
            Cell::Wall => &[Sprite::Wall],
            Cell::Container => &[Sprite::Container],
            Cell::Plate => &[Sprite::Plate],
            Cell::ContainerOnPlate => &[Sprite::Plate, Sprite::ContainerOnPlate],
            Cell::Glyph(_) | Cell::Unrenderable(_) => &[],
        }
    }
}

/// Sprite strip at one cell size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteAtlas {
    cell_size: u32,
    image: Canvas,
}

impl SpriteAtlas {
    /// Draw every tile at `cell_size`, clamped by [`effective_cell_size`].
    pub fn generate(cell_size: u32, palette: &Palette) -> Self {
        let z = effective_cell_size(cell_size);
        let _span = tracing::debug_span!("generate_atlas", z).entered();

        let mut image = Canvas::new(z * Sprite::COUNT as u32, z);
        for sprite in Sprite::ALL {
            let tile = draw_tile(sprite, z as i32, palette);
            image.blit(&tile, PixelRect::new(0, 0, z, z), (sprite.index() * z) as i32, 0);
        }

        tracing::debug!(z, width = image.width(), "sprite atlas generated");
        Self {
            cell_size: z,
            image,
        }
    }

    /// Effective cell size the tiles were drawn at.
    pub fn cell_size(&self) -> u32 {
        self.cell_size
    }

    /// The whole strip.
    pub fn image(&self) -> &Canvas {
        &self.image
    }

    /// Pixel region of a sprite within the strip.
    pub fn region(&self, sprite: Sprite) -> PixelRect {
        let z = self.cell_size;
        PixelRect::new(sprite.index() * z, 0, z, z)
    }

    /// Composite a sprite onto `target` with its top-left corner at (`x`, `y`).
    pub fn blit_to(&self, target: &mut Canvas, sprite: Sprite, x: i32, y: i32) {
        target.blit(&self.image, self.region(sprite), x, y);
    }
}

/// Draw one tile on its own `z x z` canvas so wide pens cannot bleed into a
/// neighbouring slot.
fn draw_tile(sprite: Sprite, z: i32, p: &Palette) -> Canvas {
    let mut t = Canvas::new(z as u32, z as u32);
    match sprite {
        Sprite::Empty => t.fill_rect(0, 0, z, z, p.background),
        Sprite::Wall => {
            let pen = z / 15 | 1;
            t.fill_rect(0, 0, z, z, p.wall);
            // Two courses of bricks with staggered joints.
            t.draw_line((0, 0), (z, 0), pen, p.wall_mortar);
            t.draw_line((0, z / 2), (z, z / 2), pen, p.wall_mortar);
            t.draw_line((z / 4, 0), (z / 4, z / 2), pen, p.wall_mortar);
            t.draw_line((z / 4 * 3, 0), (z / 4 * 3, z / 2), pen, p.wall_mortar);
            t.draw_line((z / 2, z / 2), (z / 2, z), pen, p.wall_mortar);
        }
        Sprite::Container => draw_container(&mut t, z, p),
        Sprite::Plate => {
            let q = z / 4;
            t.fill_rect(0, 0, z, z, p.plate);
            t.fill_polygon(&[(0, 0), (q, 0), (0, q)], p.plate_stripe);
            t.fill_polygon(&[(z, z), (z, z - q), (z - q, z)], p.plate_stripe);
            t.fill_polygon(
                &[(0, z), (0, z - q), (z - q, 0), (z, 0), (z, q), (q, z)],
                p.plate_stripe,
            );
        }
        Sprite::ContainerOnPlate => {
            draw_container(&mut t, z, p);
            let pen = z / 10 | 1;
            t.draw_line((2, 2), (z - 3, z - 3), pen, p.container_marker);
            t.draw_line((2, z - 3), (z - 3, 2), pen, p.container_marker);
        }
        Sprite::Player => {
            t.fill_ellipse(2, 2, z - 2, z - 2, p.player);
            // tail
            t.fill_ellipse(0, z - z / 2, z / 2, z / 2, p.player);
            t.fill_ellipse(z / 3 + 1, z / 3, z / 5, z / 5, p.player_eye);
            t.fill_ellipse(z / 3 * 2 + 1, z / 3, z / 5, z / 5, p.player_eye);
        }
    }
    t
}

fn draw_container(t: &mut Canvas, z: i32, p: &Palette) {
    t.fill_rect(1, 1, z - 3, z - 3, p.container);
    t.stroke_rect(1, 1, z - 3, z - 3, p.container_edge);
}
