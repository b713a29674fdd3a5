//! Field rendering: procedural sprite atlas, RGBA canvas, incremental redraw.
//!
//! # Invariants
//! - Renderer never mutates game state; it reads through `Logic`.
//! - Canvas and atlas live in one `RenderSurface`, replaced as a unit on
//!   resize. There is never a canvas at one cell size and an atlas at another.
//! - Draw calls on a detached renderer are no-ops.
//! - Unknown cell states never fail a draw: glyphs are lettered, the rest
//!   skipped.

mod atlas;
mod canvas;
mod config;
mod field;
mod glyph;

pub use atlas::{MAX_CELL_SIZE, MIN_CELL_SIZE, Sprite, SpriteAtlas, effective_cell_size};
pub use canvas::{Canvas, PixelRect, Rgba};
pub use config::{Palette, RenderConfig};
pub use field::{FieldRenderer, MAX_SURFACE_EDGE, RenderError, RenderSurface};
pub use glyph::{GLYPH_SCALE, draw_glyph, glyph_size};

pub fn crate_info() -> &'static str {
    "pushbox-render v0.1.0"
}
