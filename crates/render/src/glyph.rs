use font8x8::{BASIC_FONTS, LATIN_FONTS, UnicodeFonts};

use crate::canvas::{Canvas, Rgba};

/// Glyph height relative to the cell size.
pub const GLYPH_SCALE: f32 = 0.9;

/// Draw `ch` as a one-character label scaled to `size` pixels, with its
/// top-left corner at (`x`, `y`). Only set bits are painted; the cell
/// underneath shows through.
///
/// Returns `false` when the font has no bitmap for `ch`.
pub fn draw_glyph(canvas: &mut Canvas, ch: char, x: i32, y: i32, size: u32, color: Rgba) -> bool {
    let Some(bitmap) = BASIC_FONTS.get(ch).or_else(|| LATIN_FONTS.get(ch)) else {
        return false;
    };
    if size == 0 {
        return true;
    }
    for dy in 0..size {
        let row = bitmap[(dy * 8 / size) as usize];
        for dx in 0..size {
            let bit = dx * 8 / size;
            if row & (1 << bit) != 0 {
                canvas.put(x.saturating_add(dx as i32), y.saturating_add(dy as i32), color);
            }
        }
    }
    true
}

/// Pixel size of a glyph label for a cell size.
pub fn glyph_size(cell_size: u32) -> u32 {
    (cell_size as f32 * GLYPH_SCALE).round() as u32
}
