//! RGBA pixel canvas and the drawing primitives the atlas is built from.

use bytemuck::{Pod, Zeroable};

/// 8-bit straight-alpha RGBA color.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Pod, Zeroable)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Composite `self` over `dst` (source-over).
    pub fn over(self, dst: Rgba) -> Rgba {
        match self.a {
            255 => self,
            0 => dst,
            sa => {
                let sa = sa as u32;
                let da = dst.a as u32 * (255 - sa) / 255;
                let out_a = sa + da;
                let mix = |s: u8, d: u8| ((s as u32 * sa + d as u32 * da) / out_a) as u8;
                Rgba::new(
                    mix(self.r, dst.r),
                    mix(self.g, dst.g),
                    mix(self.b, dst.b),
                    out_a as u8,
                )
            }
        }
    }
}

/// Axis-aligned pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Owned RGBA image. All drawing is clipped to the canvas bounds and
/// composited source-over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
}

impl Canvas {
    /// Fully transparent canvas.
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, Rgba::TRANSPARENT)
    }

    pub fn filled(width: u32, height: u32, color: Rgba) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major pixels.
    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    /// Raw RGBA8 bytes, row-major, ready to hand to an image encoder or a
    /// texture upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    #[inline(always)]
    fn idx(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    pub fn get(&self, x: u32, y: u32) -> Option<Rgba> {
        self.idx(x as i32, y as i32).map(|i| self.pixels[i])
    }

    /// Composite one pixel. Out-of-bounds writes are dropped.
    pub fn put(&mut self, x: i32, y: i32, color: Rgba) {
        if let Some(i) = self.idx(x, y) {
            self.pixels[i] = color.over(self.pixels[i]);
        }
    }

    /// Overwrite every pixel.
    pub fn clear(&mut self, color: Rgba) {
        self.pixels.fill(color);
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Rgba) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = x.saturating_add(w).min(self.width as i32);
        let y1 = y.saturating_add(h).min(self.height as i32);
        for py in y0..y1 {
            for px in x0..x1 {
                self.put(px, py, color);
            }
        }
    }

    /// One-pixel outline. Both edges are inclusive, so the outline covers
    /// `(w + 1) x (h + 1)` pixels.
    pub fn stroke_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Rgba) {
        self.fill_rect(x, y, w + 1, 1, color);
        self.fill_rect(x, y + h, w + 1, 1, color);
        self.fill_rect(x, y + 1, 1, h - 1, color);
        self.fill_rect(x + w, y + 1, 1, h - 1, color);
    }

    /// Straight line with a square pen `width` pixels wide. Endpoints are
    /// inclusive.
    pub fn draw_line(&mut self, from: (i32, i32), to: (i32, i32), width: i32, color: Rgba) {
        let (mut x, mut y) = from;
        let dx = (to.0 - x).abs();
        let dy = -(to.1 - y).abs();
        let sx = if x < to.0 { 1 } else { -1 };
        let sy = if y < to.1 { 1 } else { -1 };
        let mut err = dx + dy;
        let width = width.max(1);
        let half = width / 2;

        loop {
            self.fill_rect(x - half, y - half, width, width, color);
            if x == to.0 && y == to.1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Even-odd scanline fill, sampling at pixel centers.
    pub fn fill_polygon(&mut self, points: &[(i32, i32)], color: Rgba) {
        if points.len() < 3 {
            return;
        }
        let min_y = points.iter().map(|p| p.1).min().unwrap_or(0).max(0);
        let max_y = points
            .iter()
            .map(|p| p.1)
            .max()
            .unwrap_or(0)
            .min(self.height as i32);

        let mut crossings: Vec<f32> = Vec::with_capacity(points.len());
        for py in min_y..max_y {
            let y = py as f32 + 0.5;
            crossings.clear();
            for (i, &(x0, y0)) in points.iter().enumerate() {
                let (x1, y1) = points[(i + 1) % points.len()];
                let (fy0, fy1) = (y0 as f32, y1 as f32);
                if (fy0 <= y && y < fy1) || (fy1 <= y && y < fy0) {
                    let t = (y - fy0) / (fy1 - fy0);
                    crossings.push(x0 as f32 + t * (x1 - x0) as f32);
                }
            }
            crossings.sort_by(f32::total_cmp);
            for span in crossings.chunks_exact(2) {
                let start = (span[0] - 0.5).ceil() as i32;
                let end = (span[1] - 0.5).ceil() as i32;
                for px in start..end {
                    self.put(px, py, color);
                }
            }
        }
    }

    /// Filled ellipse inscribed in the given bounding box.
    pub fn fill_ellipse(&mut self, x: i32, y: i32, w: i32, h: i32, color: Rgba) {
        if w <= 0 || h <= 0 {
            return;
        }
        let rx = w as f32 / 2.0;
        let ry = h as f32 / 2.0;
        let cx = x as f32 + rx;
        let cy = y as f32 + ry;
        for py in y..y + h {
            for px in x..x + w {
                let nx = (px as f32 + 0.5 - cx) / rx;
                let ny = (py as f32 + 0.5 - cy) / ry;
                if nx * nx + ny * ny <= 1.0 {
                    self.put(px, py, color);
                }
            }
        }
    }

    /// Composite the `src_rect` region of `src` onto this canvas with its
    /// top-left corner at (`x`, `y`).
    pub fn blit(&mut self, src: &Canvas, src_rect: PixelRect, x: i32, y: i32) {
        for dy in 0..src_rect.height {
            for dx in 0..src_rect.width {
                if let Some(color) = src.get(src_rect.x + dx, src_rect.y + dy) {
                    self.put(x.saturating_add(dx as i32), y.saturating_add(dy as i32), color);
                }
            }
        }
    }
}
