//! Cell framebuffer for terminal presentation.
//!
//! Each terminal cell shows two vertically stacked pixels using the upper
//! half block glyph: the foreground color paints the top pixel and the
//! background color the bottom one.

use scrollmap_core::types::Rgba;
use scrollmap_core::Surface;

/// Glyph used for every pixel cell.
pub const HALF_BLOCK: char = '▀';

/// 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl From<Rgba> for Rgb {
    fn from(c: Rgba) -> Self {
        Rgb::new(c.r, c.g, c.b)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellStyle {
    pub fg: Rgb,
    pub bg: Rgb,
}

impl Default for CellStyle {
    fn default() -> Self {
        Self {
            fg: Rgb::new(220, 220, 220),
            bg: Rgb::new(0, 0, 0),
        }
    }
}

/// A single terminal cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub style: CellStyle,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            style: CellStyle::default(),
        }
    }
}

/// 2D framebuffer of styled character cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    pub fn new(width: u16, height: u16) -> Self {
        let len = (width as usize) * (height as usize);
        Self {
            width,
            height,
            cells: vec![Cell::default(); len],
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Resize the framebuffer.
    ///
    /// This preserves the underlying allocation when possible.
    pub fn resize(&mut self, width: u16, height: u16) {
        if self.width == width && self.height == height {
            return;
        }
        self.width = width;
        self.height = height;
        let len = (width as usize) * (height as usize);
        self.cells.resize(len, Cell::default());
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    #[inline(always)]
    fn idx(&self, x: u16, y: u16) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some((y as usize) * (self.width as usize) + (x as usize))
    }

    pub fn get(&self, x: u16, y: u16) -> Option<Cell> {
        self.idx(x, y).map(|i| self.cells[i])
    }

    pub fn set(&mut self, x: u16, y: u16, cell: Cell) {
        if let Some(i) = self.idx(x, y) {
            self.cells[i] = cell;
        }
    }

    pub fn clear(&mut self, cell: Cell) {
        self.cells.fill(cell);
    }

    /// Overwrite the top-left corner with text (status lines).
    pub fn put_str(&mut self, x: u16, y: u16, s: &str, style: CellStyle) {
        let mut cx = x;
        for ch in s.chars() {
            if cx >= self.width {
                break;
            }
            self.set(cx, y, Cell { ch, style });
            cx += 1;
        }
    }

    /// Resize to fit `surface` (one cell per column, two pixel rows per
    /// cell) and convert it. An odd last pixel row is paired with black.
    pub fn fill_from_surface(&mut self, surface: &Surface) {
        let w = surface.width().min(u16::MAX as u32) as u16;
        let h = surface.height().div_ceil(2).min(u16::MAX as u32) as u16;
        self.resize(w, h);
        for cy in 0..h {
            for cx in 0..w {
                let top = surface.get(cx as i32, 2 * cy as i32).unwrap_or(Rgba::BLACK);
                let bottom = surface
                    .get(cx as i32, 2 * cy as i32 + 1)
                    .unwrap_or(Rgba::BLACK);
                self.set(
                    cx,
                    cy,
                    Cell {
                        ch: HALF_BLOCK,
                        style: CellStyle {
                            fg: top.into(),
                            bg: bottom.into(),
                        },
                    },
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surface_pixels_pair_into_cells() {
        let mut s = Surface::filled(2, 3, Rgba::rgb(10, 20, 30));
        s.set(1, 1, Rgba::rgb(200, 0, 0));
        let mut fb = FrameBuffer::new(0, 0);
        fb.fill_from_surface(&s);

        assert_eq!((fb.width(), fb.height()), (2, 2));
        let c = fb.get(1, 0).unwrap();
        assert_eq!(c.ch, HALF_BLOCK);
        assert_eq!(c.style.fg, Rgb::new(10, 20, 30));
        assert_eq!(c.style.bg, Rgb::new(200, 0, 0));
        // Odd row: bottom half falls off the surface.
        assert_eq!(fb.get(0, 1).unwrap().style.bg, Rgb::new(0, 0, 0));
    }

    #[test]
    fn put_str_stops_at_edge() {
        let mut fb = FrameBuffer::new(3, 1);
        fb.put_str(1, 0, "abc", CellStyle::default());
        assert_eq!(fb.get(1, 0).unwrap().ch, 'a');
        assert_eq!(fb.get(2, 0).unwrap().ch, 'b');
    }
}
