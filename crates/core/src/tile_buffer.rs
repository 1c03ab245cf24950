//! Off-screen tile buffer with shift-and-patch updates.
//!
//! The buffer holds pre-composited tiles for a window of the map. Pixel
//! (0, 0) of the surface always corresponds to the top-left corner of the
//! `covered` tile rectangle, so moving the window is a single in-place scroll
//! followed by drawing the strips that became visible.
//!
//! The allocation is sized once for the largest window the viewport can need
//! and reused for every move.

use arrayvec::ArrayVec;
use tracing::{debug, trace};

use crate::error::RenderError;
use crate::map_data::MapData;
use crate::surface::{BlitMode, Surface};
use crate::types::{Rect, Rgba};

/// Counters for buffer work, accumulated since creation or the last reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RedrawStats {
    /// Tile cells repainted.
    pub tiles_drawn: u64,
    /// `tile_image` lookups issued (one per cell per visible layer).
    pub tile_fetches: u64,
    pub full_redraws: u64,
    pub partial_redraws: u64,
}

/// What an update did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redraw {
    /// The required range was already covered.
    None,
    /// Content was shifted and `strips` edge rectangles were drawn.
    Partial { strips: usize, tiles: u64 },
    /// The whole required range was drawn.
    Full { tiles: u64 },
}

impl Redraw {
    pub fn tiles(self) -> u64 {
        match self {
            Redraw::None => 0,
            Redraw::Partial { tiles, .. } | Redraw::Full { tiles } => tiles,
        }
    }
}

#[derive(Debug)]
pub struct TileBuffer {
    surface: Surface,
    cols: u32,
    rows: u32,
    tile_width: u32,
    tile_height: u32,
    covered: Rect,
    background: Rgba,
    stats: RedrawStats,
}

impl TileBuffer {
    /// Allocate a buffer able to hold `cols` x `rows` tiles.
    pub fn new(
        cols: u32,
        rows: u32,
        tile_width: u32,
        tile_height: u32,
        background: Rgba,
    ) -> Result<Self, RenderError> {
        let width = cols.checked_mul(tile_width);
        let height = rows.checked_mul(tile_height);
        let (Some(width), Some(height)) = (width, height) else {
            return Err(RenderError::BufferTooLarge {
                width: cols.saturating_mul(tile_width),
                height: rows.saturating_mul(tile_height),
            });
        };
        let surface = Surface::try_new(width, height, background)?;
        debug!(cols, rows, width, height, "allocated tile buffer");
        Ok(Self {
            surface,
            cols,
            rows,
            tile_width,
            tile_height,
            covered: Rect::EMPTY,
            background,
            stats: RedrawStats::default(),
        })
    }

    /// Capacity in tiles.
    pub fn capacity(&self) -> (u32, u32) {
        (self.cols, self.rows)
    }

    /// Tile rectangle whose content is currently valid.
    pub fn covered(&self) -> Rect {
        self.covered
    }

    /// `covered` in map pixels.
    pub fn covered_pixels(&self) -> Rect {
        let (tw, th) = (self.tile_width as i32, self.tile_height as i32);
        Rect::new(
            self.covered.x * tw,
            self.covered.y * th,
            self.covered.w * tw,
            self.covered.h * th,
        )
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn background(&self) -> Rgba {
        self.background
    }

    pub fn stats(&self) -> RedrawStats {
        self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = RedrawStats::default();
    }

    /// Mark all content stale; the next update draws in full.
    pub fn invalidate(&mut self) {
        self.covered = Rect::EMPTY;
    }

    /// Map pixel position to buffer pixel position.
    pub fn map_to_buffer(&self, x: i32, y: i32) -> (i32, i32) {
        let origin = self.covered_pixels();
        (x - origin.x, y - origin.y)
    }

    /// Bring the buffer up to date for `required` (tile units).
    ///
    /// Only tiles outside the previously covered range are fetched, unless
    /// the two ranges do not overlap at all.
    pub fn update<M: MapData + ?Sized>(&mut self, required: Rect, map: &M) -> Redraw {
        let required = self.fit(required);
        if self.covered.contains_rect(required) {
            return Redraw::None;
        }

        let old = self.covered;
        let overlap = old.intersection(required);
        if overlap.is_empty() {
            return self.redraw_all(required, map);
        }

        let dx = (old.x - required.x) * self.tile_width as i32;
        let dy = (old.y - required.y) * self.tile_height as i32;
        self.surface.scroll(dx, dy);
        self.covered = required;

        let strips = exposed_strips(required, overlap);
        let mut tiles = 0;
        for strip in &strips {
            tiles += self.draw_rect(*strip, map);
        }
        self.stats.partial_redraws += 1;
        trace!(?old, ?required, strips = strips.len(), tiles, "patched tile buffer");
        Redraw::Partial {
            strips: strips.len(),
            tiles,
        }
    }

    /// Discard content and draw all of `required`.
    pub fn redraw_all<M: MapData + ?Sized>(&mut self, required: Rect, map: &M) -> Redraw {
        let required = self.fit(required);
        self.surface.fill(self.background);
        self.covered = required;
        let tiles = self.draw_rect(required, map);
        self.stats.full_redraws += 1;
        debug!(?required, tiles, "full tile buffer redraw");
        Redraw::Full { tiles }
    }

    /// Repaint one tile if it is inside `covered`.
    pub fn redraw_tile<M: MapData + ?Sized>(&mut self, x: i32, y: i32, map: &M) -> bool {
        if !self.covered.contains(x, y) {
            return false;
        }
        self.draw_tile(x, y, map);
        true
    }

    fn fit(&self, required: Rect) -> Rect {
        debug_assert!(
            required.w <= self.cols as i32 && required.h <= self.rows as i32,
            "required range {required:?} exceeds buffer capacity {}x{}",
            self.cols,
            self.rows
        );
        if required.is_empty() {
            return Rect::EMPTY;
        }
        required.intersection(Rect::new(required.x, required.y, self.cols as i32, self.rows as i32))
    }

    fn draw_rect<M: MapData + ?Sized>(&mut self, rect: Rect, map: &M) -> u64 {
        for y in rect.y..rect.bottom() {
            for x in rect.x..rect.right() {
                self.draw_tile(x, y, map);
            }
        }
        rect.area()
    }

    fn draw_tile<M: MapData + ?Sized>(&mut self, x: i32, y: i32, map: &M) {
        let (tw, th) = (self.tile_width as i32, self.tile_height as i32);
        let cell = Rect::new((x - self.covered.x) * tw, (y - self.covered.y) * th, tw, th);
        self.surface.fill_rect(cell, self.background);
        for &layer in map.visible_tile_layers() {
            self.stats.tile_fetches += 1;
            if let Some(image) = map.tile_image(x, y, layer) {
                self.surface
                    .blit_region(image, image.rect(), cell.x, cell.y, cell, BlitMode::Over);
            }
        }
        self.stats.tiles_drawn += 1;
    }
}

/// Parts of `required` outside `overlap`: full-height left/right columns,
/// then top/bottom rows limited to the overlap's columns so corners are drawn
/// once.
fn exposed_strips(required: Rect, overlap: Rect) -> ArrayVec<Rect, 4> {
    let mut strips = ArrayVec::new();
    let candidates = [
        Rect::from_edges(required.x, required.y, overlap.x, required.bottom()),
        Rect::from_edges(overlap.right(), required.y, required.right(), required.bottom()),
        Rect::from_edges(overlap.x, required.y, overlap.right(), overlap.y),
        Rect::from_edges(overlap.x, overlap.bottom(), overlap.right(), required.bottom()),
    ];
    for strip in candidates {
        if !strip.is_empty() {
            strips.push(strip);
        }
    }
    strips
}
