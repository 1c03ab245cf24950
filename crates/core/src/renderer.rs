//! BufferedRenderer: camera, tile buffer upkeep and per-frame blits.
//!
//! The renderer keeps a [`TileBuffer`] covering the viewport plus a margin of
//! `padding` tiles on every side. Centering the camera updates the buffer
//! immediately, redrawing only tiles that scrolled into the margin; drawing a
//! frame is a single clipped blit from the buffer.
//!
//! # Example
//!
//! ```
//! use scrollmap_core::{BufferedRenderer, GridMapData, Surface};
//! use scrollmap_core::types::{Point, Rgba, Size};
//!
//! let mut map = GridMapData::new(20, 20, 8, 8).unwrap();
//! let grass = map.add_tile_image(Surface::filled(8, 8, Rgba::rgb(0, 160, 0))).unwrap();
//! let ground = map.add_layer("ground");
//! map.fill_layer(ground, Some(grass)).unwrap();
//!
//! let mut renderer = BufferedRenderer::new(&map, Size::new(32, 24)).unwrap();
//! renderer.center(Point::new(80.0, 80.0));
//! renderer.scroll(Point::new(4.0, 0.0));
//!
//! let mut frame = Surface::new(32, 24);
//! renderer.draw(&mut frame, None);
//! assert_eq!(frame.get(0, 0), Some(Rgba::rgb(0, 160, 0)));
//! ```

use std::collections::VecDeque;
use std::fmt;

use tracing::debug;

use crate::config::RendererConfig;
use crate::error::{RenderError, Result};
use crate::map_data::{validate_map_data, MapData};
use crate::surface::{BlitMode, Surface};
use crate::tile_buffer::{Redraw, RedrawStats, TileBuffer};
use crate::types::{Point, Rect, Size};

/// Largest center coordinate magnitude, in map pixels.
///
/// Keeps the camera, the viewport edges and the padded tile range inside
/// `i32` for any valid viewport size.
pub const MAX_CENTER: f32 = (i32::MAX / 4) as f32;

pub struct BufferedRenderer<M: MapData> {
    data: M,
    config: RendererConfig,
    size: Size,
    buffer: TileBuffer,
    /// Whole map in pixels.
    map_rect: Rect,
    center: Point,
    /// Top-left corner of the viewport in map pixels.
    camera: (i32, i32),
    idle: bool,
    pending: VecDeque<(i32, i32)>,
}

impl<M: MapData> fmt::Debug for BufferedRenderer<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BufferedRenderer")
            .field("size", &self.size)
            .field("center", &self.center)
            .field("camera", &self.camera)
            .field("covered", &self.buffer.covered())
            .field("pending", &self.pending.len())
            .finish_non_exhaustive()
    }
}

impl<M: MapData> BufferedRenderer<M> {
    pub fn new(data: M, size: Size) -> Result<Self> {
        Self::with_config(data, size, RendererConfig::default())
    }

    pub fn with_config(data: M, size: Size, config: RendererConfig) -> Result<Self> {
        config.validate()?;
        validate_map_data(&data)?;
        check_viewport(size)?;
        let buffer = allocate_buffer(&data, size, &config)?;
        let map_rect = map_pixel_rect(&data);

        let mut renderer = Self {
            data,
            config,
            size,
            buffer,
            map_rect,
            center: Point::ZERO,
            camera: (0, 0),
            idle: false,
            pending: VecDeque::new(),
        };
        // Start with the viewport's top-left corner on the map origin.
        let start = Point::new((size.width / 2) as f32, (size.height / 2) as f32);
        renderer.center(start);
        Ok(renderer)
    }

    pub fn data(&self) -> &M {
        &self.data
    }

    /// Replace the map source, returning the previous one.
    ///
    /// The buffer is reallocated for the new tile size and fully redrawn.
    /// Queued tile updates are discarded.
    pub fn set_data(&mut self, data: M) -> Result<M> {
        validate_map_data(&data)?;
        let buffer = allocate_buffer(&data, self.size, &self.config)?;
        let old = std::mem::replace(&mut self.data, data);
        self.buffer = buffer;
        self.map_rect = map_pixel_rect(&self.data);
        self.pending.clear();
        debug!(map = ?self.map_rect, "map data replaced");
        self.recenter_full();
        Ok(old)
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Viewport size in pixels.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Change the viewport size. Reallocates the buffer and redraws it fully;
    /// the current center is kept.
    pub fn resize(&mut self, size: Size) -> Result<()> {
        if size == self.size {
            return Ok(());
        }
        check_viewport(size)?;
        let buffer = allocate_buffer(&self.data, size, &self.config)?;
        debug!(from = ?self.size, to = ?size, "viewport resized");
        self.buffer = buffer;
        self.size = size;
        self.recenter_full();
        Ok(())
    }

    /// Toggle camera clamping and re-apply the current center.
    pub fn set_clamp_camera(&mut self, clamp: bool) -> Redraw {
        self.config.clamp_camera = clamp;
        self.center(self.center)
    }

    /// Center the viewport on a map pixel.
    ///
    /// The buffer is brought up to date before returning. Non-finite
    /// coordinates are ignored; finite ones are limited to
    /// `±MAX_CENTER` pixels.
    pub fn center(&mut self, point: Point) -> Redraw {
        if !point.x.is_finite() || !point.y.is_finite() {
            return Redraw::None;
        }
        let point = Point::new(
            point.x.clamp(-MAX_CENTER, MAX_CENTER),
            point.y.clamp(-MAX_CENTER, MAX_CENTER),
        );
        let (cx, cy) = self.clamp_center(point.x.round() as i32, point.y.round() as i32);
        self.center = if self.config.clamp_camera {
            let clamped = (cx as f32 - point.x.round(), cy as f32 - point.y.round());
            Point::new(point.x + clamped.0, point.y + clamped.1)
        } else {
            point
        };

        let camera = (cx - (self.size.width / 2) as i32, cy - (self.size.height / 2) as i32);
        self.idle = camera == self.camera && !self.buffer.covered().is_empty();
        self.camera = camera;
        let required = self.required_tiles();
        self.buffer.update(required, &self.data)
    }

    /// Move the center by `delta` pixels.
    pub fn scroll(&mut self, delta: Point) -> Redraw {
        self.center(self.center + delta)
    }

    pub fn center_point(&self) -> Point {
        self.center
    }

    /// Viewport top-left in map pixels; subtract from map positions to get
    /// screen positions.
    pub fn camera_offset(&self) -> Point {
        Point::new(self.camera.0 as f32, self.camera.1 as f32)
    }

    /// Translation from map to screen coordinates.
    pub fn sprite_offset(&self) -> Point {
        -self.camera_offset()
    }

    /// Whether the last center call left the camera where it was.
    pub fn is_idle(&self) -> bool {
        self.idle
    }

    /// The whole map in pixels.
    pub fn map_rect(&self) -> Rect {
        self.map_rect
    }

    /// The viewport in map pixels.
    pub fn view_rect(&self) -> Rect {
        Rect::new(
            self.camera.0,
            self.camera.1,
            self.size.width as i32,
            self.size.height as i32,
        )
    }

    /// Tiles touched by the viewport (unclamped; may extend past the map).
    pub fn visible_tiles(&self) -> Rect {
        let (tw, th) = (self.data.tile_width() as i32, self.data.tile_height() as i32);
        let v = self.view_rect();
        Rect::from_edges(
            v.x.div_euclid(tw),
            v.y.div_euclid(th),
            div_ceil(v.right(), tw),
            div_ceil(v.bottom(), th),
        )
    }

    /// Tiles the buffer must hold: visible tiles plus padding, clamped to
    /// the map.
    pub fn required_tiles(&self) -> Rect {
        let pad = self.config.padding as i32;
        let map = Rect::new(0, 0, self.data.width() as i32, self.data.height() as i32);
        self.visible_tiles().inflate(pad, pad).intersection(map)
    }

    /// Tiles currently held by the buffer.
    pub fn covered_tiles(&self) -> Rect {
        self.buffer.covered()
    }

    pub fn buffer(&self) -> &TileBuffer {
        &self.buffer
    }

    pub fn stats(&self) -> RedrawStats {
        self.buffer.stats()
    }

    pub fn reset_stats(&mut self) {
        self.buffer.reset_stats();
    }

    /// Discard the buffer and draw the required range from scratch.
    pub fn redraw(&mut self) -> Redraw {
        self.pending.clear();
        let required = self.required_tiles();
        self.buffer.redraw_all(required, &self.data)
    }

    /// Queue one tile for repainting, e.g. after its image changed.
    pub fn update_tile(&mut self, x: i32, y: i32) {
        self.pending.push_back((x, y));
    }

    pub fn update_tiles(&mut self, tiles: impl IntoIterator<Item = (i32, i32)>) {
        self.pending.extend(tiles);
    }

    pub fn pending_tiles(&self) -> usize {
        self.pending.len()
    }

    /// Repaint at most `update_rate` queued tiles. Returns how many queue
    /// entries were consumed.
    pub fn update(&mut self) -> usize {
        self.drain_pending(self.config.update_rate)
    }

    /// Repaint every queued tile.
    pub fn flush(&mut self) -> usize {
        self.drain_pending(usize::MAX)
    }

    /// Draw the viewport into `dst` at the top-left of `area` (defaults to
    /// the whole destination), clipped to `area`.
    ///
    /// Parts of the viewport outside the map are filled with the background
    /// color. Returns the screen rectangle written.
    pub fn draw(&mut self, dst: &mut Surface, area: Option<Rect>) -> Rect {
        if self.config.flush_on_draw {
            self.flush();
        }
        let screen = self.screen_rect(dst, area);
        if screen.is_empty() {
            return Rect::EMPTY;
        }

        let (ox, oy) = (screen.x - self.camera.0, screen.y - self.camera.1);
        let covered = self.buffer.covered_pixels();
        if !covered.translate(ox, oy).contains_rect(screen) {
            dst.fill_rect(screen, self.buffer.background());
        }

        let src_map = self.view_rect().intersection(covered);
        if !src_map.is_empty() {
            let (bx, by) = self.buffer.map_to_buffer(src_map.x, src_map.y);
            dst.blit_region(
                self.buffer.surface(),
                Rect::new(bx, by, src_map.w, src_map.h),
                src_map.x + ox,
                src_map.y + oy,
                screen,
                BlitMode::Over,
            );
        }
        screen
    }

    /// Redraw the tiles of `layers`, in the given order, over the screen
    /// rectangle `rect` of a frame previously drawn with the same `area`.
    ///
    /// Used to put higher map layers back on top of sprites.
    pub fn draw_layers_over(
        &self,
        dst: &mut Surface,
        area: Option<Rect>,
        rect: Rect,
        layers: &[usize],
    ) {
        if layers.is_empty() {
            return;
        }
        let screen = self.screen_rect(dst, area);
        let clip = rect.intersection(screen);
        if clip.is_empty() {
            return;
        }

        let (ox, oy) = (screen.x - self.camera.0, screen.y - self.camera.1);
        let (tw, th) = (self.data.tile_width() as i32, self.data.tile_height() as i32);
        let in_map = clip.translate(-ox, -oy).intersection(self.map_rect);
        if in_map.is_empty() {
            return;
        }
        let tiles = Rect::from_edges(
            in_map.x.div_euclid(tw),
            in_map.y.div_euclid(th),
            div_ceil(in_map.right(), tw),
            div_ceil(in_map.bottom(), th),
        );

        for ty in tiles.y..tiles.bottom() {
            for tx in tiles.x..tiles.right() {
                let cell = Rect::new(tx * tw + ox, ty * th + oy, tw, th);
                let cell_clip = cell.intersection(clip);
                for &layer in layers {
                    if let Some(image) = self.data.tile_image(tx, ty, layer) {
                        let (x, y) = (cell.x, cell.y);
                        dst.blit_region(image, image.rect(), x, y, cell_clip, BlitMode::Over);
                    }
                }
            }
        }
    }

    /// Where the viewport lands on `dst`.
    fn screen_rect(&self, dst: &Surface, area: Option<Rect>) -> Rect {
        let area = area.unwrap_or_else(|| dst.rect()).intersection(dst.rect());
        if area.is_empty() {
            return Rect::EMPTY;
        }
        let (w, h) = (self.size.width as i32, self.size.height as i32);
        Rect::new(area.x, area.y, w, h).intersection(area)
    }

    fn clamp_center(&self, cx: i32, cy: i32) -> (i32, i32) {
        if !self.config.clamp_camera {
            return (cx, cy);
        }
        let clamp_axis = |c: i32, view: i32, map: i32| {
            let half = view / 2;
            if map <= view {
                // Map smaller than the viewport: keep it centered.
                (map - view) / 2 + half
            } else {
                c.clamp(half, map - view + half)
            }
        };
        (
            clamp_axis(cx, self.size.width as i32, self.map_rect.w),
            clamp_axis(cy, self.size.height as i32, self.map_rect.h),
        )
    }

    fn recenter_full(&mut self) {
        self.buffer.invalidate();
        self.center(self.center);
    }

    fn drain_pending(&mut self, limit: usize) -> usize {
        let mut n = 0;
        while n < limit {
            let Some((x, y)) = self.pending.pop_front() else {
                break;
            };
            self.buffer.redraw_tile(x, y, &self.data);
            n += 1;
        }
        n
    }
}

fn check_viewport(size: Size) -> Result<()> {
    if size.is_empty() || size.width > i32::MAX as u32 || size.height > i32::MAX as u32 {
        return Err(RenderError::InvalidViewport {
            width: size.width,
            height: size.height,
        });
    }
    Ok(())
}

/// Buffer capacity: the widest possible visible span (one extra tile for a
/// sub-tile offset) plus padding on both sides.
fn allocate_buffer<M: MapData>(
    data: &M,
    size: Size,
    config: &RendererConfig,
) -> Result<TileBuffer> {
    let (tw, th) = (data.tile_width(), data.tile_height());
    let extra = config.padding.saturating_mul(2).saturating_add(1);
    let cols = size.width.div_ceil(tw).saturating_add(extra);
    let rows = size.height.div_ceil(th).saturating_add(extra);
    TileBuffer::new(cols, rows, tw, th, config.background)
}

fn map_pixel_rect<M: MapData>(data: &M) -> Rect {
    Rect::new(
        0,
        0,
        data.width().saturating_mul(data.tile_width()).min(i32::MAX as u32) as i32,
        data.height().saturating_mul(data.tile_height()).min(i32::MAX as u32) as i32,
    )
}

fn div_ceil(a: i32, b: i32) -> i32 {
    -(-a).div_euclid(b)
}
