#![allow(dead_code)]

use std::cell::RefCell;

use scrollmap::core::{BufferedRenderer, GridMapData, MapData, Surface};
use scrollmap::types::{Rect, Rgba};

/// Base layer with one distinct color per tile, plus an overlay layer of
/// checkered (half transparent) tiles on every third diagonal.
pub fn coded_map(w: u32, h: u32, tile: u32) -> GridMapData {
    let mut map = GridMapData::new(w, h, tile, tile).unwrap();
    let base = map.add_layer("base");
    let overlay = map.add_layer("overlay");

    let mut checker = Surface::new(tile, tile);
    for y in 0..tile as i32 {
        for x in 0..tile as i32 {
            if (x + y) % 2 == 0 {
                checker.set(x, y, Rgba::rgb(255, 0, 255));
            }
        }
    }
    let checker = map.add_tile_image(checker).unwrap();

    for y in 0..h as i32 {
        for x in 0..w as i32 {
            let color = Rgba::rgb((x * 7 % 251) as u8, (y * 11 % 251) as u8, 40);
            let id = map.add_tile_image(Surface::filled(tile, tile, color)).unwrap();
            map.set_tile(x, y, base, Some(id)).unwrap();
            if (x + y) % 3 == 0 {
                map.set_tile(x, y, overlay, Some(checker)).unwrap();
            }
        }
    }
    map
}

/// Composite one map pixel the slow way.
pub fn reference_pixel<M: MapData>(map: &M, background: Rgba, mx: i32, my: i32) -> Rgba {
    let (tw, th) = (map.tile_width() as i32, map.tile_height() as i32);
    let world = Rect::new(0, 0, map.width() as i32 * tw, map.height() as i32 * th);
    if !world.contains(mx, my) {
        return background;
    }
    let (tx, ty) = (mx.div_euclid(tw), my.div_euclid(th));
    let mut color = background;
    for &layer in map.visible_tile_layers() {
        if let Some(p) = map
            .tile_image(tx, ty, layer)
            .and_then(|img| img.get(mx - tx * tw, my - ty * th))
        {
            if !p.is_transparent() {
                color = p;
            }
        }
    }
    color
}

/// Assert a drawn frame matches the slow composite for the renderer's
/// current camera.
pub fn assert_frame_matches<M: MapData>(
    r: &BufferedRenderer<M>,
    frame: &Surface,
    background: Rgba,
) {
    let view = r.view_rect();
    for sy in 0..frame.height() as i32 {
        for sx in 0..frame.width() as i32 {
            let expected = reference_pixel(r.data(), background, view.x + sx, view.y + sy);
            assert_eq!(
                frame.get(sx, sy),
                Some(expected),
                "screen ({sx},{sy}) map ({},{})",
                view.x + sx,
                view.y + sy
            );
        }
    }
}

/// Records every tile position looked up through it.
pub struct Recording<'a> {
    pub inner: &'a GridMapData,
    fetched: RefCell<Vec<(i32, i32)>>,
}

impl<'a> Recording<'a> {
    pub fn new(inner: &'a GridMapData) -> Self {
        Self {
            inner,
            fetched: RefCell::new(Vec::new()),
        }
    }

    /// Distinct positions fetched since the last call, sorted.
    pub fn take(&self) -> Vec<(i32, i32)> {
        let mut v = std::mem::take(&mut *self.fetched.borrow_mut());
        v.sort_unstable();
        v.dedup();
        v
    }
}

impl MapData for Recording<'_> {
    fn tile_width(&self) -> u32 {
        self.inner.tile_width()
    }

    fn tile_height(&self) -> u32 {
        self.inner.tile_height()
    }

    fn width(&self) -> u32 {
        self.inner.width()
    }

    fn height(&self) -> u32 {
        self.inner.height()
    }

    fn visible_tile_layers(&self) -> &[usize] {
        self.inner.visible_tile_layers()
    }

    fn tile_image(&self, x: i32, y: i32, layer: usize) -> Option<&Surface> {
        self.fetched.borrow_mut().push((x, y));
        self.inner.tile_image(x, y, layer)
    }
}

/// Small deterministic generator for property sweeps.
pub struct Lcg(u64);

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self(seed)
    }

    pub fn next_u32(&mut self) -> u32 {
        self.0 = self
            .0
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        (self.0 >> 33) as u32
    }

    /// Uniform-ish value in `lo..hi`.
    pub fn range(&mut self, lo: i32, hi: i32) -> i32 {
        lo + (self.next_u32() % (hi - lo) as u32) as i32
    }
}
