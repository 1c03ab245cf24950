//! Map data sources.
//!
//! The renderer reads maps only through [`MapData`]. Loaders for map file
//! formats live outside this crate and implement the trait; [`GridMapData`]
//! is an in-memory implementation for hand-built maps.

use std::rc::Rc;
use std::sync::Arc;

use crate::error::MapError;
use crate::surface::Surface;

/// Read-only view of a layered tile map.
///
/// Tile coordinates are 0-indexed. `tile_image` must return `None` for any
/// position outside `0..width` x `0..height` (negative values included) and
/// for layers that do not exist; an absent image is an empty tile.
///
/// Images are expected to be exactly `tile_width` x `tile_height`. The
/// renderer clips larger images to their cell and never rescales.
pub trait MapData {
    /// Width of one tile in pixels.
    fn tile_width(&self) -> u32;

    /// Height of one tile in pixels.
    fn tile_height(&self) -> u32;

    /// Map width in tiles.
    fn width(&self) -> u32;

    /// Map height in tiles.
    fn height(&self) -> u32;

    /// Visible layer indices in render order (bottom first).
    fn visible_tile_layers(&self) -> &[usize];

    fn tile_image(&self, x: i32, y: i32, layer: usize) -> Option<&Surface>;
}

macro_rules! forward_map_data {
    ($($ty:ty),*) => {$(
        impl<T: MapData + ?Sized> MapData for $ty {
            fn tile_width(&self) -> u32 {
                (**self).tile_width()
            }
            fn tile_height(&self) -> u32 {
                (**self).tile_height()
            }
            fn width(&self) -> u32 {
                (**self).width()
            }
            fn height(&self) -> u32 {
                (**self).height()
            }
            fn visible_tile_layers(&self) -> &[usize] {
                (**self).visible_tile_layers()
            }
            fn tile_image(&self, x: i32, y: i32, layer: usize) -> Option<&Surface> {
                (**self).tile_image(x, y, layer)
            }
        }
    )*};
}

forward_map_data!(&T, Box<T>, Rc<T>, Arc<T>);

/// Check the dimensions a map reports.
///
/// This is the boundary check the renderer runs on construction and on
/// [`set_data`](crate::BufferedRenderer::set_data).
pub fn validate_map_data<M: MapData + ?Sized>(data: &M) -> Result<(), MapError> {
    let (tw, th) = (data.tile_width(), data.tile_height());
    if tw == 0 || th == 0 || tw > i32::MAX as u32 || th > i32::MAX as u32 {
        return Err(MapError::InvalidTileSize {
            width: tw,
            height: th,
        });
    }
    let (w, h) = (data.width(), data.height());
    if w == 0 || h == 0 || w > i32::MAX as u32 || h > i32::MAX as u32 {
        return Err(MapError::InvalidMapSize {
            width: w,
            height: h,
        });
    }
    // Map pixel coordinates must fit in i32.
    let limit = i32::MAX as u64;
    if w as u64 * tw as u64 > limit || h as u64 * th as u64 > limit {
        return Err(MapError::MapTooLarge {
            width: w,
            height: h,
            tile_width: tw,
            tile_height: th,
        });
    }
    Ok(())
}

/// Index into a [`GridMapData`] tileset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileId(pub u32);

#[derive(Debug, Clone)]
struct GridLayer {
    name: String,
    visible: bool,
    tiles: Vec<Option<TileId>>,
}

/// In-memory layered tile map backed by a shared tileset.
#[derive(Debug, Clone)]
pub struct GridMapData {
    width: u32,
    height: u32,
    tile_width: u32,
    tile_height: u32,
    tileset: Vec<Surface>,
    layers: Vec<GridLayer>,
    visible: Vec<usize>,
}

impl GridMapData {
    pub fn new(
        width: u32,
        height: u32,
        tile_width: u32,
        tile_height: u32,
    ) -> Result<Self, MapError> {
        let map = Self {
            width,
            height,
            tile_width,
            tile_height,
            tileset: Vec::new(),
            layers: Vec::new(),
            visible: Vec::new(),
        };
        validate_map_data(&map)?;
        Ok(map)
    }

    /// Register a tile image. Its size must match the map's tile size.
    pub fn add_tile_image(&mut self, image: Surface) -> Result<TileId, MapError> {
        if image.width() != self.tile_width || image.height() != self.tile_height {
            return Err(MapError::TileImageSize {
                expected_width: self.tile_width,
                expected_height: self.tile_height,
                actual_width: image.width(),
                actual_height: image.height(),
            });
        }
        self.tileset.push(image);
        Ok(TileId(self.tileset.len() as u32 - 1))
    }

    /// Append an empty, visible layer and return its index.
    pub fn add_layer(&mut self, name: impl Into<String>) -> usize {
        let len = (self.width as usize) * (self.height as usize);
        self.layers.push(GridLayer {
            name: name.into(),
            visible: true,
            tiles: vec![None; len],
        });
        self.refresh_visible();
        self.layers.len() - 1
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn layer_name(&self, layer: usize) -> Option<&str> {
        self.layers.get(layer).map(|l| l.name.as_str())
    }

    pub fn set_layer_visible(&mut self, layer: usize, visible: bool) -> Result<(), MapError> {
        let l = self.layers.get_mut(layer).ok_or(MapError::UnknownLayer(layer))?;
        l.visible = visible;
        self.refresh_visible();
        Ok(())
    }

    pub fn set_tile(
        &mut self,
        x: i32,
        y: i32,
        layer: usize,
        tile: Option<TileId>,
    ) -> Result<(), MapError> {
        if let Some(TileId(id)) = tile {
            if id as usize >= self.tileset.len() {
                return Err(MapError::UnknownTile(id));
            }
        }
        let idx = self.idx(x, y).ok_or(MapError::OutOfBounds {
            x,
            y,
            width: self.width,
            height: self.height,
        })?;
        let l = self.layers.get_mut(layer).ok_or(MapError::UnknownLayer(layer))?;
        l.tiles[idx] = tile;
        Ok(())
    }

    /// Fill a whole layer with one tile.
    pub fn fill_layer(&mut self, layer: usize, tile: Option<TileId>) -> Result<(), MapError> {
        if let Some(TileId(id)) = tile {
            if id as usize >= self.tileset.len() {
                return Err(MapError::UnknownTile(id));
            }
        }
        let l = self.layers.get_mut(layer).ok_or(MapError::UnknownLayer(layer))?;
        l.tiles.fill(tile);
        Ok(())
    }

    pub fn tile(&self, x: i32, y: i32, layer: usize) -> Option<TileId> {
        let idx = self.idx(x, y)?;
        self.layers.get(layer)?.tiles[idx]
    }

    /// Mutable access to a tileset image, e.g. for animation.
    ///
    /// Renderers do not notice the change by themselves; queue the affected
    /// tiles with `update_tile`.
    pub fn tile_image_mut(&mut self, id: TileId) -> Option<&mut Surface> {
        self.tileset.get_mut(id.0 as usize)
    }

    fn idx(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return None;
        }
        Some((y as usize) * (self.width as usize) + (x as usize))
    }

    fn refresh_visible(&mut self) {
        self.visible.clear();
        self.visible.extend(
            self.layers
                .iter()
                .enumerate()
                .filter(|(_, l)| l.visible)
                .map(|(i, _)| i),
        );
    }
}

impl MapData for GridMapData {
    fn tile_width(&self) -> u32 {
        self.tile_width
    }

    fn tile_height(&self) -> u32 {
        self.tile_height
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn visible_tile_layers(&self) -> &[usize] {
        &self.visible
    }

    fn tile_image(&self, x: i32, y: i32, layer: usize) -> Option<&Surface> {
        let TileId(id) = self.tile(x, y, layer)?;
        self.tileset.get(id as usize)
    }
}
