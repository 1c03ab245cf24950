//! ScrollGroup: sprites drawn in step with a scrolling map.
//!
//! The group owns a [`BufferedRenderer`] and a set of sprites, each assigned
//! to a layer. Every frame the map layers and the sprites are sorted into one
//! draw plan:
//!
//! - map layers keep their `visible_tile_layers` order
//! - a sprite on layer `L` goes after the last visible map layer `<= L` and
//!   before the next one
//! - sprites sharing a slot are ordered by their bottom edge, then by
//!   insertion order
//!
//! The composited map is blitted once; each sprite is then drawn and the map
//! layers that follow it in the plan are redrawn over the sprite's area.

use crate::error::Result;
use crate::map_data::MapData;
use crate::renderer::BufferedRenderer;
use crate::surface::{BlitMode, Surface};
use crate::tile_buffer::Redraw;
use crate::types::{Point, Rect, Size};

/// Something the group can draw.
pub trait Sprite {
    fn image(&self) -> &Surface;

    /// Position in map pixels. The image's top-left corner is drawn at
    /// (`x`, `y`); `bottom()` is used for depth sorting within a layer.
    fn rect(&self) -> Rect;
}

/// A sprite that is just an image at a map position.
#[derive(Debug, Clone)]
pub struct BasicSprite {
    pub image: Surface,
    pub x: i32,
    pub y: i32,
}

impl BasicSprite {
    pub fn new(image: Surface, x: i32, y: i32) -> Self {
        Self { image, x, y }
    }
}

impl Sprite for BasicSprite {
    fn image(&self) -> &Surface {
        &self.image
    }

    fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.image.width() as i32, self.image.height() as i32)
    }
}

/// Handle returned by [`ScrollGroup::add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpriteId(u64);

/// One entry of the per-frame draw plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawStep {
    MapLayer(usize),
    Sprite(SpriteId),
}

#[derive(Debug)]
struct Entry<S> {
    id: SpriteId,
    sprite: S,
    layer: usize,
}

#[derive(Debug, Clone, Copy)]
struct PlanItem {
    key: (usize, i32, u64),
    step: DrawStep,
    /// Number of visible map layers drawn before this step.
    slot: usize,
    entry: usize,
}

#[derive(Debug)]
pub struct ScrollGroup<M: MapData, S: Sprite> {
    map_layer: BufferedRenderer<M>,
    entries: Vec<Entry<S>>,
    next_id: u64,
    default_layer: usize,
    plan: Vec<PlanItem>,
    last_size: Option<Size>,
}

impl<M: MapData, S: Sprite> ScrollGroup<M, S> {
    pub fn new(map_layer: BufferedRenderer<M>) -> Self {
        let default_layer = map_layer.config().default_layer;
        Self {
            map_layer,
            entries: Vec::new(),
            next_id: 0,
            default_layer,
            plan: Vec::new(),
            last_size: None,
        }
    }

    pub fn map_layer(&self) -> &BufferedRenderer<M> {
        &self.map_layer
    }

    pub fn map_layer_mut(&mut self) -> &mut BufferedRenderer<M> {
        &mut self.map_layer
    }

    pub fn into_map_layer(self) -> BufferedRenderer<M> {
        self.map_layer
    }

    /// Add a sprite on the default layer.
    pub fn add(&mut self, sprite: S) -> SpriteId {
        self.add_to_layer(sprite, self.default_layer)
    }

    pub fn add_to_layer(&mut self, sprite: S, layer: usize) -> SpriteId {
        let id = SpriteId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry { id, sprite, layer });
        id
    }

    pub fn remove(&mut self, id: SpriteId) -> Option<S> {
        let pos = self.position(id)?;
        Some(self.entries.swap_remove(pos).sprite)
    }

    pub fn contains(&self, id: SpriteId) -> bool {
        self.position(id).is_some()
    }

    pub fn get(&self, id: SpriteId) -> Option<&S> {
        self.position(id).map(|i| &self.entries[i].sprite)
    }

    pub fn get_mut(&mut self, id: SpriteId) -> Option<&mut S> {
        self.position(id).map(|i| &mut self.entries[i].sprite)
    }

    pub fn layer_of(&self, id: SpriteId) -> Option<usize> {
        self.position(id).map(|i| self.entries[i].layer)
    }

    /// Move a sprite to another layer. Returns false for unknown ids.
    pub fn change_layer(&mut self, id: SpriteId, layer: usize) -> bool {
        match self.position(id) {
            Some(i) => {
                self.entries[i].layer = layer;
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (SpriteId, &S)> {
        self.entries.iter().map(|e| (e.id, &e.sprite))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (SpriteId, &mut S)> {
        self.entries.iter_mut().map(|e| (e.id, &mut e.sprite))
    }

    /// Center map and sprites on a map pixel.
    ///
    /// Sprite rectangles are not changed, only where they land on screen.
    /// Center the map layer on `point`; see [`BufferedRenderer::center`].
    pub fn center(&mut self, point: Point) -> Redraw {
        self.map_layer.center(point)
    }

    pub fn scroll(&mut self, delta: Point) -> Redraw {
        self.map_layer.scroll(delta)
    }

    /// Where a sprite's image lands on screen with the current camera.
    pub fn screen_rect(&self, id: SpriteId) -> Option<Rect> {
        let entry = &self.entries[self.position(id)?];
        Some(self.to_screen(&entry.sprite))
    }

    /// Build this frame's draw plan and return it.
    pub fn draw_order(&mut self) -> impl Iterator<Item = DrawStep> + '_ {
        self.build_plan();
        self.plan.iter().map(|p| p.step)
    }

    /// Draw map and sprites onto `dst`.
    ///
    /// The renderer's viewport follows the destination size; a size change
    /// reallocates its buffer. Returns the screen area drawn.
    pub fn draw(&mut self, dst: &mut Surface) -> Result<Rect> {
        let size = dst.size();
        if size.is_empty() {
            return Ok(Rect::EMPTY);
        }
        if self.last_size != Some(size) {
            self.map_layer.resize(size)?;
            self.last_size = Some(size);
        }

        self.build_plan();
        let screen = self.map_layer.draw(dst, None);
        let layers = self.map_layer.data().visible_tile_layers();

        for item in &self.plan {
            if let DrawStep::Sprite(_) = item.step {
                let sprite = &self.entries[item.entry].sprite;
                let image = sprite.image();
                let rect = self.to_screen(sprite);
                dst.blit_region(image, image.rect(), rect.x, rect.y, screen, BlitMode::Over);
                self.map_layer
                    .draw_layers_over(dst, None, rect, &layers[item.slot.min(layers.len())..]);
            }
        }
        Ok(screen)
    }

    fn to_screen(&self, sprite: &S) -> Rect {
        let r = sprite.rect();
        let image = sprite.image();
        let cam = self.map_layer.camera_offset();
        Rect::new(
            r.x.saturating_sub(cam.x as i32),
            r.y.saturating_sub(cam.y as i32),
            image.width() as i32,
            image.height() as i32,
        )
    }

    fn position(&self, id: SpriteId) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }

    fn build_plan(&mut self) {
        let layers = self.map_layer.data().visible_tile_layers();
        self.plan.clear();
        for (i, &layer) in layers.iter().enumerate() {
            self.plan.push(PlanItem {
                key: (2 * i + 1, 0, 0),
                step: DrawStep::MapLayer(layer),
                slot: i,
                entry: 0,
            });
        }
        for (idx, e) in self.entries.iter().enumerate() {
            let slot = layers
                .iter()
                .rposition(|&l| l <= e.layer)
                .map_or(0, |p| p + 1);
            self.plan.push(PlanItem {
                key: (2 * slot, e.sprite.rect().bottom(), e.id.0),
                step: DrawStep::Sprite(e.id),
                slot,
                entry: idx,
            });
        }
        self.plan.sort_unstable_by_key(|p| p.key);
    }
}
