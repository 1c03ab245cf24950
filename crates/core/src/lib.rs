//! Buffered scrolling tile-map rendering.
//!
//! This crate draws layered tile maps into RGBA surfaces through an
//! off-screen buffer that is patched incrementally as the camera moves, and
//! keeps a sprite group aligned with the map's scroll position.
//!
//! It has no windowing or I/O dependencies: map loading, input and
//! presentation belong to the caller.
//!
//! # Module Structure
//!
//! - [`surface`]: RGBA pixel surface with clipped blits and in-place scroll
//! - [`map_data`]: the [`MapData`] trait and the in-memory [`GridMapData`]
//! - [`tile_buffer`]: off-screen buffer with shift-and-patch redraws
//! - [`renderer`]: camera, buffer upkeep and per-frame blits
//! - [`group`]: layered sprites drawn in step with the map
//! - [`config`]: renderer options from defaults, environment or TOML
//! - [`error`]: error types
//!
//! # Frame Loop
//!
//! ```
//! use scrollmap_core::{BasicSprite, BufferedRenderer, GridMapData, ScrollGroup, Surface};
//! use scrollmap_core::types::{Point, Rgba, Size};
//!
//! let mut map = GridMapData::new(32, 32, 8, 8).unwrap();
//! let water = map.add_tile_image(Surface::filled(8, 8, Rgba::rgb(0, 0, 200))).unwrap();
//! let ground = map.add_layer("ground");
//! map.fill_layer(ground, Some(water)).unwrap();
//!
//! let renderer = BufferedRenderer::new(&map, Size::new(64, 48)).unwrap();
//! let mut group = ScrollGroup::new(renderer);
//! let hero = group.add(BasicSprite::new(Surface::filled(4, 4, Rgba::WHITE), 100, 100));
//!
//! let mut frame = Surface::new(64, 48);
//! for _ in 0..3 {
//!     group.get_mut(hero).unwrap().x += 2;
//!     let r = group.get(hero).unwrap().x as f32;
//!     group.center(Point::new(r, 100.0));
//!     group.draw(&mut frame).unwrap();
//! }
//! ```

pub mod config;
pub mod error;
pub mod group;
pub mod map_data;
pub mod renderer;
pub mod surface;
pub mod tile_buffer;

pub use scrollmap_types as types;

pub use config::RendererConfig;
pub use error::{ConfigError, MapError, RenderError, Result};
pub use group::{BasicSprite, DrawStep, ScrollGroup, Sprite, SpriteId};
pub use map_data::{validate_map_data, GridMapData, MapData, TileId};
pub use renderer::{BufferedRenderer, MAX_CENTER};
pub use surface::{BlitMode, Surface};
pub use tile_buffer::{Redraw, RedrawStats, TileBuffer};
