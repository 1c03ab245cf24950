//! Procedural demo world: meadow, pond, flowers and tree canopies.

use anyhow::Result;

use scrollmap::core::{BasicSprite, GridMapData, Surface, TileId};
use scrollmap::types::Rgba;

pub const TILE: u32 = 8;
pub const MAP_W: u32 = 96;
pub const MAP_H: u32 = 64;

pub const GROUND: usize = 0;
pub const DECOR: usize = 1;
pub const CANOPY: usize = 2;

/// Cheap deterministic noise in 0..256.
fn hash(x: i32, y: i32) -> u32 {
    let mut h = (x as u32).wrapping_mul(0x9E37_79B1) ^ (y as u32).wrapping_mul(0x85EB_CA77);
    h ^= h >> 15;
    h = h.wrapping_mul(0xC2B2_AE3D);
    (h ^ (h >> 13)) & 0xff
}

fn speckled(base: Rgba, accent: Rgba, seed: i32) -> Surface {
    let mut s = Surface::filled(TILE, TILE, base);
    for y in 0..TILE as i32 {
        for x in 0..TILE as i32 {
            if hash(x + seed, y - seed) < 40 {
                s.set(x, y, accent);
            }
        }
    }
    s
}

fn flower(petal: Rgba) -> Surface {
    let mut s = Surface::new(TILE, TILE);
    for (x, y) in [(3, 2), (2, 3), (4, 3), (3, 4)] {
        s.set(x, y, petal);
    }
    s.set(3, 3, Rgba::rgb(250, 220, 60));
    s
}

fn canopy() -> Surface {
    let mut s = Surface::new(TILE, TILE);
    let c = (TILE as i32 - 1) as f32 / 2.0;
    for y in 0..TILE as i32 {
        for x in 0..TILE as i32 {
            let d = ((x as f32 - c).powi(2) + (y as f32 - c).powi(2)).sqrt();
            if d <= c + 0.5 {
                let shade = if hash(x, y) < 80 { 90 } else { 60 };
                s.set(x, y, Rgba::rgb(20, shade, 30));
            }
        }
    }
    s
}

struct Tiles {
    grass: TileId,
    water: TileId,
    sand: TileId,
    red_flower: TileId,
    blue_flower: TileId,
    trunk: TileId,
    canopy: TileId,
}

pub fn build_map() -> Result<GridMapData> {
    let mut map = GridMapData::new(MAP_W, MAP_H, TILE, TILE)?;
    let tiles = Tiles {
        grass: map.add_tile_image(speckled(Rgba::rgb(60, 140, 50), Rgba::rgb(80, 170, 60), 1))?,
        water: map.add_tile_image(speckled(Rgba::rgb(30, 70, 170), Rgba::rgb(90, 130, 220), 2))?,
        sand: map.add_tile_image(speckled(Rgba::rgb(200, 180, 120), Rgba::rgb(170, 150, 100), 3))?,
        red_flower: map.add_tile_image(flower(Rgba::rgb(220, 40, 50)))?,
        blue_flower: map.add_tile_image(flower(Rgba::rgb(80, 90, 230)))?,
        trunk: map.add_tile_image(Surface::filled(TILE, TILE, Rgba::rgb(90, 60, 30)))?,
        canopy: map.add_tile_image(canopy())?,
    };
    let ground = map.add_layer("ground");
    let decor = map.add_layer("decor");
    let top = map.add_layer("canopy");
    debug_assert_eq!((ground, decor, top), (GROUND, DECOR, CANOPY));

    map.fill_layer(GROUND, Some(tiles.grass))?;

    // Pond with a sandy shore.
    let (px, py, r) = (60.0f32, 36.0f32, 9.0f32);
    for y in 0..MAP_H as i32 {
        for x in 0..MAP_W as i32 {
            let d = ((x as f32 - px).powi(2) + ((y as f32 - py) * 1.4).powi(2)).sqrt();
            if d < r {
                map.set_tile(x, y, GROUND, Some(tiles.water))?;
            } else if d < r + 1.5 {
                map.set_tile(x, y, GROUND, Some(tiles.sand))?;
            }
        }
    }

    for y in 0..MAP_H as i32 {
        for x in 0..MAP_W as i32 {
            if map.tile(x, y, GROUND) != Some(tiles.grass) {
                continue;
            }
            match hash(x, y) {
                0..=6 => map.set_tile(x, y, DECOR, Some(tiles.red_flower))?,
                7..=12 => map.set_tile(x, y, DECOR, Some(tiles.blue_flower))?,
                13..=15 if y > 1 => {
                    // Trunk on the ground, canopy above it covering sprites.
                    map.set_tile(x, y, DECOR, Some(tiles.trunk))?;
                    for (dx, dy) in [(0, -1), (-1, -1), (1, -1), (0, -2)] {
                        if map.tile(x + dx, y + dy, GROUND).is_some() {
                            map.set_tile(x + dx, y + dy, CANOPY, Some(tiles.canopy))?;
                        }
                    }
                }
                _ => {}
            }
        }
    }

    Ok(map)
}

pub fn hero(x: i32, y: i32) -> BasicSprite {
    let mut image = Surface::new(6, 8);
    let skin = Rgba::rgb(240, 200, 160);
    let tunic = Rgba::rgb(200, 40, 40);
    let boots = Rgba::rgb(40, 30, 20);
    for yy in 0..8 {
        for xx in 0..6 {
            let c = match yy {
                0..=2 if (1..=4).contains(&xx) => Some(skin),
                3..=5 => Some(tunic),
                6..=7 if xx != 2 && xx != 3 => Some(boots),
                _ => None,
            };
            if let Some(c) = c {
                image.set(xx, yy, c);
            }
        }
    }
    BasicSprite::new(image, x, y)
}
