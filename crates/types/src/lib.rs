//! Shared geometry and pixel types
//!
//! This module defines the plain data types used by every other crate in the
//! workspace. They carry no rendering logic and no required dependencies, so
//! they can be used by map loaders, game code and frontends alike.
//!
//! # Coordinate Spaces
//!
//! Three coordinate spaces appear throughout the renderer:
//!
//! | Space | Unit | Origin |
//! |-------|------|--------|
//! | Map pixels | pixel | top-left corner of tile (0, 0) |
//! | Tiles | tile | tile (0, 0); negative values are outside the map |
//! | Screen | pixel | top-left corner of the destination area |
//!
//! [`Rect`] is used for both pixel and tile rectangles; the unit is always
//! stated by the function that produces it.
//!
//! # Defaults
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `DEFAULT_PADDING_TILES` | 2 | Buffer margin on each side of the viewport |
//! | `DEFAULT_UPDATE_RATE` | 10 | Queued tiles redrawn per incremental update |
//! | `DEFAULT_SPRITE_LAYER` | 0 | Layer used for sprites added without one |
//!
//! # Examples
//!
//! ```
//! use scrollmap_types::{Point, Rect, Rgba};
//!
//! let a = Rect::new(0, 0, 10, 10);
//! let b = Rect::new(5, 5, 10, 10);
//! assert_eq!(a.intersection(b), Rect::new(5, 5, 5, 5));
//! assert!(a.contains_rect(Rect::new(2, 2, 3, 3)));
//!
//! let p = Point::new(1.5, 2.0) + Point::new(0.5, -2.0);
//! assert_eq!(p, Point::new(2.0, 0.0));
//!
//! assert!(Rgba::TRANSPARENT.is_transparent());
//! ```

use std::ops::{Add, Neg, Sub};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Buffer margin in tiles on each side of the viewport.
pub const DEFAULT_PADDING_TILES: u32 = 2;

/// Queued tiles redrawn by one incremental update.
pub const DEFAULT_UPDATE_RATE: usize = 10;

/// Layer assigned to sprites added without an explicit layer.
pub const DEFAULT_SPRITE_LAYER: usize = 0;

/// 8-bit RGBA color.
///
/// Blits use binary transparency: a pixel with `a == 0` is skipped, any other
/// pixel replaces the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Fully opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    #[inline(always)]
    pub const fn is_transparent(self) -> bool {
        self.a == 0
    }
}

impl From<[u8; 4]> for Rgba {
    fn from(v: [u8; 4]) -> Self {
        Rgba::new(v[0], v[1], v[2], v[3])
    }
}

/// Width and height in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// A point or displacement in continuous map pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point::new(0.0, 0.0);

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for Point {
    type Output = Point;

    fn neg(self) -> Point {
        Point::new(-self.x, -self.y)
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Point::new(x, y)
    }
}

/// Axis-aligned integer rectangle.
///
/// `x`/`y` may be negative. A rectangle with zero width or height is empty;
/// all empty rectangles behave the same in containment and intersection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const EMPTY: Rect = Rect::new(0, 0, 0, 0);

    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Build from exclusive edges. Inverted edges produce an empty rectangle.
    pub fn from_edges(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            x: left,
            y: top,
            w: right.saturating_sub(left).max(0),
            h: bottom.saturating_sub(top).max(0),
        }
    }

    pub const fn from_size(size: Size) -> Self {
        Self::new(0, 0, size.width as i32, size.height as i32)
    }

    #[inline(always)]
    pub const fn right(self) -> i32 {
        self.x.saturating_add(self.w)
    }

    #[inline(always)]
    pub const fn bottom(self) -> i32 {
        self.y.saturating_add(self.h)
    }

    pub const fn is_empty(self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    /// Number of cells covered (tiles or pixels).
    pub const fn area(self) -> u64 {
        if self.is_empty() {
            0
        } else {
            self.w as u64 * self.h as u64
        }
    }

    pub const fn contains(self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Whether `other` lies entirely inside `self`. Empty rectangles are
    /// contained in everything.
    pub fn contains_rect(self, other: Rect) -> bool {
        if other.is_empty() {
            return true;
        }
        !self.is_empty()
            && other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    pub fn intersection(self, other: Rect) -> Rect {
        let r = Rect::from_edges(
            self.x.max(other.x),
            self.y.max(other.y),
            self.right().min(other.right()),
            self.bottom().min(other.bottom()),
        );
        if r.is_empty() {
            Rect::EMPTY
        } else {
            r
        }
    }

    pub fn intersects(self, other: Rect) -> bool {
        !self.intersection(other).is_empty()
    }

    /// Move by (`dx`, `dy`). Coordinates saturate at the `i32` range.
    pub const fn translate(self, dx: i32, dy: i32) -> Rect {
        Rect::new(self.x.saturating_add(dx), self.y.saturating_add(dy), self.w, self.h)
    }

    /// Grow on every side by `dx` horizontally and `dy` vertically.
    /// Coordinates saturate at the `i32` range.
    pub const fn inflate(self, dx: i32, dy: i32) -> Rect {
        Rect::new(
            self.x.saturating_sub(dx),
            self.y.saturating_sub(dy),
            self.w.saturating_add(dx.saturating_mul(2)),
            self.h.saturating_add(dy.saturating_mul(2)),
        )
    }

    pub const fn size(self) -> Size {
        Size::new(
            if self.w > 0 { self.w as u32 } else { 0 },
            if self.h > 0 { self.h as u32 } else { 0 },
        )
    }
}
