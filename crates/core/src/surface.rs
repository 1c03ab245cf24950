//! Owned RGBA pixel surface.
//!
//! `Surface` is used for tile images, sprite images, the renderer's off-screen
//! buffer and destination frames. All drawing operations clip silently.

use std::fmt;

use crate::error::RenderError;
use crate::types::{Rect, Rgba, Size};

/// How source pixels are combined with the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlitMode {
    /// Replace destination pixels, transparent ones included.
    Copy,
    /// Skip transparent source pixels (binary alpha).
    Over,
}

/// 2D buffer of RGBA pixels, row-major.
#[derive(Clone, PartialEq, Eq)]
pub struct Surface {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
}

impl fmt::Debug for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Surface")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl Surface {
    /// A transparent surface.
    ///
    /// Panics only if the allocation itself fails; use [`Surface::try_new`]
    /// for sizes derived from untrusted input.
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, Rgba::TRANSPARENT)
    }

    pub fn filled(width: u32, height: u32, color: Rgba) -> Self {
        let len = (width as usize) * (height as usize);
        Self {
            width,
            height,
            pixels: vec![color; len],
        }
    }

    /// Allocate a surface, reporting overflow or allocation failure instead
    /// of aborting.
    pub fn try_new(width: u32, height: u32, color: Rgba) -> Result<Self, RenderError> {
        let too_large = || RenderError::BufferTooLarge { width, height };
        let len = (width as usize)
            .checked_mul(height as usize)
            .ok_or_else(too_large)?;
        // Rect math uses i32 pixel coordinates.
        if width > i32::MAX as u32 || height > i32::MAX as u32 {
            return Err(too_large());
        }
        let mut pixels = Vec::new();
        pixels.try_reserve_exact(len).map_err(|_| too_large())?;
        pixels.resize(len, color);
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Build from row-major pixels. Returns `None` if the length is wrong.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Rgba>) -> Option<Self> {
        if pixels.len() != (width as usize) * (height as usize) {
            return None;
        }
        Some(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn rect(&self) -> Rect {
        Rect::from_size(self.size())
    }

    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    #[inline(always)]
    fn idx(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return None;
        }
        Some((y as usize) * (self.width as usize) + (x as usize))
    }

    pub fn get(&self, x: i32, y: i32) -> Option<Rgba> {
        self.idx(x, y).map(|i| self.pixels[i])
    }

    pub fn set(&mut self, x: i32, y: i32, color: Rgba) {
        if let Some(i) = self.idx(x, y) {
            self.pixels[i] = color;
        }
    }

    pub fn fill(&mut self, color: Rgba) {
        self.pixels.fill(color);
    }

    /// Fill `rect`, clipped to the surface.
    pub fn fill_rect(&mut self, rect: Rect, color: Rgba) {
        let r = rect.intersection(self.rect());
        if r.is_empty() {
            return;
        }
        let stride = self.width as usize;
        for y in r.y..r.bottom() {
            let start = y as usize * stride + r.x as usize;
            self.pixels[start..start + r.w as usize].fill(color);
        }
    }

    /// Draw all of `src` with its top-left corner at (`x`, `y`), skipping
    /// transparent pixels. Returns the destination area touched.
    pub fn blit(&mut self, src: &Surface, x: i32, y: i32) -> Rect {
        self.blit_region(src, src.rect(), x, y, self.rect(), BlitMode::Over)
    }

    /// General blit: the `src_area` part of `src` is placed at (`x`, `y`)
    /// and clipped against both surfaces and `clip`.
    ///
    /// Returns the destination area actually written (possibly empty).
    pub fn blit_region(
        &mut self,
        src: &Surface,
        src_area: Rect,
        x: i32,
        y: i32,
        clip: Rect,
        mode: BlitMode,
    ) -> Rect {
        let clipped = src_area.intersection(src.rect());
        if clipped.is_empty() {
            return Rect::EMPTY;
        }
        // Keep the visible part of the source at the same destination spot.
        let x = x + (clipped.x - src_area.x);
        let y = y + (clipped.y - src_area.y);
        let src_area = clipped;
        let dst = Rect::new(x, y, src_area.w, src_area.h)
            .intersection(self.rect())
            .intersection(clip);
        if dst.is_empty() {
            return Rect::EMPTY;
        }

        let sx0 = (src_area.x + (dst.x - x)) as usize;
        let sy0 = src_area.y + (dst.y - y);
        let w = dst.w as usize;
        let src_stride = src.width as usize;
        let dst_stride = self.width as usize;

        for row in 0..dst.h {
            let s = (sy0 + row) as usize * src_stride + sx0;
            let d = (dst.y + row) as usize * dst_stride + dst.x as usize;
            let src_row = &src.pixels[s..s + w];
            let dst_row = &mut self.pixels[d..d + w];
            match mode {
                BlitMode::Copy => dst_row.copy_from_slice(src_row),
                BlitMode::Over => {
                    for (dp, sp) in dst_row.iter_mut().zip(src_row) {
                        if !sp.is_transparent() {
                            *dp = *sp;
                        }
                    }
                }
            }
        }
        dst
    }

    /// Shift the contents in place by (`dx`, `dy`) pixels.
    ///
    /// Pixels shifted past an edge are lost; the vacated area keeps its old
    /// contents and is expected to be redrawn by the caller.
    pub fn scroll(&mut self, dx: i32, dy: i32) {
        if dx == 0 && dy == 0 {
            return;
        }
        let (w, h) = (self.width as i32, self.height as i32);
        if dx.abs() >= w || dy.abs() >= h {
            return;
        }
        let run = (w - dx.abs()) as usize;
        let src_x = (-dx).max(0) as usize;
        let dst_x = dx.max(0) as usize;
        let stride = self.width as usize;

        let rows = h - dy.abs();
        let mut copy_row = |dst_y: i32| {
            let src_y = dst_y - dy;
            let s = src_y as usize * stride + src_x;
            let d = dst_y as usize * stride + dst_x;
            self.pixels.copy_within(s..s + run, d);
        };
        // Walk rows so a source row is never overwritten before it is read.
        if dy > 0 {
            for dst_y in (dy..dy + rows).rev() {
                copy_row(dst_y);
            }
        } else {
            for dst_y in 0..rows {
                copy_row(dst_y);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba = Rgba::rgb(255, 0, 0);
    const BLUE: Rgba = Rgba::rgb(0, 0, 255);

    fn numbered(w: u32, h: u32) -> Surface {
        let mut s = Surface::new(w, h);
        for y in 0..h as i32 {
            for x in 0..w as i32 {
                s.set(x, y, Rgba::rgb(x as u8, y as u8, 1));
            }
        }
        s
    }

    #[test]
    fn out_of_range_access_is_ignored() {
        let mut s = Surface::new(2, 2);
        s.set(-1, 0, RED);
        s.set(2, 0, RED);
        assert_eq!(s.get(-1, 0), None);
        assert!(s.pixels().iter().all(|p| p.is_transparent()));
    }

    #[test]
    fn blit_clips_and_skips_transparent() {
        let mut dst = Surface::filled(4, 4, BLUE);
        let mut src = Surface::filled(3, 3, RED);
        src.set(1, 1, Rgba::TRANSPARENT);

        let touched = dst.blit(&src, 2, 2);
        assert_eq!(touched, Rect::new(2, 2, 2, 2));
        assert_eq!(dst.get(2, 2), Some(RED));
        assert_eq!(dst.get(3, 3), Some(BLUE));
        assert_eq!(dst.get(1, 1), Some(BLUE));
    }

    #[test]
    fn blit_region_respects_clip_and_copy_mode() {
        let mut dst = Surface::filled(4, 4, BLUE);
        let src = Surface::new(4, 4);
        let touched = dst.blit_region(
            &src,
            src.rect(),
            0,
            0,
            Rect::new(1, 1, 2, 1),
            BlitMode::Copy,
        );
        assert_eq!(touched, Rect::new(1, 1, 2, 1));
        assert_eq!(dst.get(1, 1), Some(Rgba::TRANSPARENT));
        assert_eq!(dst.get(2, 1), Some(Rgba::TRANSPARENT));
        assert_eq!(dst.get(3, 1), Some(BLUE));
        assert_eq!(dst.get(1, 2), Some(BLUE));
    }

    #[test]
    fn blit_region_with_negative_destination() {
        let mut dst = Surface::new(3, 3);
        let src = numbered(3, 3);
        dst.blit_region(&src, src.rect(), -1, -2, dst.rect(), BlitMode::Copy);
        assert_eq!(dst.get(0, 0), Some(Rgba::rgb(1, 2, 1)));
        assert_eq!(dst.get(1, 0), Some(Rgba::rgb(2, 2, 1)));
        assert_eq!(dst.get(0, 1), Some(Rgba::TRANSPARENT));
    }

    #[test]
    fn blit_region_clipped_source_keeps_alignment() {
        let mut dst = Surface::new(4, 4);
        let src = numbered(3, 3);
        // Source area starts one pixel left of the image.
        dst.blit_region(&src, Rect::new(-1, 0, 3, 1), 0, 0, dst.rect(), BlitMode::Copy);
        assert_eq!(dst.get(0, 0), Some(Rgba::TRANSPARENT));
        assert_eq!(dst.get(1, 0), Some(Rgba::rgb(0, 0, 1)));
        assert_eq!(dst.get(2, 0), Some(Rgba::rgb(1, 0, 1)));
        assert_eq!(dst.get(3, 0), Some(Rgba::TRANSPARENT));
    }

    #[test]
    fn scroll_moves_content_in_every_direction() {
        for (dx, dy) in [(1, 0), (-1, 0), (0, 2), (0, -2), (2, 1), (-1, -1), (1, -2)] {
            let original = numbered(5, 4);
            let mut s = original.clone();
            s.scroll(dx, dy);
            for y in 0..4 {
                for x in 0..5 {
                    let (sx, sy) = (x - dx, y - dy);
                    if original.get(sx, sy).is_some() {
                        assert_eq!(s.get(x, y), original.get(sx, sy), "d=({dx},{dy}) at ({x},{y})");
                    }
                }
            }
        }
    }

    #[test]
    fn scroll_past_edge_is_noop() {
        let original = numbered(3, 3);
        let mut s = original.clone();
        s.scroll(3, 0);
        assert_eq!(s, original);
    }

    #[test]
    fn try_new_rejects_overflowing_sizes() {
        assert!(matches!(
            Surface::try_new(u32::MAX, u32::MAX, Rgba::BLACK),
            Err(RenderError::BufferTooLarge { .. })
        ));
        let s = Surface::try_new(2, 3, Rgba::BLACK).unwrap();
        assert_eq!(s.size(), Size::new(2, 3));
    }
}
