//! Sparse RGBA8 paint device.
//!
//! Pixels are stored in 64x64 tiles keyed by tile coordinates, so a device
//! can be addressed anywhere on the i32 plane. Unallocated pixels read as
//! transparent black. Writes allocate only the tiles they touch.

use std::collections::HashMap;

use ndarray::{Array3, ArrayView3};

use super::selection::Selection;
use crate::error::{RenderError, Result};
use crate::geometry::{Point, Rect};
use crate::raster::composite::Color;

/// Tile edge length in pixels.
pub const TILE_SIZE: i32 = 64;

type Tile = Array3<u8>;

#[inline]
fn tile_coords(x: i32, y: i32) -> ((i32, i32), (usize, usize)) {
    let tx = x.div_euclid(TILE_SIZE);
    let ty = y.div_euclid(TILE_SIZE);
    let lx = x.rem_euclid(TILE_SIZE) as usize;
    let ly = y.rem_euclid(TILE_SIZE) as usize;
    ((tx, ty), (lx, ly))
}

fn new_tile() -> Tile {
    Array3::<u8>::zeros((TILE_SIZE as usize, TILE_SIZE as usize, 4))
}

/// Multi-channel raster addressed by an unbounded integer rectangle.
#[derive(Debug, Clone, Default)]
pub struct PaintDevice {
    tiles: HashMap<(i32, i32), Tile>,
}

impl PaintDevice {
    pub fn new() -> Self {
        PaintDevice::default()
    }

    /// Builds a device from an `(height, width, 4)` RGBA array placed at `origin`.
    pub fn from_rgba(origin: Point, image: ArrayView3<u8>) -> Result<Self> {
        let (height, width, channels) = image.dim();
        if channels != 4 {
            return Err(RenderError::InvalidImage(format!(
                "expected 4 channels, got {}",
                channels
            )));
        }
        let mut device = PaintDevice::new();
        for y in 0..height {
            for x in 0..width {
                let px = [
                    image[[y, x, 0]],
                    image[[y, x, 1]],
                    image[[y, x, 2]],
                    image[[y, x, 3]],
                ];
                if px != [0, 0, 0, 0] {
                    device.set_pixel(origin.x + x as i32, origin.y + y as i32, px);
                }
            }
        }
        Ok(device)
    }

    /// Copies `rect` out into an `(height, width, 4)` RGBA array.
    pub fn to_rgba(&self, rect: Rect) -> Result<Array3<u8>> {
        rect.check_allocatable()?;
        let (w, h) = (rect.width.max(0) as usize, rect.height.max(0) as usize);
        let mut out = Array3::<u8>::zeros((h, w, 4));
        for y in 0..h {
            for x in 0..w {
                let px = self.pixel(rect.x + x as i32, rect.y + y as i32);
                for c in 0..4 {
                    out[[y, x, c]] = px[c];
                }
            }
        }
        Ok(out)
    }

    #[inline]
    pub fn pixel(&self, x: i32, y: i32) -> [u8; 4] {
        let (key, (lx, ly)) = tile_coords(x, y);
        match self.tiles.get(&key) {
            Some(tile) => [
                tile[[ly, lx, 0]],
                tile[[ly, lx, 1]],
                tile[[ly, lx, 2]],
                tile[[ly, lx, 3]],
            ],
            None => [0, 0, 0, 0],
        }
    }

    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, px: [u8; 4]) {
        let (key, (lx, ly)) = tile_coords(x, y);
        let tile = self.tiles.entry(key).or_insert_with(new_tile);
        for c in 0..4 {
            tile[[ly, lx, c]] = px[c];
        }
    }

    /// Read-modify-write access to one pixel.
    #[inline]
    pub fn update_pixel<F: FnOnce(&mut [u8; 4])>(&mut self, x: i32, y: i32, f: F) {
        let mut px = self.pixel(x, y);
        let before = px;
        f(&mut px);
        if px != before {
            self.set_pixel(x, y, px);
        }
    }

    /// Fills `rect` with a solid color.
    pub fn fill(&mut self, rect: Rect, color: Color) {
        let px = color.to_array();
        for y in rect.y..rect.bottom() {
            for x in rect.x..rect.right() {
                self.set_pixel(x, y, px);
            }
        }
    }

    /// Makes `rect` transparent, dropping tiles that become fully covered.
    pub fn clear(&mut self, rect: Rect) {
        if rect.is_empty() {
            return;
        }
        self.tiles.retain(|&(tx, ty), _| {
            let tile_rect = Rect::new(tx * TILE_SIZE, ty * TILE_SIZE, TILE_SIZE, TILE_SIZE);
            !rect.contains_rect(&tile_rect)
        });
        for y in rect.y..rect.bottom() {
            for x in rect.x..rect.right() {
                let (key, (lx, ly)) = tile_coords(x, y);
                if let Some(tile) = self.tiles.get_mut(&key) {
                    for c in 0..4 {
                        tile[[ly, lx, c]] = 0;
                    }
                }
            }
        }
    }

    /// Raw copy of `rect` from `src`, replacing what was there.
    pub fn copy_rect_from(&mut self, src: &PaintDevice, rect: Rect) {
        for y in rect.y..rect.bottom() {
            for x in rect.x..rect.right() {
                let px = src.pixel(x, y);
                if px == [0, 0, 0, 0] && self.pixel(x, y) == [0, 0, 0, 0] {
                    continue;
                }
                self.set_pixel(x, y, px);
            }
        }
    }

    /// Union of all allocated tiles.
    pub fn extent(&self) -> Rect {
        self.tiles.keys().fold(Rect::empty(), |acc, &(tx, ty)| {
            acc.united(&Rect::new(tx * TILE_SIZE, ty * TILE_SIZE, TILE_SIZE, TILE_SIZE))
        })
    }

    /// Tight bounding box of pixels with non-zero alpha.
    pub fn exact_bounds(&self) -> Rect {
        let mut bounds = Rect::empty();
        for (&(tx, ty), tile) in &self.tiles {
            for ly in 0..TILE_SIZE as usize {
                for lx in 0..TILE_SIZE as usize {
                    if tile[[ly, lx, 3]] != 0 {
                        let px = Rect::new(tx * TILE_SIZE + lx as i32, ty * TILE_SIZE + ly as i32, 1, 1);
                        bounds = bounds.united(&px);
                    }
                }
            }
        }
        bounds
    }

    /// Synthesizes a selection from the alpha channel over `rect`.
    pub fn read_alpha(&self, rect: Rect) -> Result<Selection> {
        Selection::from_alpha(self, rect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_coordinates_address_distinct_tiles() {
        let mut dev = PaintDevice::new();
        dev.set_pixel(-1, -1, [1, 2, 3, 4]);
        dev.set_pixel(0, 0, [5, 6, 7, 8]);
        assert_eq!(dev.pixel(-1, -1), [1, 2, 3, 4]);
        assert_eq!(dev.pixel(0, 0), [5, 6, 7, 8]);
        assert_eq!(dev.pixel(-65, 3), [0, 0, 0, 0]);
        assert_eq!(dev.extent(), Rect::new(-64, -64, 128, 128));
    }

    #[test]
    fn test_fill_and_exact_bounds() {
        let mut dev = PaintDevice::new();
        dev.fill(Rect::new(10, 20, 30, 5), Color::rgb(255, 0, 0));
        assert_eq!(dev.exact_bounds(), Rect::new(10, 20, 30, 5));
        assert_eq!(dev.pixel(39, 24), [255, 0, 0, 255]);
        assert_eq!(dev.pixel(40, 24), [0, 0, 0, 0]);
    }

    #[test]
    fn test_clear_drops_covered_tiles() {
        let mut dev = PaintDevice::new();
        dev.fill(Rect::new(0, 0, 128, 10), Color::WHITE);
        dev.clear(Rect::new(-10, -10, 100, 100));
        assert_eq!(dev.pixel(5, 5), [0, 0, 0, 0]);
        assert_eq!(dev.pixel(100, 5), [255, 255, 255, 255]);
        assert_eq!(dev.extent(), Rect::new(64, 0, 64, 64));
        assert_eq!(dev.exact_bounds(), Rect::new(90, 0, 38, 10));
    }

    #[test]
    fn test_rgba_array_round_trip_at_origin() {
        let mut img = Array3::<u8>::zeros((3, 2, 4));
        img[[1, 1, 0]] = 200;
        img[[1, 1, 3]] = 255;
        let dev = PaintDevice::from_rgba(Point::new(-5, 7), img.view()).unwrap();
        assert_eq!(dev.pixel(-4, 8), [200, 0, 0, 255]);
        let back = dev.to_rgba(Rect::new(-5, 7, 2, 3)).unwrap();
        assert_eq!(back, img);
    }

    #[test]
    fn test_from_rgba_rejects_wrong_channel_count() {
        let img = Array3::<u8>::zeros((2, 2, 3));
        assert!(matches!(
            PaintDevice::from_rgba(Point::default(), img.view()),
            Err(RenderError::InvalidImage(_))
        ));
    }
}
