//! Single-channel coverage raster.
//!
//! A selection is a u8 window over a rectangle plus a default value for
//! everything outside it. It is synthesized fresh for each effect
//! invocation and owned by that call alone.

use ndarray::Array2;

use super::composite::{lerp_u8, mul_u8};
use super::paint_device::PaintDevice;
use crate::error::Result;
use crate::geometry::{Point, Rect};

/// Coverage raster with a movable origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    origin: Point,
    data: Array2<u8>,
    default_value: u8,
}

impl Selection {
    /// Creates a selection covering `rect`, filled with `value`.
    pub fn filled(rect: Rect, value: u8) -> Result<Self> {
        rect.check_allocatable()?;
        let (w, h) = (rect.width.max(0) as usize, rect.height.max(0) as usize);
        Ok(Selection {
            origin: rect.top_left(),
            data: Array2::from_elem((h, w), value),
            default_value: 0,
        })
    }

    /// One pass over `rect`: one byte per pixel equal to the source alpha.
    pub fn from_alpha(device: &PaintDevice, rect: Rect) -> Result<Self> {
        let mut selection = Selection::filled(rect, 0)?;
        for ((y, x), v) in selection.data.indexed_iter_mut() {
            *v = device.pixel(rect.x + x as i32, rect.y + y as i32)[3];
        }
        Ok(selection)
    }

    pub fn bounds(&self) -> Rect {
        let (h, w) = self.data.dim();
        Rect::new(self.origin.x, self.origin.y, w as i32, h as i32)
    }

    pub fn default_value(&self) -> u8 {
        self.default_value
    }

    #[inline]
    pub fn value(&self, x: i32, y: i32) -> u8 {
        let lx = x - self.origin.x;
        let ly = y - self.origin.y;
        let (h, w) = self.data.dim();
        if lx < 0 || ly < 0 || lx as usize >= w || ly as usize >= h {
            return self.default_value;
        }
        self.data[[ly as usize, lx as usize]]
    }

    /// Writes one value. Writes outside the window are dropped.
    #[inline]
    pub fn set(&mut self, x: i32, y: i32, value: u8) {
        let lx = x - self.origin.x;
        let ly = y - self.origin.y;
        if lx < 0 || ly < 0 {
            return;
        }
        if let Some(v) = self.data.get_mut([ly as usize, lx as usize]) {
            *v = value;
        }
    }

    /// Applies `f` to every value inside `rect` (clipped to the window).
    pub fn map_rect<F: Fn(u8) -> u8>(&mut self, rect: Rect, f: F) {
        let area = rect.intersected(&self.bounds());
        for y in area.y..area.bottom() {
            for x in area.x..area.right() {
                let ly = (y - self.origin.y) as usize;
                let lx = (x - self.origin.x) as usize;
                let v = &mut self.data[[ly, lx]];
                *v = f(*v);
            }
        }
    }

    /// `255 - v` for every value, including the outside default.
    pub fn invert(&mut self) {
        self.data.mapv_inplace(|v| 255 - v);
        self.default_value = 255 - self.default_value;
    }

    /// Moves the selection by `offset`. Pure coordinate change, no pixel copy.
    pub fn translate(&mut self, offset: Point) {
        self.origin.x += offset.x;
        self.origin.y += offset.y;
    }

    /// Alpha-subtract composite: removes `other`'s coverage inside `rect`.
    pub fn erase(&mut self, other: &Selection, rect: Rect) {
        let area = rect.intersected(&self.bounds());
        for y in area.y..area.bottom() {
            for x in area.x..area.right() {
                let keep = 255 - other.value(x, y);
                let v = self.value(x, y);
                self.set(x, y, mul_u8(v, keep));
            }
        }
    }

    /// Copy-composites `overlay` into this selection inside `rect` with `opacity`.
    pub fn copy_from(&mut self, overlay: &Selection, rect: Rect, opacity: u8) {
        let area = rect.intersected(&self.bounds());
        for y in area.y..area.bottom() {
            for x in area.x..area.right() {
                let v = self.value(x, y);
                self.set(x, y, lerp_u8(v, overlay.value(x, y), opacity));
            }
        }
    }

    /// Multiplies coverage inside `rect` by the alpha of `device`.
    pub fn mask_with_alpha(&mut self, device: &PaintDevice, rect: Rect) {
        let area = rect.intersected(&self.bounds());
        for y in area.y..area.bottom() {
            for x in area.x..area.right() {
                let v = self.value(x, y);
                self.set(x, y, mul_u8(v, device.pixel(x, y)[3]));
            }
        }
    }

    /// Copies `rect` into a dense f32 buffer, row-major.
    pub fn window_f32(&self, rect: Rect) -> Array2<f32> {
        let (w, h) = (rect.width.max(0) as usize, rect.height.max(0) as usize);
        Array2::from_shape_fn((h, w), |(y, x)| {
            self.value(rect.x + x as i32, rect.y + y as i32) as f32
        })
    }

    /// Number of values inside `rect` that are not zero.
    pub fn count_nonzero(&self, rect: Rect) -> usize {
        let mut n = 0;
        for y in rect.y..rect.bottom() {
            for x in rect.x..rect.right() {
                if self.value(x, y) != 0 {
                    n += 1;
                }
            }
        }
        n
    }
}
