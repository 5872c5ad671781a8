//! Rectangle-scoped painting onto a [`PaintDevice`].

use super::composite::{composite, mul_u8, Color, CompositeOp};
use super::paint_device::PaintDevice;
use super::selection::Selection;
use crate::geometry::Rect;

/// Borrowed painter over a target device.
pub struct Painter<'a> {
    device: &'a mut PaintDevice,
}

impl<'a> Painter<'a> {
    pub fn new(device: &'a mut PaintDevice) -> Self {
        Painter { device }
    }

    pub fn device(&self) -> &PaintDevice {
        self.device
    }

    pub fn device_mut(&mut self) -> &mut PaintDevice {
        self.device
    }

    /// Composites `src` onto the target inside `rect`.
    pub fn bit_blt(&mut self, src: &PaintDevice, rect: Rect, op: CompositeOp, opacity: u8) {
        if opacity == 0 && op != CompositeOp::Copy {
            return;
        }
        for y in rect.y..rect.bottom() {
            for x in rect.x..rect.right() {
                let src_px = src.pixel(x, y);
                if src_px[3] == 0 && op != CompositeOp::Copy {
                    continue;
                }
                self.device
                    .update_pixel(x, y, |dst| composite(op, dst, src_px, opacity));
            }
        }
    }

    /// Fills `rect` with `color`, using `selection` as a per-pixel stencil.
    pub fn fill_selection(
        &mut self,
        rect: Rect,
        color: Color,
        selection: &Selection,
        op: CompositeOp,
        opacity: u8,
    ) {
        if opacity == 0 {
            return;
        }
        for y in rect.y..rect.bottom() {
            for x in rect.x..rect.right() {
                let coverage = selection.value(x, y);
                if coverage == 0 {
                    continue;
                }
                let src_px = [color.r, color.g, color.b, mul_u8(color.a, coverage)];
                self.device
                    .update_pixel(x, y, |dst| composite(op, dst, src_px, opacity));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_blt_respects_rect() {
        let mut src = PaintDevice::new();
        src.fill(Rect::new(0, 0, 10, 10), Color::rgb(0, 255, 0));
        let mut dst = PaintDevice::new();
        Painter::new(&mut dst).bit_blt(&src, Rect::new(5, 5, 10, 10), CompositeOp::Normal, 255);
        assert_eq!(dst.pixel(4, 4), [0, 0, 0, 0]);
        assert_eq!(dst.pixel(5, 5), [0, 255, 0, 255]);
        assert_eq!(dst.exact_bounds(), Rect::new(5, 5, 5, 5));
    }

    #[test]
    fn test_fill_selection_uses_coverage_as_alpha() {
        let mut sel = Selection::filled(Rect::new(0, 0, 4, 1), 0).unwrap();
        sel.set(1, 0, 255);
        sel.set(2, 0, 128);
        let mut dst = PaintDevice::new();
        Painter::new(&mut dst).fill_selection(
            Rect::new(0, 0, 4, 1),
            Color::BLACK,
            &sel,
            CompositeOp::Normal,
            255,
        );
        assert_eq!(dst.pixel(0, 0)[3], 0);
        assert_eq!(dst.pixel(1, 0), [0, 0, 0, 255]);
        assert_eq!(dst.pixel(2, 0)[3], 128);
    }
}
