//! Integer rectangle math used by the rectangle propagation protocol.
//!
//! Rectangles follow raster conventions: `x`/`y` name the top-left pixel,
//! `right()`/`bottom()` are exclusive, and y grows downwards. A rectangle
//! with a non-positive width or height is empty. Empty rectangles are
//! absorbing for growth and translation and neutral for union, so every
//! geometry query maps an empty input to an empty output. Coordinates
//! saturate at the `i32` limits instead of wrapping.

use crate::error::{RenderError, Result, MAX_RASTER_PIXELS};

/// Integer point / offset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Point { x, y }
    }

    /// Point mirrored through the origin.
    pub const fn negated(self) -> Self {
        Point::new(self.x.saturating_neg(), self.y.saturating_neg())
    }
}

/// Axis-aligned integer rectangle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Rect {
            x,
            y,
            width,
            height,
        }
    }

    /// Canonical empty rectangle.
    pub const fn empty() -> Self {
        Rect::new(0, 0, 0, 0)
    }

    /// Rectangle spanning `[left, right) x [top, bottom)`.
    pub fn from_edges(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Rect::new(left, top, right.saturating_sub(left), bottom.saturating_sub(top))
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    pub fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    pub fn top_left(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn area(&self) -> i64 {
        if self.is_empty() {
            0
        } else {
            self.width as i64 * self.height as i64
        }
    }

    /// Fails with [`RenderError::Allocation`] if a raster window of this
    /// size would exceed [`MAX_RASTER_PIXELS`].
    pub fn check_allocatable(&self) -> Result<()> {
        if self.area() > MAX_RASTER_PIXELS {
            return Err(RenderError::Allocation {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    pub fn translated(&self, offset: Point) -> Self {
        if self.is_empty() {
            return *self;
        }
        Rect::new(
            self.x.saturating_add(offset.x),
            self.y.saturating_add(offset.y),
            self.width,
            self.height,
        )
    }

    /// Grows the rectangle by `border` pixels on every side.
    pub fn grown(&self, border: i32) -> Self {
        if self.is_empty() {
            return *self;
        }
        let twice = border.saturating_mul(2);
        Rect::new(
            self.x.saturating_sub(border),
            self.y.saturating_sub(border),
            self.width.saturating_add(twice),
            self.height.saturating_add(twice),
        )
    }

    /// Bounding box of both rectangles; empty operands are ignored.
    pub fn united(&self, other: &Rect) -> Self {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        Rect::from_edges(
            self.x.min(other.x),
            self.y.min(other.y),
            self.right().max(other.right()),
            self.bottom().max(other.bottom()),
        )
    }

    pub fn intersected(&self, other: &Rect) -> Self {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right <= left || bottom <= top {
            return Rect::empty();
        }
        Rect::from_edges(left, top, right, bottom)
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        !self.intersected(other).is_empty()
    }

    pub fn contains_point(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// True if `other` lies fully inside. The empty rectangle is contained
    /// in every rectangle.
    pub fn contains_rect(&self, other: &Rect) -> bool {
        if other.is_empty() {
            return true;
        }
        if self.is_empty() {
            return false;
        }
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Splits the rectangle into row-major tiles of at most `tile` pixels a side.
    pub fn tiles(&self, tile: i32) -> Vec<Rect> {
        let tile = tile.max(1);
        let mut out = Vec::new();
        if self.is_empty() {
            return out;
        }
        let mut y = self.y;
        while y < self.bottom() {
            let h = tile.min(self.bottom() - y);
            let mut x = self.x;
            while x < self.right() {
                let w = tile.min(self.right() - x);
                out.push(Rect::new(x, y, w, h));
                x += w;
            }
            y += h;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_absorbing_for_grow_and_translate() {
        let e = Rect::new(5, 5, 0, 10);
        assert!(e.grown(8).is_empty());
        assert!(e.translated(Point::new(3, 3)).is_empty());
    }

    #[test]
    fn test_union_ignores_empty() {
        let r = Rect::new(10, 10, 5, 5);
        assert_eq!(r.united(&Rect::empty()), r);
        assert_eq!(Rect::empty().united(&r), r);
        assert_eq!(
            r.united(&Rect::new(0, 12, 2, 10)),
            Rect::from_edges(0, 10, 15, 22)
        );
    }

    #[test]
    fn test_intersection() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(5, 6, 10, 10);
        assert_eq!(a.intersected(&b), Rect::new(5, 6, 5, 4));
        assert!(a.intersected(&Rect::new(10, 0, 4, 4)).is_empty());
    }

    #[test]
    fn test_containment() {
        let a = Rect::new(0, 0, 10, 10);
        assert!(a.contains_rect(&Rect::new(2, 2, 8, 8)));
        assert!(!a.contains_rect(&Rect::new(2, 2, 9, 8)));
        assert!(a.contains_rect(&Rect::empty()));
        assert!(!Rect::empty().contains_rect(&a));
        assert!(a.contains_point(9, 0));
        assert!(!a.contains_point(10, 0));
    }

    #[test]
    fn test_tiles_cover_exactly() {
        let r = Rect::new(-3, 4, 70, 33);
        let tiles = r.tiles(32);
        assert_eq!(tiles.len(), 6);
        let total: i64 = tiles.iter().map(Rect::area).sum();
        assert_eq!(total, r.area());
        let bbox = tiles.iter().fold(Rect::empty(), |acc, t| acc.united(t));
        assert_eq!(bbox, r);
    }

    #[test]
    fn test_extreme_offsets_saturate() {
        let r = Rect::new(0, 0, 10, 10);
        let far = r.translated(Point::new(i32::MAX, i32::MIN));
        assert_eq!(far.top_left(), Point::new(i32::MAX, i32::MIN));
        assert_eq!(far.right(), i32::MAX);

        let huge = r.grown(i32::MAX);
        assert_eq!(huge.x, -i32::MAX);
        assert_eq!(huge.width, i32::MAX);
        assert!(huge.check_allocatable().is_err());
        assert_eq!(Point::new(i32::MIN, 3).negated(), Point::new(i32::MAX, -3));
    }

    #[test]
    fn test_allocation_limit() {
        assert!(Rect::new(0, 0, 100, 100).check_allocatable().is_ok());
        assert_eq!(
            Rect::new(0, 0, 1 << 15, 1 << 15).check_allocatable(),
            Err(RenderError::Allocation {
                width: 1 << 15,
                height: 1 << 15
            })
        );
    }
}
