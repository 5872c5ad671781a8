//! Spread: morphological growth of a selection silhouette.
//!
//! The silhouette is blurred with the spread radius and then every touched
//! value is remapped to a hard edge. With the edge hidden, faint values
//! below [`EDGE_THRESHOLD`] keep a short ramp (x10) instead of jumping to
//! full coverage.

use super::blur::gaussian_blur_selection;
use crate::geometry::Rect;
use crate::raster::Selection;

/// Values below this keep a ramp when the edge is hidden.
pub const EDGE_THRESHOLD: u8 = 24;

/// Remaps every value inside `rect` to a hard-edged silhouette.
pub fn find_edge(selection: &mut Selection, rect: Rect, edge_hidden: bool) {
    if edge_hidden {
        selection.map_rect(rect, |v| {
            if v < EDGE_THRESHOLD {
                (v as u16 * 10).min(255) as u8
            } else {
                255
            }
        });
    } else {
        selection.map_rect(rect, |_| 255);
    }
}

/// Grows the silhouette by `spread_size` pixels inside `rect`.
pub fn apply_spread(selection: &mut Selection, rect: Rect, spread_size: i32, edge_hidden: bool) {
    if spread_size <= 0 {
        return;
    }
    gaussian_blur_selection(selection, rect, spread_size);
    find_edge(selection, rect, edge_hidden);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dot() -> Selection {
        let mut sel = Selection::filled(Rect::new(0, 0, 40, 40), 0).unwrap();
        sel.map_rect(Rect::new(18, 18, 4, 4), |_| 255);
        sel
    }

    #[test]
    fn test_find_edge_hidden_ramps_low_values() {
        let mut sel = Selection::filled(Rect::new(0, 0, 4, 1), 0).unwrap();
        sel.set(1, 0, 2);
        sel.set(2, 0, 23);
        sel.set(3, 0, 24);
        find_edge(&mut sel, Rect::new(0, 0, 4, 1), true);
        assert_eq!(sel.value(0, 0), 0);
        assert_eq!(sel.value(1, 0), 20);
        assert_eq!(sel.value(2, 0), 230);
        assert_eq!(sel.value(3, 0), 255);
    }

    #[test]
    fn test_find_edge_visible_saturates_everything() {
        let mut sel = Selection::filled(Rect::new(0, 0, 3, 3), 0).unwrap();
        find_edge(&mut sel, Rect::new(0, 0, 3, 3), false);
        assert_eq!(sel.count_nonzero(Rect::new(0, 0, 3, 3)), 9);
    }

    #[test]
    fn test_spread_grows_silhouette() {
        let mut sel = dot();
        let before = sel.count_nonzero(sel.bounds());
        apply_spread(&mut sel, Rect::new(6, 6, 28, 28), 4, true);
        let after = sel.count_nonzero(sel.bounds());
        assert!(after > before);
        assert_eq!(sel.value(19, 19), 255);
        assert_eq!(sel.value(17, 19), 255);
    }

    #[test]
    fn test_zero_spread_is_identity() {
        let mut sel = dot();
        let before = sel.clone();
        apply_spread(&mut sel, Rect::new(6, 6, 28, 28), 0, true);
        assert_eq!(sel, before);
    }
}
