//! Band-limited noise injection into a selection.
//!
//! A uniformly random selection is generated over the target rectangle
//! grown by [`NOISE_NEED_BORDER`]. Each random byte also picks a jitter of
//! up to +/-8 px (low nibble for x, high nibble for y); the byte is added,
//! saturating, into an overlay at the jittered position. The overlay is
//! then copy-composited into the working selection inside the target
//! rectangle with opacity `noise * 255 / 100`.
//!
//! Random values are keyed by `(seed, x, y)`, never by call order, so a
//! fixed seed reproduces the same pixels however the area is split up.

use crate::error::Result;
use crate::geometry::Rect;
use crate::raster::composite::percent_to_u8;
use crate::raster::Selection;

/// Extra border the noise stage reads around its target rectangle.
pub const NOISE_NEED_BORDER: i32 = 8;

/// Seeded, position-keyed random source owned by one render call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoiseGenerator {
    seed: u64,
}

impl NoiseGenerator {
    pub fn new(seed: u64) -> Self {
        NoiseGenerator { seed }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform random byte for pixel `(x, y)`.
    #[inline]
    pub fn sample(&self, x: i32, y: i32) -> u8 {
        let mut h = self
            .seed
            .wrapping_add((x as u32 as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15))
            .wrapping_add((y as u32 as u64).wrapping_mul(0xC2B2_AE3D_27D4_EB4F));
        // splitmix64 finalizer
        h ^= h >> 30;
        h = h.wrapping_mul(0xBF58_476D_1CE4_E5B9);
        h ^= h >> 27;
        h = h.wrapping_mul(0x94D0_49BB_1331_11EB);
        h ^= h >> 31;
        (h >> 56) as u8
    }

    /// Jitter encoded in a random byte, each axis in `-8..=7`.
    #[inline]
    pub fn jitter(value: u8) -> (i32, i32) {
        ((value & 0x0f) as i32 - 8, (value >> 4) as i32 - 8)
    }

    /// Random selection covering `rect`.
    pub fn random_selection(&self, rect: Rect) -> Result<Selection> {
        let mut selection = Selection::filled(rect, 0)?;
        for y in rect.y..rect.bottom() {
            for x in rect.x..rect.right() {
                selection.set(x, y, self.sample(x, y));
            }
        }
        Ok(selection)
    }
}

/// Injects noise of strength `noise` (0..=100) into `selection` inside `rect`.
///
/// `selection` must be valid over `rect` grown by [`NOISE_NEED_BORDER`].
pub fn apply_noise(
    selection: &mut Selection,
    rect: Rect,
    noise: i32,
    generator: &NoiseGenerator,
) -> Result<()> {
    if noise <= 0 || rect.is_empty() {
        return Ok(());
    }

    let overlay_rect = rect.grown(NOISE_NEED_BORDER);
    let random = generator.random_selection(overlay_rect)?;

    let mut overlay = selection.clone();
    for y in overlay_rect.y..overlay_rect.bottom() {
        for x in overlay_rect.x..overlay_rect.right() {
            let value = random.value(x, y);
            let (dx, dy) = NoiseGenerator::jitter(value);
            let (tx, ty) = (x + dx, y + dy);
            let sum = overlay.value(tx, ty).saturating_add(value);
            overlay.set(tx, ty, sum);
        }
    }

    selection.copy_from(&overlay, rect, percent_to_u8(noise));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_samples_are_deterministic_per_seed() {
        let a = NoiseGenerator::new(12345);
        let b = NoiseGenerator::new(12345);
        let c = NoiseGenerator::new(54321);
        assert_eq!(a.sample(7, -3), b.sample(7, -3));
        let differs = (0..64).any(|x| a.sample(x, 0) != c.sample(x, 0));
        assert!(differs);
    }

    #[test]
    fn test_samples_cover_byte_range() {
        let g = NoiseGenerator::new(1);
        let mut seen = [false; 256];
        for y in 0..64 {
            for x in 0..64 {
                seen[g.sample(x, y) as usize] = true;
            }
        }
        assert!(seen.iter().filter(|&&s| s).count() > 240);
    }

    #[test]
    fn test_jitter_range() {
        assert_eq!(NoiseGenerator::jitter(0x00), (-8, -8));
        assert_eq!(NoiseGenerator::jitter(0xff), (7, 7));
        assert_eq!(NoiseGenerator::jitter(0x18), (0, -7));
    }

    #[test]
    fn test_noise_changes_only_target_rect() {
        let mut sel = Selection::filled(Rect::new(0, 0, 40, 40), 100).unwrap();
        apply_noise(&mut sel, Rect::new(10, 10, 20, 20), 100, &NoiseGenerator::new(3)).unwrap();
        assert_eq!(sel.value(9, 15), 100);
        assert_eq!(sel.value(30, 15), 100);
        let changed = sel.count_nonzero(Rect::new(10, 10, 20, 20));
        assert_eq!(changed, 400);
        let differs = (10..30).any(|x| sel.value(x, 20) != 100);
        assert!(differs);
    }

    #[test]
    fn test_zero_noise_is_identity() {
        let mut sel = Selection::filled(Rect::new(0, 0, 20, 20), 42).unwrap();
        let before = sel.clone();
        apply_noise(&mut sel, Rect::new(5, 5, 10, 10), 0, &NoiseGenerator::new(3)).unwrap();
        assert_eq!(sel, before);
    }

    #[test]
    fn test_noise_in_pieces_matches_whole() {
        let base = Selection::filled(Rect::new(0, 0, 60, 60), 30).unwrap();
        let g = NoiseGenerator::new(99);

        let mut whole = base.clone();
        apply_noise(&mut whole, Rect::new(10, 10, 40, 40), 60, &g).unwrap();

        let mut pieces = base.clone();
        for tile in Rect::new(10, 10, 40, 40).tiles(13) {
            let mut s = base.clone();
            apply_noise(&mut s, tile, 60, &g).unwrap();
            for y in tile.y..tile.bottom() {
                for x in tile.x..tile.right() {
                    pieces.set(x, y, s.value(x, y));
                }
            }
        }
        assert_eq!(whole, pieces);
    }
}
