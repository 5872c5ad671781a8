//! Gaussian kernel sizing shared by the blur and spread stages.
//!
//! The kernel for a blur "radius" r (pixels, as configured on an effect)
//! uses sigma = 0.3 * r + 0.3 and spans `6 * ceil(sigma) + 1` taps. Rect
//! propagation grows rectangles by half that span, so a blur over a
//! rectangle never reads outside the grown rectangle.

use crate::geometry::Rect;

/// Standard deviation used for a blur of `radius` pixels.
pub fn sigma_from_radius(radius: i32) -> f32 {
    0.3 * radius as f32 + 0.3
}

/// Number of taps of the kernel used for a blur of `radius` pixels. Always odd.
pub fn kernel_size_from_radius(radius: i32) -> i32 {
    if radius <= 0 {
        return 1;
    }
    (sigma_from_radius(radius).ceil() as i32)
        .saturating_mul(6)
        .saturating_add(1)
}

/// Half the kernel span, i.e. how far a blur of `radius` reads past its target.
pub fn kernel_half_extent(radius: i32) -> i32 {
    kernel_size_from_radius(radius) / 2
}

/// Grows `rect` by the read extent of a blur of `radius` pixels.
pub fn grow_rect_from_radius(rect: Rect, radius: i32) -> Rect {
    rect.grown(kernel_half_extent(radius))
}

/// Normalized 1D Gaussian kernel for a blur of `radius` pixels.
pub fn gaussian_kernel_1d(radius: i32) -> Vec<f32> {
    if radius <= 0 {
        return vec![1.0];
    }

    let sigma = sigma_from_radius(radius);
    let half = kernel_half_extent(radius);

    let mut kernel: Vec<f32> = (-half..=half)
        .map(|i| {
            let x = i as f32;
            (-x * x / (2.0 * sigma * sigma)).exp()
        })
        .collect();

    // Normalize
    let sum: f32 = kernel.iter().sum();
    for v in kernel.iter_mut() {
        *v /= sum;
    }

    kernel
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kernel_sizes() {
        assert_eq!(kernel_size_from_radius(0), 1);
        assert_eq!(kernel_size_from_radius(7), 19);
        assert_eq!(kernel_size_from_radius(15), 31);
        assert_eq!(kernel_half_extent(15), 15);
        assert_eq!(kernel_half_extent(21), 21);
        assert_eq!(kernel_size_from_radius(i32::MAX), i32::MAX);
    }

    #[test]
    fn test_kernel_normalized_and_symmetric() {
        let k = gaussian_kernel_1d(10);
        assert_eq!(k.len() as i32, kernel_size_from_radius(10));
        let sum: f32 = k.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
        for i in 0..k.len() / 2 {
            assert!((k[i] - k[k.len() - 1 - i]).abs() < 1e-7);
        }
    }

    #[test]
    fn test_grow_rect_from_radius() {
        let r = Rect::new(0, 0, 10, 10);
        assert_eq!(grow_rect_from_radius(r, 7), Rect::new(-9, -9, 28, 28));
        assert_eq!(grow_rect_from_radius(r, 0), r);
    }
}
