//! Separable Gaussian blur over a selection.
//!
//! The blur writes `rect` and reads `rect` grown by the kernel half extent.
//! Both passes run row-parallel on rayon. Each output value depends only on
//! the input window around it, so blurring a rectangle in pieces gives the
//! same bytes as blurring it whole.

use ndarray::Array2;
use rayon::prelude::*;

use super::core::{gaussian_kernel_1d, grow_rect_from_radius};
use crate::geometry::Rect;
use crate::raster::Selection;

/// Blurs `selection` inside `rect` with a kernel sized for `radius` pixels.
pub fn gaussian_blur_selection(selection: &mut Selection, rect: Rect, radius: i32) {
    if radius <= 0 || rect.is_empty() {
        return;
    }

    let kernel = gaussian_kernel_1d(radius);
    let half = kernel.len() / 2;
    let window_rect = grow_rect_from_radius(rect, radius);
    let window = selection.window_f32(window_rect);

    let (out_h, out_w) = (rect.height as usize, rect.width as usize);
    let win_h = window_rect.height as usize;

    // Horizontal pass: every window row, output columns only
    let rows: Vec<Vec<f32>> = (0..win_h)
        .into_par_iter()
        .map(|y| {
            (0..out_w)
                .map(|x| {
                    let mut sum = 0.0f32;
                    for (ki, &kv) in kernel.iter().enumerate() {
                        sum += window[[y, x + ki]] * kv;
                    }
                    sum
                })
                .collect()
        })
        .collect();

    let mut temp = Array2::<f32>::zeros((win_h, out_w));
    for (y, row) in rows.iter().enumerate() {
        for (x, &v) in row.iter().enumerate() {
            temp[[y, x]] = v;
        }
    }

    // Vertical pass
    let result: Vec<Vec<u8>> = (0..out_h)
        .into_par_iter()
        .map(|y| {
            (0..out_w)
                .map(|x| {
                    let mut sum = 0.0f32;
                    for (ki, &kv) in kernel.iter().enumerate() {
                        sum += temp[[y + ki, x]] * kv;
                    }
                    sum.round().clamp(0.0, 255.0) as u8
                })
                .collect()
        })
        .collect();

    debug_assert_eq!(half as i32 * 2 + out_h as i32, win_h as i32);

    for (y, row) in result.iter().enumerate() {
        for (x, &v) in row.iter().enumerate() {
            selection.set(rect.x + x as i32, rect.y + y as i32, v);
        }
    }
}
