//! Rendering drivers on top of the plane contract.
//!
//! [`render_tiled`] plays the role of the external scheduler: it splits a
//! dirty rectangle into tiles, applies the plane to each tile on a rayon
//! worker, and merges the tiles back. [`render_layer_with_style`] renders a
//! whole RGBA image with a style, growing the output by the style's change
//! rectangle.

use std::sync::Arc;

use log::debug;
use ndarray::{Array3, ArrayView3};
use rayon::prelude::*;

use crate::error::Result;
use crate::geometry::{Point, Rect};
use crate::layer_effects::LayerStyle;
use crate::projection::{Layer, NodeId, NodePosition, ProjectionPlane};
use crate::raster::paint_device::TILE_SIZE;
use crate::raster::{PaintDevice, Painter};

/// Tile edge used by [`render_layer_with_style`].
pub const RENDER_TILE: i32 = TILE_SIZE * 2;

/// Applies `plane` to `dst` inside `rect`, one tile per rayon task.
///
/// Each task composites onto its own copy of the destination tile, so the
/// result equals a single `apply` over `rect`.
pub fn render_tiled(
    plane: &dyn ProjectionPlane,
    dst: &mut PaintDevice,
    rect: Rect,
    tile: i32,
) -> Result<()> {
    let tiles = rect.tiles(tile);
    debug!("render_tiled: {:?} in {} tiles", rect, tiles.len());

    let base: &PaintDevice = dst;
    let rendered = tiles
        .into_par_iter()
        .map(|tile_rect| -> Result<(Rect, PaintDevice)> {
            let mut device = PaintDevice::new();
            device.copy_rect_from(base, tile_rect);
            plane.apply(&mut Painter::new(&mut device), tile_rect)?;
            Ok((tile_rect, device))
        })
        .collect::<Result<Vec<_>>>()?;

    for (tile_rect, device) in rendered {
        dst.copy_rect_from(&device, tile_rect);
    }
    Ok(())
}

/// Renders an RGBA image (height, width, 4) with `style`.
///
/// Returns the output pixels and the position of their top-left corner
/// relative to the input image. The output covers everything the style can
/// change, so it may be larger than the input. Out-of-range style values
/// are clamped as [`LayerStyle::clamped`] describes.
pub fn render_layer_with_style(
    rgba: ArrayView3<u8>,
    style: &LayerStyle,
    seed: u64,
) -> Result<(Array3<u8>, Point)> {
    let device = PaintDevice::from_rgba(Point::new(0, 0), rgba)?;
    let (height, width) = (rgba.shape()[0] as i32, rgba.shape()[1] as i32);
    let bounds = Rect::new(0, 0, width, height);

    let style = LayerStyle {
        noise_seed: seed,
        ..style.clone()
    };
    let layer = Arc::new(Layer::new(NodeId(0), "image", device).with_style(style));
    let plane = layer.projection_plane();

    let out_rect = plane
        .change_rect(bounds, NodePosition::AboveFilthy)
        .united(&bounds);
    out_rect.check_allocatable()?;

    let mut dst = PaintDevice::new();
    render_tiled(plane.as_ref(), &mut dst, out_rect, RENDER_TILE)?;
    Ok((dst.to_rgba(out_rect)?, out_rect.top_left()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RenderError;
    use crate::layer_effects::ShadowConfig;
    use crate::raster::Color;

    fn square_image() -> Array3<u8> {
        let mut image = Array3::<u8>::zeros((64, 64, 4));
        for y in 16..48 {
            for x in 16..48 {
                image[[y, x, 0]] = 40;
                image[[y, x, 1]] = 200;
                image[[y, x, 2]] = 90;
                image[[y, x, 3]] = 255;
            }
        }
        image
    }

    fn shadow_style() -> LayerStyle {
        LayerStyle {
            drop_shadow: ShadowConfig {
                effect_enabled: true,
                size: 8,
                distance: 6,
                spread: 20,
                noise: 30,
                ..ShadowConfig::drop_shadow()
            },
            inner_shadow: ShadowConfig {
                effect_enabled: true,
                size: 5,
                distance: 3,
                ..ShadowConfig::inner_shadow()
            },
            ..LayerStyle::default()
        }
    }

    #[test]
    fn test_tiled_matches_single_apply() {
        let device = PaintDevice::from_rgba(Point::new(0, 0), square_image().view()).unwrap();
        let layer = Arc::new(Layer::new(NodeId(1), "square", device).with_style(shadow_style()));
        let plane = layer.projection_plane();
        let area = Rect::new(-20, -20, 110, 110);

        let mut background = PaintDevice::new();
        background.fill(area, Color::rgb(250, 240, 230));

        let mut whole = background.clone();
        plane.apply(&mut Painter::new(&mut whole), area).unwrap();

        for tile in [7, 32, 200] {
            let mut tiled = background.clone();
            render_tiled(plane.as_ref(), &mut tiled, area, tile).unwrap();
            assert_eq!(whole.to_rgba(area), tiled.to_rgba(area), "tile {}", tile);
        }
    }

    #[test]
    fn test_render_layer_grows_output() {
        let (pixels, origin) = render_layer_with_style(square_image().view(), &shadow_style(), 5).unwrap();
        assert!(origin.x <= 0 && origin.y <= 0);
        let (h, w, c) = pixels.dim();
        assert_eq!(c, 4);
        assert!(w > 64 && h > 64);

        // Source pixel in the middle of the square survives
        let (cx, cy) = ((32 - origin.x) as usize, (32 - origin.y) as usize);
        assert_eq!(pixels[[cy, cx, 3]], 255);
    }

    #[test]
    fn test_render_layer_is_reproducible_per_seed() {
        let image = square_image();
        let a = render_layer_with_style(image.view(), &shadow_style(), 11).unwrap();
        let b = render_layer_with_style(image.view(), &shadow_style(), 11).unwrap();
        assert_eq!(a, b);
        let c = render_layer_with_style(image.view(), &shadow_style(), 12).unwrap();
        assert_eq!(a.1, c.1);
        assert_ne!(a.0, c.0);
    }

    #[test]
    fn test_unstyled_render_is_identity() {
        let image = square_image();
        let (pixels, origin) =
            render_layer_with_style(image.view(), &LayerStyle::default(), 0).unwrap();
        assert_eq!(origin, Point::new(0, 0));
        assert_eq!(pixels, image);
    }

    #[test]
    fn test_out_of_range_style_is_clamped() {
        let style = LayerStyle {
            drop_shadow: ShadowConfig {
                effect_enabled: true,
                use_global_light: false,
                angle: 180,
                distance: i32::MAX,
                size: 0,
                opacity: 1000,
                ..ShadowConfig::drop_shadow()
            },
            ..LayerStyle::default()
        };
        let (pixels, origin) = render_layer_with_style(square_image().view(), &style, 0).unwrap();
        assert_eq!(origin, Point::new(0, 0));
        assert_eq!(pixels.dim(), (64, 64 + 30000, 4));
    }

    #[test]
    fn test_bad_shape_is_rejected() {
        let image = Array3::<u8>::zeros((4, 4, 3));
        let err = render_layer_with_style(image.view(), &LayerStyle::default(), 0).unwrap_err();
        assert!(matches!(err, RenderError::InvalidImage(_)));
    }
}
