//! WebAssembly exports for layer styles.
//!
//! These functions are exposed to JavaScript via wasm-bindgen. Images are
//! flat RGBA u8 arrays (length = width * height * 4).

use ndarray::Array3;
use wasm_bindgen::prelude::*;

use crate::layer_effects::{LayerStyle, ShadowConfig};
use crate::raster::{Color, CompositeOp};
use crate::render::render_layer_with_style;

/// A rendered image that may be larger than its input.
#[wasm_bindgen]
pub struct StyledImage {
    width: usize,
    height: usize,
    offset_x: i32,
    offset_y: i32,
    data: Vec<u8>,
}

#[wasm_bindgen]
impl StyledImage {
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> usize {
        self.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> usize {
        self.height
    }

    /// X of the top-left corner relative to the input image.
    #[wasm_bindgen(getter)]
    pub fn offset_x(&self) -> i32 {
        self.offset_x
    }

    /// Y of the top-left corner relative to the input image.
    #[wasm_bindgen(getter)]
    pub fn offset_y(&self) -> i32 {
        self.offset_y
    }

    /// Flat RGBA bytes.
    #[wasm_bindgen(getter)]
    pub fn data(&self) -> Vec<u8> {
        self.data.clone()
    }
}

// ============================================================================
// Drop Shadow
// ============================================================================

/// Render a drop shadow under an RGBA u8 image.
///
/// # Arguments
/// * `data` - Flat array of RGBA bytes (length = width * height * 4)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `size` - Blur size in pixels
/// * `distance` - Shadow distance in pixels
/// * `angle` - Light angle in degrees
/// * `color` - Shadow color as `#rrggbb`
/// * `opacity` - Shadow opacity in percent (0-100)
/// * `blend_mode` - Compositing operator, e.g. "multiply"
/// * `seed` - Noise seed
///
/// Numeric arguments outside their accepted range are clamped.
#[wasm_bindgen]
#[allow(clippy::too_many_arguments)]
pub fn drop_shadow_rgba_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    size: i32,
    distance: i32,
    angle: i32,
    color: &str,
    opacity: i32,
    blend_mode: &str,
    seed: u32,
) -> Result<StyledImage, JsValue> {
    let input = Array3::from_shape_vec((height, width, 4), data.to_vec())
        .map_err(|e| JsValue::from_str(&format!("Invalid dimensions: {}", e)))?;
    let color = Color::from_hex(color)
        .ok_or_else(|| JsValue::from_str(&format!("Invalid color: {}", color)))?;
    let blend_mode = CompositeOp::from_id(blend_mode)
        .ok_or_else(|| JsValue::from_str(&format!("Unknown blend mode: {}", blend_mode)))?;

    let style = LayerStyle {
        drop_shadow: ShadowConfig {
            effect_enabled: true,
            blend_mode,
            color,
            opacity,
            angle,
            use_global_light: false,
            distance,
            size,
            ..ShadowConfig::drop_shadow()
        },
        ..LayerStyle::default()
    };

    let (pixels, origin) = render_layer_with_style(input.view(), &style, seed as u64)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    let (out_h, out_w, _) = pixels.dim();
    Ok(StyledImage {
        width: out_w,
        height: out_h,
        offset_x: origin.x,
        offset_y: origin.y,
        data: pixels.into_raw_vec_and_offset().0,
    })
}
