//! Layer Styles
//!
//! Non-destructive layer effects (drop shadow, inner shadow) rendered as
//! projection planes around a raster layer, plus the rectangle propagation
//! that tells an incremental compositor what to read and what to repaint.
//! Python bindings via PyO3 and WASM bindings for JavaScript are available
//! behind the `python` and `wasm` features.
//!
//! ## Image Format
//! Images cross the bindings as RGBA u8 arrays of shape (height, width, 4),
//! straight (non-premultiplied) alpha.
//!
//! ## Plane Architecture
//! - [`projection::ProjectionPlane`]: `recalculate` / `apply` plus the pure
//!   geometry queries `need_rect`, `change_rect`, `access_rect`
//! - [`projection::FilterProjectionPlane`]: one effect and its configuration
//! - [`projection::StyleProjectionPlane`]: effect planes stacked before and
//!   after the layer's own projection
//!
//! Effects can write outside the layer's bounds, so whole-image renders
//! return a larger image and the position of its top-left corner.

pub mod error;
pub mod filters;
pub mod geometry;
pub mod layer_effects;
pub mod projection;
pub mod raster;
pub mod render;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use error::{RenderError, Result};
pub use geometry::{Point, Rect};
pub use layer_effects::{
    ConfigStore, EffectAlgorithm, EffectKind, GlobalLight, LayerStyle, PropertyBag, PropertyValue,
    ShadowConfig, ShadowEffect, SpreadEdgeMode, StyleEnvironment,
};
pub use projection::{
    FilterProjectionPlane, Layer, LayerProjectionPlane, NodeId, NodePosition, ProjectionPlane,
    StyleProjectionPlane,
};
pub use raster::{Color, CompositeOp, PaintDevice, Painter, Selection};
pub use render::{render_layer_with_style, render_tiled};

// Python bindings (only when python feature is enabled)
#[cfg(feature = "python")]
mod python {
    use numpy::{IntoPyArray, PyArray3, PyReadonlyArray3};
    use pyo3::exceptions::PyValueError;
    use pyo3::prelude::*;

    use crate::layer_effects::{LayerStyle, ShadowConfig};
    use crate::raster::{Color, CompositeOp};
    use crate::render::render_layer_with_style;

    fn blend_mode(id: &str) -> PyResult<CompositeOp> {
        CompositeOp::from_id(id)
            .ok_or_else(|| PyValueError::new_err(format!("unknown blend mode: {}", id)))
    }

    fn render<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        style: LayerStyle,
        seed: u64,
    ) -> PyResult<(Bound<'py, PyArray3<u8>>, (i32, i32))> {
        let input = image.as_array();
        let (pixels, origin) = py
            .allow_threads(|| render_layer_with_style(input, &style, seed))
            .map_err(|e| PyValueError::new_err(e.to_string()))?;
        Ok((pixels.into_pyarray(py), (origin.x, origin.y)))
    }

    // ========================================================================
    // Drop Shadow
    // ========================================================================

    /// Render a drop shadow under an RGBA u8 image.
    ///
    /// # Arguments
    /// * `image` - Source RGBA image (height, width, 4)
    /// * `size` - Blur size in pixels
    /// * `distance` - Shadow distance in pixels
    /// * `angle` - Light angle in degrees (0 = light from the right)
    /// * `color` - Shadow color (R, G, B)
    /// * `opacity` - Shadow opacity in percent (0-100)
    /// * `spread` - Percent of `size` used to grow the silhouette
    /// * `noise` - Noise amount in percent (0-100)
    /// * `knocks_out` - Remove the shadow under the layer's own silhouette
    /// * `blend_mode` - Compositing operator, e.g. "multiply"
    /// * `seed` - Noise seed
    ///
    /// Numeric arguments outside their accepted range are clamped.
    ///
    /// # Returns
    /// `(image, (x, y))`: the rendered image and the position of its
    /// top-left corner relative to the input.
    #[pyfunction]
    #[pyo3(signature = (image, size=21, distance=21, angle=120, color=(0, 0, 0), opacity=75, spread=0, noise=0, knocks_out=false, blend_mode="multiply", seed=0))]
    pub fn drop_shadow_rgba<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        size: i32,
        distance: i32,
        angle: i32,
        color: (u8, u8, u8),
        opacity: i32,
        spread: i32,
        noise: i32,
        knocks_out: bool,
        blend_mode: &str,
        seed: u64,
    ) -> PyResult<(Bound<'py, PyArray3<u8>>, (i32, i32))> {
        let style = LayerStyle {
            drop_shadow: ShadowConfig {
                effect_enabled: true,
                blend_mode: self::blend_mode(blend_mode)?,
                color: Color::rgb(color.0, color.1, color.2),
                opacity,
                angle,
                use_global_light: false,
                distance,
                spread,
                size,
                noise,
                knocks_out,
                ..ShadowConfig::drop_shadow()
            },
            ..LayerStyle::default()
        };
        render(py, image, style, seed)
    }

    // ========================================================================
    // Inner Shadow
    // ========================================================================

    /// Render an inner shadow on top of an RGBA u8 image.
    ///
    /// Same arguments as `drop_shadow_rgba`, without knockout. The output
    /// is grown by the shadow's change rectangle like the drop shadow's, so
    /// its top-left corner usually lies above and left of the input; pixels
    /// outside the input stay transparent.
    #[pyfunction]
    #[pyo3(signature = (image, size=21, distance=21, angle=120, color=(0, 0, 0), opacity=75, spread=0, noise=0, blend_mode="multiply", seed=0))]
    pub fn inner_shadow_rgba<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        size: i32,
        distance: i32,
        angle: i32,
        color: (u8, u8, u8),
        opacity: i32,
        spread: i32,
        noise: i32,
        blend_mode: &str,
        seed: u64,
    ) -> PyResult<(Bound<'py, PyArray3<u8>>, (i32, i32))> {
        let style = LayerStyle {
            inner_shadow: ShadowConfig {
                effect_enabled: true,
                blend_mode: self::blend_mode(blend_mode)?,
                color: Color::rgb(color.0, color.1, color.2),
                opacity,
                angle,
                use_global_light: false,
                distance,
                spread,
                size,
                noise,
                ..ShadowConfig::inner_shadow()
            },
            ..LayerStyle::default()
        };
        render(py, image, style, seed)
    }

    /// Python module definition
    #[pymodule]
    pub fn layer_styles(m: &Bound<'_, PyModule>) -> PyResult<()> {
        m.add_function(wrap_pyfunction!(drop_shadow_rgba, m)?)?;
        m.add_function(wrap_pyfunction!(inner_shadow_rgba, m)?)?;
        Ok(())
    }
}

#[cfg(feature = "python")]
pub use python::layer_styles;
