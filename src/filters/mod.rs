//! Selection filters used by the layer effects.
//!
//! Every filter works in place on a [`Selection`](crate::raster::Selection)
//! and is scoped to a rectangle. Filters that read around their target
//! (blur, spread, noise) document how far they read, and the shadow
//! geometry chain grows rectangles by exactly that much.
//!
//! ## Stages
//!
//! - **Blur**: separable Gaussian, kernel sized from a pixel radius
//! - **Morphology**: spread (blur + hard-edge remap)
//! - **Contour**: 256-entry falloff remap
//! - **Noise**: seeded, position-keyed jittered noise

pub mod blur;
pub mod contour;
pub mod core;
pub mod morphology;
pub mod noise;
