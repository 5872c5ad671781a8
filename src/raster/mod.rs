//! Raster primitives consumed by the effect pipeline.
//!
//! - [`PaintDevice`]: sparse RGBA8 device on an unbounded plane
//! - [`Selection`]: single-channel coverage window
//! - [`CompositeOp`]: blend-mode table
//! - [`Painter`]: rectangle-scoped compositing onto a device

pub mod composite;
pub mod paint_device;
pub mod painter;
pub mod selection;

pub use composite::{Color, CompositeOp};
pub use paint_device::PaintDevice;
pub use painter::Painter;
pub use selection::Selection;
