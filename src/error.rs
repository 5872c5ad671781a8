//! Error types for the layer style engine.
//!
//! Geometry and pixel loops never fail. Errors only come from three places:
//! - binding an effect algorithm to a configuration of another effect kind
//! - allocating a raster window that is too large
//! - acquiring a layer device whose lock was poisoned

use thiserror::Error;

use crate::layer_effects::EffectKind;

/// Result type alias for layer style operations.
pub type Result<T> = std::result::Result<T, RenderError>;

/// Largest number of pixels a single selection or device window may hold.
pub const MAX_RASTER_PIXELS: i64 = 1 << 28;

/// Errors surfaced at module boundaries of the rendering pipeline.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// An effect algorithm was bound to a configuration of another kind.
    #[error("effect algorithm {algorithm:?} cannot render a {config:?} configuration")]
    KindMismatch {
        algorithm: EffectKind,
        config: EffectKind,
    },

    /// A raster window exceeded [`MAX_RASTER_PIXELS`].
    #[error("cannot allocate a {width}x{height} raster window")]
    Allocation { width: i32, height: i32 },

    /// The layer device lock was poisoned by a panicking writer.
    #[error("layer device is unavailable (lock poisoned)")]
    DeviceLocked,

    /// An RGBA buffer handed in from outside has the wrong shape.
    #[error("invalid image: {0}")]
    InvalidImage(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_problem() {
        let err = RenderError::KindMismatch {
            algorithm: EffectKind::DropShadow,
            config: EffectKind::InnerShadow,
        };
        assert_eq!(
            err.to_string(),
            "effect algorithm DropShadow cannot render a InnerShadow configuration"
        );

        let err = RenderError::Allocation {
            width: 70000,
            height: 70000,
        };
        assert_eq!(err.to_string(), "cannot allocate a 70000x70000 raster window");
    }
}
