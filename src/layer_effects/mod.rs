//! Layer effects (Photoshop-style layer styles).
//!
//! ## Shadow Effects
//! - **Drop Shadow** - Shadow cast behind the layer (`shadow.rs`)
//! - **Inner Shadow** - Shadow inside the layer edges (`shadow.rs`)
//!
//! ## Layer Effects vs Filters
//!
//! Layer effects differ from filters in that they:
//! - Work primarily with the alpha channel
//! - Grow the area they read and write (see `need_rect` / `change_rect`)
//! - Composite a solid color through a synthesized selection
//! - Support blend modes and opacity
//!
//! Every effect implements [`EffectAlgorithm`]. Geometry methods are pure
//! functions of the configuration and the input rectangle; `apply` keeps no
//! state between calls.

pub mod config;
pub mod shadow;
pub mod store;

use std::fmt::Debug;

pub use config::{EffectKind, GlobalLight, LayerStyle, ShadowConfig, SpreadEdgeMode, Stacking};
pub use shadow::ShadowEffect;
pub use store::{ConfigStore, PropertyBag, PropertyValue};

use crate::error::Result;
use crate::filters::noise::NoiseGenerator;
use crate::geometry::Rect;
use crate::raster::{PaintDevice, Painter};

/// Per-render context shared by every effect of one style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleEnvironment {
    pub light: GlobalLight,
    pub noise: NoiseGenerator,
}

impl StyleEnvironment {
    pub fn new(light: GlobalLight, noise: NoiseGenerator) -> Self {
        StyleEnvironment { light, noise }
    }

    pub fn from_style(style: &LayerStyle) -> Self {
        StyleEnvironment::new(style.light, NoiseGenerator::new(style.noise_seed))
    }
}

/// A pixel effect with its rectangle propagation rules.
pub trait EffectAlgorithm: Send + Sync + Debug {
    /// The configuration kind this algorithm renders.
    fn kind(&self) -> EffectKind;

    /// Source rectangle that must be valid to produce `rect`.
    fn need_rect(&self, rect: Rect, config: &ShadowConfig, light: &GlobalLight) -> Rect;

    /// Output rectangle affected by a source change inside `rect`.
    fn change_rect(&self, rect: Rect, config: &ShadowConfig, light: &GlobalLight) -> Rect;

    /// Renders the effect for `src` into `painter`, restricted to `rect`.
    fn apply(
        &self,
        src: &PaintDevice,
        painter: &mut Painter<'_>,
        rect: Rect,
        config: &ShadowConfig,
        env: &StyleEnvironment,
    ) -> Result<()>;
}

/// Algorithm for an effect kind.
pub fn algorithm_for(kind: EffectKind) -> ShadowEffect {
    ShadowEffect::new(kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_from_style() {
        let style = LayerStyle {
            noise_seed: 42,
            ..LayerStyle::default()
        };
        let env = StyleEnvironment::from_style(&style);
        assert_eq!(env.noise.seed(), 42);
        assert_eq!(env.light, style.light);
    }

    #[test]
    fn test_algorithm_matches_kind() {
        for kind in [EffectKind::DropShadow, EffectKind::InnerShadow] {
            assert_eq!(algorithm_for(kind).kind(), kind);
        }
    }
}
