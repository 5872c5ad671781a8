//! One effect algorithm bound to one configuration.

use std::sync::Arc;

use log::error;

use super::{Layer, NodeId, NodePosition, ProjectionPlane};
use crate::error::{RenderError, Result};
use crate::geometry::Rect;
use crate::layer_effects::{EffectAlgorithm, EffectKind, ShadowConfig, StyleEnvironment};
use crate::raster::Painter;

/// Renders one effect of a layer from the layer's projected pixels.
///
/// The plane owns no pixels. Effects are computed during `apply`, so
/// `recalculate` touches nothing.
#[derive(Debug)]
pub struct FilterProjectionPlane {
    layer: Arc<Layer>,
    algorithm: Box<dyn EffectAlgorithm>,
    config: ShadowConfig,
    env: StyleEnvironment,
}

impl FilterProjectionPlane {
    /// Binds `algorithm` to `config`, refusing configurations of another kind.
    /// Out-of-range values are clamped.
    pub fn try_new(
        layer: Arc<Layer>,
        algorithm: Box<dyn EffectAlgorithm>,
        config: ShadowConfig,
        env: StyleEnvironment,
    ) -> Result<Self> {
        if algorithm.kind() != config.kind {
            return Err(RenderError::KindMismatch {
                algorithm: algorithm.kind(),
                config: config.kind,
            });
        }
        Ok(FilterProjectionPlane {
            layer,
            algorithm,
            config: config.clamped(),
            env,
        })
    }

    /// Like [`try_new`](Self::try_new), but a mismatch is a programming
    /// error: debug builds panic, release builds log it and render the
    /// effect as disabled.
    pub fn new(
        layer: Arc<Layer>,
        algorithm: Box<dyn EffectAlgorithm>,
        config: ShadowConfig,
        env: StyleEnvironment,
    ) -> Self {
        let algorithm_kind = algorithm.kind();
        let config_kind = config.kind;
        if algorithm_kind == config_kind {
            return FilterProjectionPlane {
                layer,
                algorithm,
                config: config.clamped(),
                env,
            };
        }

        let err = RenderError::KindMismatch {
            algorithm: algorithm_kind,
            config: config_kind,
        };
        debug_assert!(false, "{}", err);
        error!("{}: {}; effect disabled", layer.name(), err);
        FilterProjectionPlane {
            layer,
            algorithm,
            config: ShadowConfig {
                effect_enabled: false,
                ..ShadowConfig::for_kind(algorithm_kind)
            },
            env,
        }
    }

    pub fn kind(&self) -> EffectKind {
        self.algorithm.kind()
    }

    pub fn config(&self) -> &ShadowConfig {
        &self.config
    }

    pub fn is_enabled(&self) -> bool {
        self.config.effect_enabled
    }
}

impl ProjectionPlane for FilterProjectionPlane {
    fn recalculate(&self, _rect: Rect, _filthy_node: NodeId) -> Result<Rect> {
        Ok(Rect::empty())
    }

    fn apply(&self, painter: &mut Painter<'_>, rect: Rect) -> Result<()> {
        if !self.config.effect_enabled {
            return Ok(());
        }
        let device = self.layer.read_device()?;
        self.algorithm
            .apply(&device, painter, rect, &self.config, &self.env)
    }

    fn need_rect(&self, rect: Rect, _position: NodePosition) -> Rect {
        self.algorithm.need_rect(rect, &self.config, &self.env.light)
    }

    fn change_rect(&self, rect: Rect, _position: NodePosition) -> Rect {
        self.algorithm
            .change_rect(rect, &self.config, &self.env.light)
    }
}
