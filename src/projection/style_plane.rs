//! Layer style stack: effect planes around the layer's own projection.
//!
//! ```text
//!   after[0], after[1], ...      painted last (inner shadow)
//!   source                       the layer's pixels
//!   before[0], before[1], ...    painted first (drop shadow)
//! ```
//!
//! The order is fixed when the stack is built: the builder files each
//! effect plane by its kind's stacking, in registration order.

use std::sync::Arc;

use log::debug;

use super::{FilterProjectionPlane, Layer, NodeId, NodePosition, ProjectionPlane};
use crate::error::Result;
use crate::geometry::Rect;
use crate::layer_effects::{algorithm_for, LayerStyle, Stacking, StyleEnvironment};
use crate::raster::Painter;

/// Effect planes stacked around one source plane.
#[derive(Debug)]
pub struct StyleProjectionPlane {
    source: Arc<dyn ProjectionPlane>,
    before: Vec<FilterProjectionPlane>,
    after: Vec<FilterProjectionPlane>,
}

/// Collects effect planes for a [`StyleProjectionPlane`].
#[derive(Debug)]
pub struct StylePlaneBuilder {
    source: Arc<dyn ProjectionPlane>,
    before: Vec<FilterProjectionPlane>,
    after: Vec<FilterProjectionPlane>,
}

impl StylePlaneBuilder {
    /// Registers an effect plane. Disabled planes are dropped.
    pub fn effect(mut self, plane: FilterProjectionPlane) -> Self {
        if !plane.is_enabled() {
            return self;
        }
        match plane.kind().stacking() {
            Stacking::Before => self.before.push(plane),
            Stacking::After => self.after.push(plane),
        }
        self
    }

    pub fn build(self) -> StyleProjectionPlane {
        debug!(
            "style stack: {} before, {} after",
            self.before.len(),
            self.after.len()
        );
        StyleProjectionPlane {
            source: self.source,
            before: self.before,
            after: self.after,
        }
    }
}

impl StyleProjectionPlane {
    pub fn builder(source: Arc<dyn ProjectionPlane>) -> StylePlaneBuilder {
        StylePlaneBuilder {
            source,
            before: Vec::new(),
            after: Vec::new(),
        }
    }

    /// Builds the stack for every enabled effect of `style`.
    pub fn for_layer(
        layer: &Arc<Layer>,
        style: &LayerStyle,
        source: Arc<dyn ProjectionPlane>,
    ) -> Self {
        let env = StyleEnvironment::from_style(style);
        let mut builder = StyleProjectionPlane::builder(source);
        for config in style.effects() {
            let plane = FilterProjectionPlane::new(
                Arc::clone(layer),
                Box::new(algorithm_for(config.kind)),
                config.clone(),
                env,
            );
            builder = builder.effect(plane);
        }
        debug!("{} ({}): built style stack", layer.name(), layer.id());
        builder.build()
    }

    pub fn source(&self) -> &Arc<dyn ProjectionPlane> {
        &self.source
    }

    pub fn before(&self) -> &[FilterProjectionPlane] {
        &self.before
    }

    pub fn after(&self) -> &[FilterProjectionPlane] {
        &self.after
    }

    fn effect_planes(&self) -> impl Iterator<Item = &FilterProjectionPlane> {
        self.before.iter().chain(self.after.iter())
    }
}

impl ProjectionPlane for StyleProjectionPlane {
    fn recalculate(&self, rect: Rect, filthy_node: NodeId) -> Result<Rect> {
        self.source.recalculate(rect, filthy_node)
    }

    fn apply(&self, painter: &mut Painter<'_>, rect: Rect) -> Result<()> {
        for plane in &self.before {
            plane.apply(painter, rect)?;
        }
        self.source.apply(painter, rect)?;
        for plane in &self.after {
            plane.apply(painter, rect)?;
        }
        Ok(())
    }

    fn need_rect(&self, rect: Rect, position: NodePosition) -> Rect {
        self.source.need_rect(rect, position)
    }

    fn change_rect(&self, rect: Rect, position: NodePosition) -> Rect {
        let source_change = self.source.change_rect(rect, position);
        self.effect_planes().fold(source_change, |acc, plane| {
            acc.united(&plane.change_rect(source_change, position))
        })
    }

    fn access_rect(&self, rect: Rect, position: NodePosition) -> Rect {
        self.effect_planes()
            .fold(self.source.access_rect(rect, position), |acc, plane| {
                acc.united(&plane.access_rect(rect, position))
            })
    }
}
