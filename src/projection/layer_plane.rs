//! Raster layers and their plain projection.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::{NodeId, NodePosition, ProjectionPlane, StyleProjectionPlane};
use crate::error::{RenderError, Result};
use crate::geometry::Rect;
use crate::layer_effects::LayerStyle;
use crate::raster::{CompositeOp, PaintDevice, Painter};

/// A raster layer: its rendered pixels plus how they are composited.
#[derive(Debug)]
pub struct Layer {
    id: NodeId,
    name: String,
    device: RwLock<PaintDevice>,
    opacity: u8,
    composite_op: CompositeOp,
    style: Option<LayerStyle>,
}

impl Layer {
    pub fn new(id: NodeId, name: &str, device: PaintDevice) -> Self {
        Layer {
            id,
            name: name.to_string(),
            device: RwLock::new(device),
            opacity: 255,
            composite_op: CompositeOp::Normal,
            style: None,
        }
    }

    pub fn with_opacity(mut self, opacity: u8) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn with_composite_op(mut self, op: CompositeOp) -> Self {
        self.composite_op = op;
        self
    }

    /// Attaches `style`, clamping its values into their accepted ranges.
    pub fn with_style(mut self, style: LayerStyle) -> Self {
        self.style = Some(style.clamped());
        self
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn opacity(&self) -> u8 {
        self.opacity
    }

    pub fn composite_op(&self) -> CompositeOp {
        self.composite_op
    }

    pub fn style(&self) -> Option<&LayerStyle> {
        self.style.as_ref()
    }

    pub fn read_device(&self) -> Result<RwLockReadGuard<'_, PaintDevice>> {
        self.device.read().map_err(|_| RenderError::DeviceLocked)
    }

    pub fn write_device(&self) -> Result<RwLockWriteGuard<'_, PaintDevice>> {
        self.device.write().map_err(|_| RenderError::DeviceLocked)
    }

    /// The plane the scheduler renders for this layer.
    ///
    /// Layers with at least one enabled effect get a style stack around
    /// their own projection; all others project their pixels directly.
    pub fn projection_plane(self: &Arc<Self>) -> Arc<dyn ProjectionPlane> {
        let source: Arc<dyn ProjectionPlane> = Arc::new(LayerProjectionPlane::new(Arc::clone(self)));
        match &self.style {
            Some(style) if style.has_enabled_effects() => {
                Arc::new(StyleProjectionPlane::for_layer(self, style, source))
            }
            _ => source,
        }
    }
}

/// Projects a layer's own pixels.
#[derive(Debug, Clone)]
pub struct LayerProjectionPlane {
    layer: Arc<Layer>,
}

impl LayerProjectionPlane {
    pub fn new(layer: Arc<Layer>) -> Self {
        LayerProjectionPlane { layer }
    }

    pub fn layer(&self) -> &Arc<Layer> {
        &self.layer
    }
}

impl ProjectionPlane for LayerProjectionPlane {
    fn recalculate(&self, rect: Rect, _filthy_node: NodeId) -> Result<Rect> {
        let device = self.layer.read_device()?;
        Ok(rect.intersected(&device.extent()))
    }

    fn apply(&self, painter: &mut Painter<'_>, rect: Rect) -> Result<()> {
        let device = self.layer.read_device()?;
        painter.bit_blt(&device, rect, self.layer.composite_op, self.layer.opacity);
        Ok(())
    }

    fn need_rect(&self, rect: Rect, _position: NodePosition) -> Rect {
        rect
    }

    fn change_rect(&self, rect: Rect, _position: NodePosition) -> Rect {
        rect
    }

    fn access_rect(&self, rect: Rect, _position: NodePosition) -> Rect {
        rect
    }
}
