//! Rectangle propagation planes.
//!
//! A plane is one renderable contributor to a layer's composited output.
//! The node scheduler asks a plane to `recalculate` a filthy rectangle and
//! then to `apply` it into an output painter. The geometry queries
//! (`need_rect`, `change_rect`, `access_rect`) are pure functions of the
//! plane's configuration and the input rectangle, so they may be called
//! from any thread.
//!
//! - [`LayerProjectionPlane`]: the layer's own pixels
//! - [`FilterProjectionPlane`]: one effect bound to one configuration
//! - [`StyleProjectionPlane`]: effect planes stacked around a source plane

pub mod filter_plane;
pub mod layer_plane;
pub mod style_plane;

use std::fmt::{self, Debug};

pub use filter_plane::FilterProjectionPlane;
pub use layer_plane::{Layer, LayerProjectionPlane};
pub use style_plane::{StylePlaneBuilder, StyleProjectionPlane};

use crate::error::Result;
use crate::geometry::Rect;
use crate::raster::Painter;

/// Identifier of a node in the layer tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// Where a plane sits relative to the node that changed.
///
/// The geometry of every plane in this crate is independent of position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodePosition {
    AboveFilthy,
    Filthy,
    BelowFilthy,
}

/// Rectangle propagation contract shared by every plane.
pub trait ProjectionPlane: Send + Sync + Debug {
    /// Precomputes `rect` and returns how much of it was touched.
    fn recalculate(&self, rect: Rect, filthy_node: NodeId) -> Result<Rect>;

    /// Composites this plane's contribution inside `rect`.
    ///
    /// May be called repeatedly with overlapping rectangles.
    fn apply(&self, painter: &mut Painter<'_>, rect: Rect) -> Result<()>;

    /// Source rectangle that must be up to date for correct output in `rect`.
    fn need_rect(&self, rect: Rect, position: NodePosition) -> Rect;

    /// Output rectangle that may change when source `rect` changes.
    fn change_rect(&self, rect: Rect, position: NodePosition) -> Rect;

    /// Everything this plane may read or write for `rect`.
    fn access_rect(&self, rect: Rect, position: NodePosition) -> Rect {
        self.need_rect(rect, position).united(&rect)
    }
}
