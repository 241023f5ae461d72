// SPDX-License-Identifier: MIT OR Apache-2.0
//! Connection points: the in/out anchors on either side of a node.

use crate::event::{CanvasMessage, EventContext};
use crate::node::NodeId;
use egui::{Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Default connection point size (width, height)
pub const POINT_SIZE: [f32; 2] = [10.0, 20.0];

/// How far a point overlaps the edge of its node
const POINT_INSET: f32 = 8.0;

/// Which side of a connection a point sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortKind {
    /// Left-hand anchor, the receiving end of a connection
    In,
    /// Right-hand anchor, the sending end of a connection
    Out,
}

/// Stable reference to a connection point: the owning node plus the side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PortRef {
    /// Owning node
    pub node: NodeId,
    /// Side of the node
    pub kind: PortKind,
}

impl PortRef {
    /// Reference a node's in point
    pub fn input(node: NodeId) -> Self {
        Self { node, kind: PortKind::In }
    }

    /// Reference a node's out point
    pub fn output(node: NodeId) -> Self {
        Self { node, kind: PortKind::Out }
    }
}

/// A typed anchor attached to a node.
///
/// The point never stores a position of its own. Its rectangle is derived
/// from the owning node's bounds whenever it is hit-tested or drawn, so it
/// follows the node through drags and pans without any bookkeeping.
/// Points are never persisted; a node rebuilds both from its own id.
#[derive(Debug, Clone)]
pub struct ConnectionPoint {
    /// In or out
    pub kind: PortKind,
    /// Owning node (non-owning back-reference)
    pub owner: NodeId,
    /// Size of the hit region
    pub size: [f32; 2],
}

impl ConnectionPoint {
    /// Create a point for the given node
    pub fn new(owner: NodeId, kind: PortKind) -> Self {
        Self {
            kind,
            owner,
            size: POINT_SIZE,
        }
    }

    /// Reference to this point
    pub fn port_ref(&self) -> PortRef {
        PortRef {
            node: self.owner,
            kind: self.kind,
        }
    }

    /// Hit region for this point given the owning node's current bounds
    pub fn rect(&self, node_bounds: Rect) -> Rect {
        let size = Vec2::new(self.size[0], self.size[1]);
        let y = node_bounds.top() + node_bounds.height() * 0.5 - size.y * 0.5;
        let x = match self.kind {
            PortKind::In => node_bounds.left() - size.x + POINT_INSET,
            PortKind::Out => node_bounds.right() - POINT_INSET,
        };
        Rect::from_min_size(Pos2::new(x, y), size)
    }

    /// Anchor position used by connection curves
    pub fn center(&self, node_bounds: Rect) -> Pos2 {
        self.rect(node_bounds).center()
    }

    /// Raise a `PointActivated` notification for this point
    pub fn activate(&self, ctx: &mut EventContext) {
        ctx.push(CanvasMessage::PointActivated(self.port_ref()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node_rect() -> Rect {
        Rect::from_min_size(Pos2::new(100.0, 50.0), Vec2::new(150.0, 70.0))
    }

    #[test]
    fn test_points_are_vertically_centered() {
        let id = NodeId::new();
        let input = ConnectionPoint::new(id, PortKind::In);
        let output = ConnectionPoint::new(id, PortKind::Out);

        assert_eq!(input.center(node_rect()).y, 85.0);
        assert_eq!(output.center(node_rect()).y, 85.0);
    }

    #[test]
    fn test_points_straddle_node_edges() {
        let id = NodeId::new();
        let input = ConnectionPoint::new(id, PortKind::In).rect(node_rect());
        let output = ConnectionPoint::new(id, PortKind::Out).rect(node_rect());

        // In sits mostly outside the left edge, out mostly inside the right edge
        assert_eq!(input.left(), 98.0);
        assert_eq!(input.right(), 108.0);
        assert_eq!(output.left(), 242.0);
        assert_eq!(output.right(), 252.0);
    }

    #[test]
    fn test_activate_queues_notification() {
        let id = NodeId::new();
        let point = ConnectionPoint::new(id, PortKind::Out);
        let mut ctx = EventContext::default();

        point.activate(&mut ctx);

        let messages = ctx.into_messages();
        assert_eq!(messages.len(), 1);
        assert!(matches!(
            messages[0],
            CanvasMessage::PointActivated(PortRef { node, kind: PortKind::Out }) if node == id
        ));
    }
}
