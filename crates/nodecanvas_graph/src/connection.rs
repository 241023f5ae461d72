// SPDX-License-Identifier: MIT OR Apache-2.0
//! Connection (edge) definitions for the canvas.

use crate::draw::{connection_curve, Surface};
use crate::node::{Node, NodeId};
use crate::port::{PortKind, PortRef};
use egui::{Color32, Pos2, Rect, Stroke, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Side length of the square remove handle at a connection's midpoint
pub const REMOVE_HANDLE_SIZE: f32 = 8.0;

const CONNECTION_THICKNESS: f32 = 2.0;
const CONNECTION_COLOR: Color32 = Color32::from_rgb(200, 80, 200);

/// Unique identifier for a connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectionId(pub Uuid);

impl ConnectionId {
    /// Create a new random connection ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

/// How a connection is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConnectionStyle {
    /// Cubic curve leaving and entering horizontally
    #[default]
    Bezier,
    /// Straight segment
    Line,
}

/// An edge from one node's out point to another node's in point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    /// Unique connection ID
    pub id: ConnectionId,
    /// Node whose out point the connection leaves from
    pub out_node: NodeId,
    /// Node whose in point the connection enters
    pub in_node: NodeId,
}

impl Connection {
    /// Create a new connection
    pub fn new(out_node: NodeId, in_node: NodeId) -> Self {
        Self {
            id: ConnectionId::new(),
            out_node,
            in_node,
        }
    }

    /// The out end
    pub fn out_point(&self) -> PortRef {
        PortRef::output(self.out_node)
    }

    /// The in end
    pub fn in_point(&self) -> PortRef {
        PortRef::input(self.in_node)
    }

    /// Check if this connection involves a specific node
    pub fn involves_node(&self, node_id: NodeId) -> bool {
        self.out_node == node_id || self.in_node == node_id
    }

    /// Current endpoint anchors (out, in), resolved from the nodes' bounds
    pub fn endpoints(&self, out_node: &Node, in_node: &Node) -> (Pos2, Pos2) {
        (out_node.anchor(PortKind::Out), in_node.anchor(PortKind::In))
    }

    /// Square remove handle centred between the endpoints
    pub fn remove_handle(&self, out_node: &Node, in_node: &Node) -> Rect {
        let (from, to) = self.endpoints(out_node, in_node);
        Rect::from_center_size(from.lerp(to, 0.5), Vec2::splat(REMOVE_HANDLE_SIZE))
    }

    /// Draw the edge and its remove handle
    pub fn draw(
        &self,
        surface: &mut dyn Surface,
        out_node: &Node,
        in_node: &Node,
        style: ConnectionStyle,
    ) {
        let (from, to) = self.endpoints(out_node, in_node);
        let stroke = Stroke::new(CONNECTION_THICKNESS, CONNECTION_COLOR);

        match style {
            ConnectionStyle::Bezier => surface.bezier(connection_curve(from, to), stroke),
            ConnectionStyle::Line => surface.line_segment(from, to, stroke),
        }

        let handle = self.remove_handle(out_node, in_node);
        surface.fill_rect(handle, 1.0, Color32::from_gray(40));
        surface.stroke_rect(handle, 1.0, Stroke::new(1.0, CONNECTION_COLOR));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::recording::RecordingSurface;
    use crate::node::NodeCategory;

    fn pair() -> (Node, Node) {
        (
            Node::new(NodeCategory::Blue, Pos2::new(0.0, 0.0)),
            Node::new(NodeCategory::Red, Pos2::new(300.0, 0.0)),
        )
    }

    #[test]
    fn test_connection_points() {
        let (a, b) = pair();
        let connection = Connection::new(a.id, b.id);

        assert_eq!(connection.out_point(), PortRef::output(a.id));
        assert_eq!(connection.in_point(), PortRef::input(b.id));
        assert!(connection.involves_node(a.id));
        assert!(connection.involves_node(b.id));
    }

    #[test]
    fn test_remove_handle_at_midpoint() {
        let (a, b) = pair();
        let connection = Connection::new(a.id, b.id);
        let (from, to) = connection.endpoints(&a, &b);

        let handle = connection.remove_handle(&a, &b);
        assert_eq!(handle.center(), Pos2::new((from.x + to.x) / 2.0, 35.0));
        assert_eq!(handle.size(), Vec2::splat(REMOVE_HANDLE_SIZE));
    }

    #[test]
    fn test_endpoints_follow_moved_nodes() {
        let (mut a, b) = pair();
        let connection = Connection::new(a.id, b.id);
        let (before, _) = connection.endpoints(&a, &b);

        a.move_by(Vec2::new(0.0, 40.0));
        let (after, _) = connection.endpoints(&a, &b);

        assert_eq!(after, before + Vec2::new(0.0, 40.0));
    }

    #[test]
    fn test_line_style_draws_single_segment() {
        let (a, b) = pair();
        let connection = Connection::new(a.id, b.id);
        let mut surface = RecordingSurface::default();

        connection.draw(&mut surface, &a, &b, ConnectionStyle::Line);

        let lines: Vec<_> = surface.lines().collect();
        assert_eq!(lines.len(), 1);
        let (from, to) = connection.endpoints(&a, &b);
        assert_eq!(lines[0], (&from, &to));
        assert_eq!(surface.fills().count(), 1);
    }
}
