// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node definitions for the canvas.

use crate::draw::Surface;
use crate::event::{CanvasEvent, CanvasMessage, EventContext};
use crate::port::{ConnectionPoint, PortKind};
use egui::{Color32, Key, PointerButton, Pos2, Rect, Stroke, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default node size (width, height)
pub const NODE_SIZE: [f32; 2] = [150.0, 70.0];

const NODE_ROUNDING: f32 = 6.0;

/// Unique identifier for a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub Uuid);

impl NodeId {
    /// Create a new random node ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

/// Node colour category. Purely cosmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum NodeCategory {
    /// Blue body
    #[default]
    Blue,
    /// Teal body
    Teal,
    /// Green body
    Green,
    /// Yellow body
    Yellow,
    /// Orange body
    Orange,
    /// Red body
    Red,
}

impl NodeCategory {
    /// Every category, in menu order
    pub fn all() -> &'static [NodeCategory] {
        &[
            NodeCategory::Blue,
            NodeCategory::Teal,
            NodeCategory::Green,
            NodeCategory::Yellow,
            NodeCategory::Orange,
            NodeCategory::Red,
        ]
    }

    /// Display name
    pub fn display_name(&self) -> &'static str {
        match self {
            NodeCategory::Blue => "Blue",
            NodeCategory::Teal => "Teal",
            NodeCategory::Green => "Green",
            NodeCategory::Yellow => "Yellow",
            NodeCategory::Orange => "Orange",
            NodeCategory::Red => "Red",
        }
    }

    /// Body colour when idle
    pub fn color(&self) -> [u8; 3] {
        match self {
            NodeCategory::Blue => [52, 84, 138],
            NodeCategory::Teal => [38, 110, 112],
            NodeCategory::Green => [56, 112, 60],
            NodeCategory::Yellow => [140, 126, 44],
            NodeCategory::Orange => [150, 90, 40],
            NodeCategory::Red => [140, 50, 50],
        }
    }

    /// Body colour when selected
    pub fn highlight_color(&self) -> [u8; 3] {
        let [r, g, b] = self.color();
        [
            r.saturating_add(50),
            g.saturating_add(50),
            b.saturating_add(50),
        ]
    }
}

/// Interaction state of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodeState {
    /// Not selected
    #[default]
    Idle,
    /// Selected and highlighted
    Selected,
    /// Selected and following the pointer
    Dragging,
}

/// A node on the canvas.
///
/// Connection points are not stored; they are rebuilt from `id` on load so
/// a saved file can never hand a node a point owned by someone else.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "StoredNode")]
pub struct Node {
    /// Unique instance ID
    pub id: NodeId,
    /// Title drawn on the body
    pub title: String,
    /// Colour category
    pub category: NodeCategory,
    /// Top-left corner (screen space)
    pub position: [f32; 2],
    /// Width and height
    pub size: [f32; 2],
    #[serde(skip_serializing)]
    in_point: ConnectionPoint,
    #[serde(skip_serializing)]
    out_point: ConnectionPoint,
    #[serde(skip_serializing)]
    state: NodeState,
}

/// Persisted form of a node
#[derive(Deserialize)]
struct StoredNode {
    id: NodeId,
    title: String,
    category: NodeCategory,
    position: [f32; 2],
    #[serde(default = "default_size")]
    size: [f32; 2],
}

fn default_size() -> [f32; 2] {
    NODE_SIZE
}

impl From<StoredNode> for Node {
    fn from(stored: StoredNode) -> Self {
        Self {
            id: stored.id,
            title: stored.title,
            category: stored.category,
            position: stored.position,
            size: stored.size,
            in_point: ConnectionPoint::new(stored.id, PortKind::In),
            out_point: ConnectionPoint::new(stored.id, PortKind::Out),
            state: NodeState::Idle,
        }
    }
}

impl Node {
    /// Create a node with its top-left corner at `position`
    pub fn new(category: NodeCategory, position: Pos2) -> Self {
        let id = NodeId::new();
        Self {
            id,
            title: format!("{} Node", category.display_name()),
            category,
            position: [position.x, position.y],
            size: NODE_SIZE,
            in_point: ConnectionPoint::new(id, PortKind::In),
            out_point: ConnectionPoint::new(id, PortKind::Out),
            state: NodeState::Idle,
        }
    }

    /// Set the size
    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.size = [width, height];
        self
    }

    /// Current bounds
    pub fn bounds(&self) -> Rect {
        Rect::from_min_size(
            Pos2::new(self.position[0], self.position[1]),
            Vec2::new(self.size[0], self.size[1]),
        )
    }

    /// The in point
    pub fn in_point(&self) -> &ConnectionPoint {
        &self.in_point
    }

    /// The out point
    pub fn out_point(&self) -> &ConnectionPoint {
        &self.out_point
    }

    /// Point of the given kind
    pub fn point(&self, kind: PortKind) -> &ConnectionPoint {
        match kind {
            PortKind::In => &self.in_point,
            PortKind::Out => &self.out_point,
        }
    }

    /// Anchor position of the given point at the node's current bounds
    pub fn anchor(&self, kind: PortKind) -> Pos2 {
        self.point(kind).center(self.bounds())
    }

    /// Interaction state
    pub fn state(&self) -> NodeState {
        self.state
    }

    /// Whether the node is selected (dragging implies selected)
    pub fn is_selected(&self) -> bool {
        self.state != NodeState::Idle
    }

    /// Whether the node is following the pointer
    pub fn is_dragging(&self) -> bool {
        self.state == NodeState::Dragging
    }

    /// Translate by `delta`
    pub fn move_by(&mut self, delta: Vec2) {
        self.position[0] += delta.x;
        self.position[1] += delta.y;
    }

    /// Move to `point`, optionally centring the node under it
    pub fn move_to(&mut self, point: Pos2, centered: bool) {
        let origin = if centered {
            point - Vec2::new(self.size[0], self.size[1]) * 0.5
        } else {
            point
        };
        self.position = [origin.x, origin.y];
    }

    /// Feed an input event to the node. Returns whether it was consumed.
    pub fn handle_event(&mut self, event: &CanvasEvent, ctx: &mut EventContext) -> bool {
        let bounds = self.bounds();
        let pos = event.pointer;

        if event.is_pointer_down(PointerButton::Primary) {
            // A node above already owns this click.
            if !ctx.pointer_claimed() {
                for point in [&self.in_point, &self.out_point] {
                    if point.rect(bounds).contains(pos) {
                        point.activate(ctx);
                        return true;
                    }
                }
            }

            if bounds.contains(pos) && !ctx.pointer_claimed() {
                ctx.claim_pointer();
                self.state = NodeState::Dragging;
            } else {
                self.state = NodeState::Idle;
            }
            return false;
        }

        if event.is_pointer_down(PointerButton::Secondary) {
            if self.is_selected() && bounds.contains(pos) {
                ctx.push(CanvasMessage::NodeMenuRequested {
                    node: self.id,
                    at: pos,
                });
                return true;
            }
            return false;
        }

        if event.is_pointer_up(PointerButton::Primary) {
            if self.state == NodeState::Dragging {
                self.state = NodeState::Selected;
            }
            return false;
        }

        if event.is_drag(PointerButton::Primary) && self.is_dragging() {
            self.move_to(pos, true);
            return true;
        }

        if event.is_key_down(Key::Delete) && self.is_selected() {
            ctx.push(CanvasMessage::NodeRemovalRequested(self.id));
            return true;
        }

        false
    }

    /// Draw both connection points, then the body
    pub fn draw(&self, surface: &mut dyn Surface) {
        let bounds = self.bounds();

        for point in [&self.in_point, &self.out_point] {
            let rect = point.rect(bounds);
            surface.fill_rect(rect, 2.0, Color32::from_gray(170));
            surface.stroke_rect(rect, 2.0, Stroke::new(1.0, Color32::from_gray(30)));
        }

        let [r, g, b] = if self.is_selected() {
            self.category.highlight_color()
        } else {
            self.category.color()
        };
        surface.fill_rect(bounds, NODE_ROUNDING, Color32::from_rgb(r, g, b));

        if self.is_selected() {
            surface.stroke_rect(
                bounds,
                NODE_ROUNDING,
                Stroke::new(2.0, Color32::from_rgb(100, 150, 255)),
            );
        }

        surface.text(bounds.center(), &self.title, Color32::WHITE);
    }
}
