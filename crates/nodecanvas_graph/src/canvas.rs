// SPDX-License-Identifier: MIT OR Apache-2.0
//! The canvas: event routing, the pending-connection state machine,
//! panning, context menus and structural edits.
//!
//! Input flows top-down. The host hands each event to
//! [`Canvas::handle_event`], which offers it to connection remove handles and
//! then to nodes from the topmost down. Nodes and points never touch the
//! collections directly. They queue [`CanvasMessage`]s, and the canvas
//! applies them once the dispatch pass has finished.

use crate::connection::{ConnectionId, ConnectionStyle};
use crate::draw::{grid_lines, GridLayer, Surface, BEZIER_TANGENT};
use crate::event::{CanvasEvent, CanvasMessage, EventContext, EventKind};
use crate::graph::Graph;
use crate::node::{Node, NodeCategory, NodeId, NODE_SIZE};
use crate::port::{PortKind, PortRef};
use egui::{Color32, PointerButton, Pos2, Rect, Stroke, Vec2};

/// Visual settings for a canvas
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasStyle {
    /// Background fill
    pub background: Color32,
    /// Grid layers, drawn in order
    pub grids: Vec<GridLayer>,
    /// Whether grids are drawn at all
    pub show_grid: bool,
    /// How connections are drawn
    pub connection_style: ConnectionStyle,
    /// Size of newly created nodes
    pub node_size: [f32; 2],
}

impl Default for CanvasStyle {
    fn default() -> Self {
        Self {
            background: Color32::from_rgb(38, 38, 42),
            grids: vec![
                GridLayer {
                    spacing: 20.0,
                    opacity: 0.1,
                    color: Color32::from_rgb(255, 0, 255),
                },
                GridLayer {
                    spacing: 100.0,
                    opacity: 0.2,
                    color: Color32::GRAY,
                },
            ],
            show_grid: true,
            connection_style: ConnectionStyle::Bezier,
            node_size: NODE_SIZE,
        }
    }
}

/// Pending connection selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Nothing picked
    Empty,
    /// An in point is waiting for an out point
    PendingIn(PortRef),
    /// An out point is waiting for an in point
    PendingOut(PortRef),
}

/// A context menu the host should present
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ContextMenu {
    /// Right-click on empty canvas: offers node creation
    Canvas {
        /// Where the menu opened, and where new nodes go
        at: Pos2,
    },
    /// Right-click on a selected node: offers removal
    Node {
        /// Node the menu belongs to
        node: NodeId,
        /// Where the menu opened
        at: Pos2,
    },
}

impl ContextMenu {
    /// Screen position of the menu
    pub fn position(&self) -> Pos2 {
        match self {
            ContextMenu::Canvas { at } | ContextMenu::Node { at, .. } => *at,
        }
    }
}

/// An entry picked from a [`ContextMenu`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    /// Create a node of this category at the menu position
    CreateNode(NodeCategory),
    /// Remove the node the menu belongs to
    RemoveNode,
}

/// Interactive node graph canvas
#[derive(Debug, Clone)]
pub struct Canvas {
    /// Screen-space area the canvas occupies
    pub bounds: Rect,
    /// Visual settings
    pub style: CanvasStyle,
    graph: Graph,
    pending_in: Option<PortRef>,
    pending_out: Option<PortRef>,
    grid_offset: Vec2,
    panning: bool,
    context_menu: Option<ContextMenu>,
}

impl Canvas {
    /// Create an empty canvas covering `bounds`
    pub fn new(bounds: Rect) -> Self {
        Self::with_graph(bounds, Graph::default())
    }

    /// Create a canvas editing an existing graph
    pub fn with_graph(bounds: Rect, mut graph: Graph) -> Self {
        let dropped = graph.prune_dangling();
        if dropped > 0 {
            tracing::warn!("Dropped {dropped} connection(s) with missing endpoints");
        }
        Self {
            bounds,
            style: CanvasStyle::default(),
            graph,
            pending_in: None,
            pending_out: None,
            grid_offset: Vec2::ZERO,
            panning: false,
            context_menu: None,
        }
    }

    /// Move or resize the canvas
    pub fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
    }

    /// The graph being edited
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Remove every node and connection, dropping all transient state
    pub fn clear(&mut self) {
        tracing::debug!(
            "Clearing {} node(s) and {} connection(s)",
            self.graph.node_count(),
            self.graph.connection_count()
        );
        self.graph.clear();
        self.clear_selection();
        self.context_menu = None;
        self.panning = false;
    }

    /// Current pending connection selection
    pub fn selection(&self) -> Selection {
        match (self.pending_in, self.pending_out) {
            (Some(point), None) => Selection::PendingIn(point),
            (None, Some(point)) => Selection::PendingOut(point),
            _ => Selection::Empty,
        }
    }

    /// Whether a connection is half made
    pub fn has_pending_selection(&self) -> bool {
        self.pending_in.is_some() || self.pending_out.is_some()
    }

    /// Accumulated pan offset used by the grid
    pub fn grid_offset(&self) -> Vec2 {
        self.grid_offset
    }

    /// Whether a middle-button pan is in progress
    pub fn is_panning(&self) -> bool {
        self.panning
    }

    /// Menu waiting to be shown by the host
    pub fn context_menu(&self) -> Option<&ContextMenu> {
        self.context_menu.as_ref()
    }

    /// Dismiss the open context menu without acting on it
    pub fn close_context_menu(&mut self) {
        self.context_menu = None;
    }

    /// Apply an entry from the open context menu. Returns whether anything
    /// changed.
    pub fn invoke_menu(&mut self, action: MenuAction) -> bool {
        let Some(menu) = self.context_menu.take() else {
            return false;
        };

        match (menu, action) {
            (ContextMenu::Canvas { at }, MenuAction::CreateNode(category)) => {
                self.create_node(category, at);
                true
            }
            (ContextMenu::Node { node, .. }, MenuAction::RemoveNode) => {
                self.apply(vec![CanvasMessage::NodeRemovalRequested(node)]);
                true
            }
            (menu, action) => {
                tracing::debug!("Ignoring {:?} for {:?}", action, menu);
                false
            }
        }
    }

    /// Add a node of `category` with its top-left corner at `at`
    pub fn create_node(&mut self, category: NodeCategory, at: Pos2) -> NodeId {
        let [width, height] = self.style.node_size;
        self.graph
            .add_node(Node::new(category, at).with_size(width, height))
    }

    /// Ask for a node to be removed along with its connections
    pub fn request_node_removal(&mut self, node: NodeId) {
        self.apply(vec![CanvasMessage::NodeRemovalRequested(node)]);
    }

    /// Ask for a connection to be removed
    pub fn request_connection_removal(&mut self, connection: ConnectionId) {
        self.apply(vec![CanvasMessage::ConnectionRemovalRequested(connection)]);
    }

    /// Treat `point` as clicked
    pub fn activate_point(&mut self, point: PortRef) {
        self.apply(vec![CanvasMessage::PointActivated(point)]);
    }

    /// Translate every node by `delta`
    pub fn pan(&mut self, delta: Vec2) {
        self.graph.translate_all(delta);
        self.grid_offset += delta;
    }

    /// Drop the pending connection selection
    pub fn clear_selection(&mut self) {
        self.pending_in = None;
        self.pending_out = None;
    }

    /// Feed an input event to the canvas. Returns whether it was consumed.
    ///
    /// Only events inside `bounds` reach handles and nodes, except a primary
    /// release, which always does so a drag never outlives its button.
    pub fn handle_event(&mut self, event: &CanvasEvent) -> bool {
        let inside = self.bounds.contains(event.pointer);
        let mut ctx = EventContext::default();
        let mut consumed = false;

        if inside || event.is_pointer_up(PointerButton::Primary) {
            consumed = self.dispatch(event, &mut ctx);
        }

        let pointer_claimed = ctx.pointer_claimed();
        self.apply(ctx.into_messages());

        if consumed {
            return true;
        }

        match event.kind {
            EventKind::PointerDown if inside => match event.button {
                Some(PointerButton::Primary) => {
                    if !pointer_claimed {
                        self.clear_selection();
                        self.context_menu = None;
                    }
                    true
                }
                Some(PointerButton::Secondary) => {
                    if self.has_pending_selection() {
                        tracing::debug!("Pending connection cancelled");
                        self.clear_selection();
                    } else {
                        self.context_menu = Some(ContextMenu::Canvas { at: event.pointer });
                    }
                    true
                }
                Some(PointerButton::Middle) => {
                    self.panning = true;
                    true
                }
                _ => false,
            },
            EventKind::PointerUp if event.button == Some(PointerButton::Middle) => {
                self.panning = false;
                true
            }
            EventKind::PointerDrag
                if self.panning && event.button == Some(PointerButton::Middle) =>
            {
                self.pan(event.delta);
                true
            }
            _ => false,
        }
    }

    /// Offer the event to remove handles, then nodes topmost first
    fn dispatch(&mut self, event: &CanvasEvent, ctx: &mut EventContext) -> bool {
        if event.is_pointer_down(PointerButton::Primary) {
            if let Some(connection) = self.connection_handle_at(event.pointer) {
                ctx.push(CanvasMessage::ConnectionRemovalRequested(connection));
                return true;
            }
        }

        for node in self.graph.nodes_mut().rev() {
            if node.handle_event(event, ctx) {
                return true;
            }
        }
        false
    }

    /// Topmost connection whose remove handle contains `pos`
    fn connection_handle_at(&self, pos: Pos2) -> Option<ConnectionId> {
        self.graph.connections().rev().find_map(|connection| {
            let out_node = self.graph.node(connection.out_node)?;
            let in_node = self.graph.node(connection.in_node)?;
            connection
                .remove_handle(out_node, in_node)
                .contains(pos)
                .then_some(connection.id)
        })
    }

    /// Apply queued notifications in order
    fn apply(&mut self, messages: Vec<CanvasMessage>) {
        for message in messages {
            match message {
                CanvasMessage::PointActivated(point) => self.on_point_activated(point),
                CanvasMessage::NodeRemovalRequested(node) => self.on_node_removal(node),
                CanvasMessage::NodeMenuRequested { node, at } => {
                    self.context_menu = Some(ContextMenu::Node { node, at });
                }
                CanvasMessage::ConnectionRemovalRequested(connection) => {
                    self.graph.disconnect(connection);
                }
            }
        }
    }

    fn on_point_activated(&mut self, point: PortRef) {
        if self.graph.node(point.node).is_none() {
            return;
        }

        let waiting = match point.kind {
            PortKind::In => {
                self.pending_in = Some(point);
                self.pending_out
            }
            PortKind::Out => {
                self.pending_out = Some(point);
                self.pending_in
            }
        };

        let Some(other) = waiting else {
            return;
        };

        if other.node != point.node {
            if let Err(e) = self.graph.connect_points(point, other) {
                tracing::debug!("Connection rejected: {e}");
            }
        } else {
            tracing::debug!("Both points on {:?}, selection cancelled", point.node);
        }
        self.clear_selection();
    }

    fn on_node_removal(&mut self, node: NodeId) {
        if self.graph.remove_node(node).is_none() {
            return;
        }
        if self.pending_in.is_some_and(|p| p.node == node) {
            self.pending_in = None;
        }
        if self.pending_out.is_some_and(|p| p.node == node) {
            self.pending_out = None;
        }
        if matches!(self.context_menu, Some(ContextMenu::Node { node: n, .. }) if n == node) {
            self.context_menu = None;
        }
    }

    /// Draw the canvas. `event` supplies the pointer for the live edge.
    pub fn draw(&self, surface: &mut dyn Surface, event: &CanvasEvent) {
        surface.fill_rect(self.bounds, 0.0, self.style.background);

        if self.style.show_grid {
            for layer in &self.style.grids {
                let stroke = layer.stroke();
                for [from, to] in grid_lines(self.bounds, layer.spacing, self.grid_offset) {
                    surface.line_segment(from, to, stroke);
                }
            }
        }

        for node in self.graph.nodes() {
            node.draw(surface);
        }

        for connection in self.graph.connections() {
            let endpoints = (
                self.graph.node(connection.out_node),
                self.graph.node(connection.in_node),
            );
            if let (Some(out_node), Some(in_node)) = endpoints {
                connection.draw(surface, out_node, in_node, self.style.connection_style);
            }
        }

        self.draw_pending_edge(surface, event.pointer);
    }

    fn draw_pending_edge(&self, surface: &mut dyn Surface, pointer: Pos2) {
        let point = match self.selection() {
            Selection::PendingIn(point) | Selection::PendingOut(point) => point,
            Selection::Empty => return,
        };
        let Some(node) = self.graph.node(point.node) else {
            return;
        };

        let anchor = node.anchor(point.kind);
        let pull = match point.kind {
            PortKind::In => -BEZIER_TANGENT,
            PortKind::Out => BEZIER_TANGENT,
        };
        let stroke = Stroke::new(2.0, Color32::WHITE);
        match self.style.connection_style {
            ConnectionStyle::Bezier => surface.bezier(
                [
                    anchor,
                    anchor + Vec2::new(pull, 0.0),
                    pointer - Vec2::new(pull, 0.0),
                    pointer,
                ],
                stroke,
            ),
            ConnectionStyle::Line => surface.line_segment(anchor, pointer, stroke),
        }
    }
}
