// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node graph editing model for nodecanvas.
//!
//! This crate provides the interactive model behind the node canvas:
//! - Nodes with one in and one out connection point
//! - Connections between points on different nodes
//! - A canvas that routes input, tracks the pending connection and pans
//!
//! ## Architecture
//!
//! The model is host-independent. The host forwards [`CanvasEvent`]s to
//! [`Canvas::handle_event`] and renders with [`Canvas::draw`] through any
//! [`Surface`]. Ownership runs strictly canvas → graph → node → point;
//! connections and points refer to nodes by [`NodeId`] only.
//!
//! The [`ui`] module hosts the canvas inside egui: [`CanvasView`] translates
//! raw input and paints through [`EguiSurface`].

pub mod canvas;
pub mod connection;
pub mod draw;
pub mod event;
pub mod graph;
pub mod node;
pub mod port;
pub mod ui;

pub use canvas::{Canvas, CanvasStyle, ContextMenu, MenuAction, Selection};
pub use connection::{Connection, ConnectionId, ConnectionStyle};
pub use draw::Surface;
pub use event::{CanvasEvent, CanvasMessage, EventKind};
pub use graph::{ConnectionError, Graph};
pub use node::{Node, NodeCategory, NodeId, NodeState};
pub use port::{ConnectionPoint, PortKind, PortRef};
pub use ui::{CanvasView, EguiSurface, InputTranslator};
