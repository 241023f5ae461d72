// SPDX-License-Identifier: MIT OR Apache-2.0
//! Input events consumed by the canvas and the notifications raised while
//! dispatching them.

use crate::connection::ConnectionId;
use crate::node::NodeId;
use crate::port::PortRef;
use egui::{Key, PointerButton, Pos2, Vec2};

/// Kind of input event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// A pointer button was pressed
    PointerDown,
    /// A pointer button was released
    PointerUp,
    /// The pointer moved while a button was held
    PointerDrag,
    /// The pointer moved with no button held
    PointerMove,
    /// A key was pressed
    KeyDown,
    /// A key was released
    KeyUp,
    /// Frame refresh with no input
    Repaint,
}

/// A single host input event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasEvent {
    /// What happened
    pub kind: EventKind,
    /// Pointer position at the time of the event (screen space)
    pub pointer: Pos2,
    /// Button involved, for pointer events
    pub button: Option<PointerButton>,
    /// Key involved, for key events
    pub key: Option<Key>,
    /// Pointer movement since the previous event
    pub delta: Vec2,
}

impl CanvasEvent {
    fn new(kind: EventKind, pointer: Pos2) -> Self {
        Self {
            kind,
            pointer,
            button: None,
            key: None,
            delta: Vec2::ZERO,
        }
    }

    /// Button press at `pointer`
    pub fn pointer_down(pointer: Pos2, button: PointerButton) -> Self {
        Self {
            button: Some(button),
            ..Self::new(EventKind::PointerDown, pointer)
        }
    }

    /// Button release at `pointer`
    pub fn pointer_up(pointer: Pos2, button: PointerButton) -> Self {
        Self {
            button: Some(button),
            ..Self::new(EventKind::PointerUp, pointer)
        }
    }

    /// Pointer moved to `pointer` by `delta` while `button` was held
    pub fn pointer_drag(pointer: Pos2, delta: Vec2, button: PointerButton) -> Self {
        Self {
            button: Some(button),
            delta,
            ..Self::new(EventKind::PointerDrag, pointer)
        }
    }

    /// Pointer moved with no button held
    pub fn pointer_move(pointer: Pos2, delta: Vec2) -> Self {
        Self {
            delta,
            ..Self::new(EventKind::PointerMove, pointer)
        }
    }

    /// Key press
    pub fn key_down(key: Key, pointer: Pos2) -> Self {
        Self {
            key: Some(key),
            ..Self::new(EventKind::KeyDown, pointer)
        }
    }

    /// Key release
    pub fn key_up(key: Key, pointer: Pos2) -> Self {
        Self {
            key: Some(key),
            ..Self::new(EventKind::KeyUp, pointer)
        }
    }

    /// Idle frame with the pointer at `pointer`
    pub fn repaint(pointer: Pos2) -> Self {
        Self::new(EventKind::Repaint, pointer)
    }

    /// Whether this is a press of `button`
    pub fn is_pointer_down(&self, button: PointerButton) -> bool {
        self.kind == EventKind::PointerDown && self.button == Some(button)
    }

    /// Whether this is a release of `button`
    pub fn is_pointer_up(&self, button: PointerButton) -> bool {
        self.kind == EventKind::PointerUp && self.button == Some(button)
    }

    /// Whether this is a drag with `button` held
    pub fn is_drag(&self, button: PointerButton) -> bool {
        self.kind == EventKind::PointerDrag && self.button == Some(button)
    }

    /// Whether this is a press of `key`
    pub fn is_key_down(&self, key: Key) -> bool {
        self.kind == EventKind::KeyDown && self.key == Some(key)
    }
}

/// Notification raised by a node, point or connection during dispatch.
///
/// Notifications are queued and applied by the canvas once the dispatch
/// pass is over, so nothing mutates the node or connection collections
/// while they are being iterated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CanvasMessage {
    /// A connection point was clicked
    PointActivated(PortRef),
    /// A node asked to be removed
    NodeRemovalRequested(NodeId),
    /// A selected node was right-clicked
    NodeMenuRequested {
        /// Node the menu belongs to
        node: NodeId,
        /// Where the menu opens
        at: Pos2,
    },
    /// A connection's remove handle was clicked
    ConnectionRemovalRequested(ConnectionId),
}

/// Per-event dispatch state shared by every node the event visits.
#[derive(Debug, Default)]
pub struct EventContext {
    messages: Vec<CanvasMessage>,
    pointer_claimed: bool,
}

impl EventContext {
    /// Queue a notification
    pub fn push(&mut self, message: CanvasMessage) {
        self.messages.push(message);
    }

    /// Mark the pointer press as taken by a node
    pub fn claim_pointer(&mut self) {
        self.pointer_claimed = true;
    }

    /// Whether a node higher in the stack already took the pointer press
    pub fn pointer_claimed(&self) -> bool {
        self.pointer_claimed
    }

    /// Take the queued notifications
    pub fn into_messages(self) -> Vec<CanvasMessage> {
        self.messages
    }
}
