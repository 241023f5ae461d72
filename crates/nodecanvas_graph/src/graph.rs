// SPDX-License-Identifier: MIT OR Apache-2.0
//! Graph arena containing nodes and connections.

use crate::connection::{Connection, ConnectionId};
use crate::node::{Node, NodeId};
use crate::port::PortRef;
use egui::Vec2;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Ordered collection of nodes and the connections between them.
///
/// Insertion order is draw order: later nodes sit on top and get the
/// first look at input. Removals keep the remaining order intact.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "StoredGraph")]
pub struct Graph {
    /// Graph name
    pub name: String,
    /// Nodes in the graph
    nodes: IndexMap<NodeId, Node>,
    /// Connections between nodes
    connections: IndexMap<ConnectionId, Connection>,
}

/// Persisted form of a graph. Map keys are not trusted on load.
#[derive(Deserialize)]
struct StoredGraph {
    name: String,
    nodes: IndexMap<NodeId, Node>,
    connections: IndexMap<ConnectionId, Connection>,
}

impl From<StoredGraph> for Graph {
    fn from(stored: StoredGraph) -> Self {
        let mut graph = Self {
            name: stored.name,
            nodes: stored.nodes.into_values().map(|n| (n.id, n)).collect(),
            connections: stored
                .connections
                .into_values()
                .map(|c| (c.id, c))
                .collect(),
        };
        let dropped = graph.prune_dangling();
        if dropped > 0 {
            tracing::warn!("Dropped {} dangling connection(s) while loading", dropped);
        }
        graph
    }
}

impl Graph {
    /// Create a new empty graph
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nodes: IndexMap::new(),
            connections: IndexMap::new(),
        }
    }

    /// Add a node on top of the others
    pub fn add_node(&mut self, node: Node) -> NodeId {
        let id = node.id;
        tracing::debug!("Adding node {:?} ({:?})", id, node.category);
        self.nodes.insert(id, node);
        id
    }

    /// Remove a node and every connection touching either of its points.
    ///
    /// Incident connections are collected first and removed before the node
    /// itself, so no connection is ever left pointing at a missing node.
    pub fn remove_node(&mut self, node_id: NodeId) -> Option<Node> {
        if !self.nodes.contains_key(&node_id) {
            return None;
        }

        let incident: Vec<ConnectionId> = self
            .connections_for_node(node_id)
            .map(|c| c.id)
            .collect();
        for connection_id in &incident {
            self.connections.shift_remove(connection_id);
        }

        tracing::debug!(
            "Removing node {:?} and {} connection(s)",
            node_id,
            incident.len()
        );
        self.nodes.shift_remove(&node_id)
    }

    /// Get a node by ID
    pub fn node(&self, node_id: NodeId) -> Option<&Node> {
        self.nodes.get(&node_id)
    }

    /// Get all nodes, bottom to top
    pub fn nodes(&self) -> impl DoubleEndedIterator<Item = &Node> {
        self.nodes.values()
    }

    /// Get all nodes mutably, bottom to top
    pub fn nodes_mut(&mut self) -> impl DoubleEndedIterator<Item = &mut Node> {
        self.nodes.values_mut()
    }

    /// Get all node IDs, bottom to top
    pub fn node_ids(&self) -> impl DoubleEndedIterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }

    /// Get the number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Translate every node by `delta`
    pub fn translate_all(&mut self, delta: Vec2) {
        for node in self.nodes.values_mut() {
            node.move_by(delta);
        }
    }

    /// Connect `out_node`'s out point to `in_node`'s in point
    pub fn connect(
        &mut self,
        out_node: NodeId,
        in_node: NodeId,
    ) -> Result<ConnectionId, ConnectionError> {
        if !self.nodes.contains_key(&out_node) {
            return Err(ConnectionError::NodeNotFound(out_node));
        }
        if !self.nodes.contains_key(&in_node) {
            return Err(ConnectionError::NodeNotFound(in_node));
        }

        // Prevent self-loops
        if out_node == in_node {
            return Err(ConnectionError::SelfLoop);
        }

        let connection = Connection::new(out_node, in_node);
        let id = connection.id;
        tracing::debug!("Connecting {:?} -> {:?}", out_node, in_node);
        self.connections.insert(id, connection);
        Ok(id)
    }

    /// Connect two points given in either order
    pub fn connect_points(
        &mut self,
        a: PortRef,
        b: PortRef,
    ) -> Result<ConnectionId, ConnectionError> {
        if a.kind == b.kind {
            return Err(ConnectionError::SameKind);
        }
        let (out_point, in_point) = if a.kind == crate::port::PortKind::Out {
            (a, b)
        } else {
            (b, a)
        };
        self.connect(out_point.node, in_point.node)
    }

    /// Remove a connection
    pub fn disconnect(&mut self, connection_id: ConnectionId) -> Option<Connection> {
        let removed = self.connections.shift_remove(&connection_id);
        if removed.is_some() {
            tracing::debug!("Removed connection {:?}", connection_id);
        }
        removed
    }

    /// Get a connection by ID
    pub fn connection(&self, connection_id: ConnectionId) -> Option<&Connection> {
        self.connections.get(&connection_id)
    }

    /// Get all connections, oldest first
    pub fn connections(&self) -> impl DoubleEndedIterator<Item = &Connection> {
        self.connections.values()
    }

    /// Get connections involving a node
    pub fn connections_for_node(&self, node_id: NodeId) -> impl Iterator<Item = &Connection> {
        self.connections
            .values()
            .filter(move |c| c.involves_node(node_id))
    }

    /// Get the number of connections
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Drop every connection whose endpoints are not both present.
    ///
    /// Used after loading a graph from outside, where the data may not
    /// uphold the arena's invariants. Returns how many were dropped.
    pub fn prune_dangling(&mut self) -> usize {
        let before = self.connections.len();
        let nodes = &self.nodes;
        self.connections.retain(|_, c| {
            c.out_node != c.in_node
                && nodes.contains_key(&c.out_node)
                && nodes.contains_key(&c.in_node)
        });
        before - self.connections.len()
    }

    /// Remove everything
    pub fn clear(&mut self) {
        self.connections.clear();
        self.nodes.clear();
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new("Untitled")
    }
}

/// Error when creating a connection
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    /// Node not found
    #[error("Node not found: {0:?}")]
    NodeNotFound(NodeId),

    /// Both points are on the same side
    #[error("Connections need one in point and one out point")]
    SameKind,

    /// Self-loop not allowed
    #[error("Self-loop not allowed")]
    SelfLoop,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeCategory;
    use egui::Pos2;

    fn node_at(x: f32, y: f32) -> Node {
        Node::new(NodeCategory::Blue, Pos2::new(x, y))
    }

    #[test]
    fn test_add_preserves_order() {
        let mut graph = Graph::default();
        let a = graph.add_node(node_at(0.0, 0.0));
        let b = graph.add_node(node_at(10.0, 0.0));
        let c = graph.add_node(node_at(20.0, 0.0));

        assert_eq!(graph.node_ids().collect::<Vec<_>>(), vec![a, b, c]);
        assert_eq!(graph.node_ids().rev().collect::<Vec<_>>(), vec![c, b, a]);
    }

    #[test]
    fn test_connect_validates() {
        let mut graph = Graph::default();
        let a = graph.add_node(node_at(0.0, 0.0));
        let b = graph.add_node(node_at(300.0, 0.0));

        assert!(matches!(graph.connect(a, a), Err(ConnectionError::SelfLoop)));
        assert!(matches!(
            graph.connect(a, NodeId::new()),
            Err(ConnectionError::NodeNotFound(_))
        ));
        assert!(matches!(
            graph.connect_points(PortRef::input(a), PortRef::input(b)),
            Err(ConnectionError::SameKind)
        ));
        assert_eq!(graph.connection_count(), 0);

        let id = graph.connect_points(PortRef::input(b), PortRef::output(a)).unwrap();
        let connection = graph.connection(id).unwrap();
        assert_eq!(connection.out_node, a);
        assert_eq!(connection.in_node, b);
    }

    #[test]
    fn test_remove_node_cascades_only_incident_connections() {
        let mut graph = Graph::default();
        let a = graph.add_node(node_at(0.0, 0.0));
        let b = graph.add_node(node_at(300.0, 0.0));
        let c = graph.add_node(node_at(600.0, 0.0));

        graph.connect(a, b).unwrap();
        graph.connect(b, a).unwrap();
        let kept = graph.connect(c, a).unwrap();
        graph.connect(b, c).unwrap();

        let removed = graph.remove_node(b).unwrap();
        assert_eq!(removed.id, b);
        assert_eq!(graph.node_ids().collect::<Vec<_>>(), vec![a, c]);
        assert_eq!(graph.connection_count(), 1);
        assert!(graph.connection(kept).is_some());
        assert_eq!(graph.connections_for_node(b).count(), 0);
    }

    #[test]
    fn test_remove_missing_node_is_noop() {
        let mut graph = Graph::default();
        let a = graph.add_node(node_at(0.0, 0.0));
        assert!(graph.remove_node(NodeId::new()).is_none());
        assert_eq!(graph.node_ids().collect::<Vec<_>>(), vec![a]);
    }

    #[test]
    fn test_disconnect_leaves_everything_else() {
        let mut graph = Graph::default();
        let a = graph.add_node(node_at(0.0, 0.0));
        let b = graph.add_node(node_at(300.0, 0.0));
        let first = graph.connect(a, b).unwrap();
        let second = graph.connect(b, a).unwrap();

        assert!(graph.disconnect(first).is_some());
        assert!(graph.disconnect(first).is_none());
        assert_eq!(graph.node_count(), 2);
        assert_eq!(
            graph.connections().map(|c| c.id).collect::<Vec<_>>(),
            vec![second]
        );
    }

    #[test]
    fn test_translate_all() {
        let mut graph = Graph::default();
        graph.add_node(node_at(0.0, 0.0));
        graph.add_node(node_at(300.0, 0.0));

        graph.translate_all(Vec2::new(10.0, -5.0));

        let positions: Vec<_> = graph.nodes().map(|n| n.position).collect();
        assert_eq!(positions, vec![[10.0, -5.0], [310.0, -5.0]]);
    }

    #[test]
    fn test_prune_dangling_after_load() {
        let mut graph = Graph::default();
        let a = graph.add_node(node_at(0.0, 0.0));
        let b = graph.add_node(node_at(300.0, 0.0));
        graph.connect(a, b).unwrap();

        let mut value = serde_json::to_value(&graph).unwrap();
        // A hand-edited file missing a node
        value["nodes"]
            .as_object_mut()
            .unwrap()
            .remove(&b.0.to_string());

        let loaded: Graph = serde_json::from_value(value).unwrap();
        assert_eq!(loaded.node_ids().collect::<Vec<_>>(), vec![a]);
        assert_eq!(loaded.connection_count(), 0);
    }

    #[test]
    fn test_load_rekeys_by_stored_ids() {
        let mut graph = Graph::default();
        let a = graph.add_node(node_at(0.0, 0.0));
        let b = graph.add_node(node_at(300.0, 0.0));
        let link = graph.connect(a, b).unwrap();

        let mut value = serde_json::to_value(&graph).unwrap();
        let nodes = value["nodes"].as_object_mut().unwrap();
        let node_a = nodes.remove(&a.0.to_string()).unwrap();
        nodes.insert(NodeId::new().0.to_string(), node_a);
        let connections = value["connections"].as_object_mut().unwrap();
        let stored_link = connections.remove(&link.0.to_string()).unwrap();
        connections.insert(ConnectionId::new().0.to_string(), stored_link);

        let mut loaded: Graph = serde_json::from_value(value).unwrap();
        assert_eq!(loaded.node(a).map(|n| n.id), Some(a));
        assert_eq!(loaded.node(a).unwrap().in_point().owner, a);
        assert_eq!(loaded.connection(link).map(|c| (c.out_node, c.in_node)), Some((a, b)));

        assert!(loaded.disconnect(link).is_some());
        assert!(loaded.remove_node(a).is_some());
        assert_eq!(loaded.node_ids().collect::<Vec<_>>(), vec![b]);
    }
}
