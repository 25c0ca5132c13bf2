//! The authored adventure graph.
//!
//! The graph is a snapshot: the editor replaces it wholesale after every
//! mutation and the runtime never keeps one around between calls.

mod connection;
mod ids;
mod node;

pub use connection::*;
pub use ids::*;
pub use node::*;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Nodes plus the connections between them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AdventureGraph {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub connections: Vec<Connection>,
}

impl AdventureGraph {
    /// Create a graph from existing nodes and connections.
    pub fn new(nodes: Vec<Node>, connections: Vec<Connection>) -> Self {
        Self { nodes, connections }
    }

    /// Add a node, replacing any node with the same id.
    pub fn add_node(&mut self, node: Node) -> NodeId {
        let id = node.id.clone();
        match self.nodes.iter_mut().find(|n| n.id == id) {
            Some(existing) => *existing = node,
            None => self.nodes.push(node),
        }
        id
    }

    /// Remove a node together with every connection touching it.
    pub fn remove_node(&mut self, id: &NodeId) -> Option<Node> {
        let index = self.nodes.iter().position(|n| &n.id == id)?;
        self.connections
            .retain(|c| &c.source_node_id != id && &c.target_node_id != id);
        Some(self.nodes.remove(index))
    }

    /// Add a connection. No checks are made; see the transition validator.
    pub fn add_connection(&mut self, connection: Connection) -> ConnectionId {
        let id = connection.id.clone();
        self.connections.push(connection);
        id
    }

    pub fn remove_connection(&mut self, id: &ConnectionId) -> Option<Connection> {
        let index = self.connections.iter().position(|c| &c.id == id)?;
        Some(self.connections.remove(index))
    }

    /// Get node by ID.
    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| &n.id == id)
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.node(id).is_some()
    }

    /// Title of a node for messages, falling back to its id.
    pub fn display_name(&self, id: &NodeId) -> String {
        match self.node(id) {
            Some(node) if !node.title().trim().is_empty() => node.title().to_string(),
            _ => id.to_string(),
        }
    }

    /// Connections leaving a node.
    pub fn outgoing<'a>(&'a self, id: &'a NodeId) -> impl Iterator<Item = &'a Connection> + 'a {
        self.connections.iter().filter(move |c| &c.source_node_id == id)
    }

    /// Connections entering a node.
    pub fn incoming<'a>(&'a self, id: &'a NodeId) -> impl Iterator<Item = &'a Connection> + 'a {
        self.connections.iter().filter(move |c| &c.target_node_id == id)
    }

    /// Adjacency list over the connection set, in connection order.
    pub fn adjacency(&self) -> HashMap<&NodeId, Vec<&NodeId>> {
        let mut adjacency: HashMap<&NodeId, Vec<&NodeId>> = HashMap::new();
        for connection in &self.connections {
            adjacency
                .entry(&connection.source_node_id)
                .or_default()
                .push(&connection.target_node_id);
        }
        adjacency
    }

    /// Nodes where play can begin: no incoming connection, at least one
    /// outgoing. A node with no connections at all is not a start point.
    pub fn start_candidates(&self) -> Vec<&Node> {
        self.nodes
            .iter()
            .filter(|node| {
                self.incoming(&node.id).next().is_none() && self.outgoing(&node.id).next().is_some()
            })
            .collect()
    }

    /// Number of nodes of a given type.
    pub fn count_of(&self, node_type: NodeType) -> usize {
        self.nodes
            .iter()
            .filter(|node| node.node_type() == node_type)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn story(id: &str, title: &str) -> Node {
        Node::story(
            id,
            StoryProperties {
                title: title.to_string(),
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_add_and_get_node() {
        let mut graph = AdventureGraph::new(Vec::new(), Vec::new());
        let id = graph.add_node(story("intro", "Intro"));

        assert!(graph.contains(&id));
        assert_eq!(graph.display_name(&id), "Intro");
        assert_eq!(graph.display_name(&NodeId::new("ghost")), "ghost");
    }

    #[test]
    fn test_remove_node_drops_connections() {
        let mut graph = AdventureGraph::default();
        graph.add_node(story("a", "A"));
        graph.add_node(story("b", "B"));
        graph.add_connection(Connection::new("a-b", "a", "output", "b", "input"));

        let removed = graph.remove_node(&NodeId::new("b"));
        assert!(removed.is_some());
        assert!(graph.connections.is_empty());
    }

    #[test]
    fn test_start_candidates() {
        let mut graph = AdventureGraph::default();
        graph.add_node(story("a", "A"));
        graph.add_node(story("b", "B"));
        graph.add_node(story("c", "C"));
        graph.add_connection(Connection::new("a-b", "a", "output", "b", "input"));

        // `c` has no connections at all, so it is an orphan rather than a start.
        let starts: Vec<_> = graph.start_candidates().iter().map(|n| n.id.clone()).collect();
        assert_eq!(starts, vec![NodeId::new("a")]);
    }

    #[test]
    fn test_outgoing_and_incoming() {
        let mut graph = AdventureGraph::default();
        graph.add_node(story("a", "A"));
        graph.add_node(story("b", "B"));
        graph.add_connection(Connection::new("a-b", "a", "output", "b", "input"));

        let a = NodeId::new("a");
        let b = NodeId::new("b");
        assert_eq!(graph.outgoing(&a).count(), 1);
        assert_eq!(graph.incoming(&a).count(), 0);
        assert_eq!(graph.incoming(&b).count(), 1);
        assert_eq!(graph.adjacency()[&a], vec![&b]);
    }
}
