//! Directed edges between node ports.

use serde::{Deserialize, Serialize};

use super::{ConnectionId, NodeId};

/// A directed edge from an output port of one node to an input port of another.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub id: ConnectionId,
    pub source_node_id: NodeId,
    pub source_port: String,
    pub target_node_id: NodeId,
    pub target_port: String,
}

impl Connection {
    pub fn new(
        id: impl Into<ConnectionId>,
        source: impl Into<NodeId>,
        source_port: impl Into<String>,
        target: impl Into<NodeId>,
        target_port: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            source_node_id: source.into(),
            source_port: source_port.into(),
            target_node_id: target.into(),
            target_port: target_port.into(),
        }
    }

    /// Same endpoints and ports, regardless of id.
    pub fn same_route(&self, other: &Connection) -> bool {
        self.source_node_id == other.source_node_id
            && self.source_port == other.source_port
            && self.target_node_id == other.target_node_id
            && self.target_port == other.target_port
    }
}
