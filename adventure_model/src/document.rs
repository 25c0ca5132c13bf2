//! The persisted adventure document.
//!
//! Reading and writing files is left to the caller; this module only maps the
//! JSON shape onto the model.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::graph::{AdventureGraph, NodeId};
use crate::state::AdventureState;

/// Descriptive metadata of an adventure.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdventureMeta {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author_id: String,
    #[serde(default)]
    pub version: String,
    /// Minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_playtime: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
}

/// A complete exported adventure.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdventureDocument {
    #[serde(default)]
    pub meta: AdventureMeta,

    #[serde(flatten)]
    pub graph: AdventureGraph,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_node_id: Option<NodeId>,

    /// Last validation result as stored by the editor. Opaque to the runtime.
    #[serde(default)]
    pub validation_state: Value,
}

impl AdventureDocument {
    pub fn new(meta: AdventureMeta, graph: AdventureGraph) -> Self {
        Self {
            meta,
            graph,
            start_node_id: None,
            validation_state: Value::Null,
        }
    }

    /// Parse a document from its JSON form.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Explicit start node, or the first node when none is set.
    pub fn start_node(&self) -> Option<&NodeId> {
        self.start_node_id
            .as_ref()
            .or_else(|| self.graph.nodes.first().map(|node| &node.id))
    }

    /// Fresh play state for this adventure.
    pub fn initial_state(&self) -> Option<AdventureState> {
        self.start_node().cloned().map(AdventureState::new)
    }
}
