//! Play state - the snapshot threaded through a playthrough.
//!
//! An `AdventureState` is never mutated in place by the runtime. Every
//! operation clones the snapshot it is given and returns the new one, which
//! keeps undo/redo and validator re-runs trivially safe.

mod action;
mod party;

pub use action::*;
pub use party::*;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeSet, HashMap};

use crate::graph::NodeId;

/// The complete state of one playthrough at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdventureState {
    /// Named values addressed by expression paths.
    #[serde(default)]
    pub variables: HashMap<String, Value>,

    #[serde(default)]
    pub inventory: Vec<InventoryItem>,

    #[serde(default)]
    pub party: Vec<PartyMember>,

    #[serde(default)]
    pub flags: HashMap<String, bool>,

    pub current_node_id: NodeId,

    #[serde(default)]
    pub visited_nodes: BTreeSet<NodeId>,

    #[serde(default)]
    pub action_history: Vec<ActionRecord>,
}

impl AdventureState {
    /// Initial state of a playthrough starting at `start`.
    ///
    /// Nothing is visited yet; the start node is marked visited by the first
    /// action executed on it.
    pub fn new(start: NodeId) -> Self {
        Self {
            variables: HashMap::new(),
            inventory: Vec::new(),
            party: Vec::new(),
            flags: HashMap::new(),
            current_node_id: start,
            visited_nodes: BTreeSet::new(),
            action_history: Vec::new(),
        }
    }

    pub fn with_party_member(mut self, member: PartyMember) -> Self {
        self.party.push(member);
        self
    }

    pub fn with_item(mut self, item: InventoryItem) -> Self {
        self.inventory.push(item);
        self
    }

    pub fn with_variable(mut self, name: impl Into<String>, value: Value) -> Self {
        self.variables.insert(name.into(), value);
        self
    }

    pub fn with_flag(mut self, name: impl Into<String>, value: bool) -> Self {
        self.flags.insert(name.into(), value);
        self
    }

    /// Get an inventory entry by item id.
    pub fn item(&self, id: &str) -> Option<&InventoryItem> {
        self.inventory.iter().find(|item| item.id == id)
    }

    /// Get a party member by id.
    pub fn party_member(&self, id: &str) -> Option<&PartyMember> {
        self.party.iter().find(|member| member.id == id)
    }

    /// The member that acts when no one is named explicitly.
    pub fn lead_member(&self) -> Option<&PartyMember> {
        self.party.first()
    }

    pub fn flag(&self, name: &str) -> bool {
        self.flags.get(name).copied().unwrap_or(false)
    }

    pub fn has_visited(&self, node_id: &NodeId) -> bool {
        self.visited_nodes.contains(node_id)
    }

    /// Most recent action taken on a node.
    pub fn last_action_on(&self, node_id: &NodeId) -> Option<&ActionRecord> {
        self.action_history
            .iter()
            .rev()
            .find(|record| &record.node_id == node_id)
    }
}
