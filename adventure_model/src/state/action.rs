//! Records of resolved player interactions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::graph::{ChoiceId, NodeId};
use crate::mechanics::{Reward, StateChange};

/// What kind of interaction the player performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Choice,
    Challenge,
    Combat,
    Check,
    Continue,
}

/// The resolved outcome of an interaction.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionResult {
    pub success: bool,

    /// Narrative consequences, in the order they happened.
    #[serde(default)]
    pub consequences: Vec<String>,

    #[serde(default)]
    pub state_changes: Vec<StateChange>,

    #[serde(default)]
    pub rewards: Vec<Reward>,
}

impl ActionResult {
    pub fn new(success: bool) -> Self {
        Self {
            success,
            ..Default::default()
        }
    }

    pub fn with_consequence(mut self, consequence: impl Into<String>) -> Self {
        self.consequences.push(consequence.into());
        self
    }
}

/// One entry of the action history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionRecord {
    pub node_id: NodeId,

    #[serde(rename = "type", alias = "kind")]
    pub kind: ActionKind,

    pub timestamp: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choice_id: Option<ChoiceId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_node_id: Option<NodeId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<ActionResult>,
}

impl ActionRecord {
    /// Create a record stamped with the current time.
    pub fn new(node_id: NodeId, kind: ActionKind) -> Self {
        Self {
            node_id,
            kind,
            timestamp: Utc::now(),
            choice_id: None,
            target_node_id: None,
            result: None,
        }
    }

    pub fn with_choice(mut self, choice: impl Into<ChoiceId>) -> Self {
        self.choice_id = Some(choice.into());
        self
    }

    pub fn with_target(mut self, target: NodeId) -> Self {
        self.target_node_id = Some(target);
        self
    }

    pub fn with_result(mut self, result: ActionResult) -> Self {
        self.result = Some(result);
        self
    }
}
