//! Node definitions: the five scene archetypes and their properties.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{ChoiceId, NodeId};
use crate::mechanics::{ConditionalExpression, Reward, StateChange};

/// The five node archetypes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    Story,
    Decision,
    Challenge,
    Combat,
    Check,
}

impl NodeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Story => "story",
            NodeType::Decision => "decision",
            NodeType::Challenge => "challenge",
            NodeType::Combat => "combat",
            NodeType::Check => "check",
        }
    }

    /// Output port names this node type is expected to use, if it has a fixed vocabulary.
    pub fn canonical_output_ports(&self) -> Option<&'static [&'static str]> {
        match self {
            NodeType::Challenge => Some(&["success", "failure"]),
            NodeType::Check => Some(&["pass", "fail"]),
            NodeType::Combat => Some(&["victory", "defeat", "flee"]),
            NodeType::Story | NodeType::Decision => None,
        }
    }

    /// Whether resolving this node involves dice or opposition.
    pub fn is_encounter(&self) -> bool {
        matches!(self, NodeType::Challenge | NodeType::Combat)
    }
}

impl std::fmt::Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Editor-visible validation marker carried on each node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ValidationState {
    #[default]
    Valid,
    Warning,
    Error,
}

/// Narrative text and effects shared by the branches of a resolved node.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutcomeBranch {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub effects: Vec<StateChange>,
    #[serde(default)]
    pub rewards: Vec<Reward>,
}

impl OutcomeBranch {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Default::default()
        }
    }

    pub fn with_effect(mut self, effect: StateChange) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_reward(mut self, reward: Reward) -> Self {
        self.rewards.push(reward);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryProperties {
    #[serde(default)]
    pub title: String,

    #[serde(default, alias = "text")]
    pub content: String,

    /// Reaching this node wins the adventure.
    #[serde(default)]
    pub is_victory: bool,

    /// Reaching this node loses the adventure.
    #[serde(default)]
    pub is_failure: bool,

    /// Experience granted to the lead party member on arrival.
    #[serde(default)]
    pub experience: i64,

    #[serde(default)]
    pub effects: Vec<StateChange>,

    #[serde(default)]
    pub rewards: Vec<Reward>,
}

/// One option offered by a decision node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoiceOption {
    pub id: ChoiceId,

    #[serde(default)]
    pub text: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_node_id: Option<NodeId>,

    #[serde(default)]
    pub effects: Vec<StateChange>,

    /// The option is only offered when this holds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<ConditionalExpression>,
}

impl ChoiceOption {
    pub fn new(id: impl Into<ChoiceId>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            target_node_id: None,
            effects: Vec::new(),
            condition: None,
        }
    }

    pub fn with_effect(mut self, effect: StateChange) -> Self {
        self.effects.push(effect);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionProperties {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub choices: Vec<ChoiceOption>,
}

/// Whether an outcome band applies on success or on failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeKind {
    Success,
    Failure,
}

/// A challenge result band: narrative, penalties on failure, rewards on success.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeOutcome {
    pub result: OutcomeKind,
    #[serde(flatten)]
    pub branch: OutcomeBranch,
}

fn default_difficulty() -> i64 {
    10
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeProperties {
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub description: String,

    /// Attribute the roll is made against.
    #[serde(default, alias = "selectedAttribute", skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,

    /// Total (d6 + attribute) needed to succeed.
    #[serde(default = "default_difficulty")]
    pub difficulty: i64,

    #[serde(default)]
    pub outcomes: Vec<ChallengeOutcome>,
}

impl Default for ChallengeProperties {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            attribute: None,
            difficulty: default_difficulty(),
            outcomes: Vec::new(),
        }
    }
}

impl ChallengeProperties {
    /// The outcome band for a result, if the author wrote one.
    pub fn outcome(&self, kind: OutcomeKind) -> Option<&OutcomeBranch> {
        self.outcomes
            .iter()
            .find(|outcome| outcome.result == kind)
            .map(|outcome| &outcome.branch)
    }
}

/// Strength and dexterity used when a creature leaves them unspecified.
pub const DEFAULT_CREATURE_SCORE: i64 = 5;

/// One entry of a combat encounter's roster.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Creature {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strength: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dexterity: Option<i64>,
}

impl Creature {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: name.to_lowercase(),
            name,
            strength: None,
            dexterity: None,
        }
    }

    pub fn with_scores(mut self, strength: i64, dexterity: i64) -> Self {
        self.strength = Some(strength);
        self.dexterity = Some(dexterity);
        self
    }

    /// Strength plus dexterity, defaulting each to 5.
    pub fn combat_score(&self) -> i64 {
        self.strength
            .unwrap_or(DEFAULT_CREATURE_SCORE)
            .saturating_add(self.dexterity.unwrap_or(DEFAULT_CREATURE_SCORE))
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombatProperties {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, alias = "creatures")]
    pub enemies: Vec<Creature>,
    #[serde(default)]
    pub victory: OutcomeBranch,
    #[serde(default)]
    pub defeat: OutcomeBranch,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flee: Option<OutcomeBranch>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckProperties {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Decides pass/fail; a coin flip when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<ConditionalExpression>,
    #[serde(default)]
    pub pass: OutcomeBranch,
    #[serde(default)]
    pub fail: OutcomeBranch,
}

/// Per-type node properties. The variant always matches the node's type.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeProperties {
    Story(StoryProperties),
    Decision(DecisionProperties),
    Challenge(ChallengeProperties),
    Combat(CombatProperties),
    Check(CheckProperties),
}

impl NodeProperties {
    pub fn node_type(&self) -> NodeType {
        match self {
            NodeProperties::Story(_) => NodeType::Story,
            NodeProperties::Decision(_) => NodeType::Decision,
            NodeProperties::Challenge(_) => NodeType::Challenge,
            NodeProperties::Combat(_) => NodeType::Combat,
            NodeProperties::Check(_) => NodeType::Check,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            NodeProperties::Story(p) => &p.title,
            NodeProperties::Decision(p) => &p.title,
            NodeProperties::Challenge(p) => &p.title,
            NodeProperties::Combat(p) => &p.title,
            NodeProperties::Check(p) => &p.title,
        }
    }

    /// Output ports a freshly created node of this kind gets.
    pub fn default_output_ports(&self) -> Vec<String> {
        match self {
            NodeProperties::Story(_) => vec!["output".to_string()],
            NodeProperties::Decision(p) => p.choices.iter().map(|c| c.id.to_string()).collect(),
            other => other
                .node_type()
                .canonical_output_ports()
                .unwrap_or_default()
                .iter()
                .map(|port| port.to_string())
                .collect(),
        }
    }

    fn to_value(&self) -> Result<Value, serde_json::Error> {
        match self {
            NodeProperties::Story(p) => serde_json::to_value(p),
            NodeProperties::Decision(p) => serde_json::to_value(p),
            NodeProperties::Challenge(p) => serde_json::to_value(p),
            NodeProperties::Combat(p) => serde_json::to_value(p),
            NodeProperties::Check(p) => serde_json::to_value(p),
        }
    }

    fn from_value(node_type: NodeType, value: Value) -> Result<Self, serde_json::Error> {
        // A node saved before any property was edited carries `null`.
        let value = if value.is_null() {
            Value::Object(Default::default())
        } else {
            value
        };
        Ok(match node_type {
            NodeType::Story => NodeProperties::Story(serde_json::from_value(value)?),
            NodeType::Decision => NodeProperties::Decision(serde_json::from_value(value)?),
            NodeType::Challenge => NodeProperties::Challenge(serde_json::from_value(value)?),
            NodeType::Combat => NodeProperties::Combat(serde_json::from_value(value)?),
            NodeType::Check => NodeProperties::Check(serde_json::from_value(value)?),
        })
    }
}

fn default_input_ports() -> Vec<String> {
    vec!["input".to_string()]
}

/// Wire shape of a node: `type` and `properties` side by side.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRecord {
    id: NodeId,
    #[serde(rename = "type")]
    node_type: NodeType,
    #[serde(default)]
    properties: Value,
    #[serde(default)]
    validation_state: ValidationState,
    #[serde(default = "default_input_ports")]
    input_ports: Vec<String>,
    #[serde(default)]
    output_ports: Vec<String>,
}

/// One scene of the adventure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "NodeRecord", into = "NodeRecord")]
pub struct Node {
    pub id: NodeId,
    pub properties: NodeProperties,
    pub validation_state: ValidationState,
    pub input_ports: Vec<String>,
    pub output_ports: Vec<String>,
}

impl TryFrom<NodeRecord> for Node {
    type Error = serde_json::Error;

    fn try_from(record: NodeRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: record.id,
            properties: NodeProperties::from_value(record.node_type, record.properties)?,
            validation_state: record.validation_state,
            input_ports: record.input_ports,
            output_ports: record.output_ports,
        })
    }
}

impl From<Node> for NodeRecord {
    fn from(node: Node) -> Self {
        Self {
            id: node.id,
            node_type: node.properties.node_type(),
            // Property structs are plain serde data; serialising them cannot fail.
            properties: node.properties.to_value().unwrap_or(Value::Null),
            validation_state: node.validation_state,
            input_ports: node.input_ports,
            output_ports: node.output_ports,
        }
    }
}

impl Node {
    /// Create a node with the default ports for its kind.
    pub fn new(id: impl Into<NodeId>, properties: NodeProperties) -> Self {
        let output_ports = properties.default_output_ports();
        Self {
            id: id.into(),
            properties,
            validation_state: ValidationState::Valid,
            input_ports: default_input_ports(),
            output_ports,
        }
    }

    pub fn story(id: impl Into<NodeId>, properties: StoryProperties) -> Self {
        Self::new(id, NodeProperties::Story(properties))
    }

    pub fn decision(id: impl Into<NodeId>, properties: DecisionProperties) -> Self {
        Self::new(id, NodeProperties::Decision(properties))
    }

    pub fn challenge(id: impl Into<NodeId>, properties: ChallengeProperties) -> Self {
        Self::new(id, NodeProperties::Challenge(properties))
    }

    pub fn combat(id: impl Into<NodeId>, properties: CombatProperties) -> Self {
        Self::new(id, NodeProperties::Combat(properties))
    }

    pub fn check(id: impl Into<NodeId>, properties: CheckProperties) -> Self {
        Self::new(id, NodeProperties::Check(properties))
    }

    /// Replace the output ports.
    pub fn with_output_ports<I, S>(mut self, ports: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.output_ports = ports.into_iter().map(Into::into).collect();
        self
    }

    pub fn node_type(&self) -> NodeType {
        self.properties.node_type()
    }

    pub fn title(&self) -> &str {
        self.properties.title()
    }

    /// Story node marked as a winning ending.
    pub fn is_victory(&self) -> bool {
        matches!(&self.properties, NodeProperties::Story(p) if p.is_victory)
    }

    /// Story node marked as a losing ending.
    pub fn is_failure(&self) -> bool {
        matches!(&self.properties, NodeProperties::Story(p) if p.is_failure)
    }

    pub fn is_ending(&self) -> bool {
        self.is_victory() || self.is_failure()
    }

    pub fn has_output_port(&self, port: &str) -> bool {
        self.output_ports.iter().any(|p| p == port)
    }

    pub fn has_input_port(&self, port: &str) -> bool {
        self.input_ports.iter().any(|p| p == port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_ports_per_type() {
        let story = Node::story("s", StoryProperties::default());
        assert_eq!(story.output_ports, vec!["output"]);
        assert_eq!(story.input_ports, vec!["input"]);

        let combat = Node::combat("c", CombatProperties::default());
        assert_eq!(combat.output_ports, vec!["victory", "defeat", "flee"]);

        let decision = Node::decision(
            "d",
            DecisionProperties {
                choices: vec![ChoiceOption::new("left", "Go left"), ChoiceOption::new("right", "Go right")],
                ..Default::default()
            },
        );
        assert_eq!(decision.output_ports, vec!["left", "right"]);
    }

    #[test]
    fn test_node_json_round_trip_keeps_type() {
        let value = json!({
            "id": "gate",
            "type": "check",
            "properties": {
                "title": "Locked Gate",
                "condition": { "type": "simple", "variable": "flags.hasKey", "comparison": "exists" },
                "pass": { "description": "The gate swings open." }
            },
            "outputPorts": ["pass", "fail"]
        });

        let node: Node = serde_json::from_value(value).unwrap();
        assert_eq!(node.node_type(), NodeType::Check);
        assert_eq!(node.title(), "Locked Gate");
        assert_eq!(node.input_ports, vec!["input"]);

        let back = serde_json::to_value(&node).unwrap();
        assert_eq!(back["type"], json!("check"));
        assert_eq!(back["properties"]["pass"]["description"], json!("The gate swings open."));
    }

    #[test]
    fn test_properties_must_match_type() {
        let value = json!({
            "id": "bad",
            "type": "decision",
            "properties": { "choices": "not a list" }
        });
        assert!(serde_json::from_value::<Node>(value).is_err());
    }

    #[test]
    fn test_end_conditions() {
        let victory = Node::story(
            "win",
            StoryProperties {
                is_victory: true,
                ..Default::default()
            },
        );
        assert!(victory.is_victory());
        assert!(victory.is_ending());
        assert!(!victory.is_failure());

        let fight = Node::combat("fight", CombatProperties::default());
        assert!(!fight.is_ending());
    }

    #[test]
    fn test_creature_defaults() {
        assert_eq!(Creature::new("Goblin").combat_score(), 10);
        assert_eq!(Creature::new("Ogre").with_scores(9, 2).combat_score(), 11);
        assert_eq!(Creature::new("Titan").with_scores(i64::MAX, 9).combat_score(), i64::MAX);
    }
}
