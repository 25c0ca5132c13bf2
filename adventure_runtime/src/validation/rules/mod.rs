//! Built-in validation rules.

mod accessibility;
mod content;
mod logic;
mod performance;
mod structure;

pub use accessibility::*;
pub use content::*;
pub use logic::*;
pub use performance::*;
pub use structure::*;

use adventure_model::{AdventureGraph, NodeId};

use super::issue::{RuleCategory, Severity, ValidationIssue};
use crate::config::ValidationThresholds;
use crate::error::Result;

/// A pluggable check over a whole adventure graph.
///
/// Returning `Err` (or panicking) does not abort validation: the engine turns
/// the failure into a single error issue naming the rule.
pub trait ValidationRule {
    /// Stable id, used by [`ValidationEngine::remove_rule`](super::ValidationEngine::remove_rule).
    fn id(&self) -> &str;

    /// Highest severity this rule reports. The engine lowers anything above it.
    fn severity(&self) -> Severity;

    fn category(&self) -> RuleCategory;

    fn validate(&self, graph: &AdventureGraph, thresholds: &ValidationThresholds) -> Result<Vec<ValidationIssue>>;
}

/// The rule set every engine starts with, in evaluation order.
pub fn builtin_rules() -> Vec<Box<dyn ValidationRule>> {
    vec![
        Box::new(StartNodeExists),
        Box::new(OrphanedNodes),
        Box::new(VictoryPathsExist),
        Box::new(DeadEnds),
        Box::new(RequiredContent),
        Box::new(ConnectionValidation),
        Box::new(ReadableContent),
        Box::new(Complexity),
    ]
}

/// Where reachability searches begin: the start candidates, or the first
/// node when every node has an incoming connection.
pub(crate) fn search_roots(graph: &AdventureGraph) -> Vec<&NodeId> {
    let candidates: Vec<&NodeId> = graph.start_candidates().into_iter().map(|node| &node.id).collect();
    if candidates.is_empty() {
        graph.nodes.first().map(|node| &node.id).into_iter().collect()
    } else {
        candidates
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use adventure_model::{
        AdventureGraph, ChoiceOption, Connection, DecisionProperties, Node, NodeProperties, StoryProperties,
    };

    pub fn story(id: &str, title: &str) -> Node {
        Node::story(
            id,
            StoryProperties {
                title: title.to_string(),
                content: format!("The {} awaits.", title.to_lowercase()),
                ..Default::default()
            },
        )
    }

    pub fn victory(id: &str, title: &str) -> Node {
        let mut node = story(id, title);
        if let NodeProperties::Story(props) = &mut node.properties {
            props.is_victory = true;
        }
        node
    }

    pub fn failure(id: &str, title: &str) -> Node {
        let mut node = story(id, title);
        if let NodeProperties::Story(props) = &mut node.properties {
            props.is_failure = true;
        }
        node
    }

    pub fn link(id: &str, from: &str, port: &str, to: &str) -> Connection {
        Connection::new(id, from, port, to, "input")
    }

    /// Start -> Fork -> {Treasure Room (victory), Empty Corridor (dead end)}.
    pub fn forked_adventure() -> AdventureGraph {
        let fork = Node::decision(
            "fork",
            DecisionProperties {
                title: "Fork".to_string(),
                description: "Two tunnels lead on.".to_string(),
                choices: vec![
                    ChoiceOption::new("left", "Take the left tunnel"),
                    ChoiceOption::new("right", "Take the right tunnel"),
                ],
            },
        );
        AdventureGraph::new(
            vec![
                story("start", "Entrance"),
                fork,
                victory("treasure", "Treasure Room"),
                story("corridor", "Empty Corridor"),
            ],
            vec![
                link("c1", "start", "output", "fork"),
                link("c2", "fork", "left", "treasure"),
                link("c3", "fork", "right", "corridor"),
            ],
        )
    }
}
