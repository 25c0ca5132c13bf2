//! Transition Validator.
//!
//! Two questions are answered here: may a connection exist at all (authoring
//! time), and may a connection be followed right now (play time).

mod cycle;

pub use cycle::*;

use adventure_model::{AdventureGraph, AdventureState, ConnectionId, Node, NodeId, NodeProperties, NodeType};
use serde::{Deserialize, Serialize};

/// Decision ports with these names say nothing about the choice they carry.
const GENERIC_PORT_NAMES: &[&str] = &["output", "default"];

/// Choice id that does not count as a decision.
const DEFAULT_CHOICE: &str = "default";

/// Combat may only be left through these ports.
const COMBAT_EXITS: &[&str] = &["victory", "defeat", "flee"];

/// Verdict on a single connection.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionCheck {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ConnectionCheck {
    fn from_findings(errors: Vec<String>, warnings: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
            warnings,
        }
    }
}

/// Check whether a new connection `source:source_port -> target:target_port`
/// may be added to the graph.
pub fn validate_connection(
    graph: &AdventureGraph,
    source: &NodeId,
    target: &NodeId,
    source_port: &str,
    target_port: &str,
) -> ConnectionCheck {
    validate_connection_excluding(graph, None, source, target, source_port, target_port)
}

/// Like [`validate_connection`], but ignores the existing connection `exclude`.
///
/// Used to re-check a connection that is already part of the graph against
/// all the others.
pub fn validate_connection_excluding(
    graph: &AdventureGraph,
    exclude: Option<&ConnectionId>,
    source: &NodeId,
    target: &NodeId,
    source_port: &str,
    target_port: &str,
) -> ConnectionCheck {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let (source_node, target_node) = match (graph.node(source), graph.node(target)) {
        (Some(s), Some(t)) => (s, t),
        (s, t) => {
            if s.is_none() {
                errors.push(format!("Source node '{}' does not exist", source));
            }
            if t.is_none() {
                errors.push(format!("Target node '{}' does not exist", target));
            }
            return ConnectionCheck::from_findings(errors, warnings);
        }
    };
    let source_name = graph.display_name(source);
    let target_name = graph.display_name(target);

    if source == target {
        errors.push(format!("'{}' cannot connect to itself", source_name));
    }
    if !source_node.has_output_port(source_port) {
        errors.push(format!(
            "'{}' has no output port '{}'",
            source_name, source_port
        ));
    }
    if !target_node.has_input_port(target_port) {
        errors.push(format!(
            "'{}' has no input port '{}'",
            target_name, target_port
        ));
    }

    let existing: Vec<_> = graph
        .connections
        .iter()
        .filter(|c| Some(&c.id) != exclude)
        .collect();

    let duplicate = existing.iter().any(|c| {
        &c.source_node_id == source
            && c.source_port == source_port
            && &c.target_node_id == target
            && c.target_port == target_port
    });
    if duplicate {
        errors.push(format!(
            "'{}' is already connected to '{}' through '{}'",
            source_name, target_name, source_port
        ));
    } else if existing
        .iter()
        .any(|c| &c.target_node_id == target && c.target_port == target_port)
    {
        errors.push(format!(
            "Input port '{}' of '{}' is already connected",
            target_port, target_name
        ));
    }

    if source != target && would_create_circular_dependency(existing.iter().copied(), source, target) {
        errors.push(format!(
            "Connecting '{}' to '{}' would create a circular dependency",
            source_name, target_name
        ));
    }

    warnings.extend(port_naming_warnings(source_node, &source_name, source_port));

    ConnectionCheck::from_findings(errors, warnings)
}

/// Non-blocking advice about how a source port is named.
fn port_naming_warnings(node: &Node, name: &str, port: &str) -> Vec<String> {
    let mut warnings = Vec::new();
    match node.node_type() {
        NodeType::Decision => {
            if GENERIC_PORT_NAMES.contains(&port) {
                warnings.push(format!(
                    "Decision '{}' should name its output after a choice, not '{}'",
                    name, port
                ));
            }
        }
        NodeType::Story => {
            if node.is_victory() {
                warnings.push(format!("Victory ending '{}' has an outgoing connection", name));
            }
            if node.is_failure() {
                warnings.push(format!("Failure ending '{}' has an outgoing connection", name));
            }
        }
        node_type => {
            if let Some(canonical) = node_type.canonical_output_ports() {
                if !canonical.contains(&port) {
                    warnings.push(format!(
                        "{} '{}' usually uses {} outputs, not '{}'",
                        capitalize(node_type.as_str()),
                        name,
                        canonical.join("/"),
                        port
                    ));
                }
            }
        }
    }
    warnings
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Whether the node has been resolved far enough for `port` to be followed.
fn port_is_open(node: &Node, port: &str, state: &AdventureState) -> bool {
    match &node.properties {
        NodeProperties::Story(_) => !node.is_ending(),
        NodeProperties::Decision(_) => state
            .last_action_on(&node.id)
            .and_then(|record| record.choice_id.as_ref())
            .is_some_and(|choice| choice.as_str() != DEFAULT_CHOICE),
        NodeProperties::Challenge(_) | NodeProperties::Check(_) => state
            .action_history
            .iter()
            .any(|record| record.node_id == node.id && record.result.is_some()),
        NodeProperties::Combat(_) => COMBAT_EXITS.contains(&port),
    }
}

/// Whether play may currently move from `from` to `to`.
pub fn validate_transition(
    graph: &AdventureGraph,
    from: &NodeId,
    to: &NodeId,
    state: &AdventureState,
) -> bool {
    let Some(node) = graph.node(from) else {
        return false;
    };
    graph
        .outgoing(from)
        .filter(|c| &c.target_node_id == to)
        .any(|c| port_is_open(node, &c.source_port, state))
}

/// Output ports of `node_id` that lead somewhere and may be followed now.
pub fn get_available_actions(graph: &AdventureGraph, node_id: &NodeId, state: &AdventureState) -> Vec<String> {
    let Some(node) = graph.node(node_id) else {
        return Vec::new();
    };
    let mut ports: Vec<String> = Vec::new();
    for connection in graph.outgoing(node_id) {
        if !ports.contains(&connection.source_port) && port_is_open(node, &connection.source_port, state) {
            ports.push(connection.source_port.clone());
        }
    }
    ports
}
