//! Required authoring fields per node type.

use adventure_model::{AdventureGraph, Node, NodeProperties};

use super::ValidationRule;
use crate::config::ValidationThresholds;
use crate::error::Result;
use crate::validation::issue::{RuleCategory, Severity, ValidationIssue};

pub struct RequiredContent;

impl RequiredContent {
    /// Human names of the fields `node` leaves empty.
    fn missing_fields(node: &Node) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if node.title().trim().is_empty() {
            missing.push("a title");
        }
        match &node.properties {
            NodeProperties::Story(props) => {
                if props.content.trim().is_empty() {
                    missing.push("story text");
                }
            }
            NodeProperties::Decision(props) => {
                if props.choices.is_empty() {
                    missing.push("at least one choice");
                }
            }
            NodeProperties::Challenge(props) => {
                if props.attribute.as_deref().map_or(true, |a| a.trim().is_empty()) {
                    missing.push("an attribute to test");
                }
                if props.outcomes.is_empty() {
                    missing.push("at least one outcome");
                }
            }
            NodeProperties::Combat(props) => {
                if props.enemies.is_empty() {
                    missing.push("at least one creature");
                }
            }
            NodeProperties::Check(_) => {}
        }
        missing
    }
}

impl ValidationRule for RequiredContent {
    fn id(&self) -> &str {
        "required-content"
    }

    fn severity(&self) -> Severity {
        Severity::Error
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Content
    }

    fn validate(&self, graph: &AdventureGraph, _thresholds: &ValidationThresholds) -> Result<Vec<ValidationIssue>> {
        let mut issues = Vec::new();
        for node in &graph.nodes {
            for field in Self::missing_fields(node) {
                issues.push(
                    ValidationIssue::error(
                        self.id(),
                        self.category(),
                        format!("'{}' ({}) needs {}", graph.display_name(&node.id), node.node_type(), field),
                    )
                    .with_node(node.id.clone()),
                );
            }
        }
        Ok(issues)
    }
}
