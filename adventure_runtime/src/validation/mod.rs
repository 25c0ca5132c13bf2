//! Graph Validator.
//!
//! An ordered, mutable registry of [`ValidationRule`]s run over a graph
//! snapshot. A rule that fails internally is reported as a `rule-failure`
//! error and the remaining rules still run.

mod issue;
mod report;
pub mod rules;

pub use issue::*;
pub use report::*;
pub use rules::ValidationRule;

use std::panic::{self, AssertUnwindSafe};

use adventure_model::{AdventureDocument, AdventureGraph, NodeId, ValidationState};

use crate::config::{RuntimeConfig, ValidationThresholds};

/// Code of the synthetic error raised when a rule itself fails.
pub const RULE_FAILURE: &str = "rule-failure";

pub struct ValidationEngine {
    rules: Vec<Box<dyn ValidationRule>>,
    thresholds: ValidationThresholds,
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationEngine {
    /// Engine with the built-in rules and default thresholds.
    pub fn new() -> Self {
        Self::with_thresholds(ValidationThresholds::default())
    }

    pub fn with_thresholds(thresholds: ValidationThresholds) -> Self {
        Self {
            rules: rules::builtin_rules(),
            thresholds,
        }
    }

    pub fn from_config(config: &RuntimeConfig) -> Self {
        Self::with_thresholds(config.validation.clone())
    }

    pub fn thresholds(&self) -> &ValidationThresholds {
        &self.thresholds
    }

    /// Register a rule. A rule with the same id is replaced in place,
    /// otherwise the rule runs after all existing ones.
    pub fn add_rule(&mut self, rule: impl ValidationRule + 'static) {
        match self.rules.iter().position(|r| r.id() == rule.id()) {
            Some(index) => self.rules[index] = Box::new(rule),
            None => self.rules.push(Box::new(rule)),
        }
    }

    /// Unregister a rule by id.
    pub fn remove_rule(&mut self, id: &str) -> bool {
        let before = self.rules.len();
        self.rules.retain(|rule| rule.id() != id);
        self.rules.len() != before
    }

    /// Registered rule ids, in evaluation order.
    pub fn rule_ids(&self) -> Vec<&str> {
        self.rules.iter().map(|rule| rule.id()).collect()
    }

    /// Run every registered rule over the graph.
    pub fn validate_adventure(&self, graph: &AdventureGraph) -> ValidationResult {
        let mut result = ValidationResult::default();
        for rule in &self.rules {
            for issue in self.run_rule(rule.as_ref(), graph) {
                result.push(issue);
            }
        }

        tracing::debug!(
            "Validated {} nodes and {} connections: {} errors, {} warnings",
            graph.nodes.len(),
            graph.connections.len(),
            result.errors.len(),
            result.warnings.len()
        );
        result
    }

    /// Validation result plus summary counts and recommendations.
    pub fn generate_report(&self, graph: &AdventureGraph) -> ValidationReport {
        ValidationReport::new(graph, self.validate_adventure(graph), &self.thresholds)
    }

    /// The full validation pass, narrowed to issues about one node.
    pub fn validate_node(&self, graph: &AdventureGraph, node_id: &NodeId) -> ValidationResult {
        self.validate_adventure(graph).for_node(node_id)
    }

    /// Copy of the graph with each node's `validation_state` set from its issues.
    pub fn annotate(&self, graph: &AdventureGraph) -> AdventureGraph {
        let result = self.validate_adventure(graph);
        let mut annotated = graph.clone();

        for node in &mut annotated.nodes {
            node.validation_state = if mentions(&result.errors, &node.id) {
                ValidationState::Error
            } else if mentions(&result.warnings, &node.id) {
                ValidationState::Warning
            } else {
                ValidationState::Valid
            };
        }
        annotated
    }

    /// Validate an exported document, including its declared start node.
    pub fn validate_document(&self, document: &AdventureDocument) -> ValidationResult {
        let mut result = self.validate_adventure(&document.graph);
        if let Some(start) = &document.start_node_id {
            if !document.graph.contains(start) {
                result.push(
                    ValidationIssue::error(
                        "start-node-missing",
                        RuleCategory::Structure,
                        format!("Start node '{}' does not exist", start),
                    )
                    .with_suggestion("Pick an existing node as the start"),
                );
            }
        }
        result
    }

    fn run_rule(&self, rule: &dyn ValidationRule, graph: &AdventureGraph) -> Vec<ValidationIssue> {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| rule.validate(graph, &self.thresholds)));
        let reason = match outcome {
            Ok(Ok(issues)) => return capped(issues, rule.severity()),
            Ok(Err(e)) => e.to_string(),
            Err(payload) => panic_message(payload.as_ref()),
        };

        tracing::warn!("Validation rule {} failed: {}", rule.id(), reason);
        vec![ValidationIssue::error(
            RULE_FAILURE,
            rule.category(),
            format!("Validation rule '{}' failed: {}", rule.id(), reason),
        )]
    }
}

/// A rule registered as advisory cannot report errors.
fn capped(mut issues: Vec<ValidationIssue>, ceiling: Severity) -> Vec<ValidationIssue> {
    if ceiling == Severity::Warning {
        for issue in &mut issues {
            issue.severity = Severity::Warning;
        }
    }
    issues
}

fn mentions(issues: &[ValidationIssue], node_id: &NodeId) -> bool {
    issues.iter().any(|issue| issue.node_id.as_ref() == Some(node_id))
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "rule panicked".to_string()
    }
}
