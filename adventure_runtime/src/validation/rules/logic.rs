//! Playability: a victory can be reached and play never gets stuck.

use adventure_model::AdventureGraph;

use super::{search_roots, ValidationRule};
use crate::config::ValidationThresholds;
use crate::error::Result;
use crate::traversal::reachable_from;
use crate::validation::issue::{RuleCategory, Severity, ValidationIssue};

/// At least one victory ending must exist, and each must be reachable.
pub struct VictoryPathsExist;

impl ValidationRule for VictoryPathsExist {
    fn id(&self) -> &str {
        "victory-paths-exist"
    }

    fn severity(&self) -> Severity {
        Severity::Error
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Logic
    }

    fn validate(&self, graph: &AdventureGraph, _thresholds: &ValidationThresholds) -> Result<Vec<ValidationIssue>> {
        let victories: Vec<_> = graph.nodes.iter().filter(|node| node.is_victory()).collect();
        if victories.is_empty() {
            return Ok(vec![ValidationIssue::error(
                self.id(),
                self.category(),
                "Adventure has no victory ending",
            )
            .with_suggestion("Mark a story node as a victory condition")]);
        }

        let reached = reachable_from(graph, &search_roots(graph));
        Ok(victories
            .into_iter()
            .filter(|node| !reached.contains(&node.id))
            .map(|node| {
                ValidationIssue::warning(
                    "victory-unreachable",
                    self.category(),
                    format!("No path leads to victory ending '{}'", graph.display_name(&node.id)),
                )
                .with_node(node.id.clone())
                .with_suggestion("Connect a path from the start to this ending")
            })
            .collect())
    }
}

/// Nodes with nowhere to go that are not endings.
pub struct DeadEnds;

impl ValidationRule for DeadEnds {
    fn id(&self) -> &str {
        "dead-ends"
    }

    fn severity(&self) -> Severity {
        Severity::Warning
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Logic
    }

    fn validate(&self, graph: &AdventureGraph, _thresholds: &ValidationThresholds) -> Result<Vec<ValidationIssue>> {
        Ok(graph
            .nodes
            .iter()
            .filter(|node| !node.is_ending() && graph.outgoing(&node.id).next().is_none())
            .map(|node| {
                ValidationIssue::warning(
                    self.id(),
                    self.category(),
                    format!("'{}' has no way forward", graph.display_name(&node.id)),
                )
                .with_node(node.id.clone())
                .with_suggestion("Add an outgoing connection or mark it as a victory or failure ending")
            })
            .collect())
    }
}
