//! Size and shape limits that keep an adventure maintainable.

use adventure_model::AdventureGraph;

use super::{search_roots, ValidationRule};
use crate::config::ValidationThresholds;
use crate::error::Result;
use crate::traversal::max_path_depth;
use crate::validation::issue::{RuleCategory, Severity, ValidationIssue};

/// Fraction of nodes that are challenges or combats.
pub fn encounter_ratio(graph: &AdventureGraph) -> f64 {
    if graph.nodes.is_empty() {
        return 0.0;
    }
    let encounters = graph
        .nodes
        .iter()
        .filter(|node| node.node_type().is_encounter())
        .count();
    encounters as f64 / graph.nodes.len() as f64
}

pub struct Complexity;

impl ValidationRule for Complexity {
    fn id(&self) -> &str {
        "complexity"
    }

    fn severity(&self) -> Severity {
        Severity::Warning
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Performance
    }

    fn validate(&self, graph: &AdventureGraph, thresholds: &ValidationThresholds) -> Result<Vec<ValidationIssue>> {
        let node_count = graph.nodes.len();
        if node_count == 0 {
            return Ok(Vec::new());
        }
        let mut issues = Vec::new();

        if node_count > thresholds.max_nodes {
            issues.push(
                ValidationIssue::warning(
                    "complexity-node-count",
                    self.category(),
                    format!("{} nodes exceeds the recommended {}", node_count, thresholds.max_nodes),
                )
                .with_suggestion("Split the adventure into chapters"),
            );
        }

        let density = graph.connections.len() as f64 / node_count as f64;
        if density > thresholds.max_average_connections {
            issues.push(
                ValidationIssue::warning(
                    "complexity-connection-density",
                    self.category(),
                    format!(
                        "{:.1} connections per node exceeds the recommended {:.1}",
                        density, thresholds.max_average_connections
                    ),
                )
                .with_suggestion("Simplify branching so players can follow the story"),
            );
        }

        let depth = max_path_depth(graph, &search_roots(graph), thresholds.max_path_depth);
        if depth > thresholds.max_path_depth {
            issues.push(
                ValidationIssue::warning(
                    "complexity-path-depth",
                    self.category(),
                    format!("A path runs deeper than {} nodes", thresholds.max_path_depth),
                )
                .with_suggestion("Shorten the longest route or add shortcuts"),
            );
        }

        let ratio = encounter_ratio(graph);
        if ratio > thresholds.max_encounter_ratio {
            issues.push(
                ValidationIssue::warning(
                    "complexity-encounter-ratio",
                    self.category(),
                    format!(
                        "{:.0}% of nodes are challenges or combats",
                        ratio * 100.0
                    ),
                )
                .with_suggestion("Balance encounters with story and decision nodes"),
            );
        }

        Ok(issues)
    }
}
