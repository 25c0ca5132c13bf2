//! Summarised validation output for the editor.

use std::collections::BTreeMap;

use adventure_model::{AdventureGraph, NodeType};
use serde::{Deserialize, Serialize};

use super::issue::ValidationResult;
use super::rules::encounter_ratio;
use crate::config::ValidationThresholds;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub is_valid: bool,
    pub error_count: usize,
    pub warning_count: usize,
    pub node_count: usize,
    pub connection_count: usize,
    /// Node count per node type name.
    pub node_type_counts: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub summary: ReportSummary,
    pub details: ValidationResult,
    pub recommendations: Vec<String>,
}

impl ValidationReport {
    pub fn new(graph: &AdventureGraph, details: ValidationResult, thresholds: &ValidationThresholds) -> Self {
        let mut node_type_counts = BTreeMap::new();
        for node in &graph.nodes {
            *node_type_counts.entry(node.node_type().to_string()).or_insert(0) += 1;
        }

        let summary = ReportSummary {
            is_valid: details.errors.is_empty(),
            error_count: details.errors.len(),
            warning_count: details.warnings.len(),
            node_count: graph.nodes.len(),
            connection_count: graph.connections.len(),
            node_type_counts,
        };
        let recommendations = recommendations(graph, &details, thresholds);

        Self {
            summary,
            details,
            recommendations,
        }
    }
}

/// Free-text advice derived from the graph's composition and its issues.
fn recommendations(
    graph: &AdventureGraph,
    details: &ValidationResult,
    thresholds: &ValidationThresholds,
) -> Vec<String> {
    let mut advice = Vec::new();

    if graph.nodes.is_empty() {
        advice.push("Start by adding a story node that introduces the adventure".to_string());
        return advice;
    }

    if !details.errors.is_empty() {
        advice.push(format!(
            "Fix the {} error(s) before publishing",
            details.errors.len()
        ));
    }

    let story_ratio = graph.count_of(NodeType::Story) as f64 / graph.nodes.len() as f64;
    if story_ratio < thresholds.min_story_ratio {
        advice.push("Consider adding more story nodes to develop the narrative".to_string());
    }

    if graph.count_of(NodeType::Decision) == 0 {
        advice.push("Add decision nodes so players can shape the story".to_string());
    }

    if !graph.nodes.iter().any(|node| node.is_failure()) {
        advice.push("Consider adding a failure ending so choices carry risk".to_string());
    }

    if encounter_ratio(graph) > thresholds.max_encounter_ratio {
        advice.push("Balance challenges and combat with narrative moments".to_string());
    }

    if !details.warnings.is_empty() {
        advice.push(format!(
            "Review the {} warning(s) to polish the adventure",
            details.warnings.len()
        ));
    }

    advice
}
