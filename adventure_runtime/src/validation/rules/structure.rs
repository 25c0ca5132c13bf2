//! Graph shape: a start exists, everything is reachable, connections are sound.

use adventure_model::AdventureGraph;

use super::ValidationRule;
use crate::config::ValidationThresholds;
use crate::error::Result;
use crate::transition::validate_connection_excluding;
use crate::traversal::reachable_from;
use crate::validation::issue::{RuleCategory, Severity, ValidationIssue};

/// An adventure needs at least one node to begin at.
pub struct StartNodeExists;

impl ValidationRule for StartNodeExists {
    fn id(&self) -> &str {
        "start-node-exists"
    }

    fn severity(&self) -> Severity {
        Severity::Error
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Structure
    }

    fn validate(&self, graph: &AdventureGraph, _thresholds: &ValidationThresholds) -> Result<Vec<ValidationIssue>> {
        if !graph.nodes.is_empty() {
            return Ok(Vec::new());
        }
        Ok(vec![ValidationIssue::error(
            self.id(),
            self.category(),
            "Adventure has no nodes",
        )
        .with_suggestion("Add a story node to open the adventure")])
    }
}

/// Nodes that no start candidate can reach.
pub struct OrphanedNodes;

impl ValidationRule for OrphanedNodes {
    fn id(&self) -> &str {
        "orphaned-nodes"
    }

    fn severity(&self) -> Severity {
        Severity::Warning
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Structure
    }

    fn validate(&self, graph: &AdventureGraph, _thresholds: &ValidationThresholds) -> Result<Vec<ValidationIssue>> {
        if graph.nodes.is_empty() {
            return Ok(Vec::new());
        }

        let starts: Vec<_> = graph.start_candidates().into_iter().map(|node| &node.id).collect();
        if starts.is_empty() {
            return Ok(vec![ValidationIssue::warning(
                "no-clear-start",
                self.category(),
                "No node can open the adventure: a start needs no incoming connection and at least one outgoing one",
            )
            .with_suggestion("Connect a story node with no incoming connections to the rest of the adventure")]);
        }

        let reached = reachable_from(graph, &starts);
        Ok(graph
            .nodes
            .iter()
            .filter(|node| !reached.contains(&node.id))
            .map(|node| {
                ValidationIssue::warning(
                    self.id(),
                    self.category(),
                    format!("'{}' cannot be reached from the start", graph.display_name(&node.id)),
                )
                .with_node(node.id.clone())
                .with_suggestion("Connect it to the rest of the adventure or remove it")
            })
            .collect())
    }
}

/// Re-checks every existing connection as if it were being added now.
pub struct ConnectionValidation;

impl ValidationRule for ConnectionValidation {
    fn id(&self) -> &str {
        "connection-validation"
    }

    fn severity(&self) -> Severity {
        Severity::Error
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Structure
    }

    fn validate(&self, graph: &AdventureGraph, _thresholds: &ValidationThresholds) -> Result<Vec<ValidationIssue>> {
        let mut issues = Vec::new();

        for connection in &graph.connections {
            let check = validate_connection_excluding(
                graph,
                Some(&connection.id),
                &connection.source_node_id,
                &connection.target_node_id,
                &connection.source_port,
                &connection.target_port,
            );
            let route = format!(
                "{} -> {}",
                graph.display_name(&connection.source_node_id),
                graph.display_name(&connection.target_node_id)
            );

            let findings = check
                .errors
                .into_iter()
                .map(|message| (Severity::Error, message))
                .chain(check.warnings.into_iter().map(|message| (Severity::Warning, message)));
            for (severity, message) in findings {
                let mut issue = ValidationIssue::new(
                    self.id(),
                    severity,
                    self.category(),
                    format!("{}: {}", route, message),
                )
                .with_connection(connection.id.clone());
                if graph.contains(&connection.source_node_id) {
                    issue = issue.with_node(connection.source_node_id.clone());
                }
                issues.push(issue);
            }
        }
        Ok(issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::rules::fixtures::{forked_adventure, link, story, victory};

    fn run(rule: &dyn ValidationRule, graph: &AdventureGraph) -> Vec<ValidationIssue> {
        rule.validate(graph, &ValidationThresholds::default()).unwrap()
    }

    #[test]
    fn test_empty_graph_has_no_start() {
        let issues = run(&StartNodeExists, &AdventureGraph::default());
        assert_eq!(issues.len(), 1);
        assert!(issues[0].is_error());

        assert!(run(&StartNodeExists, &forked_adventure()).is_empty());
    }

    #[test]
    fn test_isolated_node_is_orphaned() {
        let graph = AdventureGraph::new(
            vec![story("a", "A"), story("b", "B"), story("c", "C")],
            vec![link("c1", "a", "output", "b")],
        );
        let issues = run(&OrphanedNodes, &graph);

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].node_id.as_ref().map(|id| id.as_str()), Some("c"));
    }

    #[test]
    fn test_fully_cyclic_graph_has_no_clear_start() {
        let graph = AdventureGraph::new(
            vec![story("a", "A"), story("b", "B")],
            vec![link("c1", "a", "output", "b"), link("c2", "b", "output", "a")],
        );
        let issues = run(&OrphanedNodes, &graph);

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, "no-clear-start");
    }

    #[test]
    fn test_unconnected_nodes_have_no_clear_start() {
        let graph = AdventureGraph::new(vec![story("a", "A"), victory("b", "B")], Vec::new());
        let issues = run(&OrphanedNodes, &graph);

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, "no-clear-start");
        assert!(!issues[0].message.contains("Every node has an incoming connection"));
        assert!(issues[0].message.contains("at least one outgoing"));
    }

    #[test]
    fn test_connection_findings_name_both_ends() {
        let mut graph = forked_adventure();
        graph.connections.push(link("c4", "fork", "left", "ghost"));
        graph.connections.push(link("c5", "treasure", "output", "corridor"));
        graph.nodes.push(victory("spare", "Spare"));
        let issues = run(&ConnectionValidation, &graph);

        let missing = issues
            .iter()
            .find(|issue| issue.connection_id.as_ref().map(|id| id.as_str()) == Some("c4"))
            .unwrap();
        assert!(missing.is_error());
        assert!(missing.message.starts_with("Fork -> ghost: "));

        // The corridor's input is now claimed twice, and the victory ending leads on.
        assert!(issues
            .iter()
            .any(|issue| issue.is_error() && issue.message.contains("already connected")));
        assert!(issues
            .iter()
            .any(|issue| !issue.is_error() && issue.message.starts_with("Treasure Room -> Empty Corridor: ")));
    }

    #[test]
    fn test_sound_connections_pass() {
        assert!(run(&ConnectionValidation, &forked_adventure()).is_empty());
    }
}
