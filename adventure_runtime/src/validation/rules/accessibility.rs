//! Readability of player-facing text.

use adventure_model::{AdventureGraph, NodeProperties};

use super::ValidationRule;
use crate::config::ValidationThresholds;
use crate::error::Result;
use crate::validation::issue::{RuleCategory, Severity, ValidationIssue};

/// Overlong story text and choices with nothing to read.
pub struct ReadableContent;

impl ValidationRule for ReadableContent {
    fn id(&self) -> &str {
        "readable-content"
    }

    fn severity(&self) -> Severity {
        Severity::Warning
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Accessibility
    }

    fn validate(&self, graph: &AdventureGraph, thresholds: &ValidationThresholds) -> Result<Vec<ValidationIssue>> {
        let mut issues = Vec::new();

        for node in &graph.nodes {
            match &node.properties {
                NodeProperties::Story(props) => {
                    let words = props.content.split_whitespace().count();
                    if words > thresholds.max_story_words {
                        issues.push(
                            ValidationIssue::warning(
                                self.id(),
                                self.category(),
                                format!(
                                    "'{}' runs to {} words (limit {})",
                                    graph.display_name(&node.id),
                                    words,
                                    thresholds.max_story_words
                                ),
                            )
                            .with_node(node.id.clone())
                            .with_suggestion("Split the passage across several story nodes"),
                        );
                    }
                }
                NodeProperties::Decision(props) => {
                    for choice in props.choices.iter().filter(|c| c.text.trim().is_empty()) {
                        issues.push(
                            ValidationIssue::warning(
                                self.id(),
                                self.category(),
                                format!(
                                    "Choice '{}' in '{}' has no text",
                                    choice.id,
                                    graph.display_name(&node.id)
                                ),
                            )
                            .with_node(node.id.clone())
                            .with_suggestion("Describe what the player is choosing"),
                        );
                    }
                }
                _ => {}
            }
        }
        Ok(issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::rules::fixtures::{forked_adventure, story};
    use adventure_model::{ChoiceOption, DecisionProperties, Node};

    #[test]
    fn test_long_story_and_blank_choice() {
        let mut long = story("long", "Long");
        if let NodeProperties::Story(props) = &mut long.properties {
            props.content = "word ".repeat(12);
        }
        let decision = Node::decision(
            "d",
            DecisionProperties {
                title: "Door".to_string(),
                choices: vec![ChoiceOption::new("open", "Open it"), ChoiceOption::new("blank", "  ")],
                ..Default::default()
            },
        );
        let graph = AdventureGraph::new(vec![long, decision], Vec::new());
        let thresholds = ValidationThresholds {
            max_story_words: 10,
            ..Default::default()
        };

        let issues = ReadableContent.validate(&graph, &thresholds).unwrap();
        assert_eq!(issues.len(), 2);
        assert!(issues[0].message.contains("12 words"));
        assert!(issues[1].message.contains("'blank'"));
    }

    #[test]
    fn test_default_limit_accepts_fixture() {
        let issues = ReadableContent
            .validate(&forked_adventure(), &ValidationThresholds::default())
            .unwrap();
        assert!(issues.is_empty());
    }
}
