//! Issues reported by validation rules.

use adventure_model::{ConnectionId, NodeId};
use serde::{Deserialize, Serialize};

/// Errors block publication, warnings are advisory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleCategory {
    Structure,
    Logic,
    Content,
    Accessibility,
    Performance,
}

/// A single finding about an adventure graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationIssue {
    /// Stable identifier, e.g. `dead-ends`.
    pub code: String,

    pub severity: Severity,

    pub category: RuleCategory,

    /// Node to navigate to when the issue is selected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_id: Option<NodeId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_id: Option<ConnectionId>,

    pub message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl ValidationIssue {
    pub fn new(
        code: impl Into<String>,
        severity: Severity,
        category: RuleCategory,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            severity,
            category,
            node_id: None,
            connection_id: None,
            message: message.into(),
            suggestion: None,
        }
    }

    pub fn error(code: impl Into<String>, category: RuleCategory, message: impl Into<String>) -> Self {
        Self::new(code, Severity::Error, category, message)
    }

    pub fn warning(code: impl Into<String>, category: RuleCategory, message: impl Into<String>) -> Self {
        Self::new(code, Severity::Warning, category, message)
    }

    pub fn with_node(mut self, node_id: NodeId) -> Self {
        self.node_id = Some(node_id);
        self
    }

    pub fn with_connection(mut self, connection_id: ConnectionId) -> Self {
        self.connection_id = Some(connection_id);
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Issues split by severity. `is_valid` holds exactly when there are no errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }
}

impl ValidationResult {
    pub fn from_issues(issues: impl IntoIterator<Item = ValidationIssue>) -> Self {
        let mut result = Self::default();
        for issue in issues {
            result.push(issue);
        }
        result
    }

    pub fn push(&mut self, issue: ValidationIssue) {
        match issue.severity {
            Severity::Error => self.errors.push(issue),
            Severity::Warning => self.warnings.push(issue),
        }
        self.is_valid = self.errors.is_empty();
    }

    /// Errors followed by warnings.
    pub fn issues(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.errors.iter().chain(self.warnings.iter())
    }

    /// Only the issues tagged with `node_id`.
    pub fn for_node(&self, node_id: &NodeId) -> Self {
        Self::from_issues(
            self.issues()
                .filter(|issue| issue.node_id.as_ref() == Some(node_id))
                .cloned(),
        )
    }

    pub fn has_code(&self, code: &str) -> bool {
        self.issues().any(|issue| issue.code == code)
    }
}
