//! Conditional expressions attached to choices, checks and guarded state changes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Comparison applied by a simple expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComparisonOp {
    #[serde(rename = "==", alias = "equals")]
    Equal,
    #[serde(rename = "!=", alias = "not_equals")]
    NotEqual,
    #[serde(rename = ">", alias = "greater_than")]
    GreaterThan,
    #[serde(rename = "<", alias = "less_than")]
    LessThan,
    #[serde(rename = ">=", alias = "greater_equal")]
    GreaterOrEqual,
    #[serde(rename = "<=", alias = "less_equal")]
    LessOrEqual,
    #[serde(rename = "contains")]
    Contains,
    #[serde(rename = "exists")]
    Exists,
    /// Any operator this runtime does not understand. Always evaluates to `false`.
    #[serde(other)]
    Unknown,
}

impl ComparisonOp {
    /// Operator symbol as written in authored content.
    pub fn symbol(&self) -> &'static str {
        match self {
            ComparisonOp::Equal => "==",
            ComparisonOp::NotEqual => "!=",
            ComparisonOp::GreaterThan => ">",
            ComparisonOp::LessThan => "<",
            ComparisonOp::GreaterOrEqual => ">=",
            ComparisonOp::LessOrEqual => "<=",
            ComparisonOp::Contains => "contains",
            ComparisonOp::Exists => "exists",
            ComparisonOp::Unknown => "?",
        }
    }
}

/// Logical connective of a compound expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogicalOp {
    And,
    Or,
    /// Negates the first sub-expression only.
    Not,
}

/// A recursive condition evaluated against an adventure state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ConditionalExpression {
    Simple {
        /// Dotted/bracketed path into the state, e.g. `inventory[0].quantity`.
        variable: String,
        comparison: ComparisonOp,
        #[serde(default)]
        value: Value,
    },
    Compound {
        operator: LogicalOp,
        #[serde(default, alias = "subExpressions", alias = "expressions")]
        conditions: Vec<ConditionalExpression>,
    },
}

impl ConditionalExpression {
    /// Build a simple comparison.
    pub fn simple(variable: impl Into<String>, comparison: ComparisonOp, value: Value) -> Self {
        ConditionalExpression::Simple {
            variable: variable.into(),
            comparison,
            value,
        }
    }

    /// Build an `exists` test for a path.
    pub fn exists(variable: impl Into<String>) -> Self {
        Self::simple(variable, ComparisonOp::Exists, Value::Null)
    }

    pub fn and(conditions: Vec<ConditionalExpression>) -> Self {
        ConditionalExpression::Compound {
            operator: LogicalOp::And,
            conditions,
        }
    }

    pub fn or(conditions: Vec<ConditionalExpression>) -> Self {
        ConditionalExpression::Compound {
            operator: LogicalOp::Or,
            conditions,
        }
    }

    pub fn not(condition: ConditionalExpression) -> Self {
        ConditionalExpression::Compound {
            operator: LogicalOp::Not,
            conditions: vec![condition],
        }
    }
}
