//! Expression Evaluator - decides conditional expressions against a play state.
//!
//! Evaluation never fails. Unresolvable paths behave as "undefined", unknown
//! operators evaluate to `false`, and malformed paths simply do not resolve.

mod coerce;
mod path;

pub use coerce::*;
pub use path::*;

use adventure_model::{AdventureState, ComparisonOp, ConditionalExpression, LogicalOp};
use serde_json::Value;

/// Top-level `AdventureState` fields a path may start with. Any other first
/// segment is looked up inside `variables`.
const STATE_FIELDS: &[&str] = &[
    "variables",
    "inventory",
    "party",
    "flags",
    "currentNodeId",
    "visitedNodes",
    "actionHistory",
];

/// A JSON view of one state snapshot, for repeated path lookups.
pub struct StateView {
    root: Value,
}

impl StateView {
    /// Build a view over a state snapshot.
    pub fn new(state: &AdventureState) -> Self {
        let root = match serde_json::to_value(state) {
            Ok(root) => root,
            Err(e) => {
                tracing::warn!("Failed to build state view: {}", e);
                Value::Null
            }
        };
        Self { root }
    }

    /// Resolve a variable path. `None` means undefined.
    pub fn resolve(&self, path: &str) -> Option<Value> {
        let segments = parse_path(path)?;
        match segments.first() {
            Some(PathSegment::Key(first)) if STATE_FIELDS.contains(&first.as_str()) => {
                resolve_segments(&self.root, &segments)
            }
            _ => resolve_segments(self.root.get("variables")?, &segments),
        }
    }

    /// Evaluate an expression against this view.
    pub fn evaluate(&self, expr: &ConditionalExpression) -> bool {
        match expr {
            ConditionalExpression::Simple {
                variable,
                comparison,
                value,
            } => compare(self.resolve(variable).as_ref(), *comparison, value),
            ConditionalExpression::Compound {
                operator,
                conditions,
            } => match operator {
                LogicalOp::And => conditions.iter().all(|c| self.evaluate(c)),
                LogicalOp::Or => conditions.iter().any(|c| self.evaluate(c)),
                // Only the first sub-expression is negated; saved adventures rely on it.
                LogicalOp::Not => !conditions.first().is_some_and(|c| self.evaluate(c)),
            },
        }
    }
}

/// Evaluate `expr` against `state`.
pub fn evaluate(expr: &ConditionalExpression, state: &AdventureState) -> bool {
    StateView::new(state).evaluate(expr)
}

fn compare(actual: Option<&Value>, op: ComparisonOp, expected: &Value) -> bool {
    match op {
        ComparisonOp::Exists => matches!(actual, Some(v) if !v.is_null()),
        ComparisonOp::NotEqual => !loose_eq(actual, Some(expected)),
        _ if actual.is_none() => false,
        ComparisonOp::Equal => loose_eq(actual, Some(expected)),
        ComparisonOp::GreaterThan => to_number(actual) > to_number(Some(expected)),
        ComparisonOp::LessThan => to_number(actual) < to_number(Some(expected)),
        ComparisonOp::GreaterOrEqual => to_number(actual) >= to_number(Some(expected)),
        ComparisonOp::LessOrEqual => to_number(actual) <= to_number(Some(expected)),
        ComparisonOp::Contains => to_text(actual).contains(&to_text(Some(expected))),
        ComparisonOp::Unknown => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adventure_model::{InventoryItem, NodeId, PartyMember};
    use serde_json::json;

    fn state() -> AdventureState {
        AdventureState::new(NodeId::new("start"))
            .with_party_member(PartyMember::new("hero", "Aria").with_attribute("strength", 4))
            .with_item(InventoryItem::new("rope", "Rope").with_quantity(3))
            .with_variable("gold", json!(15))
            .with_variable("title", json!("Knight of the Vale"))
            .with_flag("hasKey", false)
    }

    fn simple(variable: &str, comparison: ComparisonOp, value: Value) -> ConditionalExpression {
        ConditionalExpression::simple(variable, comparison, value)
    }

    #[test]
    fn test_exists_ignores_flag_value() {
        let expr = ConditionalExpression::exists("flags.hasKey");
        assert!(evaluate(&expr, &state()));

        let expr = ConditionalExpression::exists("flags.hasTorch");
        assert!(!evaluate(&expr, &state()));
    }

    #[test]
    fn test_numeric_comparisons_coerce() {
        let s = state();
        assert!(evaluate(&simple("variables.gold", ComparisonOp::GreaterOrEqual, json!("15")), &s));
        assert!(evaluate(&simple("inventory[0].quantity", ComparisonOp::GreaterThan, json!(2)), &s));
        assert!(evaluate(&simple("party[0].attributes.strength", ComparisonOp::LessThan, json!(5)), &s));
        assert!(!evaluate(&simple("variables.title", ComparisonOp::GreaterThan, json!(0)), &s));
    }

    #[test]
    fn test_bare_names_resolve_in_variables() {
        let s = state();
        assert!(evaluate(&simple("gold", ComparisonOp::Equal, json!(15)), &s));
        assert!(evaluate(&simple("gold", ComparisonOp::Equal, json!("15")), &s));
    }

    #[test]
    fn test_contains() {
        let s = state();
        assert!(evaluate(&simple("title", ComparisonOp::Contains, json!("Vale")), &s));
        assert!(evaluate(&simple("gold", ComparisonOp::Contains, json!(5)), &s));
        assert!(!evaluate(&simple("title", ComparisonOp::Contains, json!("Moor")), &s));
    }

    #[test]
    fn test_unresolved_paths() {
        let s = state();
        assert!(!evaluate(&simple("variables.missing", ComparisonOp::Equal, json!(0)), &s));
        assert!(!evaluate(&simple("variables.missing", ComparisonOp::LessThan, json!(1)), &s));
        assert!(!evaluate(&simple("variables.missing", ComparisonOp::Contains, json!("")), &s));
        assert!(evaluate(&simple("variables.missing", ComparisonOp::NotEqual, json!(0)), &s));
        // Loosely, undefined equals null.
        assert!(!evaluate(&simple("variables.missing", ComparisonOp::NotEqual, Value::Null), &s));
        assert!(!evaluate(&simple("inventory[", ComparisonOp::Exists, Value::Null), &s));
    }

    #[test]
    fn test_unknown_operator_is_false() {
        let s = state();
        assert!(!evaluate(&simple("gold", ComparisonOp::Unknown, json!(15)), &s));
    }

    #[test]
    fn test_compound_operators() {
        let s = state();
        let rich = simple("gold", ComparisonOp::GreaterThan, json!(10));
        let keyed = simple("flags.hasKey", ComparisonOp::Equal, json!(true));

        assert!(!evaluate(&ConditionalExpression::and(vec![rich.clone(), keyed.clone()]), &s));
        assert!(evaluate(&ConditionalExpression::or(vec![rich.clone(), keyed.clone()]), &s));
        assert!(evaluate(&ConditionalExpression::not(keyed.clone()), &s));
    }

    #[test]
    fn test_empty_compounds() {
        let s = state();
        assert!(evaluate(&ConditionalExpression::and(Vec::new()), &s));
        assert!(!evaluate(&ConditionalExpression::or(Vec::new()), &s));
        let empty_not = ConditionalExpression::Compound {
            operator: LogicalOp::Not,
            conditions: Vec::new(),
        };
        assert!(evaluate(&empty_not, &s));
    }

    #[test]
    fn test_not_only_negates_first_condition() {
        let s = state();
        let expr = ConditionalExpression::Compound {
            operator: LogicalOp::Not,
            conditions: vec![
                simple("gold", ComparisonOp::LessThan, json!(0)),
                simple("gold", ComparisonOp::GreaterThan, json!(0)),
            ],
        };
        // !(false) regardless of the second, true, sub-expression.
        assert!(evaluate(&expr, &s));
    }
}
