//! Guarded state mutations and the rewards that desugar into them.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ConditionalExpression;
use crate::state::InventoryItem;

/// Which part of the adventure state a change touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StateDomain {
    Variable,
    Inventory,
    Party,
    Flag,
    /// Unrecognised domain; changes in it are ignored.
    #[serde(other)]
    Unknown,
}

/// What to do to the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StateOperation {
    Set,
    Add,
    Remove,
    Modify,
    /// Unrecognised operation; changes using it are ignored.
    #[serde(other)]
    Unknown,
}

/// A single, optionally guarded, mutation of the adventure state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateChange {
    #[serde(alias = "type")]
    pub domain: StateDomain,

    /// Variable name, item id, party member id or flag name.
    #[serde(default)]
    pub target: String,

    pub operation: StateOperation,

    #[serde(default)]
    pub value: Value,

    /// The change is skipped unless this evaluates to `true`.
    #[serde(default, alias = "optionalGuard", skip_serializing_if = "Option::is_none")]
    pub condition: Option<ConditionalExpression>,
}

impl StateChange {
    /// Create an unguarded change.
    pub fn new(
        domain: StateDomain,
        target: impl Into<String>,
        operation: StateOperation,
        value: Value,
    ) -> Self {
        Self {
            domain,
            target: target.into(),
            operation,
            value,
            condition: None,
        }
    }

    /// Guard this change with a condition.
    pub fn with_condition(mut self, condition: ConditionalExpression) -> Self {
        self.condition = Some(condition);
        self
    }

    pub fn set_variable(name: impl Into<String>, value: Value) -> Self {
        Self::new(StateDomain::Variable, name, StateOperation::Set, value)
    }

    pub fn set_flag(name: impl Into<String>, value: bool) -> Self {
        Self::new(StateDomain::Flag, name, StateOperation::Set, Value::Bool(value))
    }

    /// Add an item to the inventory, stacking onto an existing entry with the same id.
    pub fn add_item(item: &InventoryItem) -> Self {
        Self::new(
            StateDomain::Inventory,
            item.id.clone(),
            StateOperation::Add,
            serde_json::to_value(item).unwrap_or(Value::Null),
        )
    }
}

/// A reward granted by an outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Reward {
    Experience {
        amount: i64,
        /// Party member id; the first party member when absent.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target: Option<String>,
    },
    Item { item: InventoryItem },
}
