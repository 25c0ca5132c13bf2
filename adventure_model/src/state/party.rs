//! Party members and inventory entries.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

fn default_quantity() -> i64 {
    1
}

fn default_level() -> i64 {
    1
}

fn default_hp() -> i64 {
    10
}

/// An item stack in the shared inventory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default = "default_quantity")]
    pub quantity: i64,

    /// Any further authored fields (description, weight, icon, ...).
    #[serde(flatten)]
    pub properties: Map<String, Value>,
}

impl InventoryItem {
    /// Create a single item.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            quantity: 1,
            properties: Map::new(),
        }
    }

    pub fn with_quantity(mut self, quantity: i64) -> Self {
        self.quantity = quantity;
        self
    }
}

/// A member of the adventuring party.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartyMember {
    pub id: String,

    #[serde(default)]
    pub name: String,

    /// Attribute name -> score (strength, dexterity, ...).
    #[serde(default)]
    pub attributes: HashMap<String, i64>,

    #[serde(rename = "currentHP", alias = "currentHp", default = "default_hp")]
    pub current_hp: i64,

    #[serde(rename = "maxHP", alias = "maxHp", default = "default_hp")]
    pub max_hp: i64,

    #[serde(default)]
    pub experience: i64,

    #[serde(default = "default_level")]
    pub level: i64,

    /// Active conditions such as "poisoned".
    #[serde(default)]
    pub conditions: Vec<String>,
}

impl PartyMember {
    /// Create a level 1 member with 10/10 HP and no attributes.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            attributes: HashMap::new(),
            current_hp: default_hp(),
            max_hp: default_hp(),
            experience: 0,
            level: default_level(),
            conditions: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, score: i64) -> Self {
        self.attributes.insert(name.into(), score);
        self
    }

    /// Score of an attribute, 0 when the member does not have it.
    pub fn attribute(&self, name: &str) -> i64 {
        self.attributes.get(name).copied().unwrap_or(0)
    }

    pub fn is_alive(&self) -> bool {
        self.current_hp > 0
    }

    pub fn has_condition(&self, condition: &str) -> bool {
        self.conditions.iter().any(|c| c == condition)
    }
}
