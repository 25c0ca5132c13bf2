//! Ordered, guarded application of state changes.

use adventure_model::{
    AdventureState, InventoryItem, PartyMember, Reward, StateChange, StateDomain, StateOperation,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};

use crate::expression::{evaluate, is_truthy, number_value, to_number};

/// Experience needed per level.
pub const EXPERIENCE_PER_LEVEL: i64 = 100;

/// Max HP gained for each level.
pub const HP_PER_LEVEL: i64 = 5;

/// Apply `changes` in order and return the resulting state.
///
/// A change whose guard is false against the state produced so far is
/// skipped. Unknown domains and operations are ignored.
pub fn apply_state_changes(changes: &[StateChange], state: &AdventureState) -> AdventureState {
    let mut next = state.clone();
    for change in changes {
        if let Some(guard) = &change.condition {
            if !evaluate(guard, &next) {
                tracing::debug!("Skipping guarded state change to {}", change.target);
                continue;
            }
        }
        apply_change(&mut next, change);
    }
    next
}

/// Convert rewards into the equivalent state changes.
///
/// Experience goes to the named member or the lead member; items become
/// inventory additions.
pub fn rewards_to_state_changes(rewards: &[Reward], state: &AdventureState) -> Vec<StateChange> {
    rewards
        .iter()
        .filter_map(|reward| match reward {
            Reward::Experience { amount, target } => {
                let member = target
                    .clone()
                    .or_else(|| state.lead_member().map(|m| m.id.clone()));
                match member {
                    Some(member) => Some(StateChange::new(
                        StateDomain::Party,
                        member,
                        StateOperation::Add,
                        json!({ "experience": amount }),
                    )),
                    None => {
                        tracing::debug!("Dropping experience reward: party is empty");
                        None
                    }
                }
            }
            Reward::Item { item } => Some(StateChange::add_item(item)),
        })
        .collect()
}

/// Add experience, recompute the level and apply level-up benefits.
pub fn grant_experience(member: &mut PartyMember, amount: i64) {
    member.experience = member.experience.saturating_add(amount);
    let level = member.experience.div_euclid(EXPERIENCE_PER_LEVEL) + 1;
    if level > member.level {
        let gained = HP_PER_LEVEL.saturating_mul(level.saturating_sub(member.level));
        member.max_hp = member.max_hp.saturating_add(gained);
        member.current_hp = member.max_hp;
    }
    member.level = level;
}

fn apply_change(state: &mut AdventureState, change: &StateChange) {
    match change.domain {
        StateDomain::Variable => apply_variable(state, change),
        StateDomain::Inventory => apply_inventory(state, change),
        StateDomain::Party => apply_party(state, change),
        StateDomain::Flag => apply_flag(state, change),
        StateDomain::Unknown => {
            tracing::warn!("Ignoring state change to {} with unknown domain", change.target);
        }
    }
}

fn apply_variable(state: &mut AdventureState, change: &StateChange) {
    let name = &change.target;
    match change.operation {
        StateOperation::Set => {
            state.variables.insert(name.clone(), change.value.clone());
        }
        StateOperation::Add => {
            let current = state.variables.get(name).map_or(0.0, |v| to_number(Some(v)));
            let total = current + to_number(Some(&change.value));
            if total.is_nan() {
                tracing::warn!("Ignoring non-numeric add to variable {}", name);
                return;
            }
            state.variables.insert(name.clone(), number_value(total));
        }
        StateOperation::Remove => {
            state.variables.remove(name);
        }
        StateOperation::Modify => {
            if let Some(existing) = state.variables.get_mut(name) {
                *existing = change.value.clone();
            }
        }
        StateOperation::Unknown => ignore(change),
    }
}

fn apply_inventory(state: &mut AdventureState, change: &StateChange) {
    match change.operation {
        StateOperation::Add => {
            let Some(item) = item_from_change(change) else {
                tracing::warn!("Ignoring malformed inventory add for {}", change.target);
                return;
            };
            match state.inventory.iter_mut().find(|i| i.id == item.id) {
                Some(existing) => existing.quantity = existing.quantity.saturating_add(item.quantity),
                None => state.inventory.push(item),
            }
        }
        StateOperation::Remove => {
            let amount = match &change.value {
                Value::Null => 1,
                Value::Object(fields) => fields.get("quantity").and_then(Value::as_i64).unwrap_or(1),
                other => to_number(Some(other)) as i64,
            };
            if let Some(index) = state.inventory.iter().position(|i| i.id == change.target) {
                let stack = &mut state.inventory[index];
                stack.quantity = stack.quantity.saturating_sub(amount);
                if stack.quantity <= 0 {
                    state.inventory.remove(index);
                }
            }
        }
        StateOperation::Modify => {
            if let Some(item) = state.inventory.iter_mut().find(|i| i.id == change.target) {
                merge_fields(item, &change.value);
            }
        }
        StateOperation::Set | StateOperation::Unknown => ignore(change),
    }
}

/// The item an inventory add describes: an item object, a bare quantity or nothing.
fn item_from_change(change: &StateChange) -> Option<InventoryItem> {
    match &change.value {
        Value::Object(fields) => {
            let mut fields = fields.clone();
            if !fields.contains_key("id") {
                fields.insert("id".to_string(), Value::String(change.target.clone()));
            }
            serde_json::from_value(Value::Object(fields)).ok()
        }
        Value::Null if !change.target.is_empty() => {
            Some(InventoryItem::new(change.target.clone(), change.target.clone()))
        }
        Value::Number(n) if !change.target.is_empty() => Some(
            InventoryItem::new(change.target.clone(), change.target.clone())
                .with_quantity(n.as_f64().unwrap_or(1.0) as i64),
        ),
        _ => None,
    }
}

fn apply_party(state: &mut AdventureState, change: &StateChange) {
    let index = if change.target.is_empty() {
        (!state.party.is_empty()).then_some(0)
    } else {
        state.party.iter().position(|m| m.id == change.target)
    };

    let Some(index) = index else {
        // A whole member object adds a new member.
        if change.operation == StateOperation::Add {
            match serde_json::from_value::<PartyMember>(change.value.clone()) {
                Ok(member) => state.party.push(member),
                Err(_) => tracing::warn!("No party member {}", change.target),
            }
        }
        return;
    };
    let member = &mut state.party[index];

    match change.operation {
        StateOperation::Set | StateOperation::Modify => merge_fields(member, &change.value),
        StateOperation::Add => {
            if let Some(experience) = change.value.get("experience") {
                grant_experience(member, to_number(Some(experience)) as i64);
            }
            if let Some(Value::Object(stats)) = change.value.get("stats") {
                for (attribute, delta) in stats {
                    let score = member.attributes.entry(attribute.clone()).or_insert(0);
                    *score = score.saturating_add(to_number(Some(delta)) as i64);
                }
            }
            if let Some(hp) = change.value.get("hp") {
                let hp = member.current_hp.saturating_add(to_number(Some(hp)) as i64);
                member.current_hp = hp.min(member.max_hp).max(0);
            }
            if let Some(Value::String(condition)) = change.value.get("condition") {
                if !member.has_condition(condition) {
                    member.conditions.push(condition.clone());
                }
            }
        }
        StateOperation::Remove => match change.value.get("condition") {
            Some(Value::String(condition)) => member.conditions.retain(|c| c != condition),
            _ => {
                state.party.remove(index);
            }
        },
        StateOperation::Unknown => ignore(change),
    }
}

fn apply_flag(state: &mut AdventureState, change: &StateChange) {
    match change.operation {
        StateOperation::Set => {
            state
                .flags
                .insert(change.target.clone(), is_truthy(&change.value));
        }
        StateOperation::Remove => {
            state.flags.remove(&change.target);
        }
        StateOperation::Add | StateOperation::Modify | StateOperation::Unknown => ignore(change),
    }
}

fn ignore(change: &StateChange) {
    tracing::debug!(
        "Ignoring unsupported {:?} operation on {:?} {}",
        change.operation,
        change.domain,
        change.target
    );
}

/// Shallow-merge the fields of `fields` into `target`. Leaves `target`
/// untouched when the merge would not produce a valid value.
fn merge_fields<T: Serialize + DeserializeOwned>(target: &mut T, fields: &Value) {
    let Value::Object(fields) = fields else {
        return;
    };
    let Ok(Value::Object(mut current)) = serde_json::to_value(&*target) else {
        return;
    };
    for (key, value) in fields {
        current.insert(key.clone(), value.clone());
    }
    match serde_json::from_value(Value::Object(current)) {
        Ok(merged) => *target = merged,
        Err(e) => tracing::warn!("Ignoring merge that produced an invalid value: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adventure_model::{ConditionalExpression, NodeId};

    fn state() -> AdventureState {
        AdventureState::new(NodeId::new("start"))
            .with_party_member(PartyMember::new("hero", "Aria").with_attribute("strength", 2))
    }

    fn change(domain: StateDomain, target: &str, operation: StateOperation, value: Value) -> StateChange {
        StateChange::new(domain, target, operation, value)
    }

    #[test]
    fn test_variable_operations() {
        let changes = vec![
            change(StateDomain::Variable, "gold", StateOperation::Add, json!(5)),
            change(StateDomain::Variable, "gold", StateOperation::Add, json!("2.5")),
            change(StateDomain::Variable, "mood", StateOperation::Modify, json!("grim")),
            change(StateDomain::Variable, "name", StateOperation::Set, json!("Aria")),
            change(StateDomain::Variable, "name", StateOperation::Modify, json!("Bryn")),
        ];
        let next = apply_state_changes(&changes, &state());

        assert_eq!(next.variables["gold"], json!(7.5));
        assert!(!next.variables.contains_key("mood"));
        assert_eq!(next.variables["name"], json!("Bryn"));

        let removed = apply_state_changes(
            &[change(StateDomain::Variable, "name", StateOperation::Remove, Value::Null)],
            &next,
        );
        assert!(!removed.variables.contains_key("name"));
    }

    #[test]
    fn test_input_state_is_untouched() {
        let original = state();
        let _ = apply_state_changes(&[StateChange::set_flag("lit", true)], &original);
        assert!(original.flags.is_empty());
    }

    #[test]
    fn test_inventory_add_merges_stacks() {
        let rope = json!({ "id": "rope", "quantity": 1 });
        let add = change(StateDomain::Inventory, "rope", StateOperation::Add, rope);
        let next = apply_state_changes(&[add.clone(), add], &state());

        assert_eq!(next.inventory.len(), 1);
        assert_eq!(next.inventory[0].id, "rope");
        assert_eq!(next.inventory[0].quantity, 2);
    }

    #[test]
    fn test_inventory_add_saturates_quantity() {
        let gem = json!({ "id": "gem", "quantity": i64::MAX });
        let add = change(StateDomain::Inventory, "gem", StateOperation::Add, gem);
        let next = apply_state_changes(&[add.clone(), add], &state());

        assert_eq!(next.inventory.len(), 1);
        assert_eq!(next.item("gem").unwrap().quantity, i64::MAX);

        let next = apply_state_changes(
            &[change(StateDomain::Inventory, "gem", StateOperation::Remove, json!(-1e19))],
            &next,
        );
        assert_eq!(next.item("gem").unwrap().quantity, i64::MAX);
    }

    #[test]
    fn test_inventory_remove_drops_empty_stacks() {
        let start = state().with_item(InventoryItem::new("torch", "Torch").with_quantity(3));

        let next = apply_state_changes(
            &[change(StateDomain::Inventory, "torch", StateOperation::Remove, json!(2))],
            &start,
        );
        assert_eq!(next.item("torch").unwrap().quantity, 1);

        let next = apply_state_changes(
            &[change(StateDomain::Inventory, "torch", StateOperation::Remove, json!(5))],
            &next,
        );
        assert!(next.item("torch").is_none());
    }

    #[test]
    fn test_inventory_modify_merges_fields() {
        let start = state().with_item(InventoryItem::new("lamp", "Lamp"));
        let next = apply_state_changes(
            &[change(
                StateDomain::Inventory,
                "lamp",
                StateOperation::Modify,
                json!({ "name": "Lit Lamp", "lit": true }),
            )],
            &start,
        );

        let lamp = next.item("lamp").unwrap();
        assert_eq!(lamp.name, "Lit Lamp");
        assert_eq!(lamp.quantity, 1);
        assert_eq!(lamp.properties.get("lit"), Some(&json!(true)));
    }

    #[test]
    fn test_level_up_arithmetic() {
        let next = apply_state_changes(
            &[change(StateDomain::Party, "hero", StateOperation::Add, json!({ "experience": 250 }))],
            &state(),
        );

        let hero = next.party_member("hero").unwrap();
        assert_eq!(hero.experience, 250);
        assert_eq!(hero.level, 3);
        assert_eq!(hero.max_hp, 20);
        assert_eq!(hero.current_hp, hero.max_hp);
    }

    #[test]
    fn test_huge_experience_saturates() {
        let add = change(StateDomain::Party, "hero", StateOperation::Add, json!({ "experience": 1e19 }));
        let next = apply_state_changes(&[add.clone(), add], &state());

        let hero = next.party_member("hero").unwrap();
        assert_eq!(hero.experience, i64::MAX);
        assert_eq!(hero.level, i64::MAX / EXPERIENCE_PER_LEVEL + 1);
        assert_eq!(hero.max_hp, i64::MAX);
        assert_eq!(hero.current_hp, hero.max_hp);
    }

    #[test]
    fn test_huge_stat_and_hp_deltas_saturate() {
        let changes = vec![
            change(StateDomain::Party, "hero", StateOperation::Add, json!({ "stats": { "strength": 1e19 } })),
            change(StateDomain::Party, "hero", StateOperation::Add, json!({ "stats": { "strength": 1e19 } })),
            change(StateDomain::Party, "hero", StateOperation::Add, json!({ "hp": -1e19 })),
            change(StateDomain::Party, "hero", StateOperation::Add, json!({ "hp": -1e19 })),
        ];
        let next = apply_state_changes(&changes, &state());

        let hero = next.party_member("hero").unwrap();
        assert_eq!(hero.attribute("strength"), i64::MAX);
        assert_eq!(hero.current_hp, 0);
    }

    #[test]
    fn test_experience_without_level_up_keeps_hp() {
        let mut start = state();
        start.party[0].current_hp = 4;
        let next = apply_state_changes(
            &[change(StateDomain::Party, "hero", StateOperation::Add, json!({ "experience": 50 }))],
            &start,
        );

        let hero = next.party_member("hero").unwrap();
        assert_eq!(hero.level, 1);
        assert_eq!(hero.current_hp, 4);
        assert_eq!(hero.max_hp, 10);
    }

    #[test]
    fn test_party_stats_and_merge() {
        let changes = vec![
            change(
                StateDomain::Party,
                "hero",
                StateOperation::Add,
                json!({ "stats": { "strength": 1, "wisdom": 2 } }),
            ),
            change(StateDomain::Party, "hero", StateOperation::Modify, json!({ "name": "Aria the Bold" })),
            change(StateDomain::Party, "hero", StateOperation::Add, json!({ "hp": -30 })),
        ];
        let next = apply_state_changes(&changes, &state());

        let hero = next.party_member("hero").unwrap();
        assert_eq!(hero.attribute("strength"), 3);
        assert_eq!(hero.attribute("wisdom"), 2);
        assert_eq!(hero.name, "Aria the Bold");
        assert_eq!(hero.current_hp, 0);
    }

    #[test]
    fn test_invalid_party_merge_is_ignored() {
        let next = apply_state_changes(
            &[change(StateDomain::Party, "hero", StateOperation::Set, json!({ "level": "high" }))],
            &state(),
        );
        assert_eq!(next.party_member("hero").unwrap().level, 1);
    }

    #[test]
    fn test_flags() {
        let changes = vec![
            change(StateDomain::Flag, "lit", StateOperation::Set, json!(1)),
            change(StateDomain::Flag, "open", StateOperation::Set, json!("")),
            change(StateDomain::Flag, "gone", StateOperation::Set, json!(true)),
            change(StateDomain::Flag, "gone", StateOperation::Remove, Value::Null),
        ];
        let next = apply_state_changes(&changes, &state());

        assert_eq!(next.flags.get("lit"), Some(&true));
        assert_eq!(next.flags.get("open"), Some(&false));
        assert!(!next.flags.contains_key("gone"));
    }

    #[test]
    fn test_guards_see_earlier_changes() {
        let changes = vec![
            StateChange::set_flag("hasKey", true),
            StateChange::set_variable("door", json!("open"))
                .with_condition(ConditionalExpression::exists("flags.hasKey")),
            StateChange::set_variable("alarm", json!(true))
                .with_condition(ConditionalExpression::exists("flags.guardAwake")),
        ];
        let next = apply_state_changes(&changes, &state());

        assert_eq!(next.variables["door"], json!("open"));
        assert!(!next.variables.contains_key("alarm"));
    }

    #[test]
    fn test_unknown_operations_are_noops() {
        let changes = vec![
            change(StateDomain::Flag, "lit", StateOperation::Unknown, json!(true)),
            change(StateDomain::Unknown, "lit", StateOperation::Set, json!(true)),
        ];
        let next = apply_state_changes(&changes, &state());
        assert_eq!(next, state());
    }

    #[test]
    fn test_rewards_to_state_changes() {
        let rewards = vec![
            Reward::Experience { amount: 30, target: None },
            Reward::Experience {
                amount: 10,
                target: Some("sidekick".to_string()),
            },
            Reward::Item {
                item: InventoryItem::new("coin", "Coin").with_quantity(3),
            },
        ];
        let changes = rewards_to_state_changes(&rewards, &state());

        assert_eq!(changes.len(), 3);
        assert_eq!(changes[0].target, "hero");
        assert_eq!(changes[1].target, "sidekick");
        assert_eq!(changes[2].domain, StateDomain::Inventory);

        let next = apply_state_changes(&changes, &state());
        assert_eq!(next.party_member("hero").unwrap().experience, 30);
        assert_eq!(next.item("coin").unwrap().quantity, 3);
    }
}
