//! Outcome & State-Mutation Engine.
//!
//! Resolves the interaction offered by a node into an [`ActionResult`], and
//! folds action records into new state snapshots.
//!
//! # Resolution
//!
//! - **challenge**: d6 + the lead member's attribute against the difficulty
//! - **check**: the node's condition, or a coin flip when it has none
//! - **combat**: party strength+dexterity + d6 against the enemies' total
//! - **decision**: the chosen option's effects
//! - **story**: the node's effects, rewards and experience

mod dice;
mod mutation;

pub use dice::*;
pub use mutation::*;

use adventure_model::{
    ActionKind, ActionRecord, ActionResult, AdventureGraph, AdventureState, ChallengeProperties,
    CheckProperties, ChoiceId, CombatProperties, DecisionProperties, Node, NodeId, NodeProperties,
    NodeType, OutcomeBranch, OutcomeKind, Reward, StoryProperties,
};

use crate::error::{Result, RuntimeError};
use crate::expression::evaluate;
use crate::transition::validate_transition;

/// Choice id that makes a combat node resolve through its flee branch.
pub const FLEE_CHOICE: &str = "flee";

/// Action kind recorded when a node of the given type is resolved.
pub fn action_kind_for(node_type: NodeType) -> ActionKind {
    match node_type {
        NodeType::Story => ActionKind::Continue,
        NodeType::Decision => ActionKind::Choice,
        NodeType::Challenge => ActionKind::Challenge,
        NodeType::Combat => ActionKind::Combat,
        NodeType::Check => ActionKind::Check,
    }
}

/// Fold an action into a state.
///
/// The action is appended to the history, its node is marked visited, and
/// the result's state changes followed by its rewards are applied.
pub fn execute_action(action: &ActionRecord, state: &AdventureState) -> AdventureState {
    let mut next = state.clone();
    next.action_history.push(action.clone());
    next.visited_nodes.insert(action.node_id.clone());

    match &action.result {
        Some(result) => {
            let mut changes = result.state_changes.clone();
            changes.extend(rewards_to_state_changes(&result.rewards, &next));
            apply_state_changes(&changes, &next)
        }
        None => next,
    }
}

/// Resolves node interactions with an injectable dice source.
///
/// The engine holds no graph or state; both are passed to every call.
pub struct AdventureEngine<D: DiceRoller = SeededDice> {
    dice: D,
}

impl AdventureEngine<SeededDice> {
    /// Create an engine with unpredictable dice.
    pub fn new() -> Self {
        Self::with_dice(SeededDice::from_entropy())
    }

    /// Create an engine whose rolls replay for the same seed.
    pub fn seeded(seed: u64) -> Self {
        Self::with_dice(SeededDice::from_seed(seed))
    }
}

impl Default for AdventureEngine<SeededDice> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: DiceRoller> AdventureEngine<D> {
    pub fn with_dice(dice: D) -> Self {
        Self { dice }
    }

    /// Work out what happens when the player acts on `node_id`.
    ///
    /// `choice` selects a decision option, or `"flee"` on a combat node.
    /// The state is only read; apply the result with [`execute_action`].
    pub fn calculate_outcome(
        &mut self,
        graph: &AdventureGraph,
        node_id: &NodeId,
        choice: Option<&str>,
        state: &AdventureState,
    ) -> Result<ActionResult> {
        let node = graph
            .node(node_id)
            .ok_or_else(|| RuntimeError::NodeNotFound(node_id.clone()))?;

        let result = match &node.properties {
            NodeProperties::Challenge(props) => self.resolve_challenge(props, state),
            NodeProperties::Check(props) => self.resolve_check(props, state),
            NodeProperties::Combat(props) => self.resolve_combat(props, choice, state),
            NodeProperties::Decision(props) => resolve_decision(node, props, choice, state)?,
            NodeProperties::Story(props) => resolve_story(props),
        };

        tracing::debug!(
            "Resolved {} node {}: success={}",
            node.node_type(),
            node_id,
            result.success
        );
        Ok(result)
    }

    /// Calculate the outcome of acting on a node and execute it in one step.
    pub fn resolve(
        &mut self,
        graph: &AdventureGraph,
        node_id: &NodeId,
        choice: Option<&str>,
        state: &AdventureState,
    ) -> Result<(ActionResult, AdventureState)> {
        let result = self.calculate_outcome(graph, node_id, choice, state)?;
        let node_type = graph
            .node(node_id)
            .map(Node::node_type)
            .ok_or_else(|| RuntimeError::NodeNotFound(node_id.clone()))?;

        let mut record = ActionRecord::new(node_id.clone(), action_kind_for(node_type))
            .with_result(result.clone());
        if let Some(choice) = choice {
            record = record.with_choice(choice);
        }

        let next = execute_action(&record, state);
        Ok((result, next))
    }

    /// Move play to `to` if the transition from the current node is allowed.
    ///
    /// Returns the new state and whether the move happened.
    pub fn advance(
        &self,
        graph: &AdventureGraph,
        state: &AdventureState,
        to: &NodeId,
    ) -> (AdventureState, bool) {
        if !validate_transition(graph, &state.current_node_id, to, state) {
            tracing::debug!("Transition {} -> {} is not available", state.current_node_id, to);
            return (state.clone(), false);
        }
        let mut next = state.clone();
        next.current_node_id = to.clone();
        (next, true)
    }

    fn resolve_challenge(&mut self, props: &ChallengeProperties, state: &AdventureState) -> ActionResult {
        let score = match (&props.attribute, state.lead_member()) {
            (Some(attribute), Some(member)) => member.attribute(attribute),
            _ => 0,
        };
        let roll = self.dice.d6() as i64;
        let total = roll.saturating_add(score);
        let success = total >= props.difficulty;

        let kind = if success {
            OutcomeKind::Success
        } else {
            OutcomeKind::Failure
        };
        let fallback = if success {
            "You succeed."
        } else {
            "You fail."
        };
        let mut result = branch_result(success, props.outcome(kind), fallback);
        result.consequences.push(format!(
            "Rolled {} + {} = {} against difficulty {}",
            roll, score, total, props.difficulty
        ));
        result
    }

    fn resolve_check(&mut self, props: &CheckProperties, state: &AdventureState) -> ActionResult {
        let passed = match &props.condition {
            Some(condition) => evaluate(condition, state),
            None => self.dice.coin_flip(),
        };
        if passed {
            branch_result(true, Some(&props.pass), "The check passes.")
        } else {
            branch_result(false, Some(&props.fail), "The check fails.")
        }
    }

    fn resolve_combat(
        &mut self,
        props: &CombatProperties,
        choice: Option<&str>,
        state: &AdventureState,
    ) -> ActionResult {
        if choice == Some(FLEE_CHOICE) {
            if let Some(flee) = &props.flee {
                return branch_result(false, Some(flee), "You flee the fight.");
            }
        }

        let party: i64 = state
            .party
            .iter()
            .map(|m| m.attribute("strength").saturating_add(m.attribute("dexterity")))
            .fold(0, i64::saturating_add);
        let roll = self.dice.d6() as i64;
        let party_total = party.saturating_add(roll);
        let enemy_total = props
            .enemies
            .iter()
            .map(|c| c.combat_score())
            .fold(0, i64::saturating_add);
        let success = party_total > enemy_total;

        let mut result = if success {
            branch_result(true, Some(&props.victory), "The enemies are defeated.")
        } else {
            branch_result(false, Some(&props.defeat), "The party is overwhelmed.")
        };
        result.consequences.push(format!(
            "Party {} (rolled {}) against enemies {}",
            party_total, roll, enemy_total
        ));
        result
    }
}

fn resolve_decision(
    node: &Node,
    props: &DecisionProperties,
    choice: Option<&str>,
    state: &AdventureState,
) -> Result<ActionResult> {
    let choice = choice.ok_or_else(|| RuntimeError::ChoiceRequired {
        node: node.id.clone(),
    })?;
    let option = props
        .choices
        .iter()
        .find(|option| option.id.as_str() == choice)
        .ok_or_else(|| RuntimeError::UnknownChoice {
            node: node.id.clone(),
            choice: ChoiceId::new(choice),
        })?;

    if let Some(condition) = &option.condition {
        if !evaluate(condition, state) {
            return Err(RuntimeError::ChoiceUnavailable {
                node: node.id.clone(),
                choice: option.id.clone(),
            });
        }
    }

    Ok(ActionResult {
        success: true,
        consequences: vec![format!("Chose: {}", option.text)],
        state_changes: option.effects.clone(),
        rewards: Vec::new(),
    })
}

fn resolve_story(props: &StoryProperties) -> ActionResult {
    let mut rewards = props.rewards.clone();
    if props.experience > 0 {
        rewards.push(Reward::Experience {
            amount: props.experience,
            target: None,
        });
    }
    ActionResult {
        success: true,
        consequences: Vec::new(),
        state_changes: props.effects.clone(),
        rewards,
    }
}

fn branch_result(success: bool, branch: Option<&OutcomeBranch>, fallback: &str) -> ActionResult {
    let description = branch
        .map(|b| b.description.trim())
        .filter(|d| !d.is_empty())
        .unwrap_or(fallback);
    ActionResult {
        success,
        consequences: vec![description.to_string()],
        state_changes: branch.map(|b| b.effects.clone()).unwrap_or_default(),
        rewards: branch.map(|b| b.rewards.clone()).unwrap_or_default(),
    }
}
