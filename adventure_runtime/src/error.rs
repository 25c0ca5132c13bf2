use adventure_model::{ChoiceId, NodeId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuntimeError {
    // Play errors
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("Decision {node} requires a choice")]
    ChoiceRequired { node: NodeId },

    #[error("Decision {node} has no choice {choice}")]
    UnknownChoice { node: NodeId, choice: ChoiceId },

    #[error("Choice {choice} is not available at {node}")]
    ChoiceUnavailable { node: NodeId, choice: ChoiceId },

    // Validation errors
    #[error("Validation rule {rule} failed: {message}")]
    Rule { rule: String, message: String },

    // Config errors
    #[error("Config error: {0}")]
    Config(String),

    #[error("Config file not found: {0}")]
    ConfigNotFound(String),
}

pub type Result<T> = std::result::Result<T, RuntimeError>;
