//! # Adventure Runtime
//!
//! Behaviour over the `adventure_model` data. Every function here is
//! synchronous and pure over its explicit inputs: the graph snapshot and the
//! play state are passed in on every call and a new state is returned.
//!
//! ## Core Components
//!
//! - **expression**: evaluates conditional expressions against a play state
//! - **outcome**: resolves node interactions and applies guarded state changes
//! - **transition**: decides which connections may exist and which may be taken
//! - **validation**: a rule registry that proves a graph is playable
//!
//! Dice rolls are the only source of non-determinism and go through the
//! injectable [`DiceRoller`] trait.

pub mod config;
pub mod error;
pub mod expression;
pub mod outcome;
pub mod transition;
pub mod traversal;
pub mod validation;

pub use config::*;
pub use error::*;
pub use expression::*;
pub use outcome::*;
pub use transition::*;
pub use validation::*;
