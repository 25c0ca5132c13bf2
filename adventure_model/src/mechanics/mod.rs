//! Adventure mechanics: conditional expressions, state changes and rewards.

mod expression;
mod state_change;

pub use expression::*;
pub use state_change::*;
