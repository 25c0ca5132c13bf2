//! # Adventure Model
//!
//! The data half of the adventure runtime: the authored graph (nodes, ports,
//! connections), the conditional expressions and state changes attached to it,
//! and the play state threaded through a playthrough.
//!
//! This crate holds no evaluation logic. Everything here is plain data with
//! lookups and constructors; `adventure_runtime` operates on it.

pub mod document;
pub mod error;
pub mod graph;
pub mod mechanics;
pub mod state;

pub use document::*;
pub use error::*;
pub use graph::*;
pub use mechanics::*;
pub use state::*;
