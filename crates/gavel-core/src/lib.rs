//! gavel-core — Evaluation orchestration engine.
//!
//! This crate defines the data model, the assignment resolver, the batch
//! executor, and the aggregation logic the rest of the gavel system builds
//! on. External collaborators (entity store, evaluation store, judging
//! capability) are injected through the traits in [`traits`].

pub mod aggregate;
pub mod error;
pub mod executor;
pub mod model;
pub mod resolver;
pub mod store;
pub mod traits;
