//! gavel-store — JSON-file-backed stores.
//!
//! The upload/validation pipeline (out of scope here) produces snapshot
//! files of submissions and judges; evaluations accumulate in an append-only
//! JSON log. These implementations back the CLI; in-memory equivalents for
//! tests live in `gavel_core::store`.

pub mod json;

pub use json::{JsonEntityStore, JsonEvaluationStore};
