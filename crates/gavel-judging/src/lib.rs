//! gavel-judging — Judging capability implementations.
//!
//! The engine treats "apply judge to submission, obtain verdict" as a single
//! opaque asynchronous operation behind
//! [`gavel_core::traits::JudgingCapability`]. This crate provides the two
//! concrete capabilities: an HTTP client for a remote judging service and a
//! scripted in-process capability for tests and offline runs.

pub mod http;
pub mod script;

pub use http::{HttpJudgeClient, JudgingConfig};
pub use script::ScriptedJudge;
