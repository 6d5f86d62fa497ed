//! Pure domain types and helpers shared by every Forkcast crate.
//!
//! This crate has zero internal dependencies so the store, pipeline, and
//! API layers can all build on it without cycles.

pub mod error;
pub mod format;
pub mod job;
pub mod recipe;
pub mod sources;
pub mod types;
