//! Jot: a local, single-user version-control core.
//!
//! - [`areas`]: the object database, staging area, refs, and workspace
//! - [`artifacts`]: domain types and algorithms (objects, merge, status)
//! - [`commands`]: one `impl Repository` block per user-facing command

pub mod areas;
pub mod artifacts;
pub mod commands;
pub mod config;
