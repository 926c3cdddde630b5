//! Command implementations
//!
//! One file per user-facing command, each an `impl Repository` block that
//! composes the areas and artifacts into one version-control workflow.

pub mod porcelain;
