//! Whole-snapshot working tree transitions
//!
//! Checkout of a branch, reset, and fast-forward merge all replace the
//! tracked contents of the working tree with a target commit's snapshot.
//! The transition is planned first, guarded against clobbering untracked
//! files, and only then applied.

pub mod migration;
