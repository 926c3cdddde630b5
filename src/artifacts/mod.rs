//! Data structures and algorithms
//!
//! This module contains the core domain types and algorithms:
//!
//! - `branch`: Validated branch names
//! - `checkout`: Whole-snapshot working tree transitions
//! - `errors`: The logical failure taxonomy and its report lines
//! - `merge`: Split point search and three-way reconciliation
//! - `objects`: Object types (blob, commit) and their codecs
//! - `stage`: Staging area file format
//! - `status`: Status report assembly

pub mod branch;
pub mod checkout;
pub mod errors;
pub mod merge;
pub mod objects;
pub mod stage;
pub mod status;
