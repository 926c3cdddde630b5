//! Three-way merge algorithms
//!
//! - `split_point`: heuristic nearest-common-ancestor search over the
//!   commit DAG
//! - `reconcile`: per-file three-way reconciliation policy and conflict
//!   materialization

pub mod reconcile;
pub mod split_point;
