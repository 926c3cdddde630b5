//! User-facing commands
//!
//! - `init`: Create an empty repository
//! - `add` / `rm`: Stage additions and removals
//! - `commit`: Record the staged snapshot
//! - `log` / `global_log` / `find`: History reports
//! - `checkout` / `reset`: Restore files or whole snapshots
//! - `branch` / `rm_branch`: Branch pointer management
//! - `status`: Working tree and stage report
//! - `merge`: Three-way merge of another branch into the current one

pub mod add;
pub mod branch;
pub mod checkout;
pub mod commit;
pub mod find;
pub mod global_log;
pub mod init;
pub mod log;
pub mod merge;
pub mod reset;
pub mod rm;
pub mod rm_branch;
pub mod status;
