//! Logical failure taxonomy
//!
//! Every way a command can refuse to run maps to exactly one variant here,
//! and every variant renders as the exact one-line report the command
//! prints. Logical failures go to stdout and exit 0; only environmental
//! failures (I/O, corrupt store) propagate as plain `anyhow` errors and
//! exit non-zero.
//!
//! Commands return `anyhow::Result`; the binary downcasts to [`JotError`]
//! at the top level to tell the two apart.

use thiserror::Error;

/// Describes every logical failure a repository operation can report.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JotError {
    // usage errors
    #[error("Please enter a commit message.")]
    EmptyCommitMessage,

    // repository state errors
    #[error("A Jot version-control system already exists in the current directory.")]
    AlreadyInitialized,
    #[error("Not in an initialized Jot directory.")]
    NotInitialized,
    #[error("You have uncommitted changes.")]
    UncommittedChanges,
    #[error("Cannot merge a branch with itself.")]
    MergeWithSelf,
    #[error("No need to checkout the current branch.")]
    CheckoutCurrentBranch,
    #[error("Cannot remove the current branch.")]
    RemoveCurrentBranch,

    // not-found errors
    #[error("File does not exist.")]
    FileNotFound,
    #[error("No commit with that id exists.")]
    CommitNotFound,
    #[error("File does not exist in that commit.")]
    FileNotInCommit,
    #[error("No such branch exists.")]
    BranchNotFound,
    #[error("A branch with that name does not exist.")]
    BranchNameNotFound,
    #[error("Found no commit with that message.")]
    NoCommitWithMessage,

    // duplicate errors
    #[error("A branch with that name already exists.")]
    BranchAlreadyExists,

    // unsafe overwrite errors
    #[error("There is an untracked file in the way; delete it, or add and commit it first.")]
    UntrackedFileInTheWay,

    // nothing-to-do errors
    #[error("No changes added to the commit.")]
    NothingStaged,
    #[error("No reason to remove the file.")]
    NoReasonToRemove,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variants_render_their_report_lines() {
        pretty_assertions::assert_eq!(
            JotError::UntrackedFileInTheWay.to_string(),
            "There is an untracked file in the way; delete it, or add and commit it first."
        );
        pretty_assertions::assert_eq!(
            JotError::NothingStaged.to_string(),
            "No changes added to the commit."
        );
        pretty_assertions::assert_eq!(
            JotError::CommitNotFound.to_string(),
            "No commit with that id exists."
        );
    }
}
