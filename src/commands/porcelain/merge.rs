use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::checkout::migration::Migration;
use crate::artifacts::errors::JotError;
use crate::artifacts::merge::reconcile::{conflict_content, reconcile, MergeAction};
use crate::artifacts::merge::split_point::SplitPointFinder;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::object_id::ObjectId;
use std::io::Write;

impl Repository {
    /// Three-way merge of the given branch into the current one.
    ///
    /// The split point is the nearest common ancestor of the two heads.
    /// Degenerate shapes short-circuit: when the given head is already an
    /// ancestor nothing happens, and when the current head is the ancestor
    /// the branch fast-forwards without creating a merge commit.
    pub fn merge(&mut self, name: &str) -> anyhow::Result<()> {
        let mut stage = self.lock_stage()?;
        stage.rehydrate()?;
        if !stage.is_empty() {
            anyhow::bail!(JotError::UncommittedChanges);
        }

        let Ok(given_branch) = BranchName::try_parse(name.to_string()) else {
            anyhow::bail!(JotError::BranchNameNotFound);
        };
        if !self.refs().branch_exists(&given_branch) {
            anyhow::bail!(JotError::BranchNameNotFound);
        }

        let current_branch = self.refs().current_branch()?;
        if given_branch == current_branch {
            anyhow::bail!(JotError::MergeWithSelf);
        }

        let current_id = self.head_commit_id()?;
        let given_id = self
            .refs()
            .read_branch(&given_branch)?
            .ok_or_else(|| anyhow::anyhow!("branch {given_branch} has no head commit"))?;

        let current = self.database().load_commit(&current_id)?;
        let given = self.database().load_commit(&given_id)?;

        let migration = Migration::new(self.workspace(), self.database());
        migration.guard_untracked(current.snapshot(), given.snapshot())?;

        let finder =
            SplitPointFinder::new(|oid: &ObjectId| self.database().load_slim_commit(oid));
        let split_id = finder.find(&current_id, &given_id)?;

        if split_id == given_id {
            writeln!(
                self.writer(),
                "Given branch is an ancestor of the current branch."
            )?;
            return Ok(());
        }

        if split_id == current_id {
            migration.apply(current.snapshot(), given.snapshot())?;
            self.refs().update_branch(&current_branch, &given_id)?;
            writeln!(self.writer(), "Current branch fast-forwarded.")?;
            return Ok(());
        }

        let split = self.database().load_commit(&split_id)?;
        let actions = reconcile(split.snapshot(), current.snapshot(), given.snapshot());

        let mut conflicted = false;
        for action in actions {
            match action {
                MergeAction::TakeGiven { name, blob_id } => {
                    let blob = self.database().load_blob(&blob_id)?;
                    self.workspace().write_file(&name, blob.content())?;
                    stage.stage_addition(&name, blob_id, current.blob_id(&name));
                }
                MergeAction::DropCurrent { name } => {
                    self.workspace().delete_file(&name)?;
                    stage.stage_removal(&name);
                }
                MergeAction::Conflict {
                    name,
                    current: current_blob,
                    given: given_blob,
                } => {
                    conflicted = true;
                    let current_content = match &current_blob {
                        Some(oid) => Some(self.database().load_blob(oid)?),
                        None => None,
                    };
                    let given_content = match &given_blob {
                        Some(oid) => Some(self.database().load_blob(oid)?),
                        None => None,
                    };
                    let content = conflict_content(
                        current_content.as_ref().map(Blob::content),
                        given_content.as_ref().map(Blob::content),
                    );

                    self.workspace().write_file(&name, &content)?;
                    let blob_id = self.database().store(&Blob::new(content))?;
                    stage.stage_addition(&name, blob_id, current.blob_id(&name));
                }
            }
        }

        self.write_commit(
            vec![current_id, given_id],
            format!("Merged {given_branch} into {current_branch}."),
            &mut stage,
        )?;

        if conflicted {
            writeln!(self.writer(), "Encountered a merge conflict.")?;
        }

        Ok(())
    }
}
