use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::checkout::migration::Migration;
use crate::artifacts::errors::JotError;
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;

impl Repository {
    /// `checkout -- <file>`: restore a file from the HEAD snapshot.
    pub fn checkout_file_from_head(&mut self, name: &str) -> anyhow::Result<()> {
        let head_id = self.head_commit_id()?;
        self.restore_file(&head_id, name)
    }

    /// `checkout <commit-id> -- <file>`: restore a file from any commit,
    /// addressed by an unambiguous id prefix.
    pub fn checkout_file_from_commit(&mut self, prefix: &str, name: &str) -> anyhow::Result<()> {
        let commit_id = self.resolve_commit_id(prefix)?;
        self.restore_file(&commit_id, name)
    }

    /// `checkout <branch>`: replace the working tree's tracked contents
    /// with the branch head's snapshot and switch HEAD to the branch. The
    /// stage is cleared; nothing restored here is staged.
    pub fn checkout_branch(&mut self, name: &str) -> anyhow::Result<()> {
        let Ok(branch) = BranchName::try_parse(name.to_string()) else {
            anyhow::bail!(JotError::BranchNotFound);
        };
        if !self.refs().branch_exists(&branch) {
            anyhow::bail!(JotError::BranchNotFound);
        }
        if branch == self.refs().current_branch()? {
            anyhow::bail!(JotError::CheckoutCurrentBranch);
        }

        let target_id = self
            .refs()
            .read_branch(&branch)?
            .with_context(|| format!("branch {branch} has no head commit"))?;
        let target = self.database().load_commit(&target_id)?;
        let head = self.head_commit()?;

        Migration::new(self.workspace(), self.database())
            .checkout(head.snapshot(), target.snapshot())?;

        self.refs().set_current_branch(&branch)?;

        let mut stage = self.lock_stage()?;
        stage.rehydrate()?;
        stage.clear();
        stage.write_updates()?;

        Ok(())
    }

    fn restore_file(&mut self, commit_id: &ObjectId, name: &str) -> anyhow::Result<()> {
        let commit = self.database().load_commit(commit_id)?;

        let Some(blob_id) = commit.blob_id(name) else {
            anyhow::bail!(JotError::FileNotInCommit);
        };

        let blob = self.database().load_blob(blob_id)?;
        self.workspace().write_file(name, blob.content())?;

        Ok(())
    }
}
