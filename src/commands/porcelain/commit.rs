use crate::areas::repository::Repository;
use crate::areas::stage::Stage;
use crate::artifacts::errors::JotError;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::config::author_timestamp;

impl Repository {
    /// Record the staged changes as a new commit on the current branch.
    pub fn commit(&mut self, message: &str) -> anyhow::Result<()> {
        if message.is_empty() {
            anyhow::bail!(JotError::EmptyCommitMessage);
        }

        let mut stage = self.lock_stage()?;
        stage.rehydrate()?;

        if stage.is_empty() {
            anyhow::bail!(JotError::NothingStaged);
        }

        let head_id = self.head_commit_id()?;
        self.write_commit(vec![head_id], message.to_string(), &mut stage)?;

        Ok(())
    }

    /// Build the next snapshot from the stage, persist the commit, advance
    /// the current branch head, and clear the stage. Shared by `commit`
    /// and `merge` (which passes two parents).
    pub(crate) fn write_commit(
        &self,
        parents: Vec<ObjectId>,
        message: String,
        stage: &mut Stage,
    ) -> anyhow::Result<ObjectId> {
        let head = self.head_commit()?;
        let snapshot = stage.apply_to(head.snapshot().clone());

        let commit = Commit::new(parents, snapshot, author_timestamp()?, message);
        let commit_id = self.database().store(&commit)?;

        self.refs()
            .update_branch(&self.refs().current_branch()?, &commit_id)?;

        stage.clear();
        stage.write_updates()?;

        Ok(commit_id)
    }
}
