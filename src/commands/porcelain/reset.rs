use crate::areas::repository::Repository;
use crate::artifacts::checkout::migration::Migration;

impl Repository {
    /// `reset <commit-id>`: move the current branch head to the addressed
    /// commit and make the working tree match its snapshot. History is not
    /// rewritten; abandoned commits stay reachable through `global-log`.
    pub fn reset(&mut self, prefix: &str) -> anyhow::Result<()> {
        let target_id = self.resolve_commit_id(prefix)?;
        let target = self.database().load_commit(&target_id)?;
        let head = self.head_commit()?;

        Migration::new(self.workspace(), self.database())
            .checkout(head.snapshot(), target.snapshot())?;

        self.refs()
            .update_branch(&self.refs().current_branch()?, &target_id)?;

        let mut stage = self.lock_stage()?;
        stage.rehydrate()?;
        stage.clear();
        stage.write_updates()?;

        Ok(())
    }
}
