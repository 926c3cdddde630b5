use crate::areas::repository::Repository;

impl Repository {
    /// Print every commit in the object store, in no particular order.
    pub fn global_log(&mut self) -> anyhow::Result<()> {
        for (commit_id, commit) in self.database().all_commits()? {
            self.write_commit_block(&commit_id, &commit)?;
        }

        Ok(())
    }
}
