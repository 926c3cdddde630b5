use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::errors::JotError;
use crate::artifacts::objects::commit::Commit;
use anyhow::Context;
use std::fs;

impl Repository {
    /// Create the repository layout: state directory, object store, the
    /// root commit, `master` pointing at it, HEAD on `master`, and an
    /// empty stage.
    pub fn init(&mut self) -> anyhow::Result<()> {
        if self.is_initialized() {
            anyhow::bail!(JotError::AlreadyInitialized);
        }

        fs::create_dir_all(self.database().objects_path())
            .context("Failed to create the objects directory")?;
        fs::create_dir_all(self.refs().heads_path())
            .context("Failed to create the refs/heads directory")?;

        let root = Commit::root()?;
        let root_id = self.database().store(&root)?;

        let master = BranchName::default_branch();
        self.refs().create_branch(&master, &root_id)?;
        self.refs()
            .set_current_branch(&master)
            .context("Failed to create the initial HEAD reference")?;

        let mut stage = self.lock_stage()?;
        stage.write_updates()?;

        Ok(())
    }
}
