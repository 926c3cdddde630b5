use crate::areas::repository::Repository;
use crate::artifacts::errors::JotError;

impl Repository {
    /// Unstage a pending addition and, for files tracked by HEAD, stage a
    /// removal and delete the working file.
    pub fn rm(&mut self, name: &str) -> anyhow::Result<()> {
        let head = self.head_commit()?;

        let mut stage = self.lock_stage()?;
        stage.rehydrate()?;

        let staged = stage.is_staged_for_addition(name);
        let tracked = head.tracks(name);

        if !staged && !tracked {
            anyhow::bail!(JotError::NoReasonToRemove);
        }

        if staged {
            stage.unstage(name);
        }

        if tracked {
            stage.stage_removal(name);
            self.workspace().delete_file(name)?;
        }

        stage.write_updates()?;

        Ok(())
    }
}
