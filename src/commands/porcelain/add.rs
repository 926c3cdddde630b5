use crate::areas::repository::Repository;
use crate::artifacts::errors::JotError;
use crate::artifacts::objects::blob::Blob;

impl Repository {
    /// Stage a working file for the next commit. The file's content is
    /// stored as a blob immediately, so later edits do not leak into the
    /// staged version.
    pub fn add(&mut self, name: &str) -> anyhow::Result<()> {
        if !self.workspace().file_exists(name) {
            anyhow::bail!(JotError::FileNotFound);
        }

        let content = self.workspace().read_file(name)?;
        let blob_id = self.database().store(&Blob::new(content))?;

        let head = self.head_commit()?;

        let mut stage = self.lock_stage()?;
        stage.rehydrate()?;
        stage.stage_addition(name, blob_id, head.blob_id(name));
        stage.write_updates()?;

        Ok(())
    }
}
