use crate::areas::repository::Repository;
use crate::artifacts::errors::JotError;
use std::io::Write;

impl Repository {
    /// Print the id of every commit whose message matches exactly.
    pub fn find(&mut self, message: &str) -> anyhow::Result<()> {
        let mut found = false;

        for (commit_id, commit) in self.database().all_commits()? {
            if commit.message() == message {
                writeln!(self.writer(), "{commit_id}")?;
                found = true;
            }
        }

        if !found {
            anyhow::bail!(JotError::NoCommitWithMessage);
        }

        Ok(())
    }
}
