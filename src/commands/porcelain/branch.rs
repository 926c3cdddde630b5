use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::errors::JotError;

impl Repository {
    /// Create a branch pointing at the current head commit. HEAD stays on
    /// the current branch.
    pub fn branch(&mut self, name: &str) -> anyhow::Result<()> {
        let branch = BranchName::try_parse(name.to_string())?;

        if self.refs().branch_exists(&branch) {
            anyhow::bail!(JotError::BranchAlreadyExists);
        }

        let head_id = self.head_commit_id()?;
        self.refs().create_branch(&branch, &head_id)?;

        Ok(())
    }
}
