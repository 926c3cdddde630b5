use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::errors::JotError;

impl Repository {
    /// Delete a branch pointer. The commits it pointed at are untouched.
    pub fn rm_branch(&mut self, name: &str) -> anyhow::Result<()> {
        let Ok(branch) = BranchName::try_parse(name.to_string()) else {
            anyhow::bail!(JotError::BranchNameNotFound);
        };
        if !self.refs().branch_exists(&branch) {
            anyhow::bail!(JotError::BranchNameNotFound);
        }
        if branch == self.refs().current_branch()? {
            anyhow::bail!(JotError::RemoveCurrentBranch);
        }

        self.refs().delete_branch(&branch)?;

        Ok(())
    }
}
