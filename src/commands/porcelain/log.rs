use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use std::io::Write;

impl Repository {
    /// Walk the primary-parent chain from HEAD to the root commit, most
    /// recent first. Merge parents are reported on a `Merge:` line but
    /// never followed.
    pub fn log(&mut self) -> anyhow::Result<()> {
        let mut next = Some(self.head_commit_id()?);

        while let Some(commit_id) = next {
            let commit = self.database().load_commit(&commit_id)?;
            self.write_commit_block(&commit_id, &commit)?;
            next = commit.parent().cloned();
        }

        Ok(())
    }

    /// One log block:
    ///
    /// ```text
    /// ===
    /// commit <id>
    /// Merge: <p1> <p2>        (merge commits only, 7-digit parent ids)
    /// Date: <timestamp>
    /// <message>
    /// <blank line>
    /// ```
    pub(crate) fn write_commit_block(
        &self,
        commit_id: &ObjectId,
        commit: &Commit,
    ) -> anyhow::Result<()> {
        let mut writer = self.writer();

        writeln!(writer, "===")?;
        writeln!(writer, "commit {commit_id}")?;
        if let (Some(parent), Some(merge_parent)) = (commit.parent(), commit.merge_parent()) {
            writeln!(
                writer,
                "Merge: {} {}",
                parent.to_short_oid(),
                merge_parent.to_short_oid()
            )?;
        }
        writeln!(writer, "Date: {}", commit.readable_timestamp())?;
        writeln!(writer, "{}", commit.message())?;
        writeln!(writer)?;

        Ok(())
    }
}
