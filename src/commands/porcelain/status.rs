use crate::areas::repository::Repository;
use crate::artifacts::status::StatusReport;
use std::io::Write;

impl Repository {
    pub fn status(&mut self) -> anyhow::Result<()> {
        let report = StatusReport::gather(self)?;
        write!(self.writer(), "{}", report.render())?;

        Ok(())
    }
}
