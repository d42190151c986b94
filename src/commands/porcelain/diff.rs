use crate::areas::repository::Repository;
use crate::artifacts::diff::workspace_diff::WorkspaceDiff;
use colored::Colorize;

impl Repository {
    pub fn diff(&self) -> anyhow::Result<()> {
        let diff = WorkspaceDiff::new(self).render()?;

        for line in diff.lines() {
            if line.starts_with("--- ") || line.starts_with("+++ ") {
                writeln!(self.writer(), "{}", line.bold())?;
            } else if line.starts_with("@@") {
                writeln!(self.writer(), "{}", line.cyan())?;
            } else if line.starts_with('-') && !line.chars().all(|c| c == '-') {
                writeln!(self.writer(), "{}", line.red())?;
            } else if line.starts_with('+') {
                writeln!(self.writer(), "{}", line.green())?;
            } else {
                writeln!(self.writer(), "{line}")?;
            }
        }

        Ok(())
    }
}
