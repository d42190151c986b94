use crate::areas::repository::Repository;
use crate::artifacts::status::status_info::Status;

impl Repository {
    pub fn status(&self) -> anyhow::Result<()> {
        let status = Status::new(self).initialize()?;

        for (title, paths) in [
            ("changed files:", &status.changed),
            ("new files:", &status.new),
            ("deleted files:", &status.deleted),
        ] {
            if paths.is_empty() {
                continue;
            }

            writeln!(self.writer(), "{title}")?;
            for path in paths {
                writeln!(self.writer(), "    {path}")?;
            }
        }

        Ok(())
    }
}
