use crate::areas::repository::Repository;

impl Repository {
    /// List indexed paths, with `stage` also their mode, object id and merge stage
    pub fn ls_files(&self, stage: bool) -> anyhow::Result<()> {
        for entry in self.index().load()? {
            if stage {
                writeln!(
                    self.writer(),
                    "{:o} {} {}\t{}",
                    entry.mode,
                    entry.oid,
                    entry.stage(),
                    entry.path
                )?;
            } else {
                writeln!(self.writer(), "{}", entry.path)?;
            }
        }

        Ok(())
    }
}
