use crate::areas::refs::flatten_refs;
use crate::areas::repository::Repository;

impl Repository {
    pub fn show_ref(&self) -> anyhow::Result<()> {
        let refs = self.refs().list()?;

        for (name, oid) in flatten_refs(&refs, "refs") {
            writeln!(self.writer(), "{oid} {name}")?;
        }

        Ok(())
    }
}
