use crate::areas::repository::Repository;
use crate::artifacts::objects::object::ObjectBox;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use bytes::Bytes;
use std::path::Path;

impl Repository {
    /// Print the id `file` would get as an object of `object_type`, storing it with `write`
    ///
    /// The payload is decoded first so malformed trees, commits and tags are refused.
    pub fn hash_object(
        &self,
        file: &Path,
        object_type: ObjectType,
        write: bool,
    ) -> anyhow::Result<()> {
        let payload = std::fs::read(file)
            .with_context(|| format!("unable to read {}", file.display()))?;
        ObjectBox::parse(object_type, Bytes::from(payload.clone()))?;

        let object_id = if write {
            self.database().write(object_type, &payload)?
        } else {
            self.database().hash(object_type, &payload)
        };

        writeln!(self.writer(), "{object_id}")?;

        Ok(())
    }
}
