use crate::areas::repository::Repository;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::revision::Revision;

impl Repository {
    pub fn rev_parse(&self, name: &str, object_type: Option<ObjectType>) -> anyhow::Result<()> {
        let revision = Revision::new(self);
        let object_id = match object_type {
            Some(expected) => revision.find_object_as(name, expected)?,
            None => revision
                .find_object(name, None, true)?
                .ok_or_else(|| anyhow::anyhow!("{name} does not name an object"))?,
        };

        writeln!(self.writer(), "{object_id}")?;

        Ok(())
    }
}
