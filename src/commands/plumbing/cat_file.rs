use crate::areas::repository::Repository;
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::revision::Revision;

/// What `cat-file` prints about an object
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CatFileMode {
    /// Raw payload, peeled to a blob
    Blob,
    /// Raw payload, peeled to a tree
    Tree,
    /// Raw payload, peeled to a commit
    Commit,
    /// Raw payload of a tag
    Tag,
    /// Object kind
    Type,
    /// Payload size in bytes
    Size,
    /// Human readable rendering
    Pretty,
}

impl CatFileMode {
    fn object_type(self) -> Option<ObjectType> {
        match self {
            CatFileMode::Blob => Some(ObjectType::Blob),
            CatFileMode::Tree => Some(ObjectType::Tree),
            CatFileMode::Commit => Some(ObjectType::Commit),
            CatFileMode::Tag => Some(ObjectType::Tag),
            CatFileMode::Type | CatFileMode::Size | CatFileMode::Pretty => None,
        }
    }
}

impl Repository {
    pub fn cat_file(&self, mode: CatFileMode, name: &str) -> anyhow::Result<()> {
        let revision = Revision::new(self);
        let object_id = match mode.object_type() {
            Some(expected) => revision.find_object_as(name, expected)?,
            None => revision
                .find_object(name, None, false)?
                .ok_or_else(|| anyhow::anyhow!("{name} does not name an object"))?,
        };

        match mode {
            CatFileMode::Type => {
                let object_type = self.database().object_type(&object_id)?;
                writeln!(self.writer(), "{object_type}")?;
            }
            CatFileMode::Size => {
                let (_, payload) = self.database().load(&object_id)?;
                writeln!(self.writer(), "{}", payload.len())?;
            }
            CatFileMode::Pretty => {
                let object = self.database().parse_object(&object_id)?;
                writeln!(self.writer(), "{}", object.display())?;
            }
            _ => {
                let (_, payload) = self.database().load(&object_id)?;
                self.writer().write_all(&payload)?;
            }
        }

        Ok(())
    }
}
