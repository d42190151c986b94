use crate::areas::refs::flatten_refs;
use crate::areas::repository::Repository;
use crate::artifacts::config::identity::Identity;
use crate::artifacts::objects::tag::Tag;
use crate::artifacts::revision::Revision;
use tracing::debug;

/// How a new tag is recorded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagKind {
    /// A ref pointing straight at the object
    Lightweight,
    /// A tag object carrying a tagger and a message, referenced by the ref
    Annotated { message: String },
}

impl Repository {
    /// List tags, one name per line
    pub fn list_tags(&self) -> anyhow::Result<()> {
        let tags = self.refs().list_at(&self.refs().tags_path())?;

        for (name, _) in flatten_refs(&tags, "") {
            writeln!(self.writer(), "{name}")?;
        }

        Ok(())
    }

    /// Create `refs/tags/<name>` for the object `target` names
    pub fn tag(&self, name: &str, target: &str, kind: TagKind) -> anyhow::Result<()> {
        let revision = Revision::new(self);
        let object_id = revision
            .find_object(target, None, true)?
            .ok_or_else(|| anyhow::anyhow!("{target} does not name an object"))?;

        let ref_target = match kind {
            TagKind::Lightweight => object_id,
            TagKind::Annotated { message } => {
                let tagger = Identity::load(self.config())?;
                let object_type = self.database().object_type(&object_id)?;
                let message = if message.ends_with('\n') {
                    message
                } else {
                    format!("{message}\n")
                };
                let tag = Tag::annotate(&object_id, object_type, name, &tagger.display(), &message);

                self.database().store(&tag)?
            }
        };

        self.refs().create_ref(&format!("tags/{name}"), &ref_target)?;
        debug!(name, target = %ref_target, "created tag");

        Ok(())
    }
}
