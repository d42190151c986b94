//! Annotated tag object
//!
//! ```text
//! object <target-sha>
//! type <target-type>
//! tag <name>
//! tagger <name> <email> <timestamp> <timezone>
//!
//! <tag message>
//! ```

use crate::artifacts::objects::commit::parse_oid_field;
use crate::artifacts::objects::kvlm::Kvlm;
use crate::artifacts::objects::object::{Object, Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::{Error, Result};
use bytes::Bytes;
use derive_new::new;

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct Tag {
    kvlm: Kvlm,
}

impl Tag {
    /// Build an annotated tag pointing at `target`
    pub fn annotate(
        target: &ObjectId,
        target_type: ObjectType,
        name: &str,
        tagger: &str,
        message: &str,
    ) -> Self {
        let kvlm = Kvlm::new(message.to_string())
            .with("object", target.to_string())
            .with("type", target_type.as_str())
            .with("tag", name.to_string())
            .with("tagger", tagger.to_string());

        Self::new(kvlm)
    }

    pub fn kvlm(&self) -> &Kvlm {
        &self.kvlm
    }

    /// The tagged object
    pub fn object(&self) -> Result<ObjectId> {
        let object = self
            .kvlm
            .first(b"object")
            .ok_or_else(|| Error::CorruptObject("tag without object header".into()))?;

        parse_oid_field(object)
    }

    pub fn target_type(&self) -> Result<ObjectType> {
        let target_type = self
            .kvlm
            .first(b"type")
            .ok_or_else(|| Error::CorruptObject("tag without type header".into()))?;

        ObjectType::try_from(String::from_utf8_lossy(target_type).as_ref())
    }

    pub fn name(&self) -> Option<String> {
        self.kvlm
            .first(b"tag")
            .map(|name| String::from_utf8_lossy(name).into_owned())
    }
}

impl Packable for Tag {
    fn serialize(&self) -> Result<Bytes> {
        Ok(self.kvlm.serialize())
    }
}

impl Unpackable for Tag {
    fn deserialize(payload: Bytes) -> Result<Self> {
        Ok(Self::new(Kvlm::parse(&payload)?))
    }
}

impl Object for Tag {
    fn object_type(&self) -> ObjectType {
        ObjectType::Tag
    }

    fn display(&self) -> String {
        self.kvlm.display()
    }
}
