use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tag::Tag;
use crate::artifacts::objects::tree::Tree;
use crate::errors::Result;
use bytes::Bytes;

/// Serialize an object into its payload (without the `<type> <size>\0` header)
pub trait Packable {
    fn serialize(&self) -> Result<Bytes>;
}

/// Rebuild an object from its payload
pub trait Unpackable {
    fn deserialize(payload: Bytes) -> Result<Self>
    where
        Self: Sized;
}

pub trait Object: Packable {
    fn object_type(&self) -> ObjectType;

    fn display(&self) -> String;

    /// Canonical form that gets hashed and stored: header followed by payload
    fn framed(&self) -> Result<Bytes> {
        Ok(frame(self.object_type(), &self.serialize()?))
    }

    fn object_id(&self) -> Result<ObjectId> {
        Ok(ObjectId::digest(&self.framed()?))
    }
}

/// Prepend the `<type> <size>\0` header to a payload
pub fn frame(object_type: ObjectType, payload: &[u8]) -> Bytes {
    let header = format!("{} {}\0", object_type.as_str(), payload.len());

    let mut content = Vec::with_capacity(header.len() + payload.len());
    content.extend_from_slice(header.as_bytes());
    content.extend_from_slice(payload);

    Bytes::from(content)
}

/// Any object read back from the database
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectBox {
    Blob(Box<Blob>),
    Tree(Box<Tree>),
    Commit(Box<Commit>),
    Tag(Box<Tag>),
}

impl ObjectBox {
    /// Dispatch a payload to the codec of its kind
    pub fn parse(object_type: ObjectType, payload: Bytes) -> Result<Self> {
        Ok(match object_type {
            ObjectType::Blob => ObjectBox::Blob(Box::new(Blob::deserialize(payload)?)),
            ObjectType::Tree => ObjectBox::Tree(Box::new(Tree::deserialize(payload)?)),
            ObjectType::Commit => ObjectBox::Commit(Box::new(Commit::deserialize(payload)?)),
            ObjectType::Tag => ObjectBox::Tag(Box::new(Tag::deserialize(payload)?)),
        })
    }
}

impl Packable for ObjectBox {
    fn serialize(&self) -> Result<Bytes> {
        match self {
            ObjectBox::Blob(blob) => blob.serialize(),
            ObjectBox::Tree(tree) => tree.serialize(),
            ObjectBox::Commit(commit) => commit.serialize(),
            ObjectBox::Tag(tag) => tag.serialize(),
        }
    }
}

impl Object for ObjectBox {
    fn object_type(&self) -> ObjectType {
        match self {
            ObjectBox::Blob(_) => ObjectType::Blob,
            ObjectBox::Tree(_) => ObjectType::Tree,
            ObjectBox::Commit(_) => ObjectType::Commit,
            ObjectBox::Tag(_) => ObjectType::Tag,
        }
    }

    fn display(&self) -> String {
        match self {
            ObjectBox::Blob(blob) => blob.display(),
            ObjectBox::Tree(tree) => tree.display(),
            ObjectBox::Commit(commit) => commit.display(),
            ObjectBox::Tag(tag) => tag.display(),
        }
    }
}
