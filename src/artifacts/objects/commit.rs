//! Commit object
//!
//! Commits are snapshots of the repository at a point in time. They contain:
//! - A tree object ID (directory snapshot)
//! - Parent commit ID(s) (for history)
//! - Author and committer information
//! - Commit message
//!
//! ## Format
//!
//! On disk:
//! ```text
//! commit <size>\0
//! tree <tree-sha>
//! parent <parent-sha>
//! author <name> <email> <timestamp> <timezone>
//! committer <name> <email> <timestamp> <timezone>
//!
//! <commit message>
//! ```
//!
//! Fields are kept as a [`Kvlm`], so headers this crate does not interpret
//! (`gpgsig`, `encoding`, `mergetag`, ...) survive a read/write cycle.

use crate::artifacts::objects::kvlm::Kvlm;
use crate::artifacts::objects::object::{Object, Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::{Error, Result};
use bytes::Bytes;
use derive_new::new;

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct Commit {
    kvlm: Kvlm,
}

impl Commit {
    pub fn kvlm(&self) -> &Kvlm {
        &self.kvlm
    }

    /// The tree this commit snapshots
    pub fn tree(&self) -> Result<ObjectId> {
        let tree = self
            .kvlm
            .first(b"tree")
            .ok_or_else(|| Error::CorruptObject("commit without tree header".into()))?;

        parse_oid_field(tree)
    }

    /// Parent commits, empty for a root commit
    pub fn parents(&self) -> Result<Vec<ObjectId>> {
        self.kvlm
            .get(b"parent")
            .unwrap_or_default()
            .iter()
            .map(|parent| parse_oid_field(parent))
            .collect()
    }

    pub fn message(&self) -> &Bytes {
        self.kvlm.message()
    }

    /// First line of the message
    pub fn short_message(&self) -> String {
        String::from_utf8_lossy(self.message())
            .lines()
            .next()
            .unwrap_or("")
            .to_string()
    }
}

/// Decode a hex object id stored as a KVLM value
pub(crate) fn parse_oid_field(value: &Bytes) -> Result<ObjectId> {
    let hex = std::str::from_utf8(value)
        .map_err(|_| Error::InvalidObjectId(String::from_utf8_lossy(value).into_owned()))?;

    ObjectId::try_parse(hex)
}

impl Packable for Commit {
    fn serialize(&self) -> Result<Bytes> {
        Ok(self.kvlm.serialize())
    }
}

impl Unpackable for Commit {
    fn deserialize(payload: Bytes) -> Result<Self> {
        Ok(Self::new(Kvlm::parse(&payload)?))
    }
}

impl Object for Commit {
    fn object_type(&self) -> ObjectType {
        ObjectType::Commit
    }

    fn display(&self) -> String {
        self.kvlm.display()
    }
}
