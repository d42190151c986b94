//! Tree object
//!
//! Trees are directory snapshots: an ordered list of named entries, each
//! pointing at a blob (file), another tree (subdirectory) or, for gitlinks,
//! a commit.
//!
//! ## Format
//!
//! On disk: `tree <size>\0<entries>`
//! Each entry: `<mode> <name>\0<20-byte-sha1>`
//!
//! ## Ordering
//!
//! Entries are kept in the order they were given or parsed. The codec never
//! sorts nor deduplicates: a caller that wants the canonical object id of a
//! directory must hand over entries already sorted the way git sorts them.

use crate::artifacts::objects::entry_mode::EntryMode;
use crate::artifacts::objects::object::{Object, Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::{Error, Result};
use bytes::Bytes;
use derive_new::new;
use std::io::{BufRead, Cursor, Write};

/// A single `<mode> <name> <oid>` record of a tree
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct TreeEntry {
    pub mode: EntryMode,
    /// Raw entry name, never containing NUL
    pub name: Bytes,
    pub oid: ObjectId,
}

impl TreeEntry {
    /// Kind of object the mode says this entry points at
    pub fn object_type(&self) -> ObjectType {
        if self.mode.is_tree() {
            ObjectType::Tree
        } else if self.mode.as_str() == EntryMode::GITLINK {
            ObjectType::Commit
        } else {
            ObjectType::Blob
        }
    }

    pub fn name_lossy(&self) -> String {
        String::from_utf8_lossy(&self.name).into_owned()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, new)]
pub struct Tree {
    entries: Vec<TreeEntry>,
}

impl Tree {
    pub fn entries(&self) -> &[TreeEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<TreeEntry> {
        self.entries
    }
}

impl Packable for Tree {
    fn serialize(&self) -> Result<Bytes> {
        let mut content = Vec::new();

        for entry in &self.entries {
            if entry.name.contains(&0) {
                return Err(Error::CorruptObject(format!(
                    "tree entry name {:?} contains NUL",
                    entry.name_lossy()
                )));
            }

            content.write_all(entry.mode.as_str().as_bytes())?;
            content.push(b' ');
            content.write_all(&entry.name)?;
            content.push(0);
            entry.oid.write_h40_to(&mut content)?;
        }

        Ok(Bytes::from(content))
    }
}

impl Unpackable for Tree {
    fn deserialize(payload: Bytes) -> Result<Self> {
        let mut entries = Vec::new();
        let mut reader = Cursor::new(payload);

        // Reuse scratch buffers to reduce allocs
        let mut mode_bytes = Vec::new();
        let mut name_bytes = Vec::new();

        loop {
            mode_bytes.clear();
            // Read "mode " (space-delimited)
            let n = reader.read_until(b' ', &mut mode_bytes)?;
            if n == 0 {
                break; // clean EOF: no more entries
            }
            if mode_bytes.pop() != Some(b' ') {
                return Err(Error::CorruptObject("unexpected EOF in tree entry mode".into()));
            }

            let mode = std::str::from_utf8(&mode_bytes)
                .map_err(|_| Error::CorruptObject("non-ASCII tree entry mode".into()))?;
            let mode = EntryMode::from_octal_str(mode)?;

            // Read "name\0"
            name_bytes.clear();
            reader.read_until(b'\0', &mut name_bytes)?;
            if name_bytes.pop() != Some(b'\0') {
                return Err(Error::CorruptObject("unexpected EOF in tree entry name".into()));
            }

            let oid = ObjectId::read_h40_from(&mut reader).map_err(|_| {
                Error::CorruptObject("unexpected EOF in tree entry object id".into())
            })?;

            entries.push(TreeEntry::new(
                mode,
                Bytes::copy_from_slice(&name_bytes),
                oid,
            ));
        }

        Ok(Tree { entries })
    }
}

impl Object for Tree {
    fn object_type(&self) -> ObjectType {
        ObjectType::Tree
    }

    fn display(&self) -> String {
        self.entries
            .iter()
            .map(|entry| {
                format!(
                    "{} {} {}\t{}",
                    entry.mode.padded(),
                    entry.object_type(),
                    entry.oid,
                    entry.name_lossy()
                )
            })
            .collect::<Vec<String>>()
            .join("\n")
    }
}
