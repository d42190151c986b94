//! Index entry representation
//!
//! Each entry in the index represents a tracked file with:
//! - File path
//! - Content hash (object ID)
//! - Stat data captured when the file was staged
//!
//! ## Entry Format
//!
//! ```text
//! offset  size  field
//!      0     8  ctime (seconds, nanoseconds)
//!      8     8  mtime (seconds, nanoseconds)
//!     16     4  dev
//!     20     4  ino
//!     24     4  mode
//!     28     4  uid
//!     32     4  gid
//!     36     4  size
//!     40    20  object id
//!     60     2  flags
//!     62     -  path, NUL-terminated, padded to a multiple of 8
//! ```

use crate::artifacts::index::entry_flags::EntryFlags;
use crate::artifacts::objects::OBJECT_ID_SIZE;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{Error, Result};
use byteorder::{ByteOrder, WriteBytesExt};
use bytes::Bytes;
use derive_new::new;
use std::io::Write;

/// Block size for entry alignment (8 bytes)
pub const ENTRY_BLOCK: usize = 8;

/// Bytes before the path: ten stat words, the object id and the flags
pub const ENTRY_PREFIX_SIZE: usize = 62;

/// Smallest possible entry: a one-byte path padded to the block size
pub const ENTRY_MIN_SIZE: usize = 64;

/// Seconds and nanoseconds, as stored for ctime and mtime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, new)]
pub struct IndexTimestamp {
    pub seconds: u32,
    pub nanoseconds: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct IndexEntry {
    pub ctime: IndexTimestamp,
    pub mtime: IndexTimestamp,
    pub dev: u32,
    pub ino: u32,
    /// Object type (4 bits), unused (3 bits) and unix permissions (9 bits)
    pub mode: u32,
    pub uid: u32,
    pub gid: u32,
    /// File size, truncated to 32 bits
    pub size: u32,
    pub oid: ObjectId,
    pub flags: EntryFlags,
    /// `/`-separated path relative to the worktree
    pub path: String,
}

impl IndexEntry {
    /// Entry with zeroed stat data, as tools that only care about content produce
    pub fn for_content(path: &str, oid: ObjectId, mode: u32, size: u32) -> Self {
        IndexEntry::new(
            IndexTimestamp::default(),
            IndexTimestamp::default(),
            0,
            0,
            mode,
            0,
            0,
            size,
            oid,
            EntryFlags::for_name(path.len()),
            path.to_string(),
        )
    }

    pub fn stage(&self) -> u8 {
        self.flags.stage()
    }

    /// On-disk size of an entry whose path is `name_length` bytes long
    pub fn padded_size(name_length: usize) -> usize {
        // at least one NUL terminates the path
        (ENTRY_PREFIX_SIZE + name_length + ENTRY_BLOCK) / ENTRY_BLOCK * ENTRY_BLOCK
    }

    /// Decode the entry at the start of `data`
    ///
    /// Returns the entry and the number of bytes it occupies, or `None` when
    /// `data` ends before the entry does.
    pub fn parse(data: &[u8]) -> Result<Option<(Self, usize)>> {
        if data.len() < ENTRY_PREFIX_SIZE {
            return Ok(None);
        }

        let Some(name_length) = data[ENTRY_PREFIX_SIZE..].iter().position(|&b| b == 0) else {
            return Ok(None);
        };
        let entry_size = Self::padded_size(name_length);
        if data.len() < entry_size {
            return Ok(None);
        }

        let word = |i: usize| byteorder::NetworkEndian::read_u32(&data[i * 4..i * 4 + 4]);

        let mut oid = [0u8; OBJECT_ID_SIZE];
        oid.copy_from_slice(&data[40..60]);
        let flags = EntryFlags::from_bits_retain(byteorder::NetworkEndian::read_u16(&data[60..62]));

        let path = &data[ENTRY_PREFIX_SIZE..ENTRY_PREFIX_SIZE + name_length];
        let path = std::str::from_utf8(path)
            .map_err(|_| {
                Error::CorruptIndex(format!(
                    "non UTF-8 path {:?}",
                    String::from_utf8_lossy(path)
                ))
            })?
            .to_string();

        let entry = IndexEntry {
            ctime: IndexTimestamp::new(word(0), word(1)),
            mtime: IndexTimestamp::new(word(2), word(3)),
            dev: word(4),
            ino: word(5),
            mode: word(6),
            uid: word(7),
            gid: word(8),
            size: word(9),
            oid: ObjectId::from_bytes(oid),
            flags,
            path,
        };

        Ok(Some((entry, entry_size)))
    }

    pub fn serialize(&self) -> Result<Bytes> {
        let mut entry_bytes = Vec::with_capacity(Self::padded_size(self.path.len()));

        for word in [
            self.ctime.seconds,
            self.ctime.nanoseconds,
            self.mtime.seconds,
            self.mtime.nanoseconds,
            self.dev,
            self.ino,
            self.mode,
            self.uid,
            self.gid,
            self.size,
        ] {
            entry_bytes.write_u32::<byteorder::NetworkEndian>(word)?;
        }
        self.oid.write_h40_to(&mut entry_bytes)?;
        entry_bytes.write_u16::<byteorder::NetworkEndian>(self.flags.bits())?;
        entry_bytes.write_all(self.path.as_bytes())?;

        // There must be at least one null byte at the end
        entry_bytes.push(0);
        while entry_bytes.len() % ENTRY_BLOCK != 0 {
            entry_bytes.push(0);
        }

        Ok(Bytes::from(entry_bytes))
    }
}
