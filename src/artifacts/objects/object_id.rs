//! Object identifier (SHA-1 digest)
//!
//! An object id is the 20-byte SHA-1 digest of `<type> <size>\0<payload>`.
//! It is rendered as 40 lowercase hexadecimal characters.
//!
//! ## Storage
//!
//! Objects are stored in `.git/objects/<first-2-chars>/<remaining-38-chars>`

use crate::artifacts::objects::{OBJECT_ID_LENGTH, OBJECT_ID_SIZE};
use crate::errors::{Error, Result};
use sha1::{Digest, Sha1};
use std::io;
use std::path::PathBuf;

/// Content digest identifying an object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct ObjectId([u8; OBJECT_ID_SIZE]);

impl ObjectId {
    pub fn from_bytes(bytes: [u8; OBJECT_ID_SIZE]) -> Self {
        Self(bytes)
    }

    /// Hash arbitrary content (header included) into an object id
    pub fn digest(content: &[u8]) -> Self {
        let mut hasher = Sha1::new();
        hasher.update(content);

        let mut raw = [0u8; OBJECT_ID_SIZE];
        raw.copy_from_slice(&hasher.finalize());
        Self(raw)
    }

    /// Parse and validate an object id from its 40-character hex form
    ///
    /// Upper-case digits are accepted and normalized.
    pub fn try_parse(id: &str) -> Result<Self> {
        if id.len() != OBJECT_ID_LENGTH || !id.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::InvalidObjectId(id.to_string()));
        }

        let mut raw = [0u8; OBJECT_ID_SIZE];
        for (i, byte) in raw.iter_mut().enumerate() {
            *byte = u8::from_str_radix(&id[2 * i..2 * i + 2], 16)
                .map_err(|_| Error::InvalidObjectId(id.to_string()))?;
        }

        Ok(Self(raw))
    }

    /// Write the object id in binary format (20 bytes)
    pub fn write_h40_to<W: io::Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&self.0)
    }

    /// Read an object id from binary format (20 bytes)
    pub fn read_h40_from<R: io::Read + ?Sized>(reader: &mut R) -> io::Result<Self> {
        let mut raw = [0u8; OBJECT_ID_SIZE];
        reader.read_exact(&mut raw)?;

        Ok(Self(raw))
    }

    pub fn as_bytes(&self) -> &[u8; OBJECT_ID_SIZE] {
        &self.0
    }

    /// Convert to file system path for object storage
    ///
    /// Splits the hash as `XX/YYYYYY...` where XX is the first 2 chars.
    pub fn to_path(&self) -> PathBuf {
        let hex = self.to_string();
        let (dir, file) = hex.split_at(2);
        PathBuf::from(dir).join(file)
    }

    /// First 7 characters of the hash
    pub fn to_short_oid(&self) -> String {
        self.to_string()[..7].to_string()
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for byte in self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}
