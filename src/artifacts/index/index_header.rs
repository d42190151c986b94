use crate::artifacts::index::{HEADER_SIZE, SIGNATURE, VERSION};
use crate::errors::{Error, Result};
use byteorder::{ByteOrder, WriteBytesExt};
use bytes::Bytes;
use derive_new::new;
use std::io::Write;

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct IndexHeader {
    pub signature: [u8; 4],
    pub version: u32,
    pub entries_count: u32,
}

impl IndexHeader {
    /// Version 2 header announcing `entries_count` entries
    pub fn for_entries(entries_count: u32) -> Self {
        IndexHeader::new(*SIGNATURE, VERSION, entries_count)
    }

    /// Decode and validate the first `HEADER_SIZE` bytes of an index
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_SIZE {
            return Err(Error::CorruptIndex("truncated header".into()));
        }

        let mut signature = [0u8; 4];
        signature.copy_from_slice(&bytes[0..4]);
        if &signature != SIGNATURE {
            return Err(Error::CorruptIndex(format!(
                "bad signature {:?}",
                String::from_utf8_lossy(&signature)
            )));
        }

        let version = byteorder::NetworkEndian::read_u32(&bytes[4..8]);
        if version != VERSION {
            return Err(Error::UnsupportedVersion {
                what: "index",
                version,
            });
        }

        let entries_count = byteorder::NetworkEndian::read_u32(&bytes[8..12]);

        Ok(IndexHeader {
            signature,
            version,
            entries_count,
        })
    }

    pub fn serialize(&self) -> Result<Bytes> {
        let mut bytes = Vec::with_capacity(HEADER_SIZE);
        bytes.write_all(&self.signature)?;
        bytes.write_u32::<byteorder::NetworkEndian>(self.version)?;
        bytes.write_u32::<byteorder::NetworkEndian>(self.entries_count)?;

        Ok(Bytes::from(bytes))
    }
}
