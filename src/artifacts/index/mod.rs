//! Git index file format
//!
//! The index (also called staging area or cache) records which file contents
//! the next commit would contain. Only reading it is supported.
//!
//! ## File Format (Version 2)
//!
//! ```text
//! Header (12 bytes):
//!   - Signature: "DIRC" (4 bytes)
//!   - Version: 2 (4 bytes)
//!   - Entry count (4 bytes)
//!
//! Entries (variable length):
//!   - 62 bytes of stat data, object id and flags
//!   - NUL-terminated path
//!   - padded with NULs to a multiple of 8 bytes
//!
//! Extensions (optional, skipped)
//!
//! Checksum (20 bytes):
//!   - SHA-1 hash of all preceding bytes
//! ```
//!
//! All integers are big-endian.

pub mod checksum;
pub mod entry_flags;
pub mod index_entry;
pub mod index_header;

/// Size of SHA-1 checksum in bytes
pub const CHECKSUM_SIZE: usize = 20;

/// Size of index header in bytes
pub const HEADER_SIZE: usize = 12; // 4 bytes for marker, 4 for version, 4 for entries_count

/// Magic signature identifying index files
pub const SIGNATURE: &[u8; 4] = b"DIRC";

/// Index file format version
pub const VERSION: u32 = 2;

#[cfg(test)]
pub(crate) fn encode_index(entries: &[index_entry::IndexEntry]) -> Vec<u8> {
    let mut data = index_header::IndexHeader::for_entries(entries.len() as u32)
        .serialize()
        .unwrap()
        .to_vec();
    for entry in entries {
        data.extend_from_slice(&entry.serialize().unwrap());
    }

    let mut checksum = checksum::Checksum::new();
    checksum.update(&data);
    data.extend_from_slice(&checksum.finalize());
    data
}
