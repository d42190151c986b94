//! Git index (staging area), read side
//!
//! The index records, for every tracked path, the object id of the content
//! staged for the next commit along with the stat data captured at the time.
//!
//! Parsing order matters: the trailing checksum is verified before anything
//! else is decoded, so a flipped byte anywhere in the file surfaces as
//! [`Error::ChecksumMismatch`] rather than as a confusing decode error.

use crate::artifacts::index::checksum::Checksum;
use crate::artifacts::index::index_entry::{ENTRY_MIN_SIZE, IndexEntry};
use crate::artifacts::index::index_header::IndexHeader;
use crate::artifacts::index::{CHECKSUM_SIZE, HEADER_SIZE};
use crate::errors::{Error, Result};
use std::io::Read;
use std::ops::DerefMut;
use std::path::Path;
use tracing::{debug, trace};

#[derive(Debug, Clone)]
pub struct Index {
    /// Path to the index file (typically `.git/index`)
    path: Box<Path>,
}

impl Index {
    pub fn new(path: Box<Path>) -> Self {
        Index { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every entry from disk
    ///
    /// A missing or empty index file is an empty staging area.
    ///
    /// # Locking
    ///
    /// Acquires a shared lock on the index file during reading.
    pub fn load(&self) -> Result<Vec<IndexEntry>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let mut index_file = std::fs::OpenOptions::new().read(true).open(&self.path)?;
        let mut lock = file_guard::lock(&mut index_file, file_guard::Lock::Shared, 0, 1)?;

        let mut data = Vec::new();
        lock.deref_mut().read_to_end(&mut data)?;

        if data.is_empty() {
            return Ok(Vec::new());
        }

        let entries = Self::parse(&data)?;
        debug!(entries = entries.len(), "loaded index");

        Ok(entries)
    }

    /// Decode a whole index file
    pub fn parse(data: &[u8]) -> Result<Vec<IndexEntry>> {
        if data.len() < HEADER_SIZE + CHECKSUM_SIZE {
            return Err(Error::CorruptIndex(format!(
                "{} bytes is too short for an index",
                data.len()
            )));
        }

        let body = Checksum::verify(data)?;
        let header = IndexHeader::parse(body)?;

        let expected = header.entries_count;
        // the declared count is untrusted, so it does not size the allocation alone
        let capacity = (expected as usize).min(body.len() / ENTRY_MIN_SIZE);
        let mut entries = Vec::with_capacity(capacity);
        let mut offset = HEADER_SIZE;

        while entries.len() < expected as usize {
            match IndexEntry::parse(&body[offset..])? {
                Some((entry, size)) => {
                    offset += size;
                    entries.push(entry);
                }
                None => {
                    return Err(Error::IndexCountMismatch {
                        expected,
                        actual: entries.len() as u32,
                    });
                }
            }
        }

        if offset < body.len() {
            trace!(bytes = body.len() - offset, "skipping index extensions");
        }

        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::objects::object_id::ObjectId;
    use assert_fs::TempDir;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rstest::{fixture, rstest};

    fn encode(count: u32, entries: &[IndexEntry], extensions: &[u8]) -> Vec<u8> {
        let mut data = IndexHeader::for_entries(count).serialize().unwrap().to_vec();
        for entry in entries {
            data.extend_from_slice(&entry.serialize().unwrap());
        }
        data.extend_from_slice(extensions);

        let mut checksum = Checksum::new();
        checksum.update(&data);
        data.extend_from_slice(&checksum.finalize());
        data
    }

    fn sample_entries() -> Vec<IndexEntry> {
        vec![
            IndexEntry::for_content("a.txt", ObjectId::digest(b"blob 1\0a"), 0o100644, 1),
            IndexEntry::for_content(
                "src/main.rs",
                ObjectId::digest(b"blob 2\0mm"),
                0o100755,
                2,
            ),
        ]
    }

    #[fixture]
    fn entries() -> Vec<IndexEntry> {
        sample_entries()
    }

    #[rstest]
    fn parses_entries_in_file_order(entries: Vec<IndexEntry>) {
        let data = encode(2, &entries, b"");

        assert_eq!(Index::parse(&data).unwrap(), entries);
    }

    #[rstest]
    fn skips_extensions(entries: Vec<IndexEntry>) {
        let data = encode(2, &entries, b"TREE\0\0\0\x06abcdef");

        assert_eq!(Index::parse(&data).unwrap(), entries);
    }

    #[rstest]
    fn declared_count_must_be_reachable(entries: Vec<IndexEntry>) {
        let data = encode(3, &entries, b"");

        assert!(matches!(
            Index::parse(&data),
            Err(Error::IndexCountMismatch {
                expected: 3,
                actual: 2
            })
        ));
    }

    #[test]
    fn empty_index_has_no_entries() {
        assert!(Index::parse(&encode(0, &[], b"")).unwrap().is_empty());
    }

    #[rstest]
    #[case::short(b"DIRC".to_vec())]
    #[case::signature({
        let mut data = encode(0, &[], b"");
        data[0] = b'X';
        let body_len = data.len() - CHECKSUM_SIZE;
        let mut checksum = Checksum::new();
        checksum.update(&data[..body_len]);
        data.truncate(body_len);
        data.extend_from_slice(&checksum.finalize());
        data
    })]
    fn rejects_malformed_headers(#[case] data: Vec<u8>) {
        assert!(matches!(Index::parse(&data), Err(Error::CorruptIndex(_))));
    }

    #[test]
    fn rejects_other_versions() {
        let mut data = IndexHeader::new(*b"DIRC", 3, 0).serialize().unwrap().to_vec();
        let mut checksum = Checksum::new();
        checksum.update(&data);
        data.extend_from_slice(&checksum.finalize());

        assert!(matches!(
            Index::parse(&data),
            Err(Error::UnsupportedVersion { version: 3, .. })
        ));
    }

    #[rstest]
    fn load_reads_the_index_file(entries: Vec<IndexEntry>) {
        let dir = TempDir::new().unwrap();
        let index = Index::new(dir.path().join("index").into_boxed_path());

        assert!(index.load().unwrap().is_empty());

        std::fs::write(index.path(), encode(2, &entries, b"")).unwrap();
        assert_eq!(index.load().unwrap(), entries);
    }

    proptest! {
        #[test]
        fn any_flipped_byte_fails_the_checksum(position in any::<prop::sample::Index>(), mask in 1u8..) {
            let mut data = encode(2, &sample_entries(), b"");
            let position = position.index(data.len());
            data[position] ^= mask;

            prop_assert!(matches!(Index::parse(&data), Err(Error::ChecksumMismatch)));
        }
    }
}
