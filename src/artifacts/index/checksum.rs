use crate::artifacts::index::CHECKSUM_SIZE;
use crate::errors::{Error, Result};
use sha1::{Digest, Sha1};

/// Running SHA-1 over index bytes
#[derive(Debug, Default)]
pub struct Checksum {
    digest: Sha1,
}

impl Checksum {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, data: &[u8]) {
        self.digest.update(data);
    }

    pub fn finalize(self) -> [u8; CHECKSUM_SIZE] {
        let mut checksum = [0u8; CHECKSUM_SIZE];
        checksum.copy_from_slice(&self.digest.finalize());
        checksum
    }

    /// Check the trailing checksum of `data` and return everything before it
    pub fn verify(data: &[u8]) -> Result<&[u8]> {
        if data.len() < CHECKSUM_SIZE {
            return Err(Error::CorruptIndex("missing trailing checksum".into()));
        }

        let (body, expected) = data.split_at(data.len() - CHECKSUM_SIZE);
        let mut checksum = Checksum::new();
        checksum.update(body);

        if checksum.finalize().as_slice() != expected {
            return Err(Error::ChecksumMismatch);
        }

        Ok(body)
    }
}
