use crate::errors::{Error, Result};

/// Tree entry mode as it appears on disk
///
/// Kept verbatim (5 or 6 ASCII octal digits) so a parsed tree serializes back
/// to the same bytes, e.g. `40000` for directories and `100644` for files.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryMode(String);

impl EntryMode {
    pub const DIRECTORY: &'static str = "40000";
    pub const REGULAR: &'static str = "100644";
    pub const EXECUTABLE: &'static str = "100755";
    pub const SYMLINK: &'static str = "120000";
    pub const GITLINK: &'static str = "160000";

    pub fn from_octal_str(mode: &str) -> Result<Self> {
        let valid_length = mode.len() == 5 || mode.len() == 6;
        if !valid_length || !mode.bytes().all(|b| (b'0'..=b'7').contains(&b)) {
            return Err(Error::CorruptObject(format!("invalid tree entry mode {mode:?}")));
        }

        Ok(Self(mode.to_string()))
    }

    pub fn directory() -> Self {
        Self(Self::DIRECTORY.to_string())
    }

    pub fn regular() -> Self {
        Self(Self::REGULAR.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Mode left-padded to six digits, the way `ls-tree` prints it
    pub fn padded(&self) -> String {
        format!("{:0>6}", self.0)
    }

    pub fn as_u32(&self) -> u32 {
        // validated as octal digits on construction
        u32::from_str_radix(&self.0, 8).unwrap_or_default()
    }

    pub fn is_tree(&self) -> bool {
        self.as_u32() == 0o40000
    }
}

impl std::fmt::Display for EntryMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
