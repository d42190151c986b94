use crate::artifacts::refs::INVALID_REF_NAME_REGEX;
use crate::errors::{Error, Result};

/// A ref path relative to the metadata directory, e.g. `refs/tags/v1.0`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RefName(String);

impl RefName {
    pub fn try_parse(name: impl Into<String>) -> Result<Self> {
        let name = name.into();

        if name.is_empty() || regex::Regex::new(INVALID_REF_NAME_REGEX)?.is_match(&name) {
            return Err(Error::InvalidPath(name));
        }

        Ok(Self(name))
    }

    pub fn is_valid(name: &str) -> bool {
        Self::try_parse(name).is_ok()
    }
}

impl AsRef<str> for RefName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RefName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
