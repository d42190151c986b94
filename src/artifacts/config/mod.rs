//! Repository configuration
//!
//! `.git/config` is an INI file:
//!
//! ```text
//! [core]
//!     repositoryformatversion = 0
//!     filemode = false
//!     bare = false
//! [user]
//!     name = Jane Doe
//!     email = jane@example.com
//! ```
//!
//! Section and key names are case-insensitive.

pub mod identity;

use crate::errors::{Error, Result};
use configparser::ini::Ini;
use std::path::Path;

/// The only on-disk layout this crate understands
pub const REPOSITORY_FORMAT_VERSION: u32 = 0;

pub struct RepositoryConfig {
    ini: Ini,
}

impl std::fmt::Debug for RepositoryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RepositoryConfig")
            .field("sections", &self.ini.sections())
            .finish()
    }
}

impl RepositoryConfig {
    /// Configuration written by `init`
    pub fn default_config() -> Self {
        let mut ini = Ini::new();
        ini.set(
            "core",
            "repositoryformatversion",
            Some(REPOSITORY_FORMAT_VERSION.to_string()),
        );
        ini.set("core", "filemode", Some("false".into()));
        ini.set("core", "bare", Some("false".into()));

        RepositoryConfig { ini }
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::Config(format!(
                "configuration file {} is missing",
                path.display()
            )));
        }

        let mut ini = Ini::new();
        ini.load(path)
            .map_err(|message| Error::Config(format!("{}: {message}", path.display())))?;

        Ok(RepositoryConfig { ini })
    }

    /// Parse configuration text, as found in a config file
    pub fn parse(text: &str) -> Result<Self> {
        let mut ini = Ini::new();
        ini.read(text.to_string()).map_err(Error::Config)?;

        Ok(RepositoryConfig { ini })
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        self.ini.write(path)?;
        Ok(())
    }

    pub fn get(&self, section: &str, key: &str) -> Option<String> {
        self.ini.get(section, key)
    }

    /// `core.repositoryformatversion`, 0 when unset
    pub fn repository_format_version(&self) -> Result<u32> {
        let version = self
            .ini
            .getuint("core", "repositoryformatversion")
            .map_err(Error::Config)?
            .unwrap_or_default();

        u32::try_from(version)
            .map_err(|_| Error::Config(format!("repositoryformatversion {version} out of range")))
    }

    /// Fail unless the repository uses a layout this crate can read
    pub fn ensure_supported(&self) -> Result<()> {
        let version = self.repository_format_version()?;
        if version != REPOSITORY_FORMAT_VERSION {
            return Err(Error::UnsupportedVersion {
                what: "repository format",
                version,
            });
        }

        Ok(())
    }

    pub fn is_bare(&self) -> Result<bool> {
        Ok(self
            .ini
            .getbool("core", "bare")
            .map_err(Error::Config)?
            .unwrap_or(false))
    }

    pub fn user_name(&self) -> Option<String> {
        self.get("user", "name")
    }

    pub fn user_email(&self) -> Option<String> {
        self.get("user", "email")
    }
}
