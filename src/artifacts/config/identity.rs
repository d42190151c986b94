use crate::artifacts::config::RepositoryConfig;
use crate::errors::{Error, Result};

/// Name, email and timestamp recorded on tags (and commits)
///
/// Rendered as `Name <email> <unix seconds> <+hhmm>`.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Identity {
    name: String,
    email: String,
    timestamp: chrono::DateTime<chrono::FixedOffset>,
}

impl Identity {
    pub fn new(name: String, email: String) -> Self {
        Identity {
            name,
            email,
            timestamp: chrono::Local::now().fixed_offset(),
        }
    }

    pub fn new_with_timestamp(
        name: String,
        email: String,
        timestamp: chrono::DateTime<chrono::FixedOffset>,
    ) -> Self {
        Identity {
            name,
            email,
            timestamp,
        }
    }

    /// Resolve the identity from `GIT_AUTHOR_*`, falling back to `user.*` in the config
    ///
    /// `GIT_AUTHOR_DATE` accepts RFC 2822 or `%Y-%m-%d %H:%M:%S %z`; without it
    /// the current time is used.
    pub fn load(config: &RepositoryConfig) -> Result<Self> {
        let name = std::env::var("GIT_AUTHOR_NAME")
            .ok()
            .or_else(|| config.user_name())
            .ok_or_else(|| Error::Config("user.name is not set".into()))?;
        let email = std::env::var("GIT_AUTHOR_EMAIL")
            .ok()
            .or_else(|| config.user_email())
            .ok_or_else(|| Error::Config("user.email is not set".into()))?;

        let timestamp = std::env::var("GIT_AUTHOR_DATE")
            .ok()
            .and_then(|date| Self::parse_date(&date));

        match timestamp {
            Some(timestamp) => Ok(Identity::new_with_timestamp(name, email, timestamp)),
            None => Ok(Identity::new(name, email)),
        }
    }

    fn parse_date(date: &str) -> Option<chrono::DateTime<chrono::FixedOffset>> {
        chrono::DateTime::parse_from_rfc2822(date)
            .or_else(|_| chrono::DateTime::parse_from_str(date, "%Y-%m-%d %H:%M:%S %z"))
            .ok()
    }

    pub fn display_name(&self) -> String {
        format!("{} <{}>", self.name, self.email)
    }

    pub fn display(&self) -> String {
        format!(
            "{} <{}> {} {}",
            self.name,
            self.email,
            self.timestamp.timestamp(),
            self.timestamp.format("%z")
        )
    }
}
