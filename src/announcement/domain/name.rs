//! Validated service name type.

use super::AnnouncementDomainError;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Maximum length for a service name, in characters.
const MAX_NAME_LENGTH: usize = 200;

/// Human-readable name a component announces itself under.
///
/// Names keep their original casing and inner spacing (e.g.
/// `Database Service`, `Start.gg Sync`) because the router matches their
/// whitespace-separated tokens against free text. Names are not unique
/// across announcements: a component re-announcing under the same name
/// refreshes its tracked record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ServiceName(String);

impl ServiceName {
    /// Creates a validated service name.
    ///
    /// # Errors
    ///
    /// Returns [`AnnouncementDomainError::EmptyServiceName`] when the value is
    /// blank, or [`AnnouncementDomainError::ServiceNameTooLong`] when it
    /// exceeds 200 characters after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, AnnouncementDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            return Err(AnnouncementDomainError::EmptyServiceName);
        }

        if trimmed.chars().count() > MAX_NAME_LENGTH {
            return Err(AnnouncementDomainError::ServiceNameTooLong(raw));
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the service name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the lowercased, whitespace-separated tokens of the name.
    #[must_use]
    pub fn tokens(&self) -> Vec<String> {
        self.0
            .split_whitespace()
            .map(str::to_lowercase)
            .collect()
    }
}

impl TryFrom<String> for ServiceName {
    type Error = AnnouncementDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ServiceName> for String {
    fn from(value: ServiceName) -> Self {
        value.0
    }
}

impl AsRef<str> for ServiceName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Borrow<str> for ServiceName {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for ServiceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
