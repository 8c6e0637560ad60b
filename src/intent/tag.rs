//! Intent tag values.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse intent keyword such as `edit`, `show` or `sync`.
///
/// Tags are stored lowercased so table lookups and request matching agree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IntentTag(String);

impl IntentTag {
    /// Creates a tag, trimming and lowercasing the input.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into().trim().to_lowercase())
    }

    /// Returns the tag text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns whether the tag is empty after normalisation.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for IntentTag {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl AsRef<str> for IntentTag {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for IntentTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
