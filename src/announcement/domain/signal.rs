//! Directed and broadcast signal values.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Name of a signal sent over the secondary signal channel.
///
/// Signals are distinct from announcements: they are delivered only to
/// handlers registered with the bus, never to listeners.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SignalType(String);

impl SignalType {
    /// Creates a signal type from its name.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the signal name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SignalType {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for SignalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome reported by one signal handler.
///
/// Serialises as the handler's reply value, or as `{"error": "..."}` when the
/// handler failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SignalResponse {
    /// Handler failed; the failure text is captured instead of raised.
    Failed {
        /// Rendered handler error.
        error: String,
    },
    /// Handler returned a value.
    Reply(Value),
}

impl SignalResponse {
    /// Creates a failed response from any displayable error.
    #[must_use]
    pub fn failed(error: impl fmt::Display) -> Self {
        Self::Failed {
            error: error.to_string(),
        }
    }

    /// Returns whether the handler failed.
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// Returns the reply value when the handler succeeded.
    #[must_use]
    pub const fn reply(&self) -> Option<&Value> {
        match self {
            Self::Reply(value) => Some(value),
            Self::Failed { .. } => None,
        }
    }
}
