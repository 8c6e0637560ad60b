//! Error types for capability domain validation.

use thiserror::Error;

/// Errors returned while constructing capability domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CapabilityDomainError {
    /// The capability name is empty after trimming.
    #[error("capability name must not be empty")]
    EmptyName,

    /// The capability name exceeds the 100-character limit.
    #[error("capability name exceeds 100 character limit: {0}")]
    NameTooLong(String),

    /// The capability kind string is not recognised.
    #[error("unknown capability kind: {0}")]
    UnknownKind(String),
}
