//! Error types for announcement domain validation.

use thiserror::Error;

/// Errors returned while constructing announcement domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AnnouncementDomainError {
    /// The service name is empty after trimming.
    #[error("service name must not be empty")]
    EmptyServiceName,

    /// The service name exceeds the 200-character limit.
    #[error("service name exceeds 200 character limit: {0}")]
    ServiceNameTooLong(String),
}
