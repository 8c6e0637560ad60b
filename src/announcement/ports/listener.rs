//! Listener port notified on every accepted announcement.

use crate::announcement::domain::Announcement;
use std::sync::Arc;
use thiserror::Error;

/// Result type returned by announcement listeners.
pub type ListenerResult = Result<(), ListenerError>;

/// Callback invoked for announcements accepted by the bus.
///
/// Listeners run either inline on the announcing thread or on the tokio
/// blocking pool, depending on where `announce` was called from. They must
/// not assume which. Failures are logged by the bus and never reach the
/// announcer.
pub trait AnnouncementListener: Send + Sync {
    /// Handles one announcement.
    ///
    /// # Errors
    ///
    /// Returns [`ListenerError`] when the listener cannot process the
    /// announcement. The bus logs the error and carries on.
    fn on_announcement(&self, announcement: &Announcement) -> ListenerResult;
}

/// Failure reported by an announcement listener.
#[derive(Debug, Clone, Error)]
pub enum ListenerError {
    /// Listener rejected the announcement with a message.
    #[error("{0}")]
    Rejected(String),

    /// Listener hit an underlying failure.
    #[error("listener failure: {0}")]
    Failed(Arc<dyn std::error::Error + Send + Sync>),
}

impl ListenerError {
    /// Creates a rejection with a message.
    #[must_use]
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected(message.into())
    }

    /// Wraps an underlying error.
    #[must_use]
    pub fn failed(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Failed(Arc::new(err))
    }
}
