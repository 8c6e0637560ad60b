//! Signal handler port for the secondary signal channel.

use crate::announcement::domain::SignalType;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

/// Result type returned by signal handlers.
pub type SignalHandlerResult = Result<Value, SignalHandlerError>;

/// Receiver of directed or broadcast signals.
///
/// The dispatch site only ever calls [`SignalHandler::handle_signal`]; bare
/// functions are adapted into this trait when they are registered.
#[cfg_attr(test, mockall::automock)]
pub trait SignalHandler: Send + Sync {
    /// Handles a signal. `data` is [`Value::Null`] when the sender supplied
    /// no payload.
    ///
    /// # Errors
    ///
    /// Returns [`SignalHandlerError`] when the signal cannot be handled. The
    /// bus captures the error into the response map.
    fn handle_signal(&self, signal: &SignalType, data: &Value) -> SignalHandlerResult;
}

/// Failure reported by a signal handler.
#[derive(Debug, Clone, Error)]
pub enum SignalHandlerError {
    /// The handler does not understand this signal.
    #[error("unsupported signal: {0}")]
    Unsupported(SignalType),

    /// The handler failed with a message.
    #[error("{0}")]
    Message(String),

    /// The handler hit an underlying failure.
    #[error("signal handler failure: {0}")]
    Failed(Arc<dyn std::error::Error + Send + Sync>),
}

impl SignalHandlerError {
    /// Creates a handler failure from a message.
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }

    /// Wraps an underlying error.
    #[must_use]
    pub fn failed(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Failed(Arc::new(err))
    }
}
