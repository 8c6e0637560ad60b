//! Port contracts for announcement listeners and signal handlers.
//!
//! Ports define the callbacks the bus invokes; adapters in
//! [`crate::announcement::adapters`] provide closure-backed and recording
//! implementations.

pub mod listener;
pub mod signal;

pub use listener::{AnnouncementListener, ListenerError, ListenerResult};
pub use signal::{SignalHandler, SignalHandlerError, SignalHandlerResult};

#[cfg(test)]
pub use signal::MockSignalHandler;
