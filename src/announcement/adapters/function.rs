//! Closure adapters for the listener and signal handler ports.

use crate::announcement::{
    domain::{Announcement, SignalType},
    ports::{AnnouncementListener, ListenerResult, SignalHandler, SignalHandlerResult},
};
use serde_json::Value;
use std::fmt;

/// Wraps a closure as an [`AnnouncementListener`].
pub struct FnListener<F> {
    callback: F,
}

impl<F> FnListener<F>
where
    F: Fn(&Announcement) -> ListenerResult + Send + Sync,
{
    /// Creates a listener from a closure.
    #[must_use]
    pub const fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> AnnouncementListener for FnListener<F>
where
    F: Fn(&Announcement) -> ListenerResult + Send + Sync,
{
    fn on_announcement(&self, announcement: &Announcement) -> ListenerResult {
        (self.callback)(announcement)
    }
}

impl<F> fmt::Debug for FnListener<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnListener").finish_non_exhaustive()
    }
}

/// Wraps a `(signal, data)` closure as a [`SignalHandler`].
///
/// Registration through
/// [`AnnouncementBus::register_signal_fn`](crate::announcement::services::AnnouncementBus::register_signal_fn)
/// applies this adapter, so the dispatch site only sees the trait.
pub struct FnSignalHandler<F> {
    callback: F,
}

impl<F> FnSignalHandler<F>
where
    F: Fn(&SignalType, &Value) -> SignalHandlerResult + Send + Sync,
{
    /// Creates a signal handler from a closure.
    #[must_use]
    pub const fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> SignalHandler for FnSignalHandler<F>
where
    F: Fn(&SignalType, &Value) -> SignalHandlerResult + Send + Sync,
{
    fn handle_signal(&self, signal: &SignalType, data: &Value) -> SignalHandlerResult {
        (self.callback)(signal, data)
    }
}

impl<F> fmt::Debug for FnSignalHandler<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnSignalHandler").finish_non_exhaustive()
    }
}
