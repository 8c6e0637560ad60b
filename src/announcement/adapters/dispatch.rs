//! Fire-and-forget listener dispatch.
//!
//! Inside a tokio runtime every listener is submitted to the blocking pool
//! and its join handle dropped, so `announce` returns without waiting.
//! Outside a runtime listeners run inline, one after another. Either way a
//! failing or panicking listener is logged and the remaining listeners
//! still run.

use crate::announcement::{domain::Announcement, ports::AnnouncementListener};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::{trace, warn};

/// Strategy for invoking listeners after an announcement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchMode {
    /// Spawn onto the current tokio runtime when one is active, otherwise
    /// run inline.
    #[default]
    Auto,
    /// Always run listeners inline on the announcing thread.
    Inline,
    /// Spawn onto the current tokio runtime; falls back to inline when no
    /// runtime is active.
    Spawned,
}

impl DispatchMode {
    /// Returns the canonical configuration representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Inline => "inline",
            Self::Spawned => "spawned",
        }
    }
}

impl fmt::Display for DispatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for DispatchMode {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "inline" => Ok(Self::Inline),
            "spawned" => Ok(Self::Spawned),
            other => Err(format!(
                "unknown dispatch mode '{other}'; expected auto, inline, or spawned"
            )),
        }
    }
}

/// How a batch of listeners was handed off.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Listeners that ran to completion on the announcing thread.
    pub inline: usize,
    /// Listeners submitted to the runtime and left running.
    pub spawned: usize,
}

/// Invokes listeners according to a [`DispatchMode`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ListenerDispatcher {
    mode: DispatchMode,
}

impl ListenerDispatcher {
    /// Creates a dispatcher with the given mode.
    #[must_use]
    pub const fn new(mode: DispatchMode) -> Self {
        Self { mode }
    }

    /// Returns the configured dispatch mode.
    #[must_use]
    pub const fn mode(&self) -> DispatchMode {
        self.mode
    }

    /// Notifies every listener of an announcement.
    ///
    /// Never fails and never waits for spawned listeners.
    pub fn dispatch(
        &self,
        listeners: Vec<Arc<dyn AnnouncementListener>>,
        announcement: &Arc<Announcement>,
    ) -> DispatchReport {
        let mut report = DispatchReport::default();
        let runtime = match self.mode {
            DispatchMode::Inline => None,
            DispatchMode::Auto | DispatchMode::Spawned => Handle::try_current().ok(),
        };

        for listener in listeners {
            if let Some(handle) = runtime.as_ref() {
                let shared = Arc::clone(announcement);
                drop(handle.spawn_blocking(move || invoke(listener.as_ref(), &shared)));
                report.spawned += 1;
            } else {
                invoke(listener.as_ref(), announcement);
                report.inline += 1;
            }
        }

        trace!(
            service = %announcement.service_name(),
            inline = report.inline,
            spawned = report.spawned,
            "listeners dispatched"
        );
        report
    }
}

/// Runs one listener, containing both returned errors and panics.
fn invoke(listener: &dyn AnnouncementListener, announcement: &Announcement) {
    match panic::catch_unwind(AssertUnwindSafe(|| listener.on_announcement(announcement))) {
        Ok(Ok(())) => {}
        Ok(Err(err)) => warn!(
            service = %announcement.service_name(),
            error = %err,
            "announcement listener failed"
        ),
        Err(payload) => warn!(
            service = %announcement.service_name(),
            panic = panic_message(payload.as_ref()),
            "announcement listener panicked"
        ),
    }
}

/// Extracts a printable message from a panic payload.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}
