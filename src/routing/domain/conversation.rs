//! What the assistant can currently handle.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Snapshot of conversation capabilities derived from fresh services.
///
/// Changes as services come and go.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversationCapabilities {
    /// Time the snapshot was taken.
    pub timestamp: DateTime<Utc>,
    /// Services ever discovered, excluding the router itself.
    pub discovered_services: usize,
    /// Services announced within the freshness window.
    pub active_services: usize,
    /// Intent tags known to the pattern index.
    pub available_patterns: Vec<String>,
    /// `"service: capability"` lines for the first two capabilities of each
    /// fresh service.
    pub can_handle: Vec<String>,
}
