//! Freshness tracking for announced services.
//!
//! Each service name maps to its latest announcement plus first/last-seen
//! timestamps. Freshness is derived, never stored:
//! `is_fresh = (now - last_seen) < max_age`.

mod tracked;
mod tracker;
mod window;

pub use tracked::TrackedService;
pub use tracker::{
    DEFAULT_DISCOVERY_LOG_CAPACITY, DiscoveryEvent, DiscoveryKind, FreshnessPartition,
    ServiceTracker,
};
pub use window::{DEFAULT_FRESHNESS_SECS, Freshness, FreshnessWindow};
