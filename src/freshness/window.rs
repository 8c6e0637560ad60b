//! Freshness window and the derived fresh/stale state.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default window within which an announcement counts as fresh.
pub const DEFAULT_FRESHNESS_SECS: u64 = 300;

/// Maximum age for a tracked service to count as fresh.
///
/// Freshness is strict: a service last seen exactly `max_age` ago is stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreshnessWindow {
    max_age: TimeDelta,
}

impl FreshnessWindow {
    /// Creates a window from a whole number of seconds.
    #[must_use]
    pub fn from_secs(secs: u64) -> Self {
        let secs = i64::try_from(secs).unwrap_or(i64::MAX);
        Self {
            max_age: TimeDelta::try_seconds(secs).unwrap_or(TimeDelta::MAX),
        }
    }

    /// Returns the maximum age.
    #[must_use]
    pub const fn max_age(&self) -> TimeDelta {
        self.max_age
    }

    /// Returns whether something last seen at `last_seen` is fresh at `now`.
    #[must_use]
    pub fn is_fresh(&self, last_seen: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(last_seen) < self.max_age
    }

    /// Classifies `last_seen` relative to `now`.
    #[must_use]
    pub fn classify(&self, last_seen: DateTime<Utc>, now: DateTime<Utc>) -> Freshness {
        if self.is_fresh(last_seen, now) {
            Freshness::Fresh
        } else {
            Freshness::Stale
        }
    }
}

impl Default for FreshnessWindow {
    fn default() -> Self {
        Self::from_secs(DEFAULT_FRESHNESS_SECS)
    }
}

/// Derived liveness of a tracked service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Freshness {
    /// Announced within the freshness window.
    Fresh,
    /// Last announcement is older than the freshness window.
    Stale,
}

impl Freshness {
    /// Returns the canonical text representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fresh => "fresh",
            Self::Stale => "stale",
        }
    }
}

impl fmt::Display for Freshness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
