//! Latest-wins record of one announced service.

use super::{Freshness, FreshnessWindow};
use crate::announcement::domain::{Announcement, ServiceName};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};

/// Latest announcement of a service together with when it was seen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackedService {
    announcement: Announcement,
    sequence: u64,
    first_seen: DateTime<Utc>,
    last_seen: DateTime<Utc>,
    digest: String,
}

impl TrackedService {
    /// Starts tracking a newly discovered service.
    #[must_use]
    pub fn discovered(announcement: Announcement, sequence: u64, seen_at: DateTime<Utc>) -> Self {
        let digest = content_digest(&announcement);
        Self {
            announcement,
            sequence,
            first_seen: seen_at,
            last_seen: seen_at,
            digest,
        }
    }

    /// Replaces the announcement and bumps `last_seen`.
    ///
    /// Returns whether the capability or example text changed.
    pub fn refresh(&mut self, announcement: Announcement, seen_at: DateTime<Utc>) -> bool {
        let digest = content_digest(&announcement);
        let changed = digest != self.digest;
        self.announcement = announcement;
        self.digest = digest;
        self.last_seen = seen_at;
        changed
    }

    /// Returns the service name.
    #[must_use]
    pub const fn service_name(&self) -> &ServiceName {
        self.announcement.service_name()
    }

    /// Returns the latest announcement.
    #[must_use]
    pub const fn announcement(&self) -> &Announcement {
        &self.announcement
    }

    /// Returns the latest capabilities.
    #[must_use]
    pub fn capabilities(&self) -> &[String] {
        self.announcement.capabilities()
    }

    /// Returns the latest examples.
    #[must_use]
    pub fn examples(&self) -> &[String] {
        self.announcement.examples()
    }

    /// Returns the discovery sequence number; lower means announced earlier.
    #[must_use]
    pub const fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Returns when the service was first announced.
    #[must_use]
    pub const fn first_seen(&self) -> DateTime<Utc> {
        self.first_seen
    }

    /// Returns when the service last announced.
    #[must_use]
    pub const fn last_seen(&self) -> DateTime<Utc> {
        self.last_seen
    }

    /// Returns the hex SHA-256 digest of the capability and example text.
    #[must_use]
    pub fn digest(&self) -> &str {
        &self.digest
    }

    /// Returns whether the service is fresh at `now`.
    #[must_use]
    pub fn is_fresh(&self, now: DateTime<Utc>, window: FreshnessWindow) -> bool {
        window.is_fresh(self.last_seen, now)
    }

    /// Classifies the service at `now`.
    #[must_use]
    pub fn freshness(&self, now: DateTime<Utc>, window: FreshnessWindow) -> Freshness {
        window.classify(self.last_seen, now)
    }
}

fn content_digest(announcement: &Announcement) -> String {
    let mut hasher = Sha256::new();
    for capability in announcement.capabilities() {
        hasher.update(b"c:");
        hasher.update(capability.as_bytes());
        hasher.update([0]);
    }
    for example in announcement.examples() {
        hasher.update(b"e:");
        hasher.update(example.as_bytes());
        hasher.update([0]);
    }
    format!("{:x}", hasher.finalize())
}
