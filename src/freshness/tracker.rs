//! Per-service freshness tracker and discovery log.

use super::{FreshnessWindow, TrackedService};
use crate::announcement::domain::{Announcement, ServiceName};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::hash_map::Entry;
use std::collections::{HashMap, VecDeque};
use std::fmt;

/// Default number of discovery events retained.
pub const DEFAULT_DISCOVERY_LOG_CAPACITY: usize = 100;

/// What an announcement meant for the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscoveryKind {
    /// First announcement under this name.
    Discovered,
    /// Re-announcement with identical capability and example text.
    Refreshed,
    /// Re-announcement with different capability or example text.
    Updated,
}

impl DiscoveryKind {
    /// Returns the canonical text representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Discovered => "discovered",
            Self::Refreshed => "refreshed",
            Self::Updated => "updated",
        }
    }
}

impl fmt::Display for DiscoveryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entry in the bounded discovery log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscoveryEvent {
    /// Announcing service.
    pub service_name: ServiceName,
    /// Tracker transition caused by the announcement.
    pub kind: DiscoveryKind,
    /// Time the tracker observed the announcement.
    pub at: DateTime<Utc>,
}

/// Tracked services split by freshness.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FreshnessPartition {
    /// Services announced within the window, in discovery order.
    pub fresh: Vec<TrackedService>,
    /// Services whose last announcement is older than the window, in
    /// discovery order.
    pub stale: Vec<TrackedService>,
}

/// Latest-wins record of every announced service.
///
/// Entries are never removed; they only go stale.
#[derive(Debug, Clone)]
pub struct ServiceTracker {
    services: HashMap<ServiceName, TrackedService>,
    next_sequence: u64,
    log: VecDeque<DiscoveryEvent>,
    log_capacity: usize,
}

impl ServiceTracker {
    /// Creates an empty tracker keeping at most `log_capacity` events.
    #[must_use]
    pub fn new(log_capacity: usize) -> Self {
        Self {
            services: HashMap::new(),
            next_sequence: 0,
            log: VecDeque::with_capacity(log_capacity.min(DEFAULT_DISCOVERY_LOG_CAPACITY)),
            log_capacity,
        }
    }

    /// Records an announcement seen at `now`.
    pub fn observe(&mut self, announcement: &Announcement, now: DateTime<Utc>) -> DiscoveryKind {
        let name = announcement.service_name().clone();
        let kind = match self.services.entry(name.clone()) {
            Entry::Occupied(mut occupied) => {
                if occupied.get_mut().refresh(announcement.clone(), now) {
                    DiscoveryKind::Updated
                } else {
                    DiscoveryKind::Refreshed
                }
            }
            Entry::Vacant(vacant) => {
                let sequence = self.next_sequence;
                self.next_sequence += 1;
                vacant.insert(TrackedService::discovered(announcement.clone(), sequence, now));
                DiscoveryKind::Discovered
            }
        };

        self.push_event(DiscoveryEvent {
            service_name: name,
            kind,
            at: now,
        });
        kind
    }

    fn push_event(&mut self, event: DiscoveryEvent) {
        if self.log_capacity == 0 {
            return;
        }
        while self.log.len() >= self.log_capacity {
            self.log.pop_front();
        }
        self.log.push_back(event);
    }

    /// Returns the tracked record for a service name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&TrackedService> {
        self.services.get(name)
    }

    /// Returns every tracked service in discovery order.
    #[must_use]
    pub fn in_discovery_order(&self) -> Vec<&TrackedService> {
        let mut services: Vec<&TrackedService> = self.services.values().collect();
        services.sort_by_key(|tracked| tracked.sequence());
        services
    }

    /// Splits tracked services into fresh and stale at `now`.
    #[must_use]
    pub fn partition(&self, now: DateTime<Utc>, window: FreshnessWindow) -> FreshnessPartition {
        let (fresh, stale): (Vec<TrackedService>, Vec<TrackedService>) = self
            .in_discovery_order()
            .into_iter()
            .cloned()
            .partition(|tracked| tracked.is_fresh(now, window));
        FreshnessPartition { fresh, stale }
    }

    /// Returns the retained discovery events, oldest first.
    pub fn discovery_log(&self) -> impl Iterator<Item = &DiscoveryEvent> {
        self.log.iter()
    }

    /// Returns the number of tracked services.
    #[must_use]
    pub fn len(&self) -> usize {
        self.services.len()
    }

    /// Returns whether no service has been tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

impl Default for ServiceTracker {
    fn default() -> Self {
        Self::new(DEFAULT_DISCOVERY_LOG_CAPACITY)
    }
}
