//! Point-in-time view of tracked services and the pattern index.

use crate::freshness::{FreshnessPartition, FreshnessWindow, TrackedService};
use crate::intent::PatternIndex;
use chrono::{DateTime, Utc};

/// Consistent copy of the bus state taken under a single read lock.
///
/// The router works from a catalogue so that scoring, ranking and rendering
/// all see the same services even while new announcements arrive.
#[derive(Debug, Clone)]
pub struct Catalogue {
    services: Vec<TrackedService>,
    index: PatternIndex,
    taken_at: DateTime<Utc>,
}

impl Catalogue {
    pub(crate) const fn new(
        services: Vec<TrackedService>,
        index: PatternIndex,
        taken_at: DateTime<Utc>,
    ) -> Self {
        Self {
            services,
            index,
            taken_at,
        }
    }

    /// Returns tracked services in discovery order.
    #[must_use]
    pub fn services(&self) -> &[TrackedService] {
        &self.services
    }

    /// Returns the pattern index.
    #[must_use]
    pub const fn index(&self) -> &PatternIndex {
        &self.index
    }

    /// Returns the bus clock time the catalogue was taken at.
    #[must_use]
    pub const fn taken_at(&self) -> DateTime<Utc> {
        self.taken_at
    }

    /// Looks up a tracked service by exact name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&TrackedService> {
        self.services
            .iter()
            .find(|tracked| tracked.service_name().as_str() == name)
    }

    /// Splits the services by freshness at the catalogue time.
    #[must_use]
    pub fn partition(&self, window: FreshnessWindow) -> FreshnessPartition {
        let (fresh, stale): (Vec<TrackedService>, Vec<TrackedService>) = self
            .services
            .iter()
            .cloned()
            .partition(|tracked| tracked.is_fresh(self.taken_at, window));
        FreshnessPartition { fresh, stale }
    }
}
