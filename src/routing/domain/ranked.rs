//! Scored routing candidates.

use crate::announcement::domain::ServiceName;
use serde::Serialize;

/// A relevant service with its match score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedService {
    service_name: ServiceName,
    score: usize,
    sequence: u64,
}

impl RankedService {
    /// Creates a candidate.
    #[must_use]
    pub const fn new(service_name: ServiceName, score: usize, sequence: u64) -> Self {
        Self {
            service_name,
            score,
            sequence,
        }
    }

    /// Returns the service name.
    #[must_use]
    pub const fn service_name(&self) -> &ServiceName {
        &self.service_name
    }

    /// Returns the number of signals that matched.
    #[must_use]
    pub const fn score(&self) -> usize {
        self.score
    }

    /// Returns the discovery sequence used to break ties.
    #[must_use]
    pub const fn sequence(&self) -> u64 {
        self.sequence
    }
}
