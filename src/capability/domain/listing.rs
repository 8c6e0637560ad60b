//! Read models returned by registry queries.

use super::{CapabilityKind, CapabilityName};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Registered capability names grouped by category, each list sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CapabilityListing {
    /// Model capabilities.
    pub models: Vec<String>,
    /// Service capabilities.
    pub services: Vec<String>,
    /// Function capabilities.
    pub functions: Vec<String>,
}

impl CapabilityListing {
    /// Returns the list for a category.
    #[must_use]
    pub fn of_kind(&self, kind: CapabilityKind) -> &[String] {
        match kind {
            CapabilityKind::Model => &self.models,
            CapabilityKind::Service => &self.services,
            CapabilityKind::Function => &self.functions,
        }
    }

    /// Returns the total number of listed capabilities.
    #[must_use]
    pub fn total(&self) -> usize {
        self.models.len() + self.services.len() + self.functions.len()
    }

    /// Returns whether no capabilities are listed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// How a capability produces its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderStyle {
    /// A factory invoked on every discovery.
    Factory,
    /// A shared instance handed out on every discovery.
    Instance,
}

/// Metadata about one registration, without its value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CapabilityInfo {
    /// Registered name.
    pub name: CapabilityName,
    /// Listing category.
    pub kind: CapabilityKind,
    /// Whether the kind was given explicitly rather than inferred.
    pub explicit_kind: bool,
    /// Provider style.
    pub provider: ProviderStyle,
    /// Optional human description.
    pub description: Option<String>,
    /// Time of the most recent registration under this name.
    pub registered_at: DateTime<Utc>,
}
