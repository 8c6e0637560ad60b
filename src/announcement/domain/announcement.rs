//! Service announcements and their history records.

use super::{AnnouncementDomainError, AnnouncementId, ServiceName};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One self-description emitted by a component.
///
/// Capability and example strings are free text. The bus never interprets
/// them beyond case-insensitive substring checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Announcement {
    service_name: ServiceName,
    capabilities: Vec<String>,
    #[serde(default)]
    examples: Vec<String>,
}

impl Announcement {
    /// Creates an announcement with no examples.
    ///
    /// # Errors
    ///
    /// Returns [`AnnouncementDomainError`] when the service name is invalid.
    pub fn new<S>(
        service_name: impl Into<String>,
        capabilities: impl IntoIterator<Item = S>,
    ) -> Result<Self, AnnouncementDomainError>
    where
        S: Into<String>,
    {
        Ok(Self {
            service_name: ServiceName::new(service_name)?,
            capabilities: capabilities.into_iter().map(Into::into).collect(),
            examples: Vec::new(),
        })
    }

    /// Sets the example invocations.
    #[must_use]
    pub fn with_examples<S>(mut self, examples: impl IntoIterator<Item = S>) -> Self
    where
        S: Into<String>,
    {
        self.examples = examples.into_iter().map(Into::into).collect();
        self
    }

    /// Returns the announcing service name.
    #[must_use]
    pub const fn service_name(&self) -> &ServiceName {
        &self.service_name
    }

    /// Returns the announced capabilities in declaration order.
    #[must_use]
    pub fn capabilities(&self) -> &[String] {
        &self.capabilities
    }

    /// Returns the example invocations in declaration order.
    #[must_use]
    pub fn examples(&self) -> &[String] {
        &self.examples
    }
}

/// Entry in the append-only announcement history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnouncementRecord {
    id: AnnouncementId,
    announcement: Announcement,
    announced_at: DateTime<Utc>,
}

impl AnnouncementRecord {
    /// Creates a history record stamped with the bus clock time.
    #[must_use]
    pub fn new(announcement: Announcement, announced_at: DateTime<Utc>) -> Self {
        Self {
            id: AnnouncementId::new(),
            announcement,
            announced_at,
        }
    }

    /// Returns the record identifier.
    #[must_use]
    pub const fn id(&self) -> AnnouncementId {
        self.id
    }

    /// Returns the recorded announcement.
    #[must_use]
    pub const fn announcement(&self) -> &Announcement {
        &self.announcement
    }

    /// Returns the time the bus accepted the announcement.
    #[must_use]
    pub const fn announced_at(&self) -> DateTime<Utc> {
        self.announced_at
    }
}
