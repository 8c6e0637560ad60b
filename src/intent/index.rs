//! Tag to service index built from announcements.

use super::IntentTag;

/// Maps intent tags to the services whose announcements produced them.
///
/// A service appears at most once per tag no matter how often it
/// re-announces; order is first insertion. Tags are kept in the order they
/// were first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatternIndex {
    entries: Vec<(IntentTag, Vec<String>)>,
}

impl PatternIndex {
    /// Creates an empty index.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Records that `service` produced each of `tags`.
    ///
    /// Blank tags are ignored.
    pub fn record(&mut self, service: &str, tags: &[IntentTag]) {
        for tag in tags.iter().filter(|tag| !tag.is_blank()) {
            let position = self
                .entries
                .iter()
                .position(|(known, _)| known == tag)
                .unwrap_or_else(|| {
                    self.entries.push((tag.clone(), Vec::new()));
                    self.entries.len() - 1
                });
            if let Some((_, services)) = self.entries.get_mut(position)
                && !services.iter().any(|known| known == service)
            {
                services.push(service.to_owned());
            }
        }
    }

    /// Returns the services recorded for a tag, empty when unknown.
    #[must_use]
    pub fn services_for(&self, tag: &str) -> &[String] {
        self.entries
            .iter()
            .find(|(known, _)| known.as_str() == tag)
            .map(|(_, services)| services.as_slice())
            .unwrap_or_default()
    }

    /// Iterates over `(tag, services)` pairs in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&IntentTag, &[String])> {
        self.entries
            .iter()
            .map(|(tag, services)| (tag, services.as_slice()))
    }

    /// Returns the known tags in first-seen order.
    #[must_use]
    pub fn tags(&self) -> Vec<IntentTag> {
        self.entries.iter().map(|(tag, _)| tag.clone()).collect()
    }

    /// Returns the number of distinct tags.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether no tag has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
