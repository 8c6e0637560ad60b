//! Domain keyword table used by the router.

/// One request keyword and the service-name hints it points to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordHints {
    keyword: String,
    hints: Vec<String>,
}

impl KeywordHints {
    /// Returns the lowercased request keyword.
    #[must_use]
    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    /// Returns the lowercased service-name hints.
    #[must_use]
    pub fn hints(&self) -> &[String] {
        &self.hints
    }

    /// Counts the hints that occur in the lowercased service name.
    #[must_use]
    pub fn hint_hits(&self, service_name_lower: &str) -> usize {
        self.hints
            .iter()
            .filter(|hint| service_name_lower.contains(hint.as_str()))
            .count()
    }
}

/// Keyword -> service-name-hint table for domain vocabulary.
///
/// When a keyword occurs in a request, every known service whose name
/// contains one of the keyword's hints becomes relevant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainKeywordTable {
    entries: Vec<KeywordHints>,
}

impl DomainKeywordTable {
    /// Creates a table with no entries.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Adds a keyword with its service-name hints.
    ///
    /// Blank hints are dropped. The entry is skipped when the keyword is
    /// blank or no hints remain.
    #[must_use]
    pub fn with_entry<S>(mut self, keyword: impl Into<String>, hints: impl IntoIterator<Item = S>) -> Self
    where
        S: Into<String>,
    {
        let entry = KeywordHints {
            keyword: keyword.into().trim().to_lowercase(),
            hints: hints
                .into_iter()
                .map(|hint| hint.into().to_lowercase())
                .filter(|hint| !hint.trim().is_empty())
                .collect(),
        };
        if !entry.keyword.is_empty() && !entry.hints.is_empty() {
            self.entries.push(entry);
        }
        self
    }

    /// Returns the entries whose keyword occurs in a lowercased request.
    pub fn matching<'a>(&'a self, request_lower: &'a str) -> impl Iterator<Item = &'a KeywordHints> {
        self.entries
            .iter()
            .filter(move |entry| request_lower.contains(entry.keyword.as_str()))
    }

    /// Returns all entries in table order.
    #[must_use]
    pub fn entries(&self) -> &[KeywordHints] {
        &self.entries
    }
}

impl Default for DomainKeywordTable {
    fn default() -> Self {
        Self::empty()
            .with_entry(
                "tournament",
                ["Database Service", "Start.gg Sync", "Tournament Operations"],
            )
            .with_entry("player", ["Database Service", "Polymorphic Query"])
            .with_entry("edit", ["Web Editor Service"])
            .with_entry("sync", ["Start.gg Sync", "Tournament Operations"])
            .with_entry("organization", ["Web Editor Service", "Database Service"])
            .with_entry("heat", ["Visualization Service", "Analytics"])
            .with_entry("stats", ["Database Service", "Analytics"])
            .with_entry("discord", ["Discord Bridge", "Discord Service"])
    }
}
