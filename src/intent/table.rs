//! Keyword tables mapping free text to intent tags.

use super::IntentTag;

/// One tag and the substrings that select it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternRule {
    tag: IntentTag,
    needles: Vec<String>,
}

impl PatternRule {
    /// Creates a rule; needles are lowercased.
    ///
    /// Blank needles are dropped, and a blank tag drops every needle, so
    /// such a rule never matches.
    #[must_use]
    pub fn new<S>(tag: impl Into<IntentTag>, needles: impl IntoIterator<Item = S>) -> Self
    where
        S: Into<String>,
    {
        let rule_tag = tag.into();
        let kept = if rule_tag.is_blank() {
            Vec::new()
        } else {
            needles
                .into_iter()
                .map(|needle| needle.into().to_lowercase())
                .filter(|needle| !needle.trim().is_empty())
                .collect()
        };
        Self {
            tag: rule_tag,
            needles: kept,
        }
    }

    /// Returns whether the rule has no needles and can never match.
    #[must_use]
    pub fn is_inert(&self) -> bool {
        self.needles.is_empty()
    }

    /// Returns the tag this rule produces.
    #[must_use]
    pub const fn tag(&self) -> &IntentTag {
        &self.tag
    }

    /// Returns the lowercased needles.
    #[must_use]
    pub fn needles(&self) -> &[String] {
        &self.needles
    }

    /// Returns whether any needle occurs in already-lowercased text.
    #[must_use]
    pub fn matches_lowercase(&self, text: &str) -> bool {
        self.needles.iter().any(|needle| text.contains(needle.as_str()))
    }
}

/// Static keyword heuristic turning announcement text into intent tags.
///
/// Capability rules are checked against capability strings; example rules
/// against example invocations. Matching is a case-insensitive substring
/// test with no stemming and no synonyms beyond the table itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternTable {
    capability_rules: Vec<PatternRule>,
    example_rules: Vec<PatternRule>,
}

impl PatternTable {
    /// Creates a table with no rules.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            capability_rules: Vec::new(),
            example_rules: Vec::new(),
        }
    }

    /// Adds a rule matched against capability strings.
    ///
    /// A rule left without needles is not added.
    #[must_use]
    pub fn with_capability_rule<S>(
        mut self,
        tag: impl Into<IntentTag>,
        needles: impl IntoIterator<Item = S>,
    ) -> Self
    where
        S: Into<String>,
    {
        let rule = PatternRule::new(tag, needles);
        if !rule.is_inert() {
            self.capability_rules.push(rule);
        }
        self
    }

    /// Adds a rule matched against example strings.
    ///
    /// A rule left without needles is not added.
    #[must_use]
    pub fn with_example_rule<S>(
        mut self,
        tag: impl Into<IntentTag>,
        needles: impl IntoIterator<Item = S>,
    ) -> Self
    where
        S: Into<String>,
    {
        let rule = PatternRule::new(tag, needles);
        if !rule.is_inert() {
            self.example_rules.push(rule);
        }
        self
    }

    /// Returns the capability rules in table order.
    #[must_use]
    pub fn capability_rules(&self) -> &[PatternRule] {
        &self.capability_rules
    }

    /// Returns the example rules in table order.
    #[must_use]
    pub fn example_rules(&self) -> &[PatternRule] {
        &self.example_rules
    }

    /// Extracts the distinct tags found in capability and example text.
    ///
    /// Tags are returned in table order: capability rules first, then
    /// example rules.
    #[must_use]
    pub fn extract(&self, capabilities: &[String], examples: &[String]) -> Vec<IntentTag> {
        let capability_text: Vec<String> =
            capabilities.iter().map(|text| text.to_lowercase()).collect();
        let example_text: Vec<String> = examples.iter().map(|text| text.to_lowercase()).collect();

        let mut tags: Vec<IntentTag> = Vec::new();
        let scans = self
            .capability_rules
            .iter()
            .map(|rule| (rule, capability_text.as_slice()))
            .chain(
                self.example_rules
                    .iter()
                    .map(|rule| (rule, example_text.as_slice())),
            );
        for (rule, texts) in scans {
            if texts.iter().any(|text| rule.matches_lowercase(text)) && !tags.contains(rule.tag())
            {
                tags.push(rule.tag().clone());
            }
        }
        tags
    }
}

impl Default for PatternTable {
    fn default() -> Self {
        Self::empty()
            .with_capability_rule("edit", ["edit", "update", "modify", "change"])
            .with_capability_rule("show", ["show", "display", "list", "get"])
            .with_capability_rule("sync", ["sync", "synchronize", "fetch"])
            .with_capability_rule("generate", ["generate", "create", "make"])
            .with_example_rule("ask", ["ask("])
            .with_example_rule("tell", ["tell("])
            .with_example_rule("do", ["do("])
    }
}
