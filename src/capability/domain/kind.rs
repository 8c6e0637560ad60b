//! Capability categories.

use super::CapabilityDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Category a capability is listed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapabilityKind {
    /// Data model accessors.
    Model,
    /// Long-lived service objects.
    Service,
    /// Stateless callables such as queries or calculators.
    Function,
}

impl CapabilityKind {
    /// Infers a category from a capability name.
    ///
    /// Names mentioning `model` are models; names mentioning `function`,
    /// `query` or `calc` are functions; anything else is a service.
    #[must_use]
    pub fn infer(name: &str) -> Self {
        let lowered = name.to_lowercase();
        if lowered.contains("model") {
            Self::Model
        } else if ["function", "query", "calc"]
            .iter()
            .any(|marker| lowered.contains(marker))
        {
            Self::Function
        } else {
            Self::Service
        }
    }

    /// Returns the canonical lowercase representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Model => "model",
            Self::Service => "service",
            Self::Function => "function",
        }
    }
}

impl fmt::Display for CapabilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for CapabilityKind {
    type Error = CapabilityDomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "model" | "models" => Ok(Self::Model),
            "service" | "services" => Ok(Self::Service),
            "function" | "functions" => Ok(Self::Function),
            _ => Err(CapabilityDomainError::UnknownKind(value.to_owned())),
        }
    }
}
