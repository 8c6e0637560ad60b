//! Result of routing a free-text request.

use crate::announcement::domain::ServiceName;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Error text reported when no service matches a request.
pub const NO_MATCH_ERROR: &str = "No relevant services found for this request";

/// Suggestion reported alongside [`NO_MATCH_ERROR`].
pub const NO_MATCH_SUGGESTION: &str = "Try starting the appropriate service first";

/// Outcome of [`DynamicRouter::route_to_service`](crate::routing::services::DynamicRouter::route_to_service).
///
/// "No match" is an ordinary outcome rather than an error. Both variants
/// serialise with a boolean `success` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteOutcome {
    /// No known service is relevant.
    Unmatched {
        /// Why routing failed.
        error: String,
        /// What the caller could try instead.
        suggestion: String,
    },
    /// The request was routed to the top-ranked service.
    Routed {
        /// Top-ranked service.
        routed_to: ServiceName,
        /// Capabilities the top-ranked service last announced.
        service_capabilities: Vec<String>,
        /// Number of relevant services found.
        confidence: usize,
        /// Remaining relevant services in rank order.
        alternatives: Vec<ServiceName>,
    },
}

impl RouteOutcome {
    /// Creates the standard unmatched outcome.
    #[must_use]
    pub fn unmatched() -> Self {
        Self::Unmatched {
            error: NO_MATCH_ERROR.to_owned(),
            suggestion: NO_MATCH_SUGGESTION.to_owned(),
        }
    }

    /// Returns whether a service was chosen.
    #[must_use]
    pub const fn success(&self) -> bool {
        matches!(self, Self::Routed { .. })
    }

    /// Returns the chosen service, if any.
    #[must_use]
    pub const fn routed_to(&self) -> Option<&ServiceName> {
        match self {
            Self::Routed { routed_to, .. } => Some(routed_to),
            Self::Unmatched { .. } => None,
        }
    }
}

impl Serialize for RouteOutcome {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Unmatched { error, suggestion } => {
                let mut map = serializer.serialize_map(Some(3))?;
                map.serialize_entry("success", &false)?;
                map.serialize_entry("error", error)?;
                map.serialize_entry("suggestion", suggestion)?;
                map.end()
            }
            Self::Routed {
                routed_to,
                service_capabilities,
                confidence,
                alternatives,
            } => {
                let mut map = serializer.serialize_map(Some(5))?;
                map.serialize_entry("success", &true)?;
                map.serialize_entry("routed_to", routed_to)?;
                map.serialize_entry("service_capabilities", service_capabilities)?;
                map.serialize_entry("confidence", confidence)?;
                map.serialize_entry("alternatives", alternatives)?;
                map.end()
            }
        }
    }
}
