//! Domain model for direct capability lookup.

mod error;
mod kind;
mod listing;
mod name;

pub use error::CapabilityDomainError;
pub use kind::CapabilityKind;
pub use listing::{CapabilityInfo, CapabilityListing, ProviderStyle};
pub use name::CapabilityName;
