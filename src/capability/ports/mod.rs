//! Port contracts for capability providers.

pub mod provider;

pub use provider::{
    CapabilityFactory, CapabilityInstance, CapabilityProvider, FactoryError, FactoryResult,
};

#[cfg(test)]
pub use provider::MockCapabilityFactory;
