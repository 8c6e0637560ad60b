//! Capability registry service.

mod registry;

pub use registry::{
    CapabilityError, CapabilityRegistration, CapabilityRegistry, CapabilityResult,
};
