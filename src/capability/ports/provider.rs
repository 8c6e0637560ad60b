//! Provider port: how a registered capability yields its value.

use crate::capability::domain::ProviderStyle;
use std::any::Any;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Type-erased value handed out by discovery.
pub type CapabilityInstance = Arc<dyn Any + Send + Sync>;

/// Result type returned by capability factories.
pub type FactoryResult = Result<CapabilityInstance, FactoryError>;

/// Zero-argument constructor for a capability value.
///
/// Any `Fn() -> FactoryResult` closure is a factory.
#[cfg_attr(test, mockall::automock)]
pub trait CapabilityFactory: Send + Sync {
    /// Builds a fresh capability value.
    ///
    /// # Errors
    ///
    /// Returns [`FactoryError`] when the value cannot be built. Discovery
    /// propagates the error to the caller.
    fn create(&self) -> FactoryResult;
}

impl<F> CapabilityFactory for F
where
    F: Fn() -> FactoryResult + Send + Sync,
{
    fn create(&self) -> FactoryResult {
        self()
    }
}

/// Failure raised by a capability factory.
#[derive(Debug, Clone, Error)]
pub enum FactoryError {
    /// The factory failed with a message.
    #[error("{0}")]
    Message(String),

    /// The factory hit an underlying failure.
    #[error("factory failure: {0}")]
    Failed(Arc<dyn std::error::Error + Send + Sync>),
}

impl FactoryError {
    /// Creates a factory failure from a message.
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }

    /// Wraps an underlying error.
    #[must_use]
    pub fn failed(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Failed(Arc::new(err))
    }
}

/// Source of a registered capability's value.
#[derive(Clone)]
pub enum CapabilityProvider {
    /// Invoked with no arguments on every discovery.
    Factory(Arc<dyn CapabilityFactory>),
    /// Returned shared on every discovery.
    Instance(CapabilityInstance),
}

impl CapabilityProvider {
    /// Wraps a closure returning a typed value as a factory provider.
    pub fn factory<T, F>(factory: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn() -> Result<T, FactoryError> + Send + Sync + 'static,
    {
        Self::Factory(Arc::new(move || {
            factory().map(|value| Arc::new(value) as CapabilityInstance)
        }))
    }

    /// Wraps a value as a shared instance provider.
    pub fn instance<T>(value: T) -> Self
    where
        T: Any + Send + Sync,
    {
        Self::Instance(Arc::new(value))
    }

    /// Produces the capability value.
    ///
    /// # Errors
    ///
    /// Returns [`FactoryError`] when a factory provider fails.
    pub fn provide(&self) -> FactoryResult {
        match self {
            Self::Factory(factory) => factory.create(),
            Self::Instance(instance) => Ok(Arc::clone(instance)),
        }
    }

    /// Returns the provider style.
    #[must_use]
    pub const fn style(&self) -> ProviderStyle {
        match self {
            Self::Factory(_) => ProviderStyle::Factory,
            Self::Instance(_) => ProviderStyle::Instance,
        }
    }
}

impl fmt::Debug for CapabilityProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Factory(_) => f.write_str("CapabilityProvider::Factory(..)"),
            Self::Instance(_) => f.write_str("CapabilityProvider::Instance(..)"),
        }
    }
}
