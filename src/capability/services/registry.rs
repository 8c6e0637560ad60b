//! Keyed capability registry for direct, non-fuzzy lookup.

use crate::capability::{
    domain::{
        CapabilityDomainError, CapabilityInfo, CapabilityKind, CapabilityListing, CapabilityName,
    },
    ports::{CapabilityInstance, CapabilityProvider, FactoryError},
};
use minijinja::Environment;
use mockable::{Clock, DefaultClock};
use serde_json::json;
use std::any::{self, Any};
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use thiserror::Error;
use tracing::{debug, warn};

const DESCRIBE_TEMPLATE: &str = "\
=== Registered Capabilities ===
{% for section in sections %}

{{ section.title }} ({{ section.entries | length }}):
{% for entry in section.entries %}
  - {{ entry.name }} [{{ entry.provider }}]{% if entry.description %}: {{ entry.description }}{% endif %}

{% else %}
  (none)
{% endfor %}
{% endfor %}";

/// Errors returned by registry operations.
#[derive(Debug, Clone, Error)]
pub enum CapabilityError {
    /// The capability name failed validation.
    #[error(transparent)]
    Domain(#[from] CapabilityDomainError),

    /// A factory provider failed while building the value.
    #[error("capability {name} factory failed: {source}")]
    Factory {
        /// Capability being discovered.
        name: String,
        /// Factory failure.
        #[source]
        source: FactoryError,
    },

    /// The registered value is not of the requested type.
    #[error("capability {name} is not a {expected}")]
    TypeMismatch {
        /// Capability being discovered.
        name: String,
        /// Requested Rust type name.
        expected: &'static str,
    },

    /// A thread panicked while holding the registry lock.
    #[error("capability registry state lock poisoned")]
    StatePoisoned,

    /// The registry description could not be rendered.
    #[error("failed to render capability description: {0}")]
    Render(String),
}

/// Result type for registry operations.
pub type CapabilityResult<T> = Result<T, CapabilityError>;

/// Provider plus optional metadata, ready to register.
#[derive(Debug, Clone)]
pub struct CapabilityRegistration {
    provider: CapabilityProvider,
    kind: Option<CapabilityKind>,
    description: Option<String>,
}

impl CapabilityRegistration {
    /// Creates a registration whose kind is inferred from its name.
    #[must_use]
    pub const fn new(provider: CapabilityProvider) -> Self {
        Self {
            provider,
            kind: None,
            description: None,
        }
    }

    /// Sets an explicit listing category.
    #[must_use]
    pub const fn with_kind(mut self, kind: CapabilityKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Sets a human description shown by [`CapabilityRegistry::describe`].
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

#[derive(Debug, Clone)]
struct Entry {
    registration: CapabilityRegistration,
    info: CapabilityInfo,
}

/// Name-keyed map of capability providers.
///
/// Registration is last-wins. Factories run outside the registry lock, so a
/// factory may itself discover other capabilities.
pub struct CapabilityRegistry<C = DefaultClock>
where
    C: Clock + Send + Sync,
{
    entries: RwLock<BTreeMap<CapabilityName, Entry>>,
    clock: Arc<C>,
}

impl CapabilityRegistry<DefaultClock> {
    /// Creates an empty registry using the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(DefaultClock))
    }
}

impl Default for CapabilityRegistry<DefaultClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> CapabilityRegistry<C>
where
    C: Clock + Send + Sync,
{
    /// Creates an empty registry with an explicit clock.
    #[must_use]
    pub fn with_clock(clock: Arc<C>) -> Self {
        Self {
            entries: RwLock::new(BTreeMap::new()),
            clock,
        }
    }

    fn read_entries(&self) -> CapabilityResult<RwLockReadGuard<'_, BTreeMap<CapabilityName, Entry>>> {
        self.entries
            .read()
            .map_err(|_| CapabilityError::StatePoisoned)
    }

    fn write_entries(
        &self,
    ) -> CapabilityResult<RwLockWriteGuard<'_, BTreeMap<CapabilityName, Entry>>> {
        self.entries
            .write()
            .map_err(|_| CapabilityError::StatePoisoned)
    }

    // ── Registration ───────────────────────────────────────────────────

    /// Registers a capability, replacing any earlier registration under the
    /// same name.
    ///
    /// # Errors
    ///
    /// Returns [`CapabilityError::Domain`] when the name is invalid, or
    /// [`CapabilityError::StatePoisoned`] when the registry lock is
    /// poisoned.
    pub fn register(
        &self,
        name: impl Into<String>,
        registration: CapabilityRegistration,
    ) -> CapabilityResult<()> {
        let capability = CapabilityName::new(name)?;
        let info = CapabilityInfo {
            name: capability.clone(),
            kind: registration
                .kind
                .unwrap_or_else(|| CapabilityKind::infer(capability.as_str())),
            explicit_kind: registration.kind.is_some(),
            provider: registration.provider.style(),
            description: registration.description.clone(),
            registered_at: self.clock.utc(),
        };
        let kind = info.kind;
        let replaced = self
            .write_entries()?
            .insert(capability.clone(), Entry { registration, info })
            .is_some();
        debug!(capability = %capability, %kind, replaced, "capability registered");
        Ok(())
    }

    /// Registers a provider with an inferred category.
    ///
    /// # Errors
    ///
    /// See [`CapabilityRegistry::register`].
    pub fn register_capability(
        &self,
        name: impl Into<String>,
        provider: CapabilityProvider,
    ) -> CapabilityResult<()> {
        self.register(name, CapabilityRegistration::new(provider))
    }

    /// Registers a provider under an explicit category.
    ///
    /// # Errors
    ///
    /// See [`CapabilityRegistry::register`].
    pub fn register_capability_as(
        &self,
        name: impl Into<String>,
        kind: CapabilityKind,
        provider: CapabilityProvider,
    ) -> CapabilityResult<()> {
        self.register(name, CapabilityRegistration::new(provider).with_kind(kind))
    }

    /// Registers a zero-argument factory.
    ///
    /// # Errors
    ///
    /// See [`CapabilityRegistry::register`].
    pub fn register_factory<T, F>(&self, name: impl Into<String>, factory: F) -> CapabilityResult<()>
    where
        T: Any + Send + Sync,
        F: Fn() -> Result<T, FactoryError> + Send + Sync + 'static,
    {
        self.register_capability(name, CapabilityProvider::factory(factory))
    }

    /// Registers a shared instance.
    ///
    /// # Errors
    ///
    /// See [`CapabilityRegistry::register`].
    pub fn register_instance<T>(&self, name: impl Into<String>, value: T) -> CapabilityResult<()>
    where
        T: Any + Send + Sync,
    {
        self.register_capability(name, CapabilityProvider::instance(value))
    }

    // ── Discovery ──────────────────────────────────────────────────────

    /// Looks up a capability and produces its value.
    ///
    /// Factories are invoked with no arguments on every call; instances are
    /// returned shared. An unregistered name yields `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`CapabilityError::Factory`] when the factory fails, or
    /// [`CapabilityError::StatePoisoned`] when the registry lock is
    /// poisoned.
    pub fn discover_capability(&self, name: &str) -> CapabilityResult<Option<CapabilityInstance>> {
        let key = name.trim();
        let registered = self
            .read_entries()?
            .get(key)
            .map(|entry| entry.registration.provider.clone());
        let Some(provider) = registered else {
            debug!(capability = key, "capability not registered");
            return Ok(None);
        };

        provider.provide().map(Some).map_err(|source| {
            warn!(capability = key, error = %source, "capability factory failed");
            CapabilityError::Factory {
                name: key.to_owned(),
                source,
            }
        })
    }

    /// Looks up a capability and downcasts it to `T`.
    ///
    /// # Errors
    ///
    /// Returns [`CapabilityError::TypeMismatch`] when the value is not a
    /// `T`, plus every error of
    /// [`CapabilityRegistry::discover_capability`].
    pub fn discover<T>(&self, name: &str) -> CapabilityResult<Option<Arc<T>>>
    where
        T: Any + Send + Sync,
    {
        self.discover_capability(name)?
            .map(|instance| {
                instance
                    .downcast::<T>()
                    .map_err(|_| CapabilityError::TypeMismatch {
                        name: name.trim().to_owned(),
                        expected: any::type_name::<T>(),
                    })
            })
            .transpose()
    }

    /// Returns whether a capability is registered.
    ///
    /// # Errors
    ///
    /// Returns [`CapabilityError::StatePoisoned`] when the registry lock is
    /// poisoned.
    pub fn contains(&self, name: &str) -> CapabilityResult<bool> {
        Ok(self.read_entries()?.contains_key(name.trim()))
    }

    /// Returns the number of registered capabilities.
    ///
    /// # Errors
    ///
    /// Returns [`CapabilityError::StatePoisoned`] when the registry lock is
    /// poisoned.
    pub fn len(&self) -> CapabilityResult<usize> {
        Ok(self.read_entries()?.len())
    }

    /// Returns whether nothing is registered.
    ///
    /// # Errors
    ///
    /// Returns [`CapabilityError::StatePoisoned`] when the registry lock is
    /// poisoned.
    pub fn is_empty(&self) -> CapabilityResult<bool> {
        Ok(self.read_entries()?.is_empty())
    }

    // ── Introspection ──────────────────────────────────────────────────

    /// Lists registered names by category, sorted within each category.
    ///
    /// # Errors
    ///
    /// Returns [`CapabilityError::StatePoisoned`] when the registry lock is
    /// poisoned.
    pub fn list_capabilities(&self) -> CapabilityResult<CapabilityListing> {
        let entries = self.read_entries()?;
        let mut listing = CapabilityListing::default();
        for (name, entry) in entries.iter() {
            let bucket = match entry.info.kind {
                CapabilityKind::Model => &mut listing.models,
                CapabilityKind::Service => &mut listing.services,
                CapabilityKind::Function => &mut listing.functions,
            };
            bucket.push(name.to_string());
        }
        Ok(listing)
    }

    /// Returns metadata for one registration.
    ///
    /// # Errors
    ///
    /// Returns [`CapabilityError::StatePoisoned`] when the registry lock is
    /// poisoned.
    pub fn capability_info(&self, name: &str) -> CapabilityResult<Option<CapabilityInfo>> {
        Ok(self
            .read_entries()?
            .get(name.trim())
            .map(|entry| entry.info.clone()))
    }

    /// Renders the registrations by category for an LLM prompt.
    ///
    /// # Errors
    ///
    /// Returns [`CapabilityError::StatePoisoned`] when the registry lock is
    /// poisoned, or [`CapabilityError::Render`] when the template fails.
    pub fn describe(&self) -> CapabilityResult<String> {
        let entries = self.read_entries()?;
        let sections: Vec<_> = [
            (CapabilityKind::Model, "Models"),
            (CapabilityKind::Service, "Services"),
            (CapabilityKind::Function, "Functions"),
        ]
        .into_iter()
        .map(|(kind, title)| {
            let rows: Vec<_> = entries
                .values()
                .filter(|entry| entry.info.kind == kind)
                .map(|entry| {
                    json!({
                        "name": entry.info.name.as_str(),
                        "provider": entry.info.provider,
                        "description": entry.info.description,
                    })
                })
                .collect();
            json!({ "title": title, "entries": rows })
        })
        .collect();

        let mut environment = Environment::new();
        environment.set_trim_blocks(true);
        environment.set_lstrip_blocks(true);
        environment
            .render_str(DESCRIBE_TEMPLATE, json!({ "sections": sections }))
            .map_err(|err| CapabilityError::Render(err.to_string()))
    }
}
