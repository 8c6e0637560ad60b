//! Process-level wiring of the bus, capability registry and router.
//!
//! A [`DiscoveryHub`] is built once at start-up and its handles are passed to
//! every component that announces or discovers. Tests build their own hub
//! or the individual parts.

use crate::announcement::services::{AnnouncementBus, BusResult, BusStats};
use crate::capability::services::CapabilityRegistry;
use crate::config::DiscoveryConfig;
use crate::routing::services::{DynamicRouter, SelfAnnouncementListener};
use mockable::{Clock, DefaultClock};
use std::sync::Arc;
use tracing::info;

/// Name the hub announces the registry under.
pub const REGISTRY_SERVICE_NAME: &str = "Service Registry";

/// Shared handles to the discovery stack.
pub struct DiscoveryHub<C = DefaultClock>
where
    C: Clock + Send + Sync,
{
    config: DiscoveryConfig,
    bus: Arc<AnnouncementBus<C>>,
    capabilities: Arc<CapabilityRegistry<C>>,
    router: Arc<DynamicRouter<C>>,
}

impl DiscoveryHub<DefaultClock> {
    /// Starts the stack with the system clock.
    ///
    /// # Errors
    ///
    /// Returns a [`BusError`](crate::announcement::services::BusError) when
    /// the configured router name is invalid or a start-up announcement
    /// fails.
    pub fn start(config: DiscoveryConfig) -> BusResult<Self> {
        Self::start_with_clock(config, Arc::new(DefaultClock))
    }
}

impl<C> DiscoveryHub<C>
where
    C: Clock + Send + Sync + 'static,
{
    /// Starts the stack with an explicit clock.
    ///
    /// When `announce_on_start` is set the registry and the router announce
    /// themselves before this returns. When `self_announce_every` is
    /// non-zero the router announces itself again after that many
    /// announcements from other services.
    ///
    /// # Errors
    ///
    /// Returns a [`BusError`](crate::announcement::services::BusError) when
    /// the configured router name is invalid or a start-up announcement
    /// fails.
    pub fn start_with_clock(config: DiscoveryConfig, clock: Arc<C>) -> BusResult<Self> {
        let bus = Arc::new(AnnouncementBus::with_clock(&config, Arc::clone(&clock)));
        let capabilities = Arc::new(CapabilityRegistry::with_clock(clock));
        let router = Arc::new(DynamicRouter::new(Arc::clone(&bus), &config)?);
        let hub = Self {
            config,
            bus,
            capabilities,
            router,
        };

        if hub.config.announce_on_start {
            hub.announce_registry()?;
            hub.router.announce_self()?;
        }
        if hub.config.self_announce_every > 0 {
            hub.bus.add_listener(Arc::new(SelfAnnouncementListener::new(
                Arc::downgrade(&hub.router),
                hub.config.self_announce_every,
            )))?;
        }
        info!(
            dispatch = %hub.config.dispatch,
            freshness_window_secs = hub.config.freshness_window_secs,
            "discovery hub started"
        );
        Ok(hub)
    }

    fn announce_registry(&self) -> BusResult<()> {
        self.bus.announce_with_examples(
            REGISTRY_SERVICE_NAME,
            [
                "Keep the latest announcement of every service",
                "Notify listeners when services announce themselves",
                "Deliver directed and broadcast signals to services",
                "Report which services are fresh and which are stale",
            ],
            [
                "discover('Database Service')",
                "list_services()",
                "send_signal('reload')",
            ],
        )?;
        Ok(())
    }

    /// Returns the configuration the hub was started with.
    #[must_use]
    pub const fn config(&self) -> &DiscoveryConfig {
        &self.config
    }

    /// Returns the shared announcement bus.
    #[must_use]
    pub const fn bus(&self) -> &Arc<AnnouncementBus<C>> {
        &self.bus
    }

    /// Returns the shared capability registry.
    #[must_use]
    pub const fn capabilities(&self) -> &Arc<CapabilityRegistry<C>> {
        &self.capabilities
    }

    /// Returns the shared router.
    #[must_use]
    pub const fn router(&self) -> &Arc<DynamicRouter<C>> {
        &self.router
    }

    /// Stops the hub and returns the final bus counters.
    ///
    /// Handles cloned from the hub stay usable; shutdown only ends the
    /// hub's own ownership.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::StatePoisoned`](crate::announcement::services::BusError::StatePoisoned)
    /// when the bus lock is poisoned.
    pub fn shutdown(self) -> BusResult<BusStats> {
        let stats = self.bus.stats()?;
        info!(
            announcements = stats.total_announcements,
            services = stats.services,
            listeners = stats.listeners,
            "discovery hub stopped"
        );
        Ok(stats)
    }
}
