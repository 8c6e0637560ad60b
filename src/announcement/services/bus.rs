//! Process-wide announcement bus.

use super::catalogue::Catalogue;
use super::summary::{self, DirectoryFormat};
use crate::announcement::{
    adapters::{FnListener, FnSignalHandler, ListenerDispatcher, dispatch::panic_message},
    domain::{
        Announcement, AnnouncementDomainError, AnnouncementRecord, ServiceName, SignalResponse,
        SignalType,
    },
    ports::{AnnouncementListener, ListenerResult, SignalHandler, SignalHandlerResult},
};
use crate::config::DiscoveryConfig;
use crate::freshness::{
    DiscoveryEvent, DiscoveryKind, FreshnessPartition, FreshnessWindow, ServiceTracker,
    TrackedService,
};
use crate::intent::{PatternIndex, PatternTable};
use chrono::{DateTime, Utc};
use mockable::{Clock, DefaultClock};
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors returned by bus operations.
#[derive(Debug, Clone, Error)]
pub enum BusError {
    /// The announcement or service name failed validation.
    #[error(transparent)]
    Domain(#[from] AnnouncementDomainError),

    /// A thread panicked while holding the bus lock.
    #[error("announcement bus state lock poisoned")]
    StatePoisoned,

    /// A summary could not be rendered.
    #[error("failed to render bus summary: {0}")]
    Render(String),
}

/// Result type for bus operations.
pub type BusResult<T> = Result<T, BusError>;

/// Counters describing the bus.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BusStats {
    /// Announcements accepted since the bus was created.
    pub total_announcements: usize,
    /// Distinct service names seen.
    pub services: usize,
    /// Listeners notified of every announcement.
    pub listeners: usize,
    /// Listeners bound to a single service name.
    pub service_listeners: usize,
    /// Registered signal handlers.
    pub signal_handlers: usize,
    /// Intent tags in the pattern index.
    pub pattern_mappings: usize,
}

struct BusState {
    history: Vec<AnnouncementRecord>,
    tracker: ServiceTracker,
    index: PatternIndex,
    listeners: Vec<Arc<dyn AnnouncementListener>>,
    service_listeners: HashMap<ServiceName, Vec<Arc<dyn AnnouncementListener>>>,
    signal_handlers: BTreeMap<String, Arc<dyn SignalHandler>>,
}

impl BusState {
    fn new(log_capacity: usize) -> Self {
        Self {
            history: Vec::new(),
            tracker: ServiceTracker::new(log_capacity),
            index: PatternIndex::new(),
            listeners: Vec::new(),
            service_listeners: HashMap::new(),
            signal_handlers: BTreeMap::new(),
        }
    }

    fn listeners_for(&self, service: &ServiceName) -> Vec<Arc<dyn AnnouncementListener>> {
        let mut listeners = self.listeners.clone();
        if let Some(bound) = self.service_listeners.get(service) {
            listeners.extend(bound.iter().cloned());
        }
        listeners
    }
}

/// In-process registry of service announcements.
///
/// Every accepted announcement is appended to the history and folded into
/// the freshness tracker and pattern index under one write lock. Listeners
/// and signal handlers are always invoked after that lock is released, so a
/// listener may announce again without deadlocking.
///
/// The bus is an explicit value: production code shares one
/// `Arc<AnnouncementBus>` (see [`crate::hub::DiscoveryHub`]) and tests build
/// their own.
pub struct AnnouncementBus<C = DefaultClock>
where
    C: Clock + Send + Sync,
{
    state: RwLock<BusState>,
    clock: Arc<C>,
    dispatcher: ListenerDispatcher,
    patterns: PatternTable,
    window: FreshnessWindow,
    quiet: bool,
}

impl AnnouncementBus<DefaultClock> {
    /// Creates a bus with default settings and the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::from_config(&DiscoveryConfig::default())
    }

    /// Creates a bus from configuration using the system clock.
    #[must_use]
    pub fn from_config(config: &DiscoveryConfig) -> Self {
        Self::with_clock(config, Arc::new(DefaultClock))
    }
}

impl Default for AnnouncementBus<DefaultClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> AnnouncementBus<C>
where
    C: Clock + Send + Sync,
{
    /// Creates a bus from configuration and an explicit clock.
    #[must_use]
    pub fn with_clock(config: &DiscoveryConfig, clock: Arc<C>) -> Self {
        Self {
            state: RwLock::new(BusState::new(config.discovery_log_capacity)),
            clock,
            dispatcher: ListenerDispatcher::new(config.dispatch),
            patterns: PatternTable::default(),
            window: config.freshness_window(),
            quiet: config.quiet,
        }
    }

    /// Replaces the pattern table used to index future announcements.
    #[must_use]
    pub fn with_pattern_table(mut self, patterns: PatternTable) -> Self {
        self.patterns = patterns;
        self
    }

    fn read_state(&self) -> BusResult<RwLockReadGuard<'_, BusState>> {
        self.state.read().map_err(|_| BusError::StatePoisoned)
    }

    fn write_state(&self) -> BusResult<RwLockWriteGuard<'_, BusState>> {
        self.state.write().map_err(|_| BusError::StatePoisoned)
    }

    // ── Announcements ──────────────────────────────────────────────────

    /// Announces a service with no examples.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::Domain`] when the service name is invalid, or
    /// [`BusError::StatePoisoned`] when the bus lock is poisoned.
    pub fn announce<S>(
        &self,
        service_name: impl Into<String>,
        capabilities: impl IntoIterator<Item = S>,
    ) -> BusResult<&Self>
    where
        S: Into<String>,
    {
        self.publish(Announcement::new(service_name, capabilities)?)
    }

    /// Announces a service together with example invocations.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::Domain`] when the service name is invalid, or
    /// [`BusError::StatePoisoned`] when the bus lock is poisoned.
    pub fn announce_with_examples<S, E>(
        &self,
        service_name: impl Into<String>,
        capabilities: impl IntoIterator<Item = S>,
        examples: impl IntoIterator<Item = E>,
    ) -> BusResult<&Self>
    where
        S: Into<String>,
        E: Into<String>,
    {
        self.publish(Announcement::new(service_name, capabilities)?.with_examples(examples))
    }

    /// Accepts a prepared announcement and notifies listeners.
    ///
    /// Listener failures are logged and never returned.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::StatePoisoned`] when the bus lock is poisoned.
    pub fn publish(&self, announcement: Announcement) -> BusResult<&Self> {
        let now = self.clock.utc();
        let tags = self
            .patterns
            .extract(announcement.capabilities(), announcement.examples());

        let (listeners, kind) = {
            let mut state = self.write_state()?;
            let kind = state.tracker.observe(&announcement, now);
            state.index.record(announcement.service_name().as_str(), &tags);
            let listeners = state.listeners_for(announcement.service_name());
            state
                .history
                .push(AnnouncementRecord::new(announcement.clone(), now));
            (listeners, kind)
        };

        self.log_accepted(&announcement, kind, tags.len());
        let report = self.dispatcher.dispatch(listeners, &Arc::new(announcement));
        debug!(
            inline = report.inline,
            spawned = report.spawned,
            "announcement delivered"
        );
        Ok(self)
    }

    fn log_accepted(&self, announcement: &Announcement, kind: DiscoveryKind, tags: usize) {
        let service = announcement.service_name().as_str();
        let capabilities = announcement.capabilities().len();
        if self.quiet {
            debug!(service, %kind, capabilities, tags, "service announced");
        } else {
            info!(service, %kind, capabilities, tags, "service announced");
        }
    }

    // ── Listeners ──────────────────────────────────────────────────────

    /// Registers a listener for every future announcement.
    ///
    /// Listeners are never deduplicated or removed.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::StatePoisoned`] when the bus lock is poisoned.
    pub fn add_listener(&self, listener: Arc<dyn AnnouncementListener>) -> BusResult<()> {
        self.write_state()?.listeners.push(listener);
        Ok(())
    }

    /// Registers a closure as a listener for every future announcement.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::StatePoisoned`] when the bus lock is poisoned.
    pub fn add_listener_fn<F>(&self, callback: F) -> BusResult<()>
    where
        F: Fn(&Announcement) -> ListenerResult + Send + Sync + 'static,
    {
        self.add_listener(Arc::new(FnListener::new(callback)))
    }

    /// Registers a listener notified only for announcements from one
    /// service name.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::Domain`] when the name is invalid, or
    /// [`BusError::StatePoisoned`] when the bus lock is poisoned.
    pub fn add_service_listener(
        &self,
        service_name: impl Into<String>,
        listener: Arc<dyn AnnouncementListener>,
    ) -> BusResult<()> {
        let name = ServiceName::new(service_name)?;
        self.write_state()?
            .service_listeners
            .entry(name)
            .or_default()
            .push(listener);
        Ok(())
    }

    // ── Signals ────────────────────────────────────────────────────────

    /// Registers a signal handler under a service name.
    ///
    /// A later registration under the same name replaces the earlier one.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::Domain`] when the name is invalid, or
    /// [`BusError::StatePoisoned`] when the bus lock is poisoned.
    pub fn register_service(
        &self,
        service_name: impl Into<String>,
        handler: Arc<dyn SignalHandler>,
    ) -> BusResult<()> {
        let name = ServiceName::new(service_name)?;
        self.write_state()?
            .signal_handlers
            .insert(name.as_str().to_owned(), handler);
        Ok(())
    }

    /// Registers a `(signal, data)` closure as a signal handler.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::Domain`] when the name is invalid, or
    /// [`BusError::StatePoisoned`] when the bus lock is poisoned.
    pub fn register_signal_fn<F>(
        &self,
        service_name: impl Into<String>,
        callback: F,
    ) -> BusResult<()>
    where
        F: Fn(&SignalType, &Value) -> SignalHandlerResult + Send + Sync + 'static,
    {
        self.register_service(service_name, Arc::new(FnSignalHandler::new(callback)))
    }

    /// Sends a signal to one named handler, or to every handler when
    /// `target` is `None`.
    ///
    /// Returns one response per handler reached, keyed by service name.
    /// Handler errors and panics are captured as
    /// [`SignalResponse::Failed`]. An unknown target yields an empty map.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::StatePoisoned`] when the bus lock is poisoned.
    pub fn send_signal(
        &self,
        signal: impl Into<SignalType>,
        target: Option<&str>,
        data: Option<Value>,
    ) -> BusResult<BTreeMap<String, SignalResponse>> {
        let signal_type = signal.into();
        let payload = data.unwrap_or(Value::Null);
        let handlers: Vec<(String, Arc<dyn SignalHandler>)> = {
            let state = self.read_state()?;
            target.map_or_else(
                || {
                    state
                        .signal_handlers
                        .iter()
                        .map(|(key, handler)| (key.clone(), Arc::clone(handler)))
                        .collect()
                },
                |name| {
                    state
                        .signal_handlers
                        .get_key_value(name.trim())
                        .map(|(key, handler)| (key.clone(), Arc::clone(handler)))
                        .into_iter()
                        .collect()
                },
            )
        };

        debug!(signal = %signal_type, handlers = handlers.len(), "sending signal");
        Ok(handlers
            .into_iter()
            .map(|(name, handler)| {
                let response = deliver_signal(&name, handler.as_ref(), &signal_type, &payload);
                (name, response)
            })
            .collect())
    }

    // ── Queries ────────────────────────────────────────────────────────

    /// Renders the whole history for an LLM prompt, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::StatePoisoned`] when the bus lock is poisoned, or
    /// [`BusError::Render`] when the template fails.
    pub fn announcements_for_llm(&self) -> BusResult<String> {
        let state = self.read_state()?;
        summary::render_history(&state.history).map_err(|err| BusError::Render(err.to_string()))
    }

    /// Returns a copy of the announcement history in call order.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::StatePoisoned`] when the bus lock is poisoned.
    pub fn history(&self) -> BusResult<Vec<AnnouncementRecord>> {
        Ok(self.read_state()?.history.clone())
    }

    /// Returns the latest tracked record for a service name.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::StatePoisoned`] when the bus lock is poisoned.
    pub fn discover(&self, service_name: &str) -> BusResult<Option<TrackedService>> {
        Ok(self.read_state()?.tracker.get(service_name.trim()).cloned())
    }

    /// Returns every known service name in discovery order.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::StatePoisoned`] when the bus lock is poisoned.
    pub fn list_services(&self) -> BusResult<Vec<ServiceName>> {
        Ok(self
            .read_state()?
            .tracker
            .in_discovery_order()
            .into_iter()
            .map(|tracked| tracked.service_name().clone())
            .collect())
    }

    /// Splits tracked services into fresh and stale at the current time.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::StatePoisoned`] when the bus lock is poisoned.
    pub fn freshness_partition(&self) -> BusResult<FreshnessPartition> {
        let now = self.clock.utc();
        Ok(self.read_state()?.tracker.partition(now, self.window))
    }

    /// Returns a copy of the pattern index.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::StatePoisoned`] when the bus lock is poisoned.
    pub fn pattern_index(&self) -> BusResult<PatternIndex> {
        Ok(self.read_state()?.index.clone())
    }

    /// Returns tracked services and the pattern index as one snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::StatePoisoned`] when the bus lock is poisoned.
    pub fn catalogue(&self) -> BusResult<Catalogue> {
        let now = self.clock.utc();
        let state = self.read_state()?;
        let services = state
            .tracker
            .in_discovery_order()
            .into_iter()
            .cloned()
            .collect();
        Ok(Catalogue::new(services, state.index.clone(), now))
    }

    /// Returns the retained discovery events, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::StatePoisoned`] when the bus lock is poisoned.
    pub fn discovery_log(&self) -> BusResult<Vec<DiscoveryEvent>> {
        Ok(self.read_state()?.tracker.discovery_log().cloned().collect())
    }

    /// Returns bus counters.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::StatePoisoned`] when the bus lock is poisoned.
    pub fn stats(&self) -> BusResult<BusStats> {
        let state = self.read_state()?;
        Ok(BusStats {
            total_announcements: state.history.len(),
            services: state.tracker.len(),
            listeners: state.listeners.len(),
            service_listeners: state.service_listeners.values().map(Vec::len).sum(),
            signal_handlers: state.signal_handlers.len(),
            pattern_mappings: state.index.len(),
        })
    }

    /// Renders the tracked services as text or JSON.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::StatePoisoned`] when the bus lock is poisoned, or
    /// [`BusError::Render`] when rendering fails.
    pub fn render_directory(&self, format: DirectoryFormat) -> BusResult<String> {
        let services: Vec<TrackedService> = self
            .read_state()?
            .tracker
            .in_discovery_order()
            .into_iter()
            .cloned()
            .collect();
        summary::render_directory(&services, format).map_err(BusError::Render)
    }

    /// Returns the configured freshness window.
    #[must_use]
    pub const fn freshness_window(&self) -> FreshnessWindow {
        self.window
    }

    /// Returns the current bus clock time.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.utc()
    }
}

fn deliver_signal(
    service: &str,
    handler: &dyn SignalHandler,
    signal: &SignalType,
    data: &Value,
) -> SignalResponse {
    match panic::catch_unwind(AssertUnwindSafe(|| handler.handle_signal(signal, data))) {
        Ok(Ok(reply)) => SignalResponse::Reply(reply),
        Ok(Err(err)) => {
            warn!(service, %signal, error = %err, "signal handler failed");
            SignalResponse::failed(err)
        }
        Err(payload) => {
            let message = panic_message(payload.as_ref()).to_owned();
            warn!(service, %signal, panic = %message, "signal handler panicked");
            SignalResponse::failed(message)
        }
    }
}
