//! Free-text request routing over the live announcement catalogue.

use crate::announcement::{
    domain::ServiceName,
    services::{AnnouncementBus, BusError, BusResult, Catalogue},
};
use crate::config::DiscoveryConfig;
use crate::freshness::{FreshnessPartition, TrackedService};
use crate::intent::DomainKeywordTable;
use crate::routing::domain::{ConversationCapabilities, RankedService, RouteOutcome};
use minijinja::Environment;
use mockable::{Clock, DefaultClock};
use serde_json::{Value, json};
use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

const CONTEXT_TEMPLATE: &str = "\
=== Currently Available Services ===
{% if fresh %}

Active Services (recently announced):
{% for service in fresh %}

- {{ service.name }}
{% for capability in service.capabilities %}
  - {{ capability }}
{% endfor %}
{% if service.example %}
  Example: {{ service.example }}
{% endif %}
{% endfor %}
{% endif %}
{% if routes %}

=== Natural Language Routing ===
I can route these types of requests:
{% for route in routes %}
- '{{ route.tag }}' requests -> {{ route.services | join(\", \") }}
{% endfor %}
{% endif %}

=== Discovery Statistics ===
- Total services discovered: {{ stats.total }}
- Currently active: {{ stats.active }}
- Pattern mappings: {{ stats.patterns }}
- Stale services: {{ stats.stale }}";

const PROMPT_TEMPLATE: &str = "\
You are integrated with a live service discovery system. You know which \
services are running right now and what they can do.

{{ context }}
{% if relevant %}

Relevant services for this query:
{% for service in relevant %}
- {{ service.name }}: {{ service.summary }}
{% endfor %}
{% endif %}

Question: {{ question }}";

/// Capabilities listed per fresh service in the dynamic context.
const CONTEXT_CAPABILITIES: usize = 3;
/// Tags listed in the routing table section.
const CONTEXT_ROUTES: usize = 10;
/// Services listed per tag in the routing table section.
const CONTEXT_SERVICES_PER_ROUTE: usize = 3;
/// Capabilities per fresh service in [`ConversationCapabilities::can_handle`].
const CONVERSATION_CAPABILITIES: usize = 2;
/// Relevant services summarised in the assistant prompt.
const PROMPT_RELEVANT: usize = 3;

/// Routes free text to announced services.
///
/// The router reads a fresh [`Catalogue`] for every call and never caches
/// what it learns, so its view grows as services announce themselves. It
/// ignores announcements made under its own name.
pub struct DynamicRouter<C = DefaultClock>
where
    C: Clock + Send + Sync,
{
    bus: Arc<AnnouncementBus<C>>,
    keywords: DomainKeywordTable,
    name: ServiceName,
}

impl<C> DynamicRouter<C>
where
    C: Clock + Send + Sync,
{
    /// Creates a router over a shared bus.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::Domain`] when the configured router name is
    /// invalid.
    pub fn new(bus: Arc<AnnouncementBus<C>>, config: &DiscoveryConfig) -> BusResult<Self> {
        Ok(Self {
            bus,
            keywords: DomainKeywordTable::default(),
            name: ServiceName::new(config.router_name.as_str())?,
        })
    }

    /// Replaces the domain keyword table.
    #[must_use]
    pub fn with_keyword_table(mut self, keywords: DomainKeywordTable) -> Self {
        self.keywords = keywords;
        self
    }

    /// Returns the name the router announces itself under.
    #[must_use]
    pub const fn name(&self) -> &ServiceName {
        &self.name
    }

    /// Returns the bus the router reads from.
    #[must_use]
    pub const fn bus(&self) -> &Arc<AnnouncementBus<C>> {
        &self.bus
    }

    fn is_self(&self, tracked: &TrackedService) -> bool {
        tracked.service_name() == &self.name
    }

    fn partition_known(&self, catalogue: &Catalogue) -> FreshnessPartition {
        let mut partition = catalogue.partition(self.bus.freshness_window());
        partition.fresh.retain(|tracked| !self.is_self(tracked));
        partition.stale.retain(|tracked| !self.is_self(tracked));
        partition
    }

    fn known_services<'a>(&self, catalogue: &'a Catalogue) -> Vec<&'a TrackedService> {
        catalogue
            .services()
            .iter()
            .filter(|tracked| !self.is_self(tracked))
            .collect()
    }

    // ── Ranking ────────────────────────────────────────────────────────

    /// Scores every known service against a request.
    ///
    /// Each matching intent tag, service-name token and domain-keyword hint
    /// adds to a service's score. Results are ordered by score, highest
    /// first, then by discovery order.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::StatePoisoned`] when the bus lock is poisoned.
    pub fn rank_services(&self, request: &str) -> BusResult<Vec<RankedService>> {
        let catalogue = self.bus.catalogue()?;
        Ok(self.rank_in(&catalogue, request))
    }

    /// Returns the names of services relevant to a request in rank order.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::StatePoisoned`] when the bus lock is poisoned.
    pub fn find_relevant_services(&self, request: &str) -> BusResult<Vec<ServiceName>> {
        Ok(self
            .rank_services(request)?
            .into_iter()
            .map(|ranked| ranked.service_name().clone())
            .collect())
    }

    fn rank_in(&self, catalogue: &Catalogue, request: &str) -> Vec<RankedService> {
        let request_lower = request.to_lowercase();
        let mut scores: HashMap<&str, usize> = HashMap::new();

        for (tag, services) in catalogue.index().iter() {
            if request_lower.contains(tag.as_str()) {
                for service in services {
                    *scores.entry(service.as_str()).or_default() += 1;
                }
            }
        }

        for tracked in catalogue.services() {
            let mentioned = tracked
                .service_name()
                .tokens()
                .iter()
                .any(|token| request_lower.contains(token.as_str()));
            if mentioned {
                *scores.entry(tracked.service_name().as_str()).or_default() += 1;
            }
        }

        for hints in self.keywords.matching(&request_lower) {
            for tracked in catalogue.services() {
                let hits = hints.hint_hits(&tracked.service_name().as_str().to_lowercase());
                if hits > 0 {
                    *scores.entry(tracked.service_name().as_str()).or_default() += hits;
                }
            }
        }

        let mut ranked: Vec<RankedService> = self
            .known_services(catalogue)
            .into_iter()
            .filter_map(|tracked| {
                scores.get(tracked.service_name().as_str()).map(|&score| {
                    RankedService::new(tracked.service_name().clone(), score, tracked.sequence())
                })
            })
            .collect();
        ranked.sort_by_key(|candidate| (Reverse(candidate.score()), candidate.sequence()));
        ranked
    }

    // ── Routing ────────────────────────────────────────────────────────

    /// Routes a request to the top-ranked service.
    ///
    /// Returns [`RouteOutcome::Unmatched`] when nothing is relevant; that is
    /// not an error.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::StatePoisoned`] when the bus lock is poisoned.
    pub fn route_to_service(&self, request: &str) -> BusResult<RouteOutcome> {
        let catalogue = self.bus.catalogue()?;
        let ranked = self.rank_in(&catalogue, request);
        let confidence = ranked.len();
        let mut names = ranked
            .into_iter()
            .map(|candidate| candidate.service_name().clone());

        let Some(routed_to) = names.next() else {
            debug!(request, "no relevant services");
            return Ok(RouteOutcome::unmatched());
        };
        let service_capabilities = catalogue
            .get(routed_to.as_str())
            .map(|tracked| tracked.capabilities().to_vec())
            .unwrap_or_default();
        let alternatives: Vec<ServiceName> = names.collect();

        debug!(
            request,
            routed_to = %routed_to,
            confidence,
            alternatives = alternatives.len(),
            "request routed"
        );
        Ok(RouteOutcome::Routed {
            routed_to,
            service_capabilities,
            confidence,
            alternatives,
        })
    }

    // ── Context ────────────────────────────────────────────────────────

    /// Renders fresh services, the routing table and statistics for an LLM
    /// prompt.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::StatePoisoned`] when the bus lock is poisoned, or
    /// [`BusError::Render`] when the template fails.
    pub fn dynamic_context(&self) -> BusResult<String> {
        let catalogue = self.bus.catalogue()?;
        self.render_context(&catalogue)
    }

    fn render_context(&self, catalogue: &Catalogue) -> BusResult<String> {
        let FreshnessPartition { fresh, stale } = self.partition_known(catalogue);

        let fresh_rows: Vec<Value> = fresh
            .iter()
            .map(|tracked| {
                json!({
                    "name": tracked.service_name().as_str(),
                    "capabilities": tracked.capabilities().iter().take(CONTEXT_CAPABILITIES).collect::<Vec<_>>(),
                    "example": tracked.examples().first().filter(|example| !example.is_empty()),
                })
            })
            .collect();
        let routes: Vec<Value> = catalogue
            .index()
            .iter()
            .take(CONTEXT_ROUTES)
            .map(|(tag, services)| {
                json!({
                    "tag": tag.as_str(),
                    "services": services
                        .iter()
                        .filter(|service| service.as_str() != self.name.as_str())
                        .take(CONTEXT_SERVICES_PER_ROUTE)
                        .collect::<Vec<_>>(),
                })
            })
            .collect();

        let context = json!({
            "fresh": fresh_rows,
            "routes": routes,
            "stats": {
                "total": fresh.len() + stale.len(),
                "active": fresh.len(),
                "patterns": catalogue.index().len(),
                "stale": stale.len(),
            },
        });
        render(CONTEXT_TEMPLATE, context)
    }

    /// Returns what can be handled right now, based on fresh services.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::StatePoisoned`] when the bus lock is poisoned.
    pub fn conversation_capabilities(&self) -> BusResult<ConversationCapabilities> {
        let catalogue = self.bus.catalogue()?;
        let FreshnessPartition { fresh, stale } = self.partition_known(&catalogue);

        Ok(ConversationCapabilities {
            timestamp: catalogue.taken_at(),
            discovered_services: fresh.len() + stale.len(),
            active_services: fresh.len(),
            available_patterns: catalogue
                .index()
                .tags()
                .into_iter()
                .map(|tag| tag.as_str().to_owned())
                .collect(),
            can_handle: fresh
                .iter()
                .flat_map(|tracked| {
                    tracked
                        .capabilities()
                        .iter()
                        .take(CONVERSATION_CAPABILITIES)
                        .map(move |capability| format!("{}: {capability}", tracked.service_name()))
                })
                .collect(),
        })
    }

    /// Assembles a system prompt: the dynamic context, the top relevant
    /// services for `question`, and the question itself.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::StatePoisoned`] when the bus lock is poisoned, or
    /// [`BusError::Render`] when a template fails.
    pub fn assistant_prompt(&self, question: &str) -> BusResult<String> {
        let catalogue = self.bus.catalogue()?;
        let context = self.render_context(&catalogue)?;
        let relevant: Vec<Value> = self
            .rank_in(&catalogue, question)
            .iter()
            .take(PROMPT_RELEVANT)
            .map(|candidate| {
                let summary = catalogue
                    .get(candidate.service_name().as_str())
                    .and_then(|tracked| tracked.capabilities().first())
                    .map_or("Available", String::as_str);
                json!({ "name": candidate.service_name().as_str(), "summary": summary })
            })
            .collect();

        render(
            PROMPT_TEMPLATE,
            json!({ "context": context, "relevant": relevant, "question": question }),
        )
    }

    // ── Self-announcement ──────────────────────────────────────────────

    /// Announces the router with its current view of the catalogue.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::StatePoisoned`] when the bus lock is poisoned.
    pub fn announce_self(&self) -> BusResult<()> {
        let catalogue = self.bus.catalogue()?;
        let known = self.known_services(&catalogue).len();
        self.bus.announce_with_examples(
            self.name.as_str(),
            [
                "I learn what services are available through announcements".to_owned(),
                format!("Currently aware of {known} services"),
                "I route natural language requests to appropriate services".to_owned(),
                "I build context from live service announcements".to_owned(),
                "My capabilities grow as new services announce themselves".to_owned(),
            ],
            [
                "What services are available?",
                "What can you do right now?",
                "Show me top players",
            ],
        )?;
        Ok(())
    }
}

fn render(template: &str, context: Value) -> BusResult<String> {
    let mut environment = Environment::new();
    environment.set_trim_blocks(true);
    environment.set_lstrip_blocks(true);
    environment
        .render_str(template, context)
        .map_err(|err| BusError::Render(err.to_string()))
}
