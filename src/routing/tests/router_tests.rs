//! Ranking and routing tests.

use crate::announcement::services::AnnouncementBus;
use crate::config::DiscoveryConfig;
use crate::intent::{DomainKeywordTable, PatternTable};
use crate::routing::{
    domain::{NO_MATCH_ERROR, NO_MATCH_SUGGESTION, RouteOutcome},
    services::DynamicRouter,
};
use rstest::{fixture, rstest};
use serde_json::json;
use std::sync::Arc;

#[fixture]
fn router() -> DynamicRouter {
    let config = DiscoveryConfig::for_tests();
    let bus = Arc::new(AnnouncementBus::from_config(&config));
    DynamicRouter::new(bus, &config).expect("valid router name")
}

fn names(router: &DynamicRouter, request: &str) -> Vec<String> {
    router
        .find_relevant_services(request)
        .expect("bus readable")
        .iter()
        .map(ToString::to_string)
        .collect()
}

#[rstest]
fn sync_keyword_finds_announcing_service(router: DynamicRouter) {
    router
        .bus()
        .announce_with_examples(
            "DB",
            ["Query top players", "sync tournaments"],
            ["db.ask('top 10')"],
        )
        .expect("accepted");

    assert!(names(&router, "please sync my tournaments").contains(&"DB".to_owned()));
}

#[rstest]
fn empty_registry_routes_unmatched(router: DynamicRouter) {
    let outcome = router
        .route_to_service("anything at all")
        .expect("routing never fails for no match");

    assert_eq!(outcome, RouteOutcome::unmatched());
    assert!(!outcome.success());
    assert_eq!(
        serde_json::to_value(&outcome).expect("serialisable"),
        json!({
            "success": false,
            "error": NO_MATCH_ERROR,
            "suggestion": NO_MATCH_SUGGESTION,
        })
    );
}

#[rstest]
fn irrelevant_request_routes_unmatched(router: DynamicRouter) {
    router
        .bus()
        .announce("Web Editor Service", ["edit player names"])
        .expect("accepted");

    let outcome = router.route_to_service("xyzzy").expect("routed");
    assert!(outcome.routed_to().is_none());
}

#[rstest]
fn higher_score_ranks_first(router: DynamicRouter) {
    let bus = router.bus();
    bus.announce("Start.gg Sync", ["sync tournaments from start.gg"])
        .and_then(|b| b.announce("Database Service", ["show players", "sync results"]))
        .expect("accepted");

    let ranked = router
        .rank_services("show tournament stats")
        .expect("bus readable");
    let order: Vec<(String, usize)> = ranked
        .iter()
        .map(|candidate| (candidate.service_name().to_string(), candidate.score()))
        .collect();

    // Database Service: "show" tag, "tournament" and "stats" hints.
    // Start.gg Sync: "tournament" hint.
    assert_eq!(
        order,
        vec![
            ("Database Service".to_owned(), 3),
            ("Start.gg Sync".to_owned(), 1)
        ]
    );
}

#[rstest]
fn ties_break_by_discovery_order(router: DynamicRouter) {
    let bus = router.bus();
    bus.announce("Zeta", ["generate reports"])
        .and_then(|b| b.announce("Alpha", ["create invoices"]))
        .and_then(|b| b.announce("Zeta", ["generate reports", "make charts"]))
        .expect("accepted");

    assert_eq!(names(&router, "generate something"), vec!["Zeta", "Alpha"]);
}

#[rstest]
fn service_name_tokens_match(router: DynamicRouter) {
    router
        .bus()
        .announce("Discord Bridge", ["relay messages"])
        .expect("accepted");

    assert_eq!(names(&router, "is the bridge up?"), vec!["Discord Bridge"]);
}

#[rstest]
fn custom_keyword_table_replaces_defaults() {
    let config = DiscoveryConfig::for_tests();
    let bus = Arc::new(AnnouncementBus::from_config(&config));
    bus.announce("Heatmap Renderer", ["render images"])
        .expect("accepted");
    let router = DynamicRouter::new(Arc::clone(&bus), &config)
        .expect("valid router name")
        .with_keyword_table(DomainKeywordTable::empty().with_entry("venue", ["heatmap"]));

    assert_eq!(names(&router, "where is each venue?"), vec!["Heatmap Renderer"]);
    assert!(names(&router, "heat please").is_empty());
}

#[rstest]
fn blank_table_entries_match_nothing() {
    let config = DiscoveryConfig::for_tests();
    let bus = Arc::new(
        AnnouncementBus::from_config(&config).with_pattern_table(
            PatternTable::empty()
                .with_capability_rule("", ["render"])
                .with_capability_rule("render", [""]),
        ),
    );
    bus.announce("Alpha", ["render images"]).expect("accepted");
    bus.announce("Beta Svc", ["render charts"]).expect("accepted");
    let router = DynamicRouter::new(Arc::clone(&bus), &config)
        .expect("valid router name")
        .with_keyword_table(DomainKeywordTable::empty().with_entry("", ["alpha", "beta"]));

    assert!(names(&router, "zzz").is_empty());
    assert!(bus.pattern_index().expect("bus readable").is_empty());
}

#[rstest]
fn route_reports_capabilities_and_alternatives(router: DynamicRouter) {
    let bus = router.bus();
    bus.announce("Web Editor Service", ["edit names", "update venues"])
        .and_then(|b| b.announce("Admin Panel", ["modify settings"]))
        .expect("accepted");

    let outcome = router
        .route_to_service("edit the organization name")
        .expect("routed");

    let RouteOutcome::Routed {
        routed_to,
        service_capabilities,
        confidence,
        alternatives,
    } = outcome
    else {
        panic!("expected a routed outcome");
    };
    assert_eq!(routed_to.as_str(), "Web Editor Service");
    assert_eq!(service_capabilities, vec!["edit names", "update venues"]);
    assert_eq!(confidence, 2);
    assert_eq!(
        alternatives
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>(),
        vec!["Admin Panel"]
    );
}

#[rstest]
fn routed_outcome_serialises_with_success_flag(router: DynamicRouter) {
    router
        .bus()
        .announce("DB", ["sync tournaments"])
        .expect("accepted");

    let outcome = router.route_to_service("sync now").expect("routed");

    assert_eq!(
        serde_json::to_value(&outcome).expect("serialisable"),
        json!({
            "success": true,
            "routed_to": "DB",
            "service_capabilities": ["sync tournaments"],
            "confidence": 1,
            "alternatives": [],
        })
    );
}

#[rstest]
fn router_ignores_its_own_announcements(router: DynamicRouter) {
    router.announce_self().expect("announced");

    assert!(names(&router, "show me what you can do").is_empty());
    let services = router.bus().list_services().expect("bus readable");
    assert_eq!(services.len(), 1);
    assert_eq!(services.first(), Some(router.name()));
}
