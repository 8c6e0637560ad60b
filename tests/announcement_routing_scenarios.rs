//! Behaviour tests for announcement-driven discovery and routing.

mod announcement_routing_steps;

use announcement_routing_steps::world::{DiscoveryWorld, world};
use rstest_bdd_macros::scenario;

#[scenario(
    path = "tests/features/announcement_routing.feature",
    name = "A sync request reaches the announcing service"
)]
#[tokio::test(flavor = "multi_thread")]
async fn sync_request_reaches_announcer(world: DiscoveryWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/announcement_routing.feature",
    name = "An unmatched request reports a suggestion"
)]
#[tokio::test(flavor = "multi_thread")]
async fn unmatched_request_reports_suggestion(world: DiscoveryWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/announcement_routing.feature",
    name = "Listeners hear announcements made inside a runtime"
)]
#[tokio::test(flavor = "multi_thread")]
async fn listeners_hear_runtime_announcements(world: DiscoveryWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/announcement_routing.feature",
    name = "A service with no capabilities still renders"
)]
#[tokio::test(flavor = "multi_thread")]
async fn empty_announcement_renders(world: DiscoveryWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/announcement_routing.feature",
    name = "Capabilities are discovered by exact name"
)]
#[tokio::test(flavor = "multi_thread")]
async fn capabilities_discovered_by_name(world: DiscoveryWorld) {
    let _ = world;
}
