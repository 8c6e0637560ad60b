//! World state for announcement routing scenarios.

use herald::announcement::adapters::{DispatchMode, RecordingListener};
use herald::config::DiscoveryConfig;
use herald::hub::DiscoveryHub;
use herald::routing::domain::RouteOutcome;
use rstest::fixture;

/// World state for announcement routing BDD tests.
pub struct DiscoveryWorld {
    pub hub: DiscoveryHub,
    pub listeners: Vec<RecordingListener>,
    pub last_outcome: Option<RouteOutcome>,
}

impl DiscoveryWorld {
    #[expect(clippy::expect_used, reason = "a hub that cannot start fails the scenario")]
    fn start_hub() -> DiscoveryHub {
        let config = DiscoveryConfig {
            dispatch: DispatchMode::Auto,
            ..DiscoveryConfig::for_tests()
        };
        DiscoveryHub::start(config).expect("discovery hub starts")
    }

    /// Replaces the hub with a new, empty one.
    pub fn reset(&mut self) {
        self.hub = Self::start_hub();
        self.listeners.clear();
        self.last_outcome = None;
    }
}

impl Default for DiscoveryWorld {
    fn default() -> Self {
        Self {
            hub: Self::start_hub(),
            listeners: Vec::new(),
            last_outcome: None,
        }
    }
}

#[fixture]
pub fn world() -> DiscoveryWorld {
    DiscoveryWorld::default()
}

pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
