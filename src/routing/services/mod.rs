//! Routing services.

mod refresh;
mod router;

pub use refresh::{DEFAULT_SELF_ANNOUNCE_EVERY, SelfAnnouncementListener};
pub use router::DynamicRouter;
