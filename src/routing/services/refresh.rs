//! Periodic router self-announcement.

use super::DynamicRouter;
use crate::announcement::{
    domain::Announcement,
    ports::{AnnouncementListener, ListenerError, ListenerResult},
};
use mockable::{Clock, DefaultClock};
use std::sync::Weak;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Default number of foreign announcements between router re-announcements.
pub const DEFAULT_SELF_ANNOUNCE_EVERY: usize = 10;

/// Listener that re-announces the router after every `every` announcements
/// from other services, so its "Currently aware of N services" capability
/// tracks the catalogue.
///
/// Holds the router weakly; once the router is dropped the listener does
/// nothing.
pub struct SelfAnnouncementListener<C = DefaultClock>
where
    C: Clock + Send + Sync,
{
    router: Weak<DynamicRouter<C>>,
    every: usize,
    seen: AtomicUsize,
}

impl<C> SelfAnnouncementListener<C>
where
    C: Clock + Send + Sync,
{
    /// Creates a listener for `router`. An `every` of zero is treated as one.
    #[must_use]
    pub fn new(router: Weak<DynamicRouter<C>>, every: usize) -> Self {
        Self {
            router,
            every: every.max(1),
            seen: AtomicUsize::new(0),
        }
    }

    /// Counts one foreign announcement; returns whether the router is due.
    fn tick(&self) -> bool {
        let every = self.every;
        let previous = self
            .seen
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |seen| {
                Some(if seen + 1 >= every { 0 } else { seen + 1 })
            })
            .unwrap_or_default();
        previous + 1 >= every
    }
}

impl<C> AnnouncementListener for SelfAnnouncementListener<C>
where
    C: Clock + Send + Sync + 'static,
{
    fn on_announcement(&self, announcement: &Announcement) -> ListenerResult {
        let Some(router) = self.router.upgrade() else {
            return Ok(());
        };
        if announcement.service_name() == router.name() || !self.tick() {
            return Ok(());
        }
        router.announce_self().map_err(ListenerError::failed)
    }
}
