//! Recording listener for tests and monitoring tools.

use crate::announcement::{
    domain::Announcement,
    ports::{AnnouncementListener, ListenerResult},
};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::watch;

/// Listener that keeps every announcement it receives.
///
/// Clones share the same recording, so a test can hand one clone to the bus
/// and inspect another.
#[derive(Debug, Clone)]
pub struct RecordingListener {
    recorded: Arc<Mutex<Vec<Announcement>>>,
    count: Arc<watch::Sender<usize>>,
}

impl RecordingListener {
    /// Creates an empty recording listener.
    #[must_use]
    pub fn new() -> Self {
        let (count, _) = watch::channel(0);
        Self {
            recorded: Arc::new(Mutex::new(Vec::new())),
            count: Arc::new(count),
        }
    }

    /// Returns the number of announcements recorded so far.
    #[must_use]
    pub fn count(&self) -> usize {
        *self.count.borrow()
    }

    /// Returns a copy of the recorded announcements in arrival order.
    #[must_use]
    pub fn recorded(&self) -> Vec<Announcement> {
        self.recorded
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the recorded service names in arrival order.
    #[must_use]
    pub fn service_names(&self) -> Vec<String> {
        self.recorded()
            .iter()
            .map(|announcement| announcement.service_name().to_string())
            .collect()
    }

    /// Waits until at least `expected` announcements have been recorded.
    ///
    /// Returns `false` when the timeout elapses first.
    pub async fn wait_for(&self, expected: usize, timeout: Duration) -> bool {
        let mut receiver = self.count.subscribe();
        let reached = receiver.wait_for(|count| *count >= expected);
        matches!(tokio::time::timeout(timeout, reached).await, Ok(Ok(_)))
    }
}

impl Default for RecordingListener {
    fn default() -> Self {
        Self::new()
    }
}

impl AnnouncementListener for RecordingListener {
    fn on_announcement(&self, announcement: &Announcement) -> ListenerResult {
        self.recorded
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(announcement.clone());
        self.count.send_modify(|count| *count += 1);
        Ok(())
    }
}
