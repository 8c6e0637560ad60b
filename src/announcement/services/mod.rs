//! Announcement bus service and its renderings.

mod bus;
mod catalogue;
mod summary;

pub use bus::{AnnouncementBus, BusError, BusResult, BusStats};
pub use catalogue::Catalogue;
pub use summary::{DirectoryFormat, EMPTY_HISTORY_SENTINEL};
