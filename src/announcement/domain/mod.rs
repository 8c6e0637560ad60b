//! Domain model for service announcements.
//!
//! Announcements are plain values: a validated service name plus ordered
//! free-text capability and example lists. History records add an
//! identifier and the time the bus accepted them.

mod announcement;
mod error;
mod ids;
mod name;
mod signal;

pub use announcement::{Announcement, AnnouncementRecord};
pub use error::AnnouncementDomainError;
pub use ids::AnnouncementId;
pub use name::ServiceName;
pub use signal::{SignalResponse, SignalType};
