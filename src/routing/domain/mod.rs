//! Routing outcomes and read models.

mod conversation;
mod outcome;
mod ranked;

pub use conversation::ConversationCapabilities;
pub use outcome::{NO_MATCH_ERROR, NO_MATCH_SUGGESTION, RouteOutcome};
pub use ranked::RankedService;
