//! Pattern extraction: free-text announcements to coarse intent tags.
//!
//! [`PatternTable`] holds the keyword heuristic, [`PatternIndex`] the
//! resulting tag -> services map, and [`DomainKeywordTable`] the request-side
//! vocabulary the router consults. All three are plain values so they can be
//! swapped and tested in isolation.

mod index;
mod keywords;
mod tag;
mod table;

pub use index::PatternIndex;
pub use keywords::{DomainKeywordTable, KeywordHints};
pub use tag::IntentTag;
pub use table::{PatternRule, PatternTable};

#[cfg(test)]
mod tests;
