//! Free-text routing over announced services.
//!
//! The router combines the pattern index, service-name tokens and a domain
//! keyword table to rank services for a request, then routes to the top
//! candidate. It also renders the live catalogue as context for an LLM
//! assistant.

pub mod domain;
pub mod services;

#[cfg(test)]
mod tests;
