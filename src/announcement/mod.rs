//! Service announcements: who is running and what they can do.
//!
//! Components announce a name, free-text capabilities and example
//! invocations. The bus keeps the full history, folds each announcement into
//! the freshness tracker and pattern index, and fans it out to listeners.
//! A secondary signal channel delivers directed or broadcast signals to
//! registered handlers. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - The bus itself in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
