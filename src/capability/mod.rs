//! Direct capability lookup by name.
//!
//! Where announcements are free text for fuzzy routing, the capability
//! registry maps an exact name to a factory or shared instance so that one
//! component can obtain another without importing it. The module follows
//! hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - The registry in [`services`]

pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
