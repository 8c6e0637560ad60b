//! Herald: in-process capability announcement, discovery and routing.
//!
//! Components of a single process announce what they can do; other
//! components, notably an LLM-backed assistant, query those announcements at
//! runtime to decide where a natural-language request should go.
//!
//! # Architecture
//!
//! Herald follows hexagonal architecture principles:
//!
//! - **Domain**: Announcements, capability names and routing outcomes as
//!   plain validated values
//! - **Ports**: Listener, signal handler and capability factory traits
//! - **Adapters**: Closure wrappers, listener dispatch and recording
//!   listeners
//! - **Services**: The announcement bus, capability registry and router
//!
//! # Modules
//!
//! - [`announcement`]: Announcement bus, listeners and the signal channel
//! - [`capability`]: Exact-name capability registry
//! - [`intent`]: Pattern extraction from free-text announcements
//! - [`freshness`]: Latest-wins service tracking and freshness windows
//! - [`routing`]: Free-text request routing and LLM context
//! - [`hub`]: Start-up wiring of the whole stack
//! - [`config`]: TOML and environment configuration
//! - [`clock`]: Settable clock for deterministic tests

pub mod announcement;
pub mod capability;
pub mod clock;
pub mod config;
pub mod freshness;
pub mod hub;
pub mod intent;
pub mod routing;
