//! Unit tests for the routing module.

mod router_tests;
