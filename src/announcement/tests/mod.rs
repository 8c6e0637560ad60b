//! Unit tests for the announcement module.

mod signal_tests;
