//! Unit tests for the capability module.
