//! Test utilities
//!
//! Manual mock implementations and test fixtures for unit testing.
//!
//! Why manual mocks instead of mockall?
//! - Manual mocks are more explicit and easier to debug
//! - One shared in-memory database keeps the activity log and aggregates
//!   consistent across repositories, which generated mocks cannot do
//!
//! The same mocks back the router tests in `integration_tests.rs`, since
//! `AppState` holds services over repository trait objects.

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;
