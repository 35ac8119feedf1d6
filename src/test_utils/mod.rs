//! Test utilities for integration testing.
//!
//! This module provides:
//! - Test data factories for creating valid test fixtures
//! - In-memory record stores and a scripted payment processor
//! - `TestAppStateBuilder` for route tests

mod app_state_builder;
mod factories;
mod reconciliation_mocks;

pub use app_state_builder::*;
pub use factories::*;
pub use reconciliation_mocks::*;
