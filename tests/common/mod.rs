//! Common test utilities and helpers.
//!
//! This module provides shared functionality for all tests, including:
//! - Report text and PDF fixtures
//! - Assertions on generated CSV and map files

pub mod assertions;
pub mod fixtures;

pub use assertions::*;
pub use fixtures::*;
