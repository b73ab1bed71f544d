//! Common test utilities for medserve-transform
//!
//! Shared concept graph fixtures and record assertions for the integration
//! tests.

#![allow(dead_code)]

mod assertions;
mod fixtures;

pub use assertions::*;
pub use fixtures::*;
