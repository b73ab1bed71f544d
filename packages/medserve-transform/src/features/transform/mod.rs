//! Transform feature: the concept-to-record engine
//!
//! - [`engine`]: created-set, caches and the `ensure_*` entry points
//! - [`extensions`]: parent tree, generalization chain, history
//! - [`ingredients`] / [`content`]: product and package payloads
//! - [`subsidy`]: subsidy deduplication
//! - [`organization`]: manufacturer records

pub mod content;
pub mod diagnostics;
pub mod engine;
pub mod extensions;
pub mod ingredients;
pub mod organization;
pub mod subsidy;

pub use diagnostics::{Diagnostic, DiagnosticKind};
pub use engine::TransformEngine;
pub use subsidy::SubsidyMerger;
