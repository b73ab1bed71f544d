//! Concept graph feature
//!
//! Read-only view over one terminology release plus the builder that
//! validates and freezes it.

pub mod builder;
pub mod graph;

pub use builder::{
    ConceptGraphBuilder, ExternalIdAssignment, GraphSnapshot, ManufacturerAssignment,
    SubsidyAssignment,
};
pub use graph::ConceptGraph;
