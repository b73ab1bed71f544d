//! Feature modules

pub mod concept_graph;
pub mod records;
pub mod references;
pub mod transform;
