/*
 * Medserve Transform - AMT concept graph to medication records
 *
 * Feature-First Architecture:
 * - shared/      : Concept model, well-known AMT concepts, code systems
 * - features/    : concept_graph → references → transform → records
 * - pipeline/    : Bucketed driver and record sinks
 * - config/      : Run configuration (YAML v1)
 *
 * The engine is single-threaded and purely in-memory: the concept graph is
 * read-only, all per-run state lives in one TransformEngine value.
 */

#![allow(clippy::new_without_default)] // Default impl not always needed
#![allow(clippy::unnecessary_map_or)] // map_or style for compatibility

pub mod config;
pub mod errors;
pub mod features;
pub mod pipeline;
pub mod shared;

pub use config::{ConfigError, TransformConfig};
pub use errors::{ErrorKind, Result, TransformError};
pub use features::concept_graph::{ConceptGraph, ConceptGraphBuilder, GraphSnapshot};
pub use features::records::{Record, RecordBody};
pub use features::references::{ExtendedReference, Reference};
pub use features::transform::{Diagnostic, DiagnosticKind, TransformEngine};
pub use pipeline::{CollectingSink, NdjsonSink, RecordSink, RunReport, TransformDriver};
pub use shared::models::{AmtConcept, Concept, ConceptId, ReleaseVersion};
