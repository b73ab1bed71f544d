//! Bucketed run over a whole release
//!
//! Buckets go from the most specific package kind down to substances. Each
//! concept not reached yet is materialized through the engine and the records
//! it created (itself plus everything it transitively needed) are handed to
//! the sink as one batch.

use serde::Serialize;
use tracing::info;

use super::sink::RecordSink;
use crate::config::TransformConfig;
use crate::errors::Result;
use crate::features::concept_graph::ConceptGraph;
use crate::features::transform::{Diagnostic, TransformEngine};
use crate::shared::models::{MedicationKind, ReleaseVersion};

/// Processing order of top-level concepts
pub const BUCKETS: [MedicationKind; 7] = [
    MedicationKind::BrandedPackageContainer,
    MedicationKind::BrandedPackage,
    MedicationKind::UnbrandedPackage,
    MedicationKind::BrandedProductStrengthForm,
    MedicationKind::UnbrandedProductStrengthForm,
    MedicationKind::UnbrandedProduct,
    MedicationKind::Substance,
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BucketReport {
    pub kind: MedicationKind,
    /// Concepts in the bucket
    pub concepts: usize,
    /// Records created while processing the bucket
    pub records_created: usize,
}

/// Summary of a finished run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub records_created: usize,
    pub batches: usize,
    pub buckets: Vec<BucketReport>,
    pub diagnostics: Vec<Diagnostic>,
}

impl RunReport {
    pub fn bucket(&self, kind: MedicationKind) -> Option<&BucketReport> {
        self.buckets.iter().find(|b| b.kind == kind)
    }
}

pub struct TransformDriver<'g> {
    graph: &'g ConceptGraph,
    engine: TransformEngine<'g>,
    config: TransformConfig,
}

impl<'g> TransformDriver<'g> {
    pub fn new(graph: &'g ConceptGraph, release: ReleaseVersion, config: TransformConfig) -> Self {
        let engine = TransformEngine::new(graph, release, &config);
        Self {
            graph,
            engine,
            config,
        }
    }

    /// Process every bucket, handing batches to `sink`. A fatal error aborts
    /// the run; batches already accepted stay with the sink.
    pub fn run<S: RecordSink + ?Sized>(mut self, sink: &mut S) -> Result<RunReport> {
        let mut report = RunReport::default();
        let progress_interval = self.config.progress_interval.max(1);

        for kind in BUCKETS {
            let concepts = self.graph.concepts_of_kind(kind);
            let created_before = self.engine.created_count();
            info!("Processing {} {} concepts", concepts.len(), kind.code());

            for (index, &concept) in concepts.iter().enumerate() {
                if !self.engine.is_created(concept.id) {
                    self.engine.ensure(concept)?;
                }

                let batch = self.engine.take_batch();
                if !batch.is_empty() || self.config.emit_empty_batches {
                    sink.accept_batch(batch)?;
                    report.batches += 1;
                }

                if (index + 1) % progress_interval == 0 {
                    info!("Processed {} {}s...", index + 1, kind.code());
                }
            }

            let added = self.engine.created_count() - created_before;
            info!(
                "Completed processing {} {}s, added {} records",
                concepts.len(),
                kind.code(),
                added
            );
            report.buckets.push(BucketReport {
                kind,
                concepts: concepts.len(),
                records_created: added,
            });
        }

        sink.finish()?;

        report.records_created = self.engine.created_count();
        report.diagnostics = self.engine.take_diagnostics();
        info!(
            records = report.records_created,
            diagnostics = report.diagnostics.len(),
            "Finished creating {} records",
            report.records_created
        );
        Ok(report)
    }
}
