//! Recursive, memoized concept-to-record builder
//!
//! Every `ensure_*` operation is idempotent for the run: the first call for a
//! concept marks it in the created-set before building anything, builds the
//! record (recursing into everything it references) and appends it to the
//! current batch; every later call only returns the cached reference.
//!
//! ## State
//! - `created`: global created-set, one entry per concept id / manufacturer code
//! - `references`: reference + extended reference caches
//! - `in_progress`: extended references being computed (cycle guard)
//! - `batch`: records created since the last [`TransformEngine::take_batch`]
//!
//! All of it lives in the engine value; nothing is process-wide.

use ahash::AHashSet;
use std::sync::Arc;
use tracing::debug;

use super::diagnostics::Diagnostic;
use super::subsidy::SubsidyMerger;
use crate::config::TransformConfig;
use crate::errors::{Result, TransformError};
use crate::features::concept_graph::ConceptGraph;
use crate::features::records::{
    MedicationDetails, PackageRecord, ProductRecord, Record, RecordBase, RecordBody, RecordKey,
    SourceCodeSystem, SubstanceRecord,
};
use crate::features::references::{ExtendedReference, Reference, ReferenceCache};
use crate::shared::constants::CodeSystemUri;
use crate::shared::models::{
    AmtConcept, AttributeType, CodeableConcept, Coding, Concept, ConceptId, MedicationKind,
    Narrative, ReleaseVersion, ResourceType, Status,
};

pub struct TransformEngine<'g> {
    pub(super) graph: &'g ConceptGraph,
    release: ReleaseVersion,
    version_uri: String,
    max_depth: usize,
    depth: usize,
    pub(super) references: ReferenceCache,
    pub(super) created: AHashSet<RecordKey>,
    pub(super) in_progress: AHashSet<ConceptId>,
    batch: Vec<Record>,
    created_total: usize,
    pub(super) diagnostics: Vec<Diagnostic>,
    /// (concept, target) pairs already reported as type mismatches
    pub(super) reported_mismatches: AHashSet<(ConceptId, ConceptId)>,
}

impl<'g> TransformEngine<'g> {
    /// The release must already be validated, so a malformed identifier
    /// never reaches a run
    pub fn new(graph: &'g ConceptGraph, release: ReleaseVersion, config: &TransformConfig) -> Self {
        let version_uri = release.version_uri();
        Self {
            graph,
            release,
            version_uri,
            max_depth: config.max_recursion_depth,
            depth: 0,
            references: ReferenceCache::new(),
            created: AHashSet::new(),
            in_progress: AHashSet::new(),
            batch: Vec::new(),
            created_total: 0,
            diagnostics: Vec::new(),
            reported_mismatches: AHashSet::new(),
        }
    }

    pub fn graph(&self) -> &'g ConceptGraph {
        self.graph
    }

    pub fn release(&self) -> &ReleaseVersion {
        &self.release
    }

    /// True once a record for the concept has been started
    pub fn is_created(&self, id: ConceptId) -> bool {
        self.created.contains(&RecordKey::Concept(id))
    }

    /// Records created over the whole run
    pub fn created_count(&self) -> usize {
        self.created_total
    }

    /// Hand over the records created since the last call, in creation order
    pub fn take_batch(&mut self) -> Vec<Record> {
        std::mem::take(&mut self.batch)
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    /// Stable reference for a concept
    pub fn reference_for(&mut self, concept: &Concept, kind: ResourceType) -> Arc<Reference> {
        self.references.reference_for(concept, kind)
    }

    /// Materialize a top-level concept through the entry point its kind needs
    pub fn ensure(&mut self, concept: &'g Concept) -> Result<()> {
        match concept.medication_kind {
            Some(kind) if kind.is_package() => self.ensure_package(concept).map(drop),
            Some(MedicationKind::Substance) => self.ensure_substance(concept).map(drop),
            Some(_) => self.ensure_product(concept).map(drop),
            None => Err(TransformError::model_inconsistency(format!(
                "{} has no medication kind",
                concept
            ))
            .with_concept(concept.id)),
        }
    }

    pub fn ensure_substance(&mut self, concept: &'g Concept) -> Result<Arc<Reference>> {
        let reference = self.reference_for(concept, ResourceType::Substance);
        if !self.created.insert(RecordKey::Concept(concept.id)) {
            return Ok(reference);
        }

        self.descend(concept, |engine| {
            let base = engine.base_record(concept, ResourceType::Substance)?;
            let graph = engine.graph;
            let mut ingredients = Vec::new();
            for modified in graph.destinations(concept, AttributeType::IsModificationOf)? {
                ingredients.push(engine.ensure_substance(modified)?);
            }
            engine.emit(Record {
                base,
                body: RecordBody::Substance(SubstanceRecord { ingredients }),
            });
            Ok(())
        })?;

        Ok(reference)
    }

    pub fn ensure_product(&mut self, concept: &'g Concept) -> Result<Arc<ExtendedReference>> {
        self.descend(concept, |engine| {
            let reference = engine.extended_reference_for(concept)?;
            if !engine.created.insert(RecordKey::Concept(concept.id)) {
                return Ok(reference);
            }

            let base = engine.base_record(concept, ResourceType::Medication)?;
            let medication = engine.medication_details(concept)?;
            let graph = engine.graph;

            let mut ingredients = Vec::new();
            for group in graph
                .relationship_groups_containing(concept, AttributeType::HasIntendedActiveIngredient)
            {
                ingredients.push(engine.ingredient(concept, &group)?);
            }

            let form = graph
                .optional_single_destination(concept, AttributeType::HasManufacturedDoseForm)?
                .map(CodeableConcept::from);

            engine.emit(Record {
                base,
                body: RecordBody::Product(ProductRecord {
                    medication,
                    form,
                    ingredients,
                }),
            });
            Ok(reference)
        })
    }

    pub fn ensure_package(&mut self, concept: &'g Concept) -> Result<Arc<ExtendedReference>> {
        self.descend(concept, |engine| {
            let reference = engine.extended_reference_for(concept)?;
            if !engine.created.insert(RecordKey::Concept(concept.id)) {
                return Ok(reference);
            }

            let base = engine.base_record(concept, ResourceType::Medication)?;
            let medication = engine.medication_details(concept)?;
            let graph = engine.graph;

            let container = graph
                .optional_single_destination(concept, AttributeType::HasContainerType)?
                .map(CodeableConcept::from);

            let mut contents = Vec::new();
            for kind in AttributeType::PACKAGE_CONTENTS {
                for relationship in concept.relationships_of(kind) {
                    contents.push(engine.content_item(relationship)?);
                }
            }

            let mut subsidies = SubsidyMerger::new();
            for subsidy in &concept.subsidies {
                subsidies.add(subsidy);
            }
            // Terminal package: pull down subsidies stated one level up
            if graph.has_parent(concept.id, AmtConcept::Ctpp.id()) {
                for parent in graph.parents_of(concept)? {
                    if graph.has_ancestor_of_kind(parent.id, AmtConcept::Tpp)
                        && !graph.has_ancestor_of_kind(parent.id, AmtConcept::Ctpp)
                    {
                        for subsidy in &parent.subsidies {
                            subsidies.add(subsidy);
                        }
                    }
                }
            }

            let manufacturer = concept
                .manufacturer
                .as_ref()
                .map(|manufacturer| engine.ensure_organization(manufacturer));

            engine.emit(Record {
                base,
                body: RecordBody::Package(PackageRecord {
                    medication,
                    container,
                    contents,
                    manufacturer,
                    subsidies: subsidies.into_entries(),
                }),
            });
            Ok(reference)
        })
    }

    /// Shared record shell
    fn base_record(&mut self, concept: &'g Concept, kind: ResourceType) -> Result<RecordBase> {
        let history = self.historical_extension(concept, kind)?;
        let generalized = match kind {
            ResourceType::Medication => self.generalized_chain(concept)?,
            ResourceType::Substance | ResourceType::Organization => Vec::new(),
        };

        let mut code = CodeableConcept::from(concept);
        for identifier in &concept.external_ids {
            code.push(Coding {
                system: identifier.system.clone(),
                code: identifier.code.clone(),
                display: None,
            });
        }

        Ok(RecordBase {
            id: concept.id.to_string(),
            narrative: Narrative::generated(&concept.preferred_term),
            source: self.source_code_system(),
            status: Status::from_active(concept.active),
            last_modified: Some(concept.last_modified),
            code,
            history,
            generalized,
        })
    }

    fn medication_details(&mut self, concept: &'g Concept) -> Result<MedicationDetails> {
        let kind = medication_kind(concept)?;
        let parents = self.add_parent_extensions(concept, &mut AHashSet::new())?;
        Ok(MedicationDetails {
            medication_kind: kind.code().to_string(),
            is_brand: kind.is_branded(),
            parents,
            brand: concept.brand.clone(),
        })
    }

    pub(super) fn source_code_system(&self) -> SourceCodeSystem {
        SourceCodeSystem {
            system: CodeSystemUri::SnomedCt.uri().to_string(),
            version: self.version_uri.clone(),
        }
    }

    pub(super) fn emit(&mut self, record: Record) {
        debug!(
            record = record.id(),
            kind = record.kind_name(),
            "Created record"
        );
        self.created_total += 1;
        self.batch.push(record);
    }

    /// Run `f` one level deeper, aborting past the configured depth
    pub(super) fn descend<T>(
        &mut self,
        concept: &Concept,
        f: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        if self.depth >= self.max_depth {
            return Err(TransformError::model_inconsistency(format!(
                "record nesting deeper than {} levels at {}",
                self.max_depth, concept
            ))
            .with_concept(concept.id));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }
}

/// Medication kind of a concept materialized as a medication record
pub(super) fn medication_kind(concept: &Concept) -> Result<MedicationKind> {
    concept.medication_kind.ok_or_else(|| {
        TransformError::model_inconsistency(format!("{} has no medication kind", concept))
            .with_concept(concept.id)
    })
}
