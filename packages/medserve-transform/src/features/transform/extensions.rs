//! Derived extensions: parent medication tree, generalization chain,
//! historical associations and the extended reference that bundles them.

use ahash::AHashSet;
use std::sync::Arc;
use tracing::{debug, warn};

use super::diagnostics::Diagnostic;
use super::engine::{medication_kind, TransformEngine};
use crate::errors::{Result, TransformError};
use crate::features::records::{
    GeneralizedMedication, HistoricalExtension, HistoricalLink, ParentExtension,
};
use crate::features::references::ExtendedReference;
use crate::shared::models::{
    AmtConcept, Coding, Concept, ConceptId, HistoricalAssociation, ResourceType,
};

/// Generalization steps: (level the concept must descend from, broader level)
const GENERALIZATION_STEPS: [(AmtConcept, AmtConcept); 4] = [
    (AmtConcept::Ctpp, AmtConcept::Tpp),
    (AmtConcept::Tpp, AmtConcept::Mpp),
    (AmtConcept::Tpuu, AmtConcept::Mpuu),
    (AmtConcept::Mpuu, AmtConcept::Mp),
];

impl<'g> TransformEngine<'g> {
    /// Cached medication reference with its hierarchy summary.
    ///
    /// Computing it builds the parent extension tree, which also triggers
    /// record creation for every surfaced ancestor.
    pub fn extended_reference_for(&mut self, concept: &'g Concept) -> Result<Arc<ExtendedReference>> {
        if let Some(reference) = self.references.extended(concept.id) {
            return Ok(reference);
        }
        if !self.in_progress.insert(concept.id) {
            return Err(TransformError::model_inconsistency(format!(
                "extended reference of {} depends on itself",
                concept
            ))
            .with_concept(concept.id));
        }

        let computed = self.compute_extended_reference(concept);
        self.in_progress.remove(&concept.id);
        Ok(self.references.insert_extended(concept.id, computed?))
    }

    fn compute_extended_reference(&mut self, concept: &'g Concept) -> Result<ExtendedReference> {
        let reference = self.reference_for(concept, ResourceType::Medication);
        let parents = self.add_parent_extensions(concept, &mut AHashSet::new())?;
        let kind = medication_kind(concept)?;
        let history = self.historical_extension(concept, ResourceType::Medication)?;
        let generalized = self.generalized_chain(concept)?;

        Ok(ExtendedReference {
            reference,
            medication_kind: kind.code().to_string(),
            status: concept.status,
            last_modified: concept.last_modified,
            parents,
            generalized,
            history,
            brand: concept.brand.clone(),
        })
    }

    /// Parent medication tree of `concept`.
    ///
    /// Skips scaffolding concepts, parents already in this tree (`visited`),
    /// direct children of the trade product root and parents that are not
    /// packages or products. Each surfaced parent gets its own subtree and
    /// its record is created as well.
    pub(super) fn add_parent_extensions(
        &mut self,
        concept: &'g Concept,
        visited: &mut AHashSet<ConceptId>,
    ) -> Result<Vec<ParentExtension>> {
        let graph = self.graph;
        let mut nodes = Vec::new();

        for parent in graph.parents_of(concept)? {
            if AmtConcept::is_enum_value(parent.id) || visited.contains(&parent.id) {
                continue;
            }
            // Trade product concepts themselves, not the packs and units under them
            if graph.has_parent(parent.id, AmtConcept::Tp.id()) {
                continue;
            }
            let kind = match parent.medication_kind {
                Some(kind) if kind.is_package() || kind.is_product() => kind,
                _ => continue,
            };

            let reference = self.reference_for(parent, ResourceType::Medication);
            let history = self.historical_extension(parent, ResourceType::Medication)?;

            visited.insert(parent.id);
            let parents = self.add_parent_extensions(parent, visited)?;

            if kind.is_package() {
                self.ensure_package(parent)?;
            } else {
                self.ensure_product(parent)?;
            }

            nodes.push(ParentExtension {
                parent: reference,
                medication_kind: kind.code().to_string(),
                status: parent.status,
                last_modified: parent.last_modified,
                history,
                parents,
            });
        }

        Ok(nodes)
    }

    /// Broader classifications of `concept`, most specific first (0 to 4
    /// entries)
    pub(super) fn generalized_chain(&mut self, concept: &'g Concept) -> Result<Vec<GeneralizedMedication>> {
        let graph = self.graph;
        let mut chain = Vec::new();
        let mut current = concept;

        for (level, broader) in GENERALIZATION_STEPS {
            if !graph.has_ancestor_of_kind(current.id, level) {
                continue;
            }
            current = graph.leaf_ancestor_between(concept, broader, level)?;
            chain.push(GeneralizedMedication {
                reference: self.reference_for(current, ResourceType::Medication),
                medication_kind: medication_kind(current)?.code().to_string(),
            });
        }

        if !chain.is_empty() {
            debug!(
                concept = concept.id,
                entries = chain.len(),
                "Generalization chain"
            );
        }
        Ok(chain)
    }

    /// Replacement links of `concept`, seen from a record of kind `kind`
    pub(super) fn historical_extension(
        &mut self,
        concept: &'g Concept,
        kind: ResourceType,
    ) -> Result<HistoricalExtension> {
        let mut extension = HistoricalExtension::default();
        for association in &concept.replaced_by {
            let link = self.historical_link(concept, association, kind)?;
            extension.replaced_by.push(link);
        }
        for association in &concept.replaces {
            let link = self.historical_link(concept, association, kind)?;
            extension.replaces.push(link);
        }
        Ok(extension)
    }

    fn historical_link(
        &mut self,
        concept: &'g Concept,
        association: &HistoricalAssociation,
        kind: ResourceType,
    ) -> Result<HistoricalLink> {
        let graph = self.graph;
        let target = graph.concept(association.target)?;
        let target_kind = target.resource_type();

        if target_kind != kind && self.reported_mismatches.insert((concept.id, target.id)) {
            warn!(
                concept = concept.id,
                target = target.id,
                "AMT concept replacement {} for {} is not of the same type",
                target,
                concept
            );
            self.diagnostics
                .push(Diagnostic::type_mismatch(concept.id, kind, target.id, target_kind));
        }

        Ok(HistoricalLink {
            target: self.reference_for(target, target_kind),
            reason: self.reason_coding(association.reason),
            effective: association.effective,
        })
    }

    fn reason_coding(&self, reason: ConceptId) -> Coding {
        let display = AmtConcept::from_id(reason)
            .map(|known| known.display().to_string())
            .or_else(|| self.graph.get(reason).map(|c| c.preferred_term.clone()));
        Coding::snomed(reason, display)
    }
}
