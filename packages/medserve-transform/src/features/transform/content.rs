//! Package content items and the pack-containment back-stitch

use std::collections::BTreeSet;
use tracing::debug;

use super::engine::TransformEngine;
use crate::errors::{Result, TransformError};
use crate::features::records::ContentItem;
use crate::shared::models::{
    AmtConcept, AttributeType, Concept, ContentTarget, Quantity, Relationship,
};

impl<'g> TransformEngine<'g> {
    /// Content item for one package content relationship
    pub(super) fn content_item(&mut self, relationship: &'g Relationship) -> Result<ContentItem> {
        let graph = self.graph;

        let target = relationship.kind.content_target().ok_or_else(|| {
            TransformError::model_inconsistency(format!(
                "{} is not a package content relationship",
                relationship.kind.as_str()
            ))
            .with_concept(relationship.source)
        })?;

        let destination = if relationship.kind.is_pack_containment()
            && graph.has_parent(relationship.source, AmtConcept::Tpp.id())
        {
            self.back_stitch(relationship)?
        } else {
            graph.concept(relationship.destination)?
        };

        let item = match target {
            ContentTarget::Package => self.ensure_package(destination)?,
            ContentTarget::Product => self.ensure_product(destination)?,
        };

        let amount = if relationship.kind == AttributeType::HasComponentPack {
            Quantity::unitless(1.0)
        } else {
            let datatype = relationship.datatype.ok_or_else(|| {
                TransformError::model_inconsistency(format!(
                    "{} relationship from {} to {} has no quantity",
                    relationship.kind.as_str(),
                    relationship.source,
                    relationship.destination
                ))
                .with_concept(relationship.source)
            })?;
            Quantity::with_unit(datatype.value, graph.concept(datatype.unit)?)
        };

        Ok(ContentItem { item, amount })
    }

    /// Branded destination of a pack containment relationship stated on a
    /// TPP.
    ///
    /// These relationships are inherited from the MPP and point at an
    /// unbranded pack. The branded pack is found through the packages below
    /// the source: their relationships of the same type lead to packs whose
    /// parents include it. Exactly one such parent under the stated
    /// destination must exist.
    fn back_stitch(&self, relationship: &Relationship) -> Result<&'g Concept> {
        let graph = self.graph;
        let stated = relationship.destination;

        let mut candidates = BTreeSet::new();
        for id in graph.descendants_of(relationship.source) {
            let descendant = graph.concept(id)?;
            if !descendant.is_package() {
                continue;
            }
            for restated in descendant.relationships_of(relationship.kind) {
                let pack = graph.concept(restated.destination)?;
                for &parent in &pack.parents {
                    if graph.has_ancestor(parent, stated) {
                        candidates.insert(parent);
                    }
                }
            }
        }

        match candidates.len() {
            1 => {
                let resolved = candidates.into_iter().next().unwrap_or(stated);
                debug!(
                    source = relationship.source,
                    stated,
                    resolved,
                    "Back-stitched {} destination",
                    relationship.kind.as_str()
                );
                graph.concept(resolved)
            }
            _ => Err(TransformError::model_inconsistency(format!(
                "ambiguous back-stitch destination for {} from {} to {}: candidates {:?}",
                relationship.kind.as_str(),
                relationship.source,
                stated,
                candidates
            ))
            .with_concept(relationship.source)),
        }
    }
}
