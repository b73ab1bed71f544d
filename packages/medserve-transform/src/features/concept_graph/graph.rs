//! Read-only concept graph (petgraph)
//!
//! Directed graph where:
//! - Nodes are concept ids
//! - Edges are is-a links (child → parent)
//!
//! Ancestor queries walk outgoing edges, descendant queries walk the reversed
//! graph. Attribute relationships are kept on the concepts themselves.

use ahash::{AHashMap, AHashSet};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::{Dfs, Reversed};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use crate::errors::{Result, TransformError};
use crate::shared::models::{
    AmtConcept, AttributeType, Concept, ConceptId, MedicationKind, Relationship,
};

/// Immutable view of one release's concepts
///
/// Built by [`super::ConceptGraphBuilder`], which guarantees that every
/// parent and relationship destination resolves and the is-a hierarchy is
/// acyclic. Holds no interior mutability, so shared references can be read
/// from several threads.
#[derive(Debug)]
pub struct ConceptGraph {
    concepts: AHashMap<ConceptId, Concept>,
    hierarchy: DiGraph<ConceptId, ()>,
    node_of: AHashMap<ConceptId, NodeIndex>,
    /// Concept ids per medication kind, ascending
    by_kind: AHashMap<MedicationKind, Vec<ConceptId>>,
}

impl ConceptGraph {
    pub(super) fn from_parts(
        concepts: AHashMap<ConceptId, Concept>,
        hierarchy: DiGraph<ConceptId, ()>,
        node_of: AHashMap<ConceptId, NodeIndex>,
    ) -> Self {
        let mut by_kind: AHashMap<MedicationKind, Vec<ConceptId>> = AHashMap::new();
        for concept in concepts.values() {
            if let Some(kind) = concept.medication_kind {
                by_kind.entry(kind).or_default().push(concept.id);
            }
        }
        for ids in by_kind.values_mut() {
            ids.sort_unstable();
        }

        debug!(
            concepts = concepts.len(),
            is_a_edges = hierarchy.edge_count(),
            "Concept graph ready"
        );

        Self {
            concepts,
            hierarchy,
            node_of,
            by_kind,
        }
    }

    pub fn len(&self) -> usize {
        self.concepts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.concepts.is_empty()
    }

    pub fn get(&self, id: ConceptId) -> Option<&Concept> {
        self.concepts.get(&id)
    }

    /// Concept by id, `UnknownConcept` if absent
    pub fn concept(&self, id: ConceptId) -> Result<&Concept> {
        self.concepts
            .get(&id)
            .ok_or_else(|| TransformError::unknown_concept(id))
    }

    pub fn contains(&self, id: ConceptId) -> bool {
        self.concepts.contains_key(&id)
    }

    /// Direct parents, ordered by id
    pub fn parents_of(&self, concept: &Concept) -> Result<Vec<&Concept>> {
        concept.parents.iter().map(|&id| self.concept(id)).collect()
    }

    /// Stated relationships of one type, in stated order
    pub fn relationships_of<'a>(
        &self,
        concept: &'a Concept,
        kind: AttributeType,
    ) -> Vec<&'a Relationship> {
        concept.relationships_of(kind).collect()
    }

    /// Destinations of every relationship of one type
    pub fn destinations(&self, concept: &Concept, kind: AttributeType) -> Result<Vec<&Concept>> {
        concept
            .relationships_of(kind)
            .map(|r| self.concept(r.destination))
            .collect()
    }

    /// Destination of the only relationship of `kind`; `Cardinality` unless
    /// there is exactly one
    pub fn single_destination(&self, concept: &Concept, kind: AttributeType) -> Result<&Concept> {
        self.optional_single_destination(concept, kind)?
            .ok_or_else(|| {
                TransformError::cardinality(format!(
                    "expected exactly one {} relationship on {}, found none",
                    kind.as_str(),
                    concept
                ))
                .with_concept(concept.id)
            })
    }

    /// Destination of the relationship of `kind` if there is one;
    /// `Cardinality` when there are several
    pub fn optional_single_destination(
        &self,
        concept: &Concept,
        kind: AttributeType,
    ) -> Result<Option<&Concept>> {
        let mut relationships = concept.relationships_of(kind);
        let first = match relationships.next() {
            Some(r) => r,
            None => return Ok(None),
        };
        let extra = relationships.count();
        if extra > 0 {
            return Err(TransformError::cardinality(format!(
                "expected at most one {} relationship on {}, found {}",
                kind.as_str(),
                concept,
                extra + 1
            ))
            .with_concept(concept.id));
        }
        self.concept(first.destination).map(Some)
    }

    /// Relationship groups holding at least one relationship of `kind`,
    /// ordered by group number. Each group lists all of its relationships.
    pub fn relationship_groups_containing<'a>(
        &self,
        concept: &'a Concept,
        kind: AttributeType,
    ) -> Vec<Vec<&'a Relationship>> {
        let mut groups: BTreeMap<u32, Vec<&'a Relationship>> = BTreeMap::new();
        for relationship in &concept.relationships {
            groups.entry(relationship.group).or_default().push(relationship);
        }
        groups
            .into_values()
            .filter(|group| group.iter().any(|r| r.kind == kind))
            .collect()
    }

    /// True when `parent` is a direct parent of `id`
    #[inline]
    pub fn has_parent(&self, id: ConceptId, parent: ConceptId) -> bool {
        self.concepts
            .get(&id)
            .map_or(false, |c| c.parents.contains(&parent))
    }

    /// True when `ancestor` is a strict transitive ancestor of `id`
    pub fn has_ancestor(&self, id: ConceptId, ancestor: ConceptId) -> bool {
        if id == ancestor {
            return false;
        }
        let (start, target) = match (self.node_of.get(&id), self.node_of.get(&ancestor)) {
            (Some(&start), Some(&target)) => (start, target),
            _ => return false,
        };
        let mut dfs = Dfs::new(&self.hierarchy, start);
        while let Some(node) = dfs.next(&self.hierarchy) {
            if node == target {
                return true;
            }
        }
        false
    }

    /// True when the concept descends from the scaffolding root `kind`
    #[inline]
    pub fn has_ancestor_of_kind(&self, id: ConceptId, kind: AmtConcept) -> bool {
        self.has_ancestor(id, kind.id())
    }

    /// All strict ancestors of a concept
    pub fn ancestors_of(&self, id: ConceptId) -> AHashSet<ConceptId> {
        let mut ancestors = AHashSet::new();
        if let Some(&start) = self.node_of.get(&id) {
            let mut dfs = Dfs::new(&self.hierarchy, start);
            while let Some(node) = dfs.next(&self.hierarchy) {
                if node != start {
                    ancestors.insert(self.hierarchy[node]);
                }
            }
        }
        ancestors
    }

    /// All strict descendants of a concept
    pub fn descendants_of(&self, id: ConceptId) -> BTreeSet<ConceptId> {
        let mut descendants = BTreeSet::new();
        if let Some(&start) = self.node_of.get(&id) {
            let reversed = Reversed(&self.hierarchy);
            let mut dfs = Dfs::new(reversed, start);
            while let Some(node) = dfs.next(reversed) {
                if node != start {
                    descendants.insert(self.hierarchy[node]);
                }
            }
        }
        descendants
    }

    /// Most specific ancestor of `concept` that descends from `kind` but not
    /// from `excluding`.
    ///
    /// Candidates are the strict, non-scaffolding ancestors under `kind` and
    /// outside `excluding`; the leaf is the candidate no other candidate
    /// descends from. `Hierarchy` when there is none. Several leaves are
    /// resolved to the smallest id so the result does not depend on hash
    /// order.
    pub fn leaf_ancestor_between(
        &self,
        concept: &Concept,
        kind: AmtConcept,
        excluding: AmtConcept,
    ) -> Result<&Concept> {
        let candidates: BTreeSet<ConceptId> = self
            .ancestors_of(concept.id)
            .into_iter()
            .filter(|&id| !AmtConcept::is_enum_value(id))
            .filter(|&id| self.has_ancestor_of_kind(id, kind))
            .filter(|&id| !self.has_ancestor_of_kind(id, excluding))
            .collect();

        let leaves: Vec<ConceptId> = candidates
            .iter()
            .copied()
            .filter(|&id| {
                !candidates
                    .iter()
                    .any(|&other| other != id && self.has_ancestor(other, id))
            })
            .collect();

        match leaves.as_slice() {
            [] => Err(TransformError::hierarchy(format!(
                "{} has no ancestor under {:?} outside {:?}",
                concept, kind, excluding
            ))
            .with_concept(concept.id)),
            [leaf] => self.concept(*leaf),
            [first, ..] => {
                debug!(
                    concept = concept.id,
                    leaves = ?leaves,
                    "Several leaf ancestors under {:?}, using {}",
                    kind,
                    first
                );
                self.concept(*first)
            }
        }
    }

    /// Concepts classified as `kind`, ordered by id
    pub fn concepts_of_kind(&self, kind: MedicationKind) -> Vec<&Concept> {
        self.by_kind
            .get(&kind)
            .map(|ids| ids.iter().filter_map(|id| self.concepts.get(id)).collect())
            .unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Concept> {
        self.concepts.values()
    }
}
