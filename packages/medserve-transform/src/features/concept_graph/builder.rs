//! Concept graph construction and validation
//!
//! The loader (out of scope here) feeds concepts, relationships and the
//! auxiliary regulatory datasets into a [`ConceptGraphBuilder`]; `build()`
//! merges everything onto the concepts, checks referential integrity and
//! rejects cycles in the is-a hierarchy before anything reads the graph.

use ahash::AHashMap;
use chrono::NaiveDate;
use petgraph::algo::tarjan_scc;
use petgraph::graph::DiGraph;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::graph::ConceptGraph;
use crate::errors::{Result, TransformError};
use crate::shared::models::{
    AmtConcept, Concept, ConceptId, ExternalIdentifier, Manufacturer, Relationship, Subsidy,
};

/// Serialized form of a fully loaded release, as read by the CLI
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub concepts: Vec<Concept>,
    /// Relationships stated outside the concepts
    #[serde(default)]
    pub relationships: Vec<Relationship>,
    #[serde(default)]
    pub subsidies: Vec<SubsidyAssignment>,
    #[serde(default)]
    pub manufacturers: Vec<ManufacturerAssignment>,
    #[serde(default)]
    pub external_ids: Vec<ExternalIdAssignment>,
    /// Add the AMT scaffolding concepts missing from `concepts`
    #[serde(default)]
    pub scaffolding_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubsidyAssignment {
    pub concept_id: ConceptId,
    pub subsidy: Subsidy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManufacturerAssignment {
    pub concept_id: ConceptId,
    pub manufacturer: Manufacturer,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalIdAssignment {
    pub concept_id: ConceptId,
    pub identifier: ExternalIdentifier,
}

/// Accumulates a release and turns it into a [`ConceptGraph`]
#[derive(Debug, Default)]
pub struct ConceptGraphBuilder {
    concepts: AHashMap<ConceptId, Concept>,
    relationships: Vec<Relationship>,
    subsidies: Vec<(ConceptId, Subsidy)>,
    manufacturers: Vec<(ConceptId, Manufacturer)>,
    external_ids: Vec<(ConceptId, ExternalIdentifier)>,
}

impl ConceptGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add every well-known AMT concept that is not present yet, as a root
    pub fn with_amt_scaffolding(mut self, last_modified: NaiveDate) -> Self {
        for root in AmtConcept::ALL {
            self.concepts
                .entry(root.id())
                .or_insert_with(|| Concept::new(root.id(), root.display(), last_modified));
        }
        self
    }

    /// Add a concept; a later concept with the same id replaces the earlier one
    pub fn add_concept(&mut self, concept: Concept) -> &mut Self {
        self.concepts.insert(concept.id, concept);
        self
    }

    /// Add a relationship, merged onto its source at build time
    pub fn add_relationship(&mut self, relationship: Relationship) -> &mut Self {
        self.relationships.push(relationship);
        self
    }

    pub fn attach_subsidy(&mut self, concept_id: ConceptId, subsidy: Subsidy) -> &mut Self {
        self.subsidies.push((concept_id, subsidy));
        self
    }

    pub fn attach_manufacturer(
        &mut self,
        concept_id: ConceptId,
        manufacturer: Manufacturer,
    ) -> &mut Self {
        self.manufacturers.push((concept_id, manufacturer));
        self
    }

    pub fn attach_external_id(
        &mut self,
        concept_id: ConceptId,
        identifier: ExternalIdentifier,
    ) -> &mut Self {
        self.external_ids.push((concept_id, identifier));
        self
    }

    pub fn from_snapshot(snapshot: GraphSnapshot) -> Self {
        let mut builder = Self::new();
        for concept in snapshot.concepts {
            builder.add_concept(concept);
        }
        if let Some(date) = snapshot.scaffolding_date {
            builder = builder.with_amt_scaffolding(date);
        }
        for relationship in snapshot.relationships {
            builder.add_relationship(relationship);
        }
        for assignment in snapshot.subsidies {
            builder.attach_subsidy(assignment.concept_id, assignment.subsidy);
        }
        for assignment in snapshot.manufacturers {
            builder.attach_manufacturer(assignment.concept_id, assignment.manufacturer);
        }
        for assignment in snapshot.external_ids {
            builder.attach_external_id(assignment.concept_id, assignment.identifier);
        }
        builder
    }

    /// Merge, validate and freeze the graph
    pub fn build(self) -> Result<ConceptGraph> {
        let Self {
            mut concepts,
            relationships,
            subsidies,
            manufacturers,
            external_ids,
        } = self;

        for relationship in relationships {
            owner(&mut concepts, relationship.source)?
                .relationships
                .push(relationship);
        }
        for (id, subsidy) in subsidies {
            owner(&mut concepts, id)?.subsidies.push(subsidy);
        }
        for (id, manufacturer) in manufacturers {
            owner(&mut concepts, id)?.manufacturer = Some(manufacturer);
        }
        for (id, identifier) in external_ids {
            owner(&mut concepts, id)?.external_ids.push(identifier);
        }

        validate_references(&concepts)?;

        // Is-a hierarchy: child → parent
        let mut hierarchy = DiGraph::with_capacity(concepts.len(), concepts.len());
        let mut node_of = AHashMap::with_capacity(concepts.len());
        let mut ids: Vec<ConceptId> = concepts.keys().copied().collect();
        ids.sort_unstable();
        for &id in &ids {
            node_of.insert(id, hierarchy.add_node(id));
        }
        for &id in &ids {
            let concept = &concepts[&id];
            for parent in &concept.parents {
                hierarchy.add_edge(node_of[&id], node_of[parent], ());
            }
        }

        if let Some(cycle) = tarjan_scc(&hierarchy)
            .into_iter()
            .find(|scc| scc.len() > 1)
        {
            let mut members: Vec<ConceptId> = cycle.into_iter().map(|n| hierarchy[n]).collect();
            members.sort_unstable();
            return Err(TransformError::model_inconsistency(format!(
                "is-a hierarchy contains a cycle through concepts {:?}",
                members
            ))
            .with_concept(members[0]));
        }

        info!(
            concepts = concepts.len(),
            is_a_edges = hierarchy.edge_count(),
            "Built concept graph"
        );

        Ok(ConceptGraph::from_parts(concepts, hierarchy, node_of))
    }
}

fn owner(concepts: &mut AHashMap<ConceptId, Concept>, id: ConceptId) -> Result<&mut Concept> {
    concepts
        .get_mut(&id)
        .ok_or_else(|| TransformError::unknown_concept(id))
}

/// Every id a concept points at must be in the graph
fn validate_references(concepts: &AHashMap<ConceptId, Concept>) -> Result<()> {
    let dangling = |from: &Concept, to: ConceptId, what: &str| {
        TransformError::model_inconsistency(format!(
            "{} of {} refers to unknown concept {}",
            what, from, to
        ))
        .with_concept(from.id)
    };

    for concept in concepts.values() {
        for &parent in &concept.parents {
            if parent == concept.id {
                return Err(TransformError::model_inconsistency(format!(
                    "{} is its own parent",
                    concept
                ))
                .with_concept(concept.id));
            }
            if !concepts.contains_key(&parent) {
                return Err(dangling(concept, parent, "parent"));
            }
        }
        for relationship in &concept.relationships {
            if relationship.source != concept.id {
                return Err(TransformError::model_inconsistency(format!(
                    "relationship {} stored on {} has source {}",
                    relationship.kind.as_str(),
                    concept,
                    relationship.source
                ))
                .with_concept(concept.id));
            }
            if !concepts.contains_key(&relationship.destination) {
                return Err(dangling(
                    concept,
                    relationship.destination,
                    relationship.kind.as_str(),
                ));
            }
            if let Some(datatype) = &relationship.datatype {
                if !concepts.contains_key(&datatype.unit) {
                    return Err(dangling(concept, datatype.unit, "unit"));
                }
            }
        }
        for association in concept.replaced_by.iter().chain(&concept.replaces) {
            if !concepts.contains_key(&association.target) {
                return Err(dangling(concept, association.target, "historical association"));
            }
        }
    }
    Ok(())
}
