//! Per-run reference caches
//!
//! Write-once, read-many: the first call for a key creates the reference and
//! every later call returns the same `Arc`, so references are identity-equal
//! across call sites for the whole run.

use ahash::AHashMap;
use std::sync::Arc;

use super::reference::{ExtendedReference, Reference};
use crate::shared::models::{Concept, ConceptId, Manufacturer, ResourceType};

#[derive(Debug, Default)]
pub struct ReferenceCache {
    references: AHashMap<ConceptId, Arc<Reference>>,
    /// Keyed by manufacturer code, a namespace separate from concept ids
    organizations: AHashMap<String, Arc<Reference>>,
    extended: AHashMap<ConceptId, Arc<ExtendedReference>>,
}

impl ReferenceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached reference for a concept. The record kind of the first request
    /// wins.
    pub fn reference_for(&mut self, concept: &Concept, kind: ResourceType) -> Arc<Reference> {
        self.references
            .entry(concept.id)
            .or_insert_with(|| {
                Arc::new(Reference::new(kind, concept.id, concept.preferred_term.as_str()))
            })
            .clone()
    }

    pub fn organization_reference(&mut self, manufacturer: &Manufacturer) -> Arc<Reference> {
        self.organizations
            .entry(manufacturer.code.clone())
            .or_insert_with(|| {
                Arc::new(Reference::new(
                    ResourceType::Organization,
                    &manufacturer.code,
                    manufacturer.name.as_str(),
                ))
            })
            .clone()
    }

    pub fn extended(&self, id: ConceptId) -> Option<Arc<ExtendedReference>> {
        self.extended.get(&id).cloned()
    }

    /// Store a computed extended reference; an existing entry is kept
    pub fn insert_extended(
        &mut self,
        id: ConceptId,
        reference: ExtendedReference,
    ) -> Arc<ExtendedReference> {
        self.extended
            .entry(id)
            .or_insert_with(|| Arc::new(reference))
            .clone()
    }

    pub fn len(&self) -> usize {
        self.references.len() + self.organizations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.references.is_empty() && self.organizations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::models::Status;
    use chrono::NaiveDate;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 31).unwrap()
    }

    #[test]
    fn test_reference_identity_is_stable() {
        let mut cache = ReferenceCache::new();
        let concept = Concept::new(42, "paracetamol", date());

        let first = cache.reference_for(&concept, ResourceType::Substance);
        let second = cache.reference_for(&concept, ResourceType::Substance);

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.reference, "Substance/42");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_organizations_use_own_namespace() {
        let mut cache = ReferenceCache::new();
        let concept = Concept::new(7, "seven", date());
        let manufacturer = Manufacturer {
            code: "7".to_string(),
            name: "Seven Pharma".to_string(),
            address: "1 Main St".to_string(),
            phone: "555".to_string(),
            fax: None,
        };

        let medication = cache.reference_for(&concept, ResourceType::Medication);
        let organization = cache.organization_reference(&manufacturer);

        assert!(!Arc::ptr_eq(&medication, &organization));
        assert_eq!(organization.reference, "Organization/7");
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_extended_reference_is_write_once() {
        let mut cache = ReferenceCache::new();
        let concept = Concept::new(9, "pack", date());
        let reference = cache.reference_for(&concept, ResourceType::Medication);
        let extended = |brand: &str| ExtendedReference {
            reference: reference.clone(),
            medication_kind: "BPG".to_string(),
            status: Status::Active,
            last_modified: date(),
            parents: Vec::new(),
            generalized: Vec::new(),
            history: Default::default(),
            brand: Some(brand.to_string()),
        };

        let first = cache.insert_extended(9, extended("first"));
        let second = cache.insert_extended(9, extended("second"));

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.brand.as_deref(), Some("first"));
        assert!(Arc::ptr_eq(&cache.extended(9).unwrap(), &first));
    }
}
