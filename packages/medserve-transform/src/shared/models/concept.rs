//! Terminology concept model.
//!
//! A [`Concept`] is immutable once the graph is built. Everything the engine
//! needs about a concept (relationships, parents, auxiliary regulatory data)
//! is merged onto it by the loader before the run starts.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use super::relationship::{AttributeType, Relationship};
use super::subsidy::{ExternalIdentifier, Manufacturer, Subsidy};
use super::well_known::AmtConcept;

/// SNOMED CT identifier
pub type ConceptId = u64;

/// Lifecycle status shared by concepts and output records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    Active,
    Inactive,
    EnteredInError,
}

impl Status {
    /// Record status derived from a concept's active flag
    pub fn from_active(active: bool) -> Self {
        if active {
            Status::Active
        } else {
            Status::EnteredInError
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Active => "active",
            Status::Inactive => "inactive",
            Status::EnteredInError => "entered-in-error",
        }
    }
}

/// Kind of record a concept materializes as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceType {
    Medication,
    Substance,
    Organization,
}

impl ResourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Medication => "Medication",
            ResourceType::Substance => "Substance",
            ResourceType::Organization => "Organization",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Medication classification of a concept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MedicationKind {
    /// CTPP
    BrandedPackageContainer,
    /// TPP
    BrandedPackage,
    /// MPP
    UnbrandedPackage,
    /// TPUU
    BrandedProductStrengthForm,
    /// MPUU
    UnbrandedProductStrengthForm,
    /// MP
    UnbrandedProduct,
    Substance,
}

impl MedicationKind {
    pub fn code(&self) -> &'static str {
        match self {
            MedicationKind::BrandedPackageContainer => "BPGC",
            MedicationKind::BrandedPackage => "BPG",
            MedicationKind::UnbrandedPackage => "UPG",
            MedicationKind::BrandedProductStrengthForm => "BPSF",
            MedicationKind::UnbrandedProductStrengthForm => "UPDSF",
            MedicationKind::UnbrandedProduct => "UPD",
            MedicationKind::Substance => "SUB",
        }
    }

    /// Scaffolding root this kind of concept descends from
    pub fn level(&self) -> AmtConcept {
        match self {
            MedicationKind::BrandedPackageContainer => AmtConcept::Ctpp,
            MedicationKind::BrandedPackage => AmtConcept::Tpp,
            MedicationKind::UnbrandedPackage => AmtConcept::Mpp,
            MedicationKind::BrandedProductStrengthForm => AmtConcept::Tpuu,
            MedicationKind::UnbrandedProductStrengthForm => AmtConcept::Mpuu,
            MedicationKind::UnbrandedProduct => AmtConcept::Mp,
            MedicationKind::Substance => AmtConcept::Substance,
        }
    }

    #[inline]
    pub fn is_package(&self) -> bool {
        matches!(
            self,
            MedicationKind::BrandedPackageContainer
                | MedicationKind::BrandedPackage
                | MedicationKind::UnbrandedPackage
        )
    }

    #[inline]
    pub fn is_product(&self) -> bool {
        matches!(
            self,
            MedicationKind::BrandedProductStrengthForm
                | MedicationKind::UnbrandedProductStrengthForm
                | MedicationKind::UnbrandedProduct
        )
    }

    #[inline]
    pub fn is_branded(&self) -> bool {
        matches!(
            self,
            MedicationKind::BrandedPackageContainer
                | MedicationKind::BrandedPackage
                | MedicationKind::BrandedProductStrengthForm
        )
    }

    pub fn resource_type(&self) -> ResourceType {
        match self {
            MedicationKind::Substance => ResourceType::Substance,
            _ => ResourceType::Medication,
        }
    }
}

/// Replacement / replaced-by association of a concept
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoricalAssociation {
    /// Association reference set (reason)
    pub reason: ConceptId,
    pub target: ConceptId,
    pub effective: NaiveDate,
}

impl HistoricalAssociation {
    pub fn new(reason: ConceptId, target: ConceptId, effective: NaiveDate) -> Self {
        Self {
            reason,
            target,
            effective,
        }
    }
}

/// A terminology concept with everything merged onto it by the loader
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Concept {
    pub id: ConceptId,
    pub preferred_term: String,
    pub active: bool,
    pub status: Status,
    #[serde(default)]
    pub medication_kind: Option<MedicationKind>,
    pub last_modified: NaiveDate,
    #[serde(default)]
    pub parents: BTreeSet<ConceptId>,
    #[serde(default)]
    pub relationships: Vec<Relationship>,
    #[serde(default)]
    pub manufacturer: Option<Manufacturer>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub subsidies: Vec<Subsidy>,
    /// Concepts replacing this one
    #[serde(default)]
    pub replaced_by: Vec<HistoricalAssociation>,
    /// Concepts this one replaces
    #[serde(default)]
    pub replaces: Vec<HistoricalAssociation>,
    #[serde(default)]
    pub external_ids: Vec<ExternalIdentifier>,
}

impl Concept {
    pub fn new(id: ConceptId, preferred_term: impl Into<String>, last_modified: NaiveDate) -> Self {
        Self {
            id,
            preferred_term: preferred_term.into(),
            active: true,
            status: Status::Active,
            medication_kind: None,
            last_modified,
            parents: BTreeSet::new(),
            relationships: Vec::new(),
            manufacturer: None,
            brand: None,
            subsidies: Vec::new(),
            replaced_by: Vec::new(),
            replaces: Vec::new(),
            external_ids: Vec::new(),
        }
    }

    pub fn with_kind(mut self, kind: MedicationKind) -> Self {
        self.medication_kind = Some(kind);
        self
    }

    pub fn with_parent(mut self, parent: ConceptId) -> Self {
        self.parents.insert(parent);
        self
    }

    pub fn with_parents(mut self, parents: impl IntoIterator<Item = ConceptId>) -> Self {
        self.parents.extend(parents);
        self
    }

    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self.status = Status::Inactive;
        self
    }

    pub fn with_replaced_by(mut self, association: HistoricalAssociation) -> Self {
        self.replaced_by.push(association);
        self
    }

    pub fn with_replaces(mut self, association: HistoricalAssociation) -> Self {
        self.replaces.push(association);
        self
    }

    /// Record kind this concept materializes as; non-medication concepts
    /// (units, forms) are referenced as medications by convention
    pub fn resource_type(&self) -> ResourceType {
        self.medication_kind
            .map(|k| k.resource_type())
            .unwrap_or(ResourceType::Medication)
    }

    #[inline]
    pub fn is_package(&self) -> bool {
        self.medication_kind.map_or(false, |k| k.is_package())
    }

    /// Relationships of one type in stated order
    pub fn relationships_of(&self, kind: AttributeType) -> impl Iterator<Item = &Relationship> {
        self.relationships.iter().filter(move |r| r.kind == kind)
    }
}

impl fmt::Display for Concept {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} |{}|", self.id, self.preferred_term)
    }
}
