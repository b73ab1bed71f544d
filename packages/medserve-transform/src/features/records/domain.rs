//! Output record model
//!
//! A [`Record`] is a closed tagged variant: every record shares a
//! [`RecordBase`] and carries one [`RecordBody`]. Records serialize to JSON
//! with a `recordKind` tag.

use chrono::NaiveDate;
use serde::Serialize;
use std::sync::Arc;

use crate::features::references::{ExtendedReference, Reference};
use crate::shared::models::{CodeableConcept, Coding, ConceptId, Narrative, Quantity, Ratio, ResourceType, Status};

/// Key of the global created-set
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RecordKey {
    Concept(ConceptId),
    /// Manufacturer code
    Organization(String),
}

/// Terminology a record was derived from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceCodeSystem {
    pub system: String,
    /// Release version URI
    pub version: String,
}

/// Replacement link to another record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoricalLink {
    pub target: Arc<Reference>,
    /// Association reference set the link comes from
    pub reason: Coding,
    pub effective: NaiveDate,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalExtension {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub replaces: Vec<HistoricalLink>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub replaced_by: Vec<HistoricalLink>,
}

impl HistoricalExtension {
    pub fn is_empty(&self) -> bool {
        self.replaces.is_empty() && self.replaced_by.is_empty()
    }
}

/// Broader classification of a medication
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneralizedMedication {
    pub reference: Arc<Reference>,
    pub medication_kind: String,
}

/// Node of the parent medication tree
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParentExtension {
    pub parent: Arc<Reference>,
    pub medication_kind: String,
    pub status: Status,
    pub last_modified: NaiveDate,
    #[serde(skip_serializing_if = "HistoricalExtension::is_empty")]
    pub history: HistoricalExtension,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parents: Vec<ParentExtension>,
}

impl ParentExtension {
    /// Number of nodes in this subtree, including this one
    pub fn size(&self) -> usize {
        1 + self.parents.iter().map(ParentExtension::size).sum::<usize>()
    }
}

/// Fields shared by every record
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordBase {
    pub id: String,
    pub narrative: Narrative,
    pub source: SourceCodeSystem,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<NaiveDate>,
    #[serde(skip_serializing_if = "CodeableConcept::is_empty")]
    pub code: CodeableConcept,
    #[serde(skip_serializing_if = "HistoricalExtension::is_empty")]
    pub history: HistoricalExtension,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub generalized: Vec<GeneralizedMedication>,
}

/// Fields shared by packages and products
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicationDetails {
    /// BPGC, BPG, UPG, BPSF, UPDSF or UPD
    pub medication_kind: String,
    pub is_brand: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parents: Vec<ParentExtension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentItem {
    pub item: Arc<ExtendedReference>,
    pub amount: Quantity,
}

/// PBS subsidy attached to a package
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubsidyEntry {
    pub subsidy_code: Coding,
    pub program_code: Coding,
    pub commonwealth_ex_manufacturer_price: f64,
    pub manufacturer_ex_manufacturer_price: f64,
    pub restriction: Coding,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cautionary_notes: Vec<String>,
    /// Single classification shared by every ATC code of the subsidy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub atc_code: Option<CodeableConcept>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageRecord {
    #[serde(flatten)]
    pub medication: MedicationDetails,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container: Option<CodeableConcept>,
    pub contents: Vec<ContentItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<Arc<Reference>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub subsidies: Vec<SubsidyEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    pub item: Arc<Reference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub basis_of_strength: Option<Arc<Reference>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strength: Option<Ratio>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    #[serde(flatten)]
    pub medication: MedicationDetails,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form: Option<CodeableConcept>,
    pub ingredients: Vec<Ingredient>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubstanceRecord {
    /// Substances this one is a modification of
    pub ingredients: Vec<Arc<Reference>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactSystem {
    Phone,
    Fax,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactPoint {
    pub system: ContactSystem,
    /// Always `work`
    #[serde(rename = "use")]
    pub use_: String,
    pub value: String,
}

impl ContactPoint {
    pub fn work(system: ContactSystem, value: impl Into<String>) -> Self {
        Self {
            system,
            use_: "work".to_string(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrganizationRecord {
    pub name: String,
    pub address: Vec<String>,
    pub telecom: Vec<ContactPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "recordKind")]
pub enum RecordBody {
    Package(PackageRecord),
    Product(ProductRecord),
    Substance(SubstanceRecord),
    Organization(OrganizationRecord),
}

/// One output record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    #[serde(flatten)]
    pub base: RecordBase,
    #[serde(flatten)]
    pub body: RecordBody,
}

impl Record {
    pub fn id(&self) -> &str {
        &self.base.id
    }

    pub fn resource_type(&self) -> ResourceType {
        match self.body {
            RecordBody::Package(_) | RecordBody::Product(_) => ResourceType::Medication,
            RecordBody::Substance(_) => ResourceType::Substance,
            RecordBody::Organization(_) => ResourceType::Organization,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self.body {
            RecordBody::Package(_) => "Package",
            RecordBody::Product(_) => "Product",
            RecordBody::Substance(_) => "Substance",
            RecordBody::Organization(_) => "Organization",
        }
    }

    pub fn as_package(&self) -> Option<&PackageRecord> {
        match &self.body {
            RecordBody::Package(package) => Some(package),
            _ => None,
        }
    }

    pub fn as_product(&self) -> Option<&ProductRecord> {
        match &self.body {
            RecordBody::Product(product) => Some(product),
            _ => None,
        }
    }

    pub fn as_substance(&self) -> Option<&SubstanceRecord> {
        match &self.body {
            RecordBody::Substance(substance) => Some(substance),
            _ => None,
        }
    }

    pub fn as_organization(&self) -> Option<&OrganizationRecord> {
        match &self.body {
            RecordBody::Organization(organization) => Some(organization),
            _ => None,
        }
    }

    /// Medication fields of a package or product
    pub fn medication(&self) -> Option<&MedicationDetails> {
        match &self.body {
            RecordBody::Package(package) => Some(&package.medication),
            RecordBody::Product(product) => Some(&product.medication),
            _ => None,
        }
    }
}
