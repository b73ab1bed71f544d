//! Shared domain models
//!
//! Input side: concepts, relationships and the regulatory data merged onto
//! them. Output side value types live in [`datatypes`].

pub mod concept;
pub mod datatypes;
pub mod relationship;
pub mod release;
pub mod subsidy;
pub mod well_known;

pub use concept::{Concept, ConceptId, HistoricalAssociation, MedicationKind, ResourceType, Status};
pub use datatypes::{escape_html, CodeableConcept, Coding, Narrative, Quantity, Ratio};
pub use relationship::{AttributeType, ContentTarget, DataTypeProperty, Relationship};
pub use release::ReleaseVersion;
pub use subsidy::{ClassificationCode, ExternalIdentifier, Manufacturer, Subsidy};
pub use well_known::AmtConcept;
