//! Records feature: the output record model

pub mod domain;

pub use domain::{
    ContactPoint, ContactSystem, ContentItem, GeneralizedMedication, HistoricalExtension,
    HistoricalLink, Ingredient, MedicationDetails, OrganizationRecord, PackageRecord,
    ParentExtension, ProductRecord, Record, RecordBase, RecordBody, RecordKey, SourceCodeSystem,
    SubsidyEntry, SubstanceRecord,
};
