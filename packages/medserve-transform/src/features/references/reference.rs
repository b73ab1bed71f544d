//! Record references
//!
//! A [`Reference`] points at another record (`Medication/123`). An
//! [`ExtendedReference`] additionally carries the derived ancestor metadata
//! of a medication so consumers can read the hierarchy without resolving it.

use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

use crate::features::records::{GeneralizedMedication, HistoricalExtension, ParentExtension};
use crate::shared::models::{ResourceType, Status};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Reference {
    /// `{record kind}/{id}`
    pub reference: String,
    pub display: String,
}

impl Reference {
    pub fn new(kind: ResourceType, id: impl fmt::Display, display: impl Into<String>) -> Self {
        Self {
            reference: format!("{}/{}", kind, id),
            display: display.into(),
        }
    }

    /// Id part of the reference
    pub fn id(&self) -> &str {
        self.reference
            .split_once('/')
            .map_or(self.reference.as_str(), |(_, id)| id)
    }

    /// Record kind part of the reference
    pub fn kind(&self) -> &str {
        self.reference
            .split_once('/')
            .map_or("", |(kind, _)| kind)
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.reference, self.display)
    }
}

/// Medication reference with its hierarchy summary
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtendedReference {
    #[serde(flatten)]
    pub reference: Arc<Reference>,
    pub medication_kind: String,
    pub status: Status,
    pub last_modified: NaiveDate,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parents: Vec<ParentExtension>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub generalized: Vec<GeneralizedMedication>,
    #[serde(skip_serializing_if = "HistoricalExtension::is_empty")]
    pub history: HistoricalExtension,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
}

impl ExtendedReference {
    pub fn id(&self) -> &str {
        self.reference.id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_parts() {
        let reference = Reference::new(ResourceType::Medication, 1234, "Panadol");
        assert_eq!(reference.reference, "Medication/1234");
        assert_eq!(reference.id(), "1234");
        assert_eq!(reference.kind(), "Medication");
        assert_eq!(reference.to_string(), "Medication/1234 (Panadol)");
    }

    #[test]
    fn test_organization_reference() {
        let reference = Reference::new(ResourceType::Organization, "AP", "Apotex");
        assert_eq!(reference.reference, "Organization/AP");
    }
}
