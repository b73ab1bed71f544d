//! Typed relationships between concepts.

use serde::{Deserialize, Serialize};

use super::concept::ConceptId;

/// Closed set of relationship types the engine understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeType {
    IsModificationOf,
    HasIntendedActiveIngredient,
    /// Basis of strength substance, carries the strength value + unit
    HasAustralianBoss,
    HasManufacturedDoseForm,
    HasMpuu,
    HasTpuu,
    HasComponentPack,
    HasSubpack,
    HasContainerType,
    HasDenominatorUnits,
    HasNumeratorUnits,
}

/// What a package content relationship points at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentTarget {
    /// Nested package (subpack / component pack)
    Package,
    /// Unit of use product
    Product,
}

impl AttributeType {
    /// Package content relationship types in the order contents are listed
    pub const PACKAGE_CONTENTS: [AttributeType; 4] = [
        AttributeType::HasMpuu,
        AttributeType::HasTpuu,
        AttributeType::HasComponentPack,
        AttributeType::HasSubpack,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AttributeType::IsModificationOf => "is_modification_of",
            AttributeType::HasIntendedActiveIngredient => "has_intended_active_ingredient",
            AttributeType::HasAustralianBoss => "has_australian_boss",
            AttributeType::HasManufacturedDoseForm => "has_manufactured_dose_form",
            AttributeType::HasMpuu => "has_mpuu",
            AttributeType::HasTpuu => "has_tpuu",
            AttributeType::HasComponentPack => "has_component_pack",
            AttributeType::HasSubpack => "has_subpack",
            AttributeType::HasContainerType => "has_container_type",
            AttributeType::HasDenominatorUnits => "has_denominator_units",
            AttributeType::HasNumeratorUnits => "has_numerator_units",
        }
    }

    /// Target of a package content relationship, `None` for every other type.
    ///
    /// Listed exhaustively: a new relationship type must decide here.
    pub fn content_target(&self) -> Option<ContentTarget> {
        match self {
            AttributeType::HasSubpack | AttributeType::HasComponentPack => {
                Some(ContentTarget::Package)
            }
            AttributeType::HasMpuu | AttributeType::HasTpuu => Some(ContentTarget::Product),
            AttributeType::IsModificationOf
            | AttributeType::HasIntendedActiveIngredient
            | AttributeType::HasAustralianBoss
            | AttributeType::HasManufacturedDoseForm
            | AttributeType::HasContainerType
            | AttributeType::HasDenominatorUnits
            | AttributeType::HasNumeratorUnits => None,
        }
    }

    /// Pack-in-pack relationships, the ones affected by the back-stitch
    #[inline]
    pub fn is_pack_containment(&self) -> bool {
        matches!(
            self,
            AttributeType::HasSubpack | AttributeType::HasComponentPack
        )
    }
}

/// Concrete value attached to a relationship (quantity or strength)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataTypeProperty {
    pub value: f64,
    /// Unit concept
    pub unit: ConceptId,
}

/// Relationship between two concepts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub source: ConceptId,
    pub kind: AttributeType,
    pub destination: ConceptId,
    /// Relationship group (0 = ungrouped)
    #[serde(default)]
    pub group: u32,
    #[serde(default)]
    pub datatype: Option<DataTypeProperty>,
}

impl Relationship {
    pub fn new(source: ConceptId, kind: AttributeType, destination: ConceptId) -> Self {
        Self {
            source,
            kind,
            destination,
            group: 0,
            datatype: None,
        }
    }

    pub fn in_group(mut self, group: u32) -> Self {
        self.group = group;
        self
    }

    pub fn with_value(mut self, value: f64, unit: ConceptId) -> Self {
        self.datatype = Some(DataTypeProperty { value, unit });
        self
    }
}
