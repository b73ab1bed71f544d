//! Well-known AMT concept ids.
//!
//! Scaffolding roots classify every medication concept by level: a concept is
//! a CTPP when it descends from [`AmtConcept::Ctpp`], a TPP when it descends
//! from [`AmtConcept::Tpp`] but not from the CTPP root, and so on down to MP.
//! The historical association reference sets are listed here as well so that
//! replacement reasons render with a display and so the parent-extension walk
//! can skip every enumerated concept in one check.

use serde::{Deserialize, Serialize};

use super::concept::ConceptId;

/// Enumerated AMT scaffolding and reference set concepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AmtConcept {
    /// Containered trade product pack
    Ctpp,
    /// Trade product pack
    Tpp,
    /// Medicinal product pack
    Mpp,
    /// Trade product unit of use
    Tpuu,
    /// Medicinal product unit of use
    Mpuu,
    /// Medicinal product
    Mp,
    /// Trade product
    Tp,
    /// Australian substance
    Substance,
    ReplacedBy,
    SameAs,
    PossiblyEquivalentTo,
    WasA,
    MovedTo,
    Alternative,
}

impl AmtConcept {
    pub const ALL: [AmtConcept; 14] = [
        AmtConcept::Ctpp,
        AmtConcept::Tpp,
        AmtConcept::Mpp,
        AmtConcept::Tpuu,
        AmtConcept::Mpuu,
        AmtConcept::Mp,
        AmtConcept::Tp,
        AmtConcept::Substance,
        AmtConcept::ReplacedBy,
        AmtConcept::SameAs,
        AmtConcept::PossiblyEquivalentTo,
        AmtConcept::WasA,
        AmtConcept::MovedTo,
        AmtConcept::Alternative,
    ];

    pub fn id(&self) -> ConceptId {
        match self {
            AmtConcept::Ctpp => 30537011000036101,
            AmtConcept::Tpp => 30404011000036106,
            AmtConcept::Mpp => 30513011000036104,
            AmtConcept::Tpuu => 30425011000036101,
            AmtConcept::Mpuu => 30450011000036109,
            AmtConcept::Mp => 30497011000036103,
            AmtConcept::Tp => 30560011000036108,
            AmtConcept::Substance => 30388011000036102,
            AmtConcept::ReplacedBy => 900000000000526001,
            AmtConcept::SameAs => 900000000000527005,
            AmtConcept::PossiblyEquivalentTo => 900000000000523009,
            AmtConcept::WasA => 900000000000528000,
            AmtConcept::MovedTo => 900000000000524003,
            AmtConcept::Alternative => 900000000000530003,
        }
    }

    pub fn display(&self) -> &'static str {
        match self {
            AmtConcept::Ctpp => "containered trade product pack",
            AmtConcept::Tpp => "trade product pack",
            AmtConcept::Mpp => "medicinal product pack",
            AmtConcept::Tpuu => "trade product unit of use",
            AmtConcept::Mpuu => "medicinal product unit of use",
            AmtConcept::Mp => "medicinal product",
            AmtConcept::Tp => "trade product",
            AmtConcept::Substance => "Australian substance",
            AmtConcept::ReplacedBy => "REPLACED BY association reference set",
            AmtConcept::SameAs => "SAME AS association reference set",
            AmtConcept::PossiblyEquivalentTo => {
                "POSSIBLY EQUIVALENT TO association reference set"
            }
            AmtConcept::WasA => "WAS A association reference set",
            AmtConcept::MovedTo => "MOVED TO association reference set",
            AmtConcept::Alternative => "ALTERNATIVE association reference set",
        }
    }

    pub fn from_id(id: ConceptId) -> Option<AmtConcept> {
        Self::ALL.iter().copied().find(|c| c.id() == id)
    }

    /// True when `id` is one of the enumerated scaffolding/reference set concepts
    #[inline]
    pub fn is_enum_value(id: ConceptId) -> bool {
        Self::from_id(id).is_some()
    }
}
