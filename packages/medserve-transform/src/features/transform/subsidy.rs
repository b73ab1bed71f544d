//! Deduplicating accumulator for package subsidies

use crate::features::records::SubsidyEntry;
use crate::shared::constants::{pbs_program_display, pbs_restriction_display, CodeSystemUri};
use crate::shared::models::{CodeableConcept, Coding, Subsidy};

/// Collects the subsidy entries of one package record.
///
/// Entries are keyed by subsidy item code: the first entry for a code wins
/// its prices, restriction and notes; classification codes of later entries
/// with the same code are merged into the existing entry's single
/// classification.
#[derive(Debug, Default)]
pub struct SubsidyMerger {
    entries: Vec<SubsidyEntry>,
}

impl SubsidyMerger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a subsidy; returns `false` when an entry with the same code was
    /// already present
    pub fn add(&mut self, subsidy: &Subsidy) -> bool {
        if let Some(existing) = self
            .entries
            .iter_mut()
            .find(|entry| entry.subsidy_code.code == subsidy.subsidy_code)
        {
            merge_classification(existing, subsidy);
            return false;
        }

        let mut entry = SubsidyEntry {
            subsidy_code: Coding::new(CodeSystemUri::PbsSubsidy, subsidy.subsidy_code.as_str(), None),
            program_code: Coding::new(
                CodeSystemUri::PbsProgram,
                subsidy.program_code.as_str(),
                pbs_program_display(&subsidy.program_code).map(str::to_string),
            ),
            commonwealth_ex_manufacturer_price: subsidy.commonwealth_ex_manufacturer_price,
            manufacturer_ex_manufacturer_price: subsidy.manufacturer_ex_manufacturer_price,
            restriction: Coding::new(
                CodeSystemUri::PbsRestriction,
                subsidy.restriction.as_str(),
                pbs_restriction_display(&subsidy.restriction).map(str::to_string),
            ),
            notes: subsidy.notes.clone(),
            cautionary_notes: subsidy.cautions.clone(),
            atc_code: None,
        };
        merge_classification(&mut entry, subsidy);
        self.entries.push(entry);
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_entries(self) -> Vec<SubsidyEntry> {
        self.entries
    }
}

fn merge_classification(entry: &mut SubsidyEntry, subsidy: &Subsidy) {
    for pair in &subsidy.classification {
        let classification = entry.atc_code.get_or_insert_with(CodeableConcept::default);
        let coding = Coding::new(CodeSystemUri::Atc, pair.code.as_str(), Some(pair.display.clone()));
        if !classification.coding.contains(&coding) {
            classification.push(coding);
        }
    }
}
