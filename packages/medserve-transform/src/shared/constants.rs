//! Code system URIs and PBS display tables.

/// AMT module (Australian extension namespace) id
pub const AMT_MODULE_ID: u64 = 32506021000036107;

/// Expected release distribution file name
pub const RELEASE_FILE_PATTERN: &str =
    r"^NCTS_SCT_RF2_DISTRIBUTION_32506021000036107-(\d{8})-SNAPSHOT\.zip$";

/// Code systems referenced from output records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodeSystemUri {
    SnomedCt,
    /// Therapeutic Goods Administration (ARTG ids)
    Tga,
    PbsSubsidy,
    PbsProgram,
    PbsRestriction,
    Atc,
}

impl CodeSystemUri {
    pub fn uri(&self) -> &'static str {
        match self {
            CodeSystemUri::SnomedCt => "http://snomed.info/sct",
            CodeSystemUri::Tga => "https://www.tga.gov.au/australian-register-therapeutic-goods",
            CodeSystemUri::PbsSubsidy => "http://pbs.gov.au/code/item",
            CodeSystemUri::PbsProgram => "http://pbs.gov.au/code/program",
            CodeSystemUri::PbsRestriction => "http://pbs.gov.au/code/restriction",
            CodeSystemUri::Atc => "http://www.whocc.no/atc",
        }
    }
}

/// Display text for a PBS program code, `None` for unknown codes
pub fn pbs_program_display(code: &str) -> Option<&'static str> {
    let display = match code {
        "GE" => "General Schedule (Code GE)",
        "HS" => "Highly Specialised Drugs Program (Code HS)",
        "HB" => "Botulinum Toxin Program (Code HB)",
        "DB" => "Prescriber Bag (Code DB)",
        "EP" => "Extemporaneous Preparations (Code EP)",
        "PL" => "Palliative Care (Code PL)",
        "IN" => "Efficient Funding of Chemotherapy - Private Hospital - infusibles (Code IN)",
        "IP" => "Efficient Funding of Chemotherapy - Public Hospital - infusibles (Code IP)",
        "CT" => "Efficient Funding of Chemotherapy - Related Benefits (Code CT)",
        "R1" => "Repatriation Pharmaceutical Benefits Scheme only (Code R1)",
        "IF" => "IVF Program (Code IF)",
        "GH" => "Growth Hormone Program (Code GH)",
        "MF" => "Opiate Dependence Treatment Program (Code MF)",
        "SY" => "Synthetic Growth Hormone Program (Code SY)",
        "TY" => "Efficient Funding of Chemotherapy - Private Hospital - Trastuzumab (Code TY)",
        "TZ" => "Efficient Funding of Chemotherapy - Public Hospital - Trastuzumab (Code TZ)",
        _ => return None,
    };
    Some(display)
}

/// Display text for a PBS restriction code, `None` for unknown codes
pub fn pbs_restriction_display(code: &str) -> Option<&'static str> {
    let display = match code {
        "U" => "Unrestricted",
        "R" => "Restricted",
        "A" => "Authority required",
        _ => return None,
    };
    Some(display)
}
