//! Auxiliary regulatory data merged onto concepts by the loader.

use serde::{Deserialize, Serialize};

use crate::shared::constants::CodeSystemUri;

/// ATC-style classification pair attached to a subsidy
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClassificationCode {
    pub code: String,
    pub display: String,
}

impl ClassificationCode {
    pub fn new(code: impl Into<String>, display: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            display: display.into(),
        }
    }
}

/// PBS subsidy entry for a package concept
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subsidy {
    /// PBS item code, identifies the entry
    pub subsidy_code: String,
    /// PBS program (GE, HS, ...)
    pub program_code: String,
    pub commonwealth_ex_manufacturer_price: f64,
    pub manufacturer_ex_manufacturer_price: f64,
    pub restriction: String,
    #[serde(default)]
    pub notes: Vec<String>,
    #[serde(default)]
    pub cautions: Vec<String>,
    #[serde(default)]
    pub classification: Vec<ClassificationCode>,
}

impl Subsidy {
    pub fn new(subsidy_code: impl Into<String>, program_code: impl Into<String>) -> Self {
        Self {
            subsidy_code: subsidy_code.into(),
            program_code: program_code.into(),
            commonwealth_ex_manufacturer_price: 0.0,
            manufacturer_ex_manufacturer_price: 0.0,
            restriction: "U".to_string(),
            notes: Vec::new(),
            cautions: Vec::new(),
            classification: Vec::new(),
        }
    }

    pub fn with_prices(mut self, commonwealth: f64, manufacturer: f64) -> Self {
        self.commonwealth_ex_manufacturer_price = commonwealth;
        self.manufacturer_ex_manufacturer_price = manufacturer;
        self
    }

    pub fn with_restriction(mut self, restriction: impl Into<String>) -> Self {
        self.restriction = restriction.into();
        self
    }

    pub fn with_classification(mut self, code: impl Into<String>, display: impl Into<String>) -> Self {
        self.classification.push(ClassificationCode::new(code, display));
        self
    }
}

/// Sponsor / manufacturer of a package
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manufacturer {
    pub code: String,
    pub name: String,
    pub address: String,
    pub phone: String,
    #[serde(default)]
    pub fax: Option<String>,
}

/// Identifier from another register mapped onto a concept (e.g. ARTG id)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExternalIdentifier {
    pub system: String,
    pub code: String,
}

impl ExternalIdentifier {
    /// Australian Register of Therapeutic Goods id
    pub fn artg(code: impl Into<String>) -> Self {
        Self {
            system: CodeSystemUri::Tga.uri().to_string(),
            code: code.into(),
        }
    }
}
