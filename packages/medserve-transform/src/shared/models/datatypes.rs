//! Small value types shared by output records.

use serde::{Deserialize, Serialize};

use crate::shared::constants::CodeSystemUri;

use super::concept::{Concept, ConceptId};

/// Code from a code system
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coding {
    pub system: String,
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

impl Coding {
    pub fn new(system: CodeSystemUri, code: impl Into<String>, display: Option<String>) -> Self {
        Self {
            system: system.uri().to_string(),
            code: code.into(),
            display,
        }
    }

    /// SNOMED CT coding for a concept id
    pub fn snomed(id: ConceptId, display: Option<String>) -> Self {
        Self::new(CodeSystemUri::SnomedCt, id.to_string(), display)
    }
}

impl From<&Concept> for Coding {
    fn from(concept: &Concept) -> Self {
        Coding::snomed(concept.id, Some(concept.preferred_term.clone()))
    }
}

/// Set of codings with an optional text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeableConcept {
    pub coding: Vec<Coding>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl CodeableConcept {
    pub fn push(&mut self, coding: Coding) {
        self.coding.push(coding);
    }

    pub fn is_empty(&self) -> bool {
        self.coding.is_empty()
    }
}

impl From<&Concept> for CodeableConcept {
    fn from(concept: &Concept) -> Self {
        Self {
            coding: vec![Coding::from(concept)],
            text: Some(concept.preferred_term.clone()),
        }
    }
}

/// Value with an optional coded unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
}

impl Quantity {
    /// Unitless quantity
    pub fn unitless(value: f64) -> Self {
        Self {
            value,
            unit: None,
            code: None,
            system: None,
        }
    }

    /// Quantity whose unit is a SNOMED CT concept
    pub fn with_unit(value: f64, unit: &Concept) -> Self {
        Self {
            value,
            unit: Some(unit.preferred_term.clone()),
            code: Some(unit.id.to_string()),
            system: Some(CodeSystemUri::SnomedCt.uri().to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ratio {
    pub numerator: Quantity,
    pub denominator: Quantity,
}

/// Human readable rendering of a record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Narrative {
    /// Always `generated`
    pub status: String,
    pub div: String,
}

impl Narrative {
    pub fn generated(text: &str) -> Self {
        Self {
            status: "generated".to_string(),
            div: format!("<div><p>{}</p></div>", escape_html(text)),
        }
    }
}

/// Escape the HTML special characters of `text`
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
