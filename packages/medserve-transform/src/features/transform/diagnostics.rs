//! Recoverable findings collected during a run

use serde::Serialize;
use std::fmt;

use crate::shared::models::{ConceptId, ResourceType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// Historical association target materializes as a different record kind
    TypeMismatch,
}

impl DiagnosticKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticKind::TypeMismatch => "type_mismatch",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub concept_id: ConceptId,
    pub target_id: ConceptId,
    pub message: String,
}

impl Diagnostic {
    pub fn type_mismatch(
        concept_id: ConceptId,
        expected: ResourceType,
        target_id: ConceptId,
        found: ResourceType,
    ) -> Self {
        Self {
            kind: DiagnosticKind::TypeMismatch,
            concept_id,
            target_id,
            message: format!(
                "historical association of {} {} targets {} {}",
                expected, concept_id, found, target_id
            ),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind.as_str(), self.message)
    }
}
