//! Error types for medserve-transform
//!
//! Every fatal condition of a transform run maps onto one [`ErrorKind`].
//! Recoverable conditions (historical association type mismatches) are not
//! errors; see [`crate::features::transform::Diagnostic`].

use std::fmt;
use thiserror::Error;

use crate::config::ConfigError;
use crate::shared::models::ConceptId;

/// Error kind categorization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Release file name / tag does not match the expected pattern
    InvalidReleaseIdentifier,
    /// The concept graph violates a structural assumption of the engine
    ModelInconsistency,
    /// A single-destination query found zero or several destinations
    Cardinality,
    /// A strength ratio unit could not be resolved
    MissingUnit,
    /// A required ancestor could not be found in the hierarchy
    Hierarchy,
    /// A concept id is not present in the graph
    UnknownConcept,
    /// Configuration errors
    Config,
    /// Sink rejected a batch
    Sink,
    /// I/O errors
    Io,
    /// Serialization/deserialization errors
    Serialization,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidReleaseIdentifier => "invalid_release_identifier",
            ErrorKind::ModelInconsistency => "model_inconsistency",
            ErrorKind::Cardinality => "cardinality",
            ErrorKind::MissingUnit => "missing_unit",
            ErrorKind::Hierarchy => "hierarchy",
            ErrorKind::UnknownConcept => "unknown_concept",
            ErrorKind::Config => "config",
            ErrorKind::Sink => "sink",
            ErrorKind::Io => "io",
            ErrorKind::Serialization => "serialization",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Transform error type
#[derive(Debug, Error)]
#[error("[{kind}] {message}")]
pub struct TransformError {
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
    pub kind: ErrorKind,
    pub message: String,
    /// Concept being processed when the error was raised, if known
    pub concept_id: Option<ConceptId>,
}

impl TransformError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            concept_id: None,
            source: None,
        }
    }

    pub fn with_concept(mut self, concept_id: ConceptId) -> Self {
        self.concept_id = Some(concept_id);
        self
    }

    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    // Convenience constructors
    pub fn invalid_release_identifier(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidReleaseIdentifier, message)
    }

    pub fn model_inconsistency(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ModelInconsistency, message)
    }

    pub fn cardinality(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Cardinality, message)
    }

    pub fn missing_unit(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MissingUnit, message)
    }

    pub fn hierarchy(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Hierarchy, message)
    }

    pub fn unknown_concept(concept_id: ConceptId) -> Self {
        Self::new(
            ErrorKind::UnknownConcept,
            format!("Concept not found: {}", concept_id),
        )
        .with_concept(concept_id)
    }

    pub fn sink(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Sink, message)
    }
}

impl From<ConfigError> for TransformError {
    fn from(err: ConfigError) -> Self {
        TransformError::new(ErrorKind::Config, format!("Configuration error: {}", err))
            .with_source(err)
    }
}

impl From<std::io::Error> for TransformError {
    fn from(err: std::io::Error) -> Self {
        TransformError::new(ErrorKind::Io, format!("I/O error: {}", err)).with_source(err)
    }
}

impl From<serde_json::Error> for TransformError {
    fn from(err: serde_json::Error) -> Self {
        TransformError::new(ErrorKind::Serialization, format!("JSON error: {}", err))
            .with_source(err)
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, TransformError>;
