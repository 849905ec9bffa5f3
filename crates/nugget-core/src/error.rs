//! Error handling for Nugget Core operations
//!
//! Only conditions that stop a whole topic are errors. Data-quality findings inside a topic
//! (unrecognized shapes, unsupportable facts) are reported through
//! [`crate::diagnostics::Diagnostics`] instead and never abort resolution.

use thiserror::Error;

/// Error type for operations at the topic boundary
#[derive(Error, Debug, Clone)]
pub enum CoverError {
    /// The topic document parsed but is not a JSON object keyed by fact question
    #[error("Invalid topic document: {message}")]
    InvalidTopicDocument { message: String, found: Option<String> },

    /// Topic input does not exist
    #[error("Missing input: {path}")]
    MissingInput { path: String },

    /// Serialization and deserialization errors
    #[error("Serialization error: {message}")]
    Serialization { message: String, data_type: Option<String>, operation: Option<String> },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
        setting: Option<String>,
        expected: Option<String>,
        actual: Option<String>,
    },

    /// A resolution left supportable facts uncovered
    #[error("Incomplete cover: {uncovered} facts left uncovered")]
    IncompleteCover { uncovered: usize },

    /// I/O errors while reading topic input
    #[error("External error: {message}")]
    External { message: String, service: Option<String>, source_details: Option<String> },
}

impl CoverError {
    /// Get the error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            CoverError::InvalidTopicDocument { .. } => "invalid_topic_document",
            CoverError::MissingInput { .. } => "missing_input",
            CoverError::Serialization { .. } => "serialization",
            CoverError::Configuration { .. } => "configuration",
            CoverError::IncompleteCover { .. } => "incomplete_cover",
            CoverError::External { .. } => "external",
        }
    }

    /// Whether a batch can skip the affected topic and carry on
    pub fn is_recoverable(&self) -> bool {
        match self {
            CoverError::InvalidTopicDocument { .. } => true,
            CoverError::MissingInput { .. } => true,
            CoverError::Serialization { .. } => true,
            CoverError::Configuration { .. } => false, // Config errors need fixing
            CoverError::IncompleteCover { .. } => true,
            CoverError::External { .. } => true,
        }
    }

    /// Create an invalid topic document error
    pub fn invalid_topic(found: &str, message: impl Into<String>) -> Self {
        Self::InvalidTopicDocument { message: message.into(), found: Some(found.to_string()) }
    }

    /// Create a missing input error
    pub fn missing_input(path: impl Into<String>) -> Self {
        Self::MissingInput { path: path.into() }
    }

    /// Create a serialization error
    pub fn serialization(data_type: &str, operation: &str, message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
            data_type: Some(data_type.to_string()),
            operation: Some(operation.to_string()),
        }
    }

    /// Create a configuration error
    pub fn configuration(
        setting: &str,
        expected: &str,
        actual: &str,
        message: impl Into<String>,
    ) -> Self {
        Self::Configuration {
            message: message.into(),
            setting: Some(setting.to_string()),
            expected: Some(expected.to_string()),
            actual: Some(actual.to_string()),
        }
    }
}

/// Result type alias for topic-level operations
pub type CoverResult<T> = Result<T, CoverError>;

impl From<std::io::Error> for CoverError {
    fn from(err: std::io::Error) -> Self {
        CoverError::External {
            message: format!("I/O error: {err}"),
            service: Some("filesystem".to_string()),
            source_details: Some(format!("IO Error kind: {:?}", err.kind())),
        }
    }
}

impl From<serde_json::Error> for CoverError {
    fn from(err: serde_json::Error) -> Self {
        CoverError::serialization(
            "json",
            if err.is_syntax() {
                "parse"
            } else if err.is_data() {
                "validate"
            } else {
                "unknown"
            },
            format!("JSON error: {err}"),
        )
    }
}
