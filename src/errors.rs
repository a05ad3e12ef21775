//! Error types for voicerag
//!
//! One error enum covers the whole retrieval path: knowledge loading,
//! encoding, indexing and search.

use thiserror::Error;

/// Main error type for the retrieval engine and its collaborators
#[derive(Error, Debug)]
pub enum RagError {
    /// Empty or invalid knowledge base, bad configuration values
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The text encoder could not produce a vector
    #[error("Encoding error ({encoder}): {message}")]
    Encoding { encoder: String, message: String },

    /// Search attempted before an engine was installed
    #[error("Retrieval engine is not initialized")]
    NotInitialized,

    /// Blank query or a zero result count
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// A vector does not match the index dimension
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// I/O errors
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("Error: {0}")]
    Generic(String),
}

impl RagError {
    /// Build an encoding error for the named encoder
    pub fn encoding(encoder: impl Into<String>, message: impl std::fmt::Display) -> Self {
        RagError::Encoding {
            encoder: encoder.into(),
            message: message.to_string(),
        }
    }
}

/// Result type alias for retrieval operations
pub type Result<T> = std::result::Result<T, RagError>;

/// Convert anyhow errors to RagError
impl From<anyhow::Error> for RagError {
    fn from(err: anyhow::Error) -> Self {
        RagError::Generic(err.to_string())
    }
}
