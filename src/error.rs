//! Error types for the statute classifier.
//!
//! All fallible operations return [`Result`], whose error side is
//! [`StatuteError`]. The variants follow the failure taxonomy of the engine:
//!
//! - [`StatuteError::Input`] is raised by the command-line adapter when a
//!   request is rejected before it reaches the engine.
//! - [`StatuteError::Dimensionality`] and [`StatuteError::InconsistentModel`]
//!   signal a vectorizer/classifier pair that was not fit together. They are
//!   fatal to the request that hit them.
//! - [`StatuteError::ModelUnavailable`] means no trained model is installed.
//!   Prediction degrades to keyword rules instead of surfacing it.
//! - [`StatuteError::Persistence`] and the storage/serialization variants come
//!   from the persistence boundary and never affect the serving model.
//!
//! # Examples
//!
//! ```
//! use statute_classifier::error::{Result, StatuteError};
//!
//! fn validate(text: &str) -> Result<&str> {
//!     if text.trim().is_empty() {
//!         return Err(StatuteError::input("Missing text"));
//!     }
//!     Ok(text)
//! }
//!
//! assert!(validate("   ").is_err());
//! ```

use std::io;

use thiserror::Error;

/// The main error type for statute classifier operations.
#[derive(Error, Debug)]
pub enum StatuteError {
    /// I/O errors (file operations)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Rejected request text (missing, empty, or too short)
    #[error("Input error: {0}")]
    Input(String),

    /// A feature vector whose size disagrees with the fitted vocabulary
    #[error("Dimensionality error: expected {expected} features, got {actual}")]
    Dimensionality { expected: usize, actual: usize },

    /// A vectorizer and classifier that were not fit together
    #[error("Inconsistent model: {0}")]
    InconsistentModel(String),

    /// No trained model is currently installed
    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    /// Durable write or read of model artifacts failed
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Analysis-related errors (tokenization, filtering, etc.)
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Binary artifact encoding/decoding errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid arguments and configuration
    #[error("Error: {0}")]
    Other(String),
}

/// Result type alias for operations that may fail with StatuteError.
pub type Result<T> = std::result::Result<T, StatuteError>;

impl StatuteError {
    /// Create a new input error.
    pub fn input<S: Into<String>>(msg: S) -> Self {
        StatuteError::Input(msg.into())
    }

    /// Create a new dimensionality error.
    pub fn dimensionality(expected: usize, actual: usize) -> Self {
        StatuteError::Dimensionality { expected, actual }
    }

    /// Create a new inconsistent model error.
    pub fn inconsistent_model<S: Into<String>>(msg: S) -> Self {
        StatuteError::InconsistentModel(msg.into())
    }

    /// Create a new model unavailable error.
    pub fn model_unavailable<S: Into<String>>(msg: S) -> Self {
        StatuteError::ModelUnavailable(msg.into())
    }

    /// Create a new persistence error.
    pub fn persistence<S: Into<String>>(msg: S) -> Self {
        StatuteError::Persistence(msg.into())
    }

    /// Create a new storage error.
    pub fn storage<S: Into<String>>(msg: S) -> Self {
        StatuteError::Storage(msg.into())
    }

    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        StatuteError::Analysis(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        StatuteError::Other(format!("Invalid argument: {}", msg.into()))
    }

    /// Create a new invalid config error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        StatuteError::Other(format!("Invalid configuration: {}", msg.into()))
    }

    /// Whether this error means the model pair itself is broken, as opposed
    /// to a failure at the storage boundary.
    pub fn is_model_contract_violation(&self) -> bool {
        matches!(
            self,
            StatuteError::Dimensionality { .. } | StatuteError::InconsistentModel(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let error = StatuteError::input("Text too short");
        assert_eq!(error.to_string(), "Input error: Text too short");

        let error = StatuteError::dimensionality(120, 3);
        assert_eq!(
            error.to_string(),
            "Dimensionality error: expected 120 features, got 3"
        );

        let error = StatuteError::invalid_argument("empty corpus");
        assert_eq!(error.to_string(), "Error: Invalid argument: empty corpus");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let statute_error = StatuteError::from(io_error);

        match statute_error {
            StatuteError::Io(_) => {} // Expected
            _ => panic!("Expected IO error variant"),
        }
    }

    #[test]
    fn test_contract_violation_kinds() {
        assert!(StatuteError::dimensionality(2, 1).is_model_contract_violation());
        assert!(StatuteError::inconsistent_model("mismatch").is_model_contract_violation());
        assert!(!StatuteError::persistence("disk full").is_model_contract_violation());
        assert!(!StatuteError::model_unavailable("not trained").is_model_contract_violation());
    }
}
