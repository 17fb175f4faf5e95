//! Error types for the expiq-core library.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the expiq library.
#[derive(Error, Debug)]
pub enum ExpiqError {
    /// Request rejected before any processing.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Model loading or prediction error.
    #[error("model error: {0}")]
    Model(#[from] ModelError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for ExpiqError {
    fn from(err: serde_json::Error) -> Self {
        ExpiqError::Config(err.to_string())
    }
}

/// Boundary validation failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required text field was empty or whitespace only.
    #[error("{field} must not be empty")]
    EmptyInput { field: &'static str },

    /// Batch size outside `1..=max`.
    #[error("batch must contain between 1 and {max} merchants, got {len}")]
    BatchSize { len: usize, max: usize },
}

/// Errors related to the learned classifier.
#[derive(Error, Debug)]
pub enum ModelError {
    /// No model artifact exists at any candidate path.
    #[error("no model found, tried: {}", format_paths(.tried))]
    NotFound { tried: Vec<PathBuf> },

    /// The model produced a label outside the category set.
    #[error("unknown category label: {0}")]
    UnknownLabel(String),

    /// Probability matrix does not match the request.
    #[error("model output shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: String, actual: String },

    /// Error from the inference layer.
    #[error(transparent)]
    Inference(#[from] expiq_inference::InferenceError),
}

fn format_paths(paths: &[PathBuf]) -> String {
    if paths.is_empty() {
        return "(no candidate paths)".to_string();
    }
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Require a non-blank text field.
pub fn require_non_empty(
    field: &'static str,
    value: &str,
) -> std::result::Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::EmptyInput { field })
    } else {
        Ok(())
    }
}

/// Result type for the expiq library.
pub type Result<T> = std::result::Result<T, ExpiqError>;
