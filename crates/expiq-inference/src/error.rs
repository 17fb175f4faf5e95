//! Error types for the inference layer.

use thiserror::Error;

/// Errors that can occur while loading or running a text classifier.
#[derive(Error, Debug)]
pub enum InferenceError {
    /// Failed to load the model artifact.
    #[error("failed to load model: {0}")]
    ModelLoad(String),

    /// The artifact parsed but its contents are inconsistent.
    #[error("invalid model artifact: {0}")]
    InvalidArtifact(String),

    /// Input rejected by the model.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Inference execution failed.
    #[error("inference failed: {0}")]
    InferenceFailed(String),

    /// Malformed JSON artifact.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
