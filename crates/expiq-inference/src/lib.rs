//! Text classification layer for expiq.
//!
//! This crate provides the capability the categorizer consumes from a
//! trained model: given normalized text, return a probability distribution
//! over an ordered set of class labels. Backends:
//! - `LinearTextModel`: TF-IDF features with a logistic-regression head,
//!   loaded from a JSON artifact written by the training pipeline

mod backend;
mod error;

pub use backend::linear::{LinearTextModel, NgramRange};
pub use backend::{argmax, TextModel};
pub use error::InferenceError;

/// Result type for inference operations.
pub type Result<T> = std::result::Result<T, InferenceError>;
