//! Category classification over normalized text.
//!
//! Two classifiers implement [`CategoryClassifier`]: [`ModelClassifier`] runs
//! the learned model held by a [`ModelStore`] and falls back to
//! [`RuleBasedClassifier`] whenever the model is missing or fails.

mod model;
mod rules;
mod store;

pub use model::ModelClassifier;
pub use rules::{RuleBasedClassifier, CATEGORY_RULES};
pub use store::{HealthStatus, LoadedModel, ModelInfo, ModelStore};

use crate::models::transaction::ClassificationResult;
use crate::normalize::NormalizedText;

/// Trait for category classifiers.
///
/// Implementations never fail: degraded paths return a rule-based result.
pub trait CategoryClassifier: Send + Sync {
    /// Classify one normalized text.
    fn classify(&self, text: &NormalizedText) -> ClassificationResult;

    /// Classify many texts. Results are index-aligned with `texts`.
    fn classify_batch(&self, texts: &[NormalizedText]) -> Vec<ClassificationResult> {
        texts.iter().map(|t| self.classify(t)).collect()
    }

    /// Short identifier for logs.
    fn name(&self) -> &'static str;
}

impl<C: CategoryClassifier + ?Sized> CategoryClassifier for &C {
    fn classify(&self, text: &NormalizedText) -> ClassificationResult {
        (**self).classify(text)
    }

    fn classify_batch(&self, texts: &[NormalizedText]) -> Vec<ClassificationResult> {
        (**self).classify_batch(texts)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

impl<C: CategoryClassifier + ?Sized> CategoryClassifier for std::sync::Arc<C> {
    fn classify(&self, text: &NormalizedText) -> ClassificationResult {
        (**self).classify(text)
    }

    fn classify_batch(&self, texts: &[NormalizedText]) -> Vec<ClassificationResult> {
        (**self).classify_batch(texts)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}
