//! Classifier backed by the learned model, failing open to keyword rules.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::models::transaction::ClassificationResult;
use crate::normalize::NormalizedText;

use super::{CategoryClassifier, ModelStore, RuleBasedClassifier};

/// Learned-model classifier.
///
/// Reads the current model from a shared [`ModelStore`] on every call. When
/// no model is published, or the model errors, the request is answered by the
/// rule-based classifier instead.
pub struct ModelClassifier {
    store: Arc<ModelStore>,
    fallback: RuleBasedClassifier,
}

impl ModelClassifier {
    pub fn new(store: Arc<ModelStore>) -> Self {
        Self {
            store,
            fallback: RuleBasedClassifier::new(),
        }
    }

    pub fn store(&self) -> &Arc<ModelStore> {
        &self.store
    }

    fn fallback_batch(&self, texts: &[NormalizedText]) -> Vec<ClassificationResult> {
        texts.iter().map(|t| self.fallback.classify(t)).collect()
    }
}

impl CategoryClassifier for ModelClassifier {
    fn classify(&self, text: &NormalizedText) -> ClassificationResult {
        let Some(model) = self.store.current() else {
            return self.fallback.classify(text);
        };

        match model.predict(&[text.as_str()]) {
            Ok(mut predictions) if predictions.len() == 1 => {
                let (category, confidence) = predictions.remove(0);
                ClassificationResult::from_model(category, confidence)
            }
            Ok(predictions) => {
                warn!(
                    "Model returned {} predictions for one input, using rule fallback",
                    predictions.len()
                );
                self.fallback.classify(text)
            }
            Err(e) => {
                warn!("Model predict failed: {}, using rule fallback", e);
                self.fallback.classify(text)
            }
        }
    }

    /// One inference call for the whole batch. If it fails, every item is
    /// answered by the rules; results are never a mix of both.
    fn classify_batch(&self, texts: &[NormalizedText]) -> Vec<ClassificationResult> {
        if texts.is_empty() {
            return Vec::new();
        }

        let Some(model) = self.store.current() else {
            return self.fallback_batch(texts);
        };

        let inputs: Vec<&str> = texts.iter().map(NormalizedText::as_str).collect();
        match model.predict(&inputs) {
            Ok(predictions) if predictions.len() == texts.len() => {
                debug!("Batch of {} classified by model", texts.len());
                predictions
                    .into_iter()
                    .map(|(category, confidence)| ClassificationResult::from_model(category, confidence))
                    .collect()
            }
            Ok(predictions) => {
                warn!(
                    "Batch model returned {} predictions for {} inputs, falling back to rules",
                    predictions.len(),
                    texts.len()
                );
                self.fallback_batch(texts)
            }
            Err(e) => {
                warn!("Batch model failed: {}, falling back to rules", e);
                self.fallback_batch(texts)
            }
        }
    }

    fn name(&self) -> &'static str {
        "model"
    }
}
