//! Batch categorization of merchant names.

use std::time::Instant;

use tracing::info;

use crate::classify::CategoryClassifier;
use crate::error::ValidationError;
use crate::models::category::Category;
use crate::models::config::{BatchConfig, MAX_BATCH_SIZE};
use crate::models::transaction::{round_to, BatchPrediction, ClassificationResult, MerchantPrediction};
use crate::normalize::{normalize, NormalizedText};

/// Check a batch length against `1..=max`.
pub fn validate_batch_size(len: usize, max: usize) -> Result<(), ValidationError> {
    if len == 0 || len > max {
        return Err(ValidationError::BatchSize { len, max });
    }
    Ok(())
}

/// Categorizes many merchants with a single classifier batch call.
pub struct BatchOrchestrator<C> {
    classifier: C,
    max_size: usize,
}

impl<C: CategoryClassifier> BatchOrchestrator<C> {
    pub fn new(classifier: C) -> Self {
        Self {
            classifier,
            max_size: MAX_BATCH_SIZE,
        }
    }

    pub fn from_config(classifier: C, config: &BatchConfig) -> Self {
        Self::new(classifier).with_max_size(config.effective_max())
    }

    /// Lower the per-call limit. Clamped to `1..=MAX_BATCH_SIZE`.
    pub fn with_max_size(mut self, max_size: usize) -> Self {
        self.max_size = max_size.clamp(1, MAX_BATCH_SIZE);
        self
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Categorize `merchants`, preserving input order.
    ///
    /// Size violations are rejected before anything is classified. Items
    /// that normalize to nothing are `Uncategorized` and are not sent to the
    /// classifier.
    pub fn classify<S: AsRef<str>>(&self, merchants: &[S]) -> Result<BatchPrediction, ValidationError> {
        validate_batch_size(merchants.len(), self.max_size)?;

        let start = Instant::now();
        let normalized: Vec<NormalizedText> = merchants.iter().map(|m| normalize(m.as_ref())).collect();

        let (indices, texts): (Vec<usize>, Vec<NormalizedText>) = normalized
            .into_iter()
            .enumerate()
            .filter(|(_, text)| !text.is_empty())
            .unzip();

        let mut outcomes = vec![ClassificationResult::rule_based(Category::Uncategorized); merchants.len()];
        if !texts.is_empty() {
            let classified = self.classifier.classify_batch(&texts);
            for (idx, result) in indices.into_iter().zip(classified) {
                outcomes[idx] = result;
            }
        }

        let results: Vec<MerchantPrediction> = merchants
            .iter()
            .zip(outcomes)
            .map(|(merchant, result)| MerchantPrediction::new(merchant.as_ref(), result))
            .collect();

        let duration_ms = round_to(start.elapsed().as_secs_f64() * 1000.0, 2);
        info!(
            "Batch of {} merchants categorized in {:.1}ms via {}",
            results.len(),
            duration_ms,
            self.classifier.name()
        );

        Ok(BatchPrediction {
            count: results.len(),
            results,
            duration_ms,
        })
    }
}
