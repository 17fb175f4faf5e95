//! Per-message routing: extract, then either short-circuit a withdrawal or
//! classify the merchant.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use crate::classify::{CategoryClassifier, ModelClassifier, ModelStore};
use crate::models::category::Category;
use crate::models::config::ExpiqConfig;
use crate::models::transaction::{
    ClassificationResult, MerchantPrediction, NormalizeReport, SmsPrediction, TransactionKind,
    WITHDRAWAL_MERCHANT,
};
use crate::normalize::normalize;
use crate::sms::SmsParser;

/// Routes raw SMS text and merchant names to a category.
///
/// The router only depends on [`CategoryClassifier`]; which variant answers
/// is decided by the classifier it was built with.
pub struct TransactionRouter<C = ModelClassifier> {
    parser: SmsParser,
    classifier: C,
}

impl<C: CategoryClassifier> TransactionRouter<C> {
    pub fn new(parser: SmsParser, classifier: C) -> Self {
        Self { parser, classifier }
    }

    pub fn with_parser(mut self, parser: SmsParser) -> Self {
        self.parser = parser;
        self
    }

    pub fn parser(&self) -> &SmsParser {
        &self.parser
    }

    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    /// Extract fields from an SMS and categorize it.
    ///
    /// Withdrawals are never sent to the classifier. A message with no
    /// merchant is `Other` with zero confidence.
    pub fn predict_sms(&self, text: &str) -> SmsPrediction {
        let start = Instant::now();
        let fields = self.parser.parse(text);

        if fields.is_withdrawal {
            info!(
                "SMS is ATM withdrawal, amount={:?} in {:.1}ms",
                fields.amount,
                elapsed_ms(start)
            );
            return SmsPrediction {
                amount: fields.amount,
                date: fields.date,
                merchant: WITHDRAWAL_MERCHANT.to_string(),
                category: Category::Other,
                confidence: 1.0,
                kind: TransactionKind::CashWithdrawal,
                used_model: false,
            };
        }

        let merchant = fields.merchant.unwrap_or_default();
        let result = self.classify_merchant(&merchant, Category::Other);

        info!(
            "SMS merchant='{}' category={} ({:.2}) in {:.1}ms",
            merchant,
            result.category,
            result.confidence,
            elapsed_ms(start)
        );

        let prediction = MerchantPrediction::new(merchant, result);
        SmsPrediction {
            amount: fields.amount,
            date: fields.date,
            merchant: prediction.merchant,
            category: prediction.category.or_other(),
            confidence: prediction.confidence,
            kind: TransactionKind::Expense,
            used_model: prediction.used_model,
        }
    }

    /// Categorize a merchant name. Empty input is `Uncategorized`.
    pub fn predict_merchant(&self, merchant: &str) -> MerchantPrediction {
        let start = Instant::now();
        let result = self.classify_merchant(merchant, Category::Uncategorized);

        debug!(
            "Merchant '{}' -> {} ({:.2}) in {:.1}ms via {}",
            merchant,
            result.category,
            result.confidence,
            elapsed_ms(start),
            if result.used_model { self.classifier.name() } else { "rule_based" }
        );

        MerchantPrediction::new(merchant, result)
    }

    /// Show how a text is normalized under both policies.
    pub fn normalize(&self, text: &str) -> NormalizeReport {
        NormalizeReport::new(text)
    }

    fn classify_merchant(&self, merchant: &str, empty: Category) -> ClassificationResult {
        let text = normalize(merchant);
        if text.is_empty() {
            return ClassificationResult::rule_based(empty);
        }
        self.classifier.classify(&text)
    }
}

impl TransactionRouter<ModelClassifier> {
    /// Build a router backed by a fresh model store.
    ///
    /// When `load_on_start` is set the model is loaded immediately; a load
    /// failure is logged and the router starts on the rule-based path.
    pub fn from_config(config: &ExpiqConfig) -> Self {
        let store = Arc::new(ModelStore::with_config(config.model.clone()));
        if config.model.load_on_start {
            if let Err(e) = store.load() {
                debug!("Starting without a model: {}", e);
            }
        }
        Self::with_store(config, store)
    }

    /// Build a router over an existing store, without loading.
    pub fn with_store(config: &ExpiqConfig, store: Arc<ModelStore>) -> Self {
        Self::new(
            SmsParser::from_config(&config.extraction),
            ModelClassifier::new(store),
        )
    }

    pub fn store(&self) -> &Arc<ModelStore> {
        self.classifier.store()
    }
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}
