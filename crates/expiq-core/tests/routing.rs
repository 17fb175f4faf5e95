//! End-to-end routing through the model store, with stub and file-backed models.

use std::sync::Arc;
use std::thread;

use expiq_core::{
    BatchOrchestrator, Category, ExpiqConfig, InferenceError, LoadedModel, ModelClassifier,
    ModelStore, SmsParser, TextModel, TransactionKind, TransactionRouter, ValidationError,
};
use ndarray::Array2;
use pretty_assertions::assert_eq;

/// Puts `weight` on one class for every input.
struct OneHot {
    classes: Vec<String>,
    winner: usize,
    weight: f32,
}

impl OneHot {
    fn new(winner: &str, weight: f32) -> Self {
        let classes: Vec<String> = ["Food", "Travel", "Shopping", "Other"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let winner = classes.iter().position(|c| c == winner).unwrap();
        Self {
            classes,
            winner,
            weight,
        }
    }
}

impl TextModel for OneHot {
    fn predict_proba(&self, texts: &[&str]) -> expiq_inference::Result<Array2<f32>> {
        let n = self.classes.len();
        let rest = (1.0 - self.weight) / (n - 1) as f32;
        let mut out = Array2::from_elem((texts.len(), n), rest);
        out.column_mut(self.winner).fill(self.weight);
        Ok(out)
    }

    fn classes(&self) -> &[String] {
        &self.classes
    }
}

struct Exploding(Vec<String>);

impl TextModel for Exploding {
    fn predict_proba(&self, _texts: &[&str]) -> expiq_inference::Result<Array2<f32>> {
        Err(InferenceError::InvalidInput("unexpected token".to_string()))
    }

    fn classes(&self) -> &[String] {
        &self.0
    }
}

fn router_with(store: Arc<ModelStore>) -> TransactionRouter<ModelClassifier> {
    TransactionRouter::with_store(&ExpiqConfig::default(), store)
}

const SWIGGY_SMS: &str =
    "Rs. 250 debited from A/c XX1234 on 05-03-2024 to Swiggy. Avl Bal: Rs 15000.";

#[test]
fn sms_uses_published_model() {
    let store = Arc::new(ModelStore::new());
    store.publish(LoadedModel::new(OneHot::new("Shopping", 0.7)));
    let router = router_with(store);

    let prediction = router.predict_sms(SWIGGY_SMS);

    assert_eq!(prediction.merchant, "Swiggy");
    assert_eq!(prediction.category, Category::Shopping);
    assert_eq!(prediction.confidence, 0.7);
    assert_eq!(prediction.kind, TransactionKind::Expense);
    assert!(prediction.used_model);
}

#[test]
fn failing_model_degrades_to_rules() {
    let store = Arc::new(ModelStore::new());
    store.publish(LoadedModel::new(Exploding(vec!["Food".to_string()])));
    let router = router_with(Arc::clone(&store));

    let prediction = router.predict_sms(SWIGGY_SMS);
    assert_eq!(prediction.category, Category::Food);
    assert_eq!(prediction.confidence, 0.0);
    assert!(!prediction.used_model);

    let batch = BatchOrchestrator::new(router.classifier())
        .classify(&["Zomato Order", "Ola Cabs"])
        .unwrap();
    assert_eq!(
        batch.results.iter().map(|r| r.category).collect::<Vec<_>>(),
        vec![Category::Food, Category::Travel]
    );
    assert!(batch.results.iter().all(|r| !r.used_model));
}

#[test]
fn batch_agrees_with_single_predictions() {
    let store = Arc::new(ModelStore::new());
    store.publish(LoadedModel::new(OneHot::new("Travel", 0.55)));
    let router = router_with(Arc::clone(&store));

    let merchants = ["Uber", "Zara", "", "Apollo"];
    let batch = BatchOrchestrator::new(router.classifier())
        .classify(&merchants)
        .unwrap();

    for (merchant, result) in merchants.iter().zip(&batch.results) {
        assert_eq!(&router.predict_merchant(merchant), result);
    }
}

#[test]
fn batch_of_501_is_rejected() {
    let store = Arc::new(ModelStore::new());
    let router = router_with(store);
    let merchants: Vec<String> = (0..501).map(|i| format!("Shop {i}")).collect();

    let err = BatchOrchestrator::new(router.classifier())
        .classify(&merchants)
        .unwrap_err();
    assert_eq!(err, ValidationError::BatchSize { len: 501, max: 500 });
}

#[test]
fn linear_model_file_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("expense_model.json");
    std::fs::write(
        &path,
        r#"{
            "classes": ["Food", "Travel"],
            "vocabulary": {"swiggy": 0, "zomato": 1, "uber": 2, "ola": 3},
            "idf": [1.0, 1.0, 1.0, 1.0],
            "coef": [[3.0, 3.0, -3.0, -3.0], [-3.0, -3.0, 3.0, 3.0]],
            "intercept": [0.0, 0.0]
        }"#,
    )
    .unwrap();

    let mut config = ExpiqConfig::default();
    config.model.model_path = Some(path);
    config.model.search_paths.clear();
    let router = TransactionRouter::from_config(&config);

    assert!(router.store().is_loaded());
    let uber = router.predict_merchant("Uber India");
    assert_eq!(uber.category, Category::Travel);
    assert!(uber.used_model);
    assert!(uber.confidence > 0.9);

    let sms = router.predict_sms("INR 120 paid to Zomato via UPI");
    assert_eq!(sms.category, Category::Food);
    assert!(sms.used_model);
}

#[test]
fn reload_is_atomic_for_concurrent_readers() {
    let store = Arc::new(ModelStore::new());
    store.publish(LoadedModel::new(OneHot::new("Food", 0.9)));
    let router = Arc::new(router_with(Arc::clone(&store)));

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let router = Arc::clone(&router);
            thread::spawn(move || {
                for _ in 0..200 {
                    let p = router.predict_merchant("Corner Shop");
                    let consistent = (p.category == Category::Food && p.confidence == 0.9)
                        || (p.category == Category::Travel && p.confidence == 0.6);
                    assert!(consistent, "mixed model state: {:?}", p);
                    assert!(p.used_model);
                }
            })
        })
        .collect();

    for i in 0..50 {
        let next = if i % 2 == 0 {
            OneHot::new("Travel", 0.6)
        } else {
            OneHot::new("Food", 0.9)
        };
        store.publish(LoadedModel::new(next));
    }

    for reader in readers {
        reader.join().unwrap();
    }
}

#[test]
fn parser_can_be_replaced() {
    let router = router_with(Arc::new(ModelStore::new()))
        .with_parser(SmsParser::from_config(&expiq_core::ExtractionConfig {
            max_merchant_len: 3,
        }));

    assert_eq!(router.predict_sms("Rs 90 paid to Swiggy").merchant, "");
    assert_eq!(router.predict_sms("Rs 90 paid to Ola").category, Category::Travel);
}
