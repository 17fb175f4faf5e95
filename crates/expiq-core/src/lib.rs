//! Core library for bank SMS expense categorization.
//!
//! This crate provides:
//! - Field extraction from bank SMS (amount, date, merchant, withdrawal flag)
//! - Text normalization for classifier input
//! - Category classification with a learned model and a keyword fallback
//! - An atomically swappable model store
//! - Single-message routing and batch orchestration

pub mod batch;
pub mod classify;
pub mod error;
pub mod models;
pub mod normalize;
pub mod router;
pub mod sms;

pub use batch::{validate_batch_size, BatchOrchestrator};
pub use classify::{
    CategoryClassifier, HealthStatus, LoadedModel, ModelClassifier, ModelInfo, ModelStore,
    RuleBasedClassifier,
};
pub use error::{require_non_empty, ExpiqError, ModelError, Result, ValidationError};
pub use models::category::Category;
pub use models::config::{BatchConfig, ExpiqConfig, ExtractionConfig, ModelConfig, MAX_BATCH_SIZE};
pub use models::transaction::{
    BatchPrediction, ClassificationResult, MerchantPrediction, NormalizeReport, ParsedFields,
    SmsPrediction, TransactionKind, WITHDRAWAL_MERCHANT,
};
pub use normalize::{normalize, normalize_with, NormalizePolicy, NormalizedText};
pub use router::TransactionRouter;
pub use sms::{parse_records, ParsedRecord, SmsParser, SmsRecord};

/// Re-export inference types.
pub use expiq_inference::{InferenceError, LinearTextModel, TextModel};
