//! Transaction data models: extracted fields and categorization results.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::category::Category;
use crate::normalize::{normalize, normalize_with, NormalizePolicy};

/// Merchant reported for cash withdrawals.
pub const WITHDRAWAL_MERCHANT: &str = "ATM";

/// Fields extracted from one raw SMS. Every field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedFields {
    /// Amount exactly as written after the currency marker.
    pub amount: Option<String>,

    /// Date as found, `DD-MM-YYYY` or `DD/MM/YYYY`.
    pub date: Option<String>,

    /// First acceptable merchant candidate.
    pub merchant: Option<String>,

    /// Text mentions an ATM or cash withdrawal.
    pub is_withdrawal: bool,
}

impl ParsedFields {
    /// Amount as a decimal, if present and well-formed.
    pub fn amount_value(&self) -> Option<Decimal> {
        self.amount.as_deref().and_then(|a| Decimal::from_str(a).ok())
    }

    /// Date as a calendar date. `None` when absent or not a real date.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        let date = self.date.as_deref()?;
        NaiveDate::parse_from_str(date, "%d-%m-%Y")
            .or_else(|_| NaiveDate::parse_from_str(date, "%d/%m/%Y"))
            .ok()
    }
}

/// Output of a classifier for one input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub category: Category,

    /// Probability of `category`, in `[0, 1]`. Zero whenever `used_model` is false.
    pub confidence: f32,

    /// Whether the learned model produced this result.
    pub used_model: bool,
}

impl ClassificationResult {
    /// Rule-based result; carries no calibrated probability.
    pub fn rule_based(category: Category) -> Self {
        Self {
            category,
            confidence: 0.0,
            used_model: false,
        }
    }

    /// Result produced by the learned model.
    pub fn from_model(category: Category, confidence: f32) -> Self {
        Self {
            category,
            confidence: confidence.clamp(0.0, 1.0),
            used_model: true,
        }
    }
}

/// Kind of transaction an SMS describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Expense,
    CashWithdrawal,
}

/// Categorization of a single merchant name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MerchantPrediction {
    pub merchant: String,
    pub category: Category,
    pub confidence: f64,
    pub used_model: bool,
}

impl MerchantPrediction {
    pub fn new(merchant: impl Into<String>, result: ClassificationResult) -> Self {
        Self {
            merchant: merchant.into(),
            category: result.category,
            confidence: round_to(result.confidence as f64, 4),
            used_model: result.used_model,
        }
    }
}

/// Categorization of a raw SMS.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmsPrediction {
    pub amount: Option<String>,
    pub date: Option<String>,
    pub merchant: String,
    pub category: Category,
    pub confidence: f64,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub used_model: bool,
}

/// Result of a batch categorization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchPrediction {
    /// One entry per input merchant, in input order.
    pub results: Vec<MerchantPrediction>,
    pub count: usize,
    pub duration_ms: f64,
}

/// Diagnostic view of how a text is normalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizeReport {
    pub input: String,
    /// Form fed to the classifier.
    pub normalized: String,
    /// Form that also keeps `&`, `.` and `-`.
    pub display: String,
}

impl NormalizeReport {
    pub fn new(text: &str) -> Self {
        Self {
            input: text.to_string(),
            normalized: normalize(text).into_string(),
            display: normalize_with(text, NormalizePolicy::Display).into_string(),
        }
    }
}

pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
