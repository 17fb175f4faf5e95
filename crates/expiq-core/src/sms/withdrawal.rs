//! Cash withdrawal detection.

use super::patterns::WITHDRAWAL_PATTERN;
use super::{FieldExtractor, FieldMatch};

/// Detects ATM and cash withdrawal notices.
pub struct WithdrawalDetector;

impl WithdrawalDetector {
    pub fn new() -> Self {
        Self
    }

    pub fn is_withdrawal(&self, text: &str) -> bool {
        WITHDRAWAL_PATTERN.is_match(text)
    }
}

impl Default for WithdrawalDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for WithdrawalDetector {
    type Output = FieldMatch<String>;

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        WITHDRAWAL_PATTERN
            .find_iter(text)
            .map(|m| FieldMatch::new(m.as_str().to_string(), m.start(), m.end()))
            .collect()
    }
}
