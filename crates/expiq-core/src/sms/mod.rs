//! Rule-based field extraction for bank SMS notifications.

pub mod amounts;
pub mod dataset;
pub mod dates;
pub mod merchant;
pub mod patterns;
pub mod withdrawal;

mod parser;

pub use amounts::AmountExtractor;
pub use dataset::{parse_records, ParsedRecord, SmsRecord};
pub use dates::DateExtractor;
pub use merchant::{CandidateRule, MerchantExtractor};
pub use parser::SmsParser;
pub use withdrawal::WithdrawalDetector;

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the first occurrence of the field.
    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    /// Extract all occurrences of the field, in order of appearance.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// A matched field with its location in the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Byte range in source text.
    pub position: (usize, usize),
}

impl<T> FieldMatch<T> {
    pub fn new(value: T, start: usize, end: usize) -> Self {
        Self {
            value,
            position: (start, end),
        }
    }
}
