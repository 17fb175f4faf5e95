//! Amount extraction. Amounts are kept verbatim as strings.

use super::patterns::AMOUNT_PATTERN;
use super::{FieldExtractor, FieldMatch};

/// Amount field extractor.
pub struct AmountExtractor;

impl AmountExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AmountExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for AmountExtractor {
    type Output = FieldMatch<String>;

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        AMOUNT_PATTERN
            .captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .map(|m| FieldMatch::new(m.as_str().to_string(), m.start(), m.end()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first(text: &str) -> Option<String> {
        AmountExtractor::new().extract(text).map(|m| m.value)
    }

    #[test]
    fn test_currency_markers() {
        assert_eq!(first("Rs. 250 debited"), Some("250".to_string()));
        assert_eq!(first("Rs 250 debited"), Some("250".to_string()));
        assert_eq!(first("INR 1200.50 spent"), Some("1200.50".to_string()));
        assert_eq!(first("inr1200 spent"), Some("1200".to_string()));
        assert_eq!(first("Paid ₹99.9 at cafe"), Some("99.9".to_string()));
    }

    #[test]
    fn test_first_match_wins() {
        let text = "Rs 500 debited. Avl Bal: Rs 15000.00";
        assert_eq!(first(text), Some("500".to_string()));
        assert_eq!(AmountExtractor::new().extract_all(text).len(), 2);
    }

    #[test]
    fn test_at_most_two_fraction_digits() {
        assert_eq!(first("Rs.12.345"), Some("12.34".to_string()));
    }

    #[test]
    fn test_no_grouping_normalization() {
        assert_eq!(first("INR 1,250.00"), Some("1".to_string()));
    }

    #[test]
    fn test_marker_inside_word_is_ignored() {
        assert_eq!(first("Users 12 online"), None);
    }

    #[test]
    fn test_no_amount() {
        assert_eq!(first("Your OTP is 123456"), None);
    }
}
