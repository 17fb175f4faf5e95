//! SMS parser combining the individual field extractors.

use tracing::debug;

use crate::models::config::ExtractionConfig;
use crate::models::transaction::ParsedFields;

use super::{
    AmountExtractor, DateExtractor, FieldExtractor, MerchantExtractor, WithdrawalDetector,
};

/// Extracts amount, date, merchant and withdrawal signal from raw SMS text.
///
/// Parsing is total: fields that cannot be found are `None`, never errors.
pub struct SmsParser {
    withdrawal: WithdrawalDetector,
    amount: AmountExtractor,
    date: DateExtractor,
    merchant: MerchantExtractor,
}

impl SmsParser {
    /// Create a parser with default settings.
    pub fn new() -> Self {
        Self {
            withdrawal: WithdrawalDetector::new(),
            amount: AmountExtractor::new(),
            date: DateExtractor::new(),
            merchant: MerchantExtractor::new(),
        }
    }

    /// Create a parser from extraction configuration.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::new().with_merchant_extractor(
            MerchantExtractor::new().with_max_len(config.max_merchant_len),
        )
    }

    /// Replace the merchant extractor.
    pub fn with_merchant_extractor(mut self, merchant: MerchantExtractor) -> Self {
        self.merchant = merchant;
        self
    }

    /// Parse one message.
    pub fn parse(&self, text: &str) -> ParsedFields {
        if text.is_empty() {
            return ParsedFields::default();
        }

        // Withdrawal is decided first; the router never classifies those.
        let is_withdrawal = self.withdrawal.is_withdrawal(text);

        let fields = ParsedFields {
            amount: self.amount.extract(text).map(|m| m.value),
            date: self.date.extract(text).map(|m| m.value),
            merchant: self.merchant.extract(text).map(|m| m.value),
            is_withdrawal,
        };

        debug!(
            "Parsed SMS: amount={:?} date={:?} merchant={:?} withdrawal={}",
            fields.amount, fields.date, fields.merchant, fields.is_withdrawal
        );

        fields
    }
}

impl Default for SmsParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_debit_sms() {
        let fields = SmsParser::new()
            .parse("Rs. 250 debited ... on 05-03-2024 to Swiggy. Avl Bal: Rs 15000.");

        assert_eq!(
            fields,
            ParsedFields {
                amount: Some("250".to_string()),
                date: Some("05-03-2024".to_string()),
                merchant: Some("Swiggy".to_string()),
                is_withdrawal: false,
            }
        );
    }

    #[test]
    fn test_parse_withdrawal_keeps_other_fields() {
        let fields = SmsParser::new().parse("Cash withdrawn from ATM Rs 2000 on 01-01-2024");

        assert!(fields.is_withdrawal);
        assert_eq!(fields.amount, Some("2000".to_string()));
        assert_eq!(fields.date, Some("01-01-2024".to_string()));
    }

    #[test]
    fn test_parse_unstructured_text() {
        let fields = SmsParser::new().parse("Hello, your parcel is on its way");
        assert_eq!(fields, ParsedFields::default());
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(SmsParser::new().parse(""), ParsedFields::default());
    }

    #[test]
    fn test_from_config_window() {
        let config = ExtractionConfig { max_merchant_len: 5 };
        let parser = SmsParser::from_config(&config);

        assert_eq!(parser.parse("Rs 20 to Swiggy.").merchant, None);
        assert_eq!(parser.parse("Rs 20 to Ola.").merchant, Some("Ola".to_string()));
    }
}
