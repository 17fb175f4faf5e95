//! Bulk parsing of labelled SMS datasets.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::SmsParser;

/// One input row: raw SMS text and an optional known category.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SmsRecord {
    #[serde(default)]
    pub sms_text: String,
    #[serde(default)]
    pub category: Option<String>,
}

/// One parsed output row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedRecord {
    pub amount: Decimal,
    pub merchant: Option<String>,
    /// Date as written in the message.
    pub date: Option<String>,
    /// `date` when it names a real calendar day.
    pub iso_date: Option<NaiveDate>,
    pub original_text: String,
    pub true_category: Option<String>,
}

/// Parse every record, dropping rows where no amount was found.
pub fn parse_records<I>(parser: &SmsParser, records: I) -> Vec<ParsedRecord>
where
    I: IntoIterator<Item = SmsRecord>,
{
    records
        .into_iter()
        .filter_map(|record| {
            let fields = parser.parse(&record.sms_text);
            let amount = fields.amount_value()?;
            let iso_date = fields.parsed_date();
            Some(ParsedRecord {
                amount,
                merchant: fields.merchant,
                date: fields.date,
                iso_date,
                original_text: record.sms_text,
                true_category: record.category,
            })
        })
        .collect()
}
