//! Date extraction. Dates are returned as found, without calendar checks.

use super::patterns::DATE_PATTERN;
use super::{FieldExtractor, FieldMatch};

/// Date field extractor.
pub struct DateExtractor;

impl DateExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for DateExtractor {
    type Output = FieldMatch<String>;

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        DATE_PATTERN
            .find_iter(text)
            .map(|m| FieldMatch::new(m.as_str().to_string(), m.start(), m.end()))
            .collect()
    }
}
