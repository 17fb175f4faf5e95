//! Merchant extraction.
//!
//! A merchant candidate starts after `at`, `to`, `for` or `towards` and is the
//! shortest run of name characters followed by a terminator: a full stop, a
//! date, a metadata keyword (`on`, `using`, `via`, `txn`, `ref`, `avl`, `bal`,
//! `clear`) or the end of the text. Candidates are checked in order of
//! appearance against [`CandidateRule::ORDER`] and the first one that passes
//! every rule is the merchant. Bank templates put account and balance phrases
//! after the counterparty, so later candidates are never preferred.

use tracing::trace;

use super::patterns::{
    DATE_PREFIX, LEADING_CURRENCY, PREPOSITION, PURE_NUMBER, SKIP_WORDS, TERMINATOR_KEYWORD,
};
use super::{FieldExtractor, FieldMatch};

/// Default candidate window, in characters.
pub const DEFAULT_MAX_LEN: usize = 36;

/// Acceptance rule for a merchant candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateRule {
    /// Not a bare banking or currency word.
    NotSkipWord,
    /// At least two characters.
    MinLength,
    /// Not only digits.
    NotNumeric,
}

impl CandidateRule {
    /// Rules in evaluation order.
    pub const ORDER: [CandidateRule; 3] = [
        CandidateRule::NotSkipWord,
        CandidateRule::MinLength,
        CandidateRule::NotNumeric,
    ];

    pub fn accepts(self, candidate: &str) -> bool {
        match self {
            CandidateRule::NotSkipWord => !SKIP_WORDS.is_match(candidate),
            CandidateRule::MinLength => candidate.chars().count() >= 2,
            CandidateRule::NotNumeric => !PURE_NUMBER.is_match(candidate),
        }
    }
}

/// Merchant field extractor.
pub struct MerchantExtractor {
    max_len: usize,
}

impl MerchantExtractor {
    pub fn new() -> Self {
        Self {
            max_len: DEFAULT_MAX_LEN,
        }
    }

    /// Set the longest candidate considered.
    pub fn with_max_len(mut self, max_len: usize) -> Self {
        self.max_len = max_len.max(1);
        self
    }

    /// Every raw candidate in order of appearance, before rule filtering.
    pub fn candidates(&self, text: &str) -> Vec<FieldMatch<String>> {
        let mut out = Vec::new();
        let mut pos = 0;

        while let Some(prep) = PREPOSITION.find_at(text, pos) {
            match self.candidate_end(text, prep.end()) {
                Some(end) => {
                    let raw = &text[prep.end()..end];
                    out.push(FieldMatch::new(raw.trim().to_string(), prep.end(), end));
                    pos = end;
                }
                // Prepositions start with an ASCII letter, so +1 stays on a char boundary.
                None => pos = prep.start() + 1,
            }
        }

        out
    }

    /// End of the shortest terminated candidate starting at `start`.
    fn candidate_end(&self, text: &str, start: usize) -> Option<usize> {
        let bytes = text.as_bytes();

        if !bytes.get(start)?.is_ascii_alphanumeric() {
            return None;
        }
        if LEADING_CURRENCY.is_match(&text[start..]) {
            return None;
        }

        let mut end = start;
        for _ in 0..self.max_len {
            match bytes.get(end) {
                Some(&b) if is_name_byte(b) => end += 1,
                _ => return None,
            }
            if terminates_at(text, end) {
                return Some(end);
            }
        }

        None
    }
}

impl Default for MerchantExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for MerchantExtractor {
    type Output = FieldMatch<String>;

    /// Accepted merchants, whitespace collapsed.
    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        self.candidates(text)
            .into_iter()
            .filter(|c| {
                let ok = CandidateRule::ORDER.iter().all(|rule| rule.accepts(&c.value));
                if !ok {
                    trace!("Skipping merchant candidate '{}'", c.value);
                }
                ok
            })
            .map(|c| FieldMatch {
                value: collapse_whitespace(&c.value),
                position: c.position,
            })
            .collect()
    }
}

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b.is_ascii_whitespace() || matches!(b, b'&' | b'.' | b'-')
}

/// Whether a candidate ending at `end` is followed by a terminator.
fn terminates_at(text: &str, end: usize) -> bool {
    let rest = &text[end..];
    let trimmed = rest.trim_start();

    if trimmed.is_empty() || trimmed.starts_with('.') || DATE_PREFIX.is_match(trimmed) {
        return true;
    }

    // Keywords must start a new word, so "Amazon" is not cut at "on".
    let at_word_start = trimmed.len() < rest.len()
        || !text[..end]
            .chars()
            .next_back()
            .is_some_and(|c| c.is_alphanumeric());

    at_word_start && TERMINATOR_KEYWORD.is_match(trimmed)
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
