//! Common regex patterns for bank SMS extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Currency marker followed by the amount, e.g. "Rs. 250", "INR 1200.50", "₹99"
    pub static ref AMOUNT_PATTERN: Regex = Regex::new(
        r"(?i)(?:\b(?:rs\.?|inr)|₹)\s*(\d+(?:\.\d{1,2})?)"
    ).unwrap();

    // DD-MM-YYYY or DD/MM/YYYY
    pub static ref DATE_PATTERN: Regex = Regex::new(
        r"(\d{2}[-/]\d{2}[-/]\d{4})"
    ).unwrap();

    // ATM and cash withdrawal notices
    pub static ref WITHDRAWAL_PATTERN: Regex = Regex::new(
        r"(?i)(?:\batm(?:s|wdl|wdr|cash|withdraw\w*)?\b|cash\s*withdraw|withdrawn\s*from\s*atm)"
    ).unwrap();

    // Words that introduce a counterparty
    pub static ref PREPOSITION: Regex = Regex::new(
        r"(?i)\b(?:at|to|for|towards)\s+"
    ).unwrap();

    // A currency amount where a merchant name would start
    pub static ref LEADING_CURRENCY: Regex = Regex::new(
        r"(?i)^(?:rs\.?[\s\d]|inr[\s\d])"
    ).unwrap();

    // Metadata that ends a merchant name. Checked after leading whitespace.
    // Prefixes, so "Balance", "Avlbl" and "Cleared" also terminate.
    pub static ref TERMINATOR_KEYWORD: Regex = Regex::new(
        r"(?i)^(?:on\s|via\s|using|txn|ref|avl|bal|clear)"
    ).unwrap();

    pub static ref DATE_PREFIX: Regex = Regex::new(
        r"^\d{2}[-/]\d{2}"
    ).unwrap();

    // Bare banking and currency words that are never merchants
    pub static ref SKIP_WORDS: Regex = Regex::new(
        r"(?i)^(?:rs|inr|upi|debit|credit|card|bank|acct|acc|a/c|hdfc|sbi|icici|kotak|axis)$"
    ).unwrap();

    pub static ref PURE_NUMBER: Regex = Regex::new(
        r"^\d+$"
    ).unwrap();
}
