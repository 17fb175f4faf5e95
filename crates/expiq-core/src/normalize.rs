//! Text normalization shared by training and serving.
//!
//! The `Model` policy must stay identical to the normalization applied when
//! the classifier was trained. A divergence does not fail; it silently lowers
//! prediction quality.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which characters survive normalization besides `[a-z0-9]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalizePolicy {
    /// Only lowercase ASCII letters and digits. Input form of both classifiers.
    #[default]
    Model,
    /// Also keeps `&`, `.` and `-`, as merchant names are displayed.
    Display,
}

impl NormalizePolicy {
    fn keeps(self, c: char) -> bool {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            return true;
        }
        match self {
            NormalizePolicy::Model => false,
            NormalizePolicy::Display => matches!(c, '&' | '.' | '-'),
        }
    }
}

/// Text in the canonical form the classifier consumes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizedText(String);

impl NormalizedText {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for NormalizedText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NormalizedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Normalize with the `Model` policy.
pub fn normalize(text: &str) -> NormalizedText {
    normalize_with(text, NormalizePolicy::Model)
}

/// Lowercase, replace disallowed characters with spaces, collapse whitespace, trim.
pub fn normalize_with(text: &str, policy: NormalizePolicy) -> NormalizedText {
    let replaced: String = text
        .to_lowercase()
        .chars()
        .map(|c| if policy.keeps(c) { c } else { ' ' })
        .collect();

    NormalizedText(replaced.split_whitespace().collect::<Vec<_>>().join(" "))
}
