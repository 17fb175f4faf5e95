//! Spending categories.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Closed set of spending categories, plus the `Uncategorized` sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Food,
    Shopping,
    Travel,
    Transport,
    Health,
    Entertainment,
    Education,
    Housing,
    Other,
    /// Used only when no merchant could be identified.
    Uncategorized,
}

impl Category {
    /// Categories a trained model may predict, in canonical order.
    pub const ALL: [Category; 9] = [
        Category::Food,
        Category::Shopping,
        Category::Travel,
        Category::Transport,
        Category::Health,
        Category::Entertainment,
        Category::Education,
        Category::Housing,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Shopping => "Shopping",
            Category::Travel => "Travel",
            Category::Transport => "Transport",
            Category::Health => "Health",
            Category::Entertainment => "Entertainment",
            Category::Education => "Education",
            Category::Housing => "Housing",
            Category::Other => "Other",
            Category::Uncategorized => "Uncategorized",
        }
    }

    /// Map the sentinel onto `Other`; every other category is unchanged.
    pub fn or_other(self) -> Category {
        match self {
            Category::Uncategorized => Category::Other,
            c => c,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned for labels outside the category set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl fmt::Display for UnknownCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown category: {}", self.0)
    }
}

impl std::error::Error for UnknownCategory {}

impl FromStr for Category {
    type Err = UnknownCategory;

    /// Labels are matched case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim();
        Category::ALL
            .iter()
            .chain(std::iter::once(&Category::Uncategorized))
            .find(|c| c.as_str().eq_ignore_ascii_case(label))
            .copied()
            .ok_or_else(|| UnknownCategory(label.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_labels() {
        assert_eq!("Food".parse::<Category>(), Ok(Category::Food));
        assert_eq!("travel".parse::<Category>(), Ok(Category::Travel));
        assert_eq!(" Other ".parse::<Category>(), Ok(Category::Other));
        assert_eq!("Uncategorized".parse::<Category>(), Ok(Category::Uncategorized));
        assert!("Groceries".parse::<Category>().is_err());
    }

    #[test]
    fn test_or_other() {
        assert_eq!(Category::Uncategorized.or_other(), Category::Other);
        assert_eq!(Category::Health.or_other(), Category::Health);
    }

    #[test]
    fn test_serializes_as_label() {
        assert_eq!(serde_json::to_string(&Category::Food).unwrap(), "\"Food\"");
    }
}
