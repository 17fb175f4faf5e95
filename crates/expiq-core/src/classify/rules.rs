//! Keyword rules used when no learned model is available.

use crate::models::category::Category;
use crate::models::transaction::ClassificationResult;
use crate::normalize::NormalizedText;

use super::CategoryClassifier;

/// Keyword rules in priority order. The first rule with a keyword contained
/// in the text wins; text matching none is `Other`.
pub const CATEGORY_RULES: &[(Category, &[&str])] = &[
    (
        Category::Food,
        &[
            "zomato", "swiggy", "food", "restaurant", "cafe", "pizza", "burger", "biryani",
            "kfc", "domino", "mcdonalds", "starbucks", "tea", "snack",
        ],
    ),
    (
        Category::Travel,
        &[
            "uber", "ola", "rapido", "metro", "bus", "auto", "petrol", "fuel", "irctc",
            "indigo", "spicejet",
        ],
    ),
    (
        Category::Shopping,
        &[
            "amazon", "flipkart", "myntra", "zara", "shopping", "store", "mall", "meesho",
            "ajio",
        ],
    ),
    (
        Category::Health,
        &[
            "doctor", "pharmacy", "apollo", "medplus", "hospital", "clinic", "1mg", "netmeds",
            "health",
        ],
    ),
    (
        Category::Entertainment,
        &[
            "netflix", "hotstar", "prime", "spotify", "bookmyshow", "pvr", "inox", "cinema",
            "game",
        ],
    ),
    (
        Category::Education,
        &[
            "college", "school", "course", "udemy", "fees", "tuition", "book", "byju",
            "unacademy",
        ],
    ),
    (
        Category::Housing,
        &["rent", "pg", "hostel", "housing", "maintenance"],
    ),
];

/// Deterministic, stateless keyword classifier. Never fails and always
/// reports zero confidence.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedClassifier;

impl RuleBasedClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Category for already-lowercased text.
    pub fn category_for(&self, text: &str) -> Category {
        CATEGORY_RULES
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|kw| text.contains(kw)))
            .map(|(category, _)| *category)
            .unwrap_or(Category::Other)
    }
}

impl CategoryClassifier for RuleBasedClassifier {
    fn classify(&self, text: &NormalizedText) -> ClassificationResult {
        ClassificationResult::rule_based(self.category_for(text.as_str()))
    }

    fn name(&self) -> &'static str {
        "rule_based"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;

    fn classify(merchant: &str) -> Category {
        RuleBasedClassifier::new().classify(&normalize(merchant)).category
    }

    #[test]
    fn test_known_merchants() {
        assert_eq!(classify("Zomato Order"), Category::Food);
        assert_eq!(classify("Uber India"), Category::Travel);
        assert_eq!(classify("Flipkart Internet"), Category::Shopping);
        assert_eq!(classify("Apollo Pharmacy"), Category::Health);
        assert_eq!(classify("Netflix Subscription"), Category::Entertainment);
        assert_eq!(classify("Udemy Course"), Category::Education);
        assert_eq!(classify("Monthly Rent"), Category::Housing);
        assert_eq!(classify("Ramesh Kumar"), Category::Other);
    }

    #[test]
    fn test_priority_order() {
        // Food outranks Shopping.
        assert_eq!(classify("Food Mall"), Category::Food);
        // Travel outranks Education.
        assert_eq!(classify("Bus Pass School"), Category::Travel);
    }

    #[test]
    fn test_zero_confidence() {
        let result = RuleBasedClassifier::new().classify(&normalize("Swiggy"));
        assert_eq!(result.confidence, 0.0);
        assert!(!result.used_model);
    }

    #[test]
    fn test_is_pure() {
        let classifier = RuleBasedClassifier::new();
        let text = normalize("Starbucks Coffee");
        let first = classifier.classify(&text);
        for _ in 0..10 {
            assert_eq!(classifier.classify(&text), first);
        }
    }

    #[test]
    fn test_batch_matches_single() {
        let classifier = RuleBasedClassifier::new();
        let texts: Vec<_> = ["Swiggy", "Zara", "Landlord"].iter().map(|m| normalize(m)).collect();
        let batch = classifier.classify_batch(&texts);
        let single: Vec<_> = texts.iter().map(|t| classifier.classify(t)).collect();
        assert_eq!(batch, single);
    }
}
