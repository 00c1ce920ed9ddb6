//! Keyword-based transaction categorization
//!
//! Categories are assigned by scanning an ordered rule table: the first rule
//! with any keyword contained in the lowercased description wins. Matching is
//! plain substring matching, so "gas" matches both "gas station" and "gasket".

use serde::{Deserialize, Serialize};
use tracing::trace;

/// Label for descriptions that match no rule
pub const OTHER_CATEGORY: &str = "Other";

/// A category label and the keywords that select it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub label: String,
    pub keywords: Vec<String>,
}

impl CategoryRule {
    pub fn new<I, S>(label: impl Into<String>, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            label: label.into(),
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().to_lowercase())
                .collect(),
        }
    }

    fn matches(&self, lowered: &str) -> bool {
        self.keywords
            .iter()
            .any(|k| !k.is_empty() && lowered.contains(k.as_str()))
    }
}

/// Ordered list of category rules. Order is priority.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTable {
    rules: Vec<CategoryRule>,
}

impl CategoryTable {
    pub fn new(rules: Vec<CategoryRule>) -> Self {
        // Keywords may come from config in any case
        let rules = rules
            .into_iter()
            .map(|r| CategoryRule::new(r.label, r.keywords))
            .collect();
        Self { rules }
    }

    pub fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|r| r.label.as_str())
    }
}

impl Default for CategoryTable {
    fn default() -> Self {
        Self::new(vec![
            CategoryRule::new(
                "Food",
                [
                    "restaurant",
                    "coffee",
                    "cafe",
                    "burger",
                    "pizza",
                    "bar",
                    "starbucks",
                    "mcdonalds",
                    "kfc",
                    "burger king",
                    "safeway",
                    "trader joes",
                    "giant",
                    "lidl",
                    "marathon deli",
                ],
            ),
            CategoryRule::new(
                "Transportation",
                [
                    "uber", "lyft", "taxi", "bus", "train", "flight", "airline", "gas", "fuel",
                ],
            ),
            CategoryRule::new(
                "Utilities",
                [
                    "electric", "water", "gas bill", "internet", "wifi", "phone", "utility",
                ],
            ),
            CategoryRule::new(
                "Entertainment",
                [
                    "movie", "netflix", "spotify", "game", "cinema", "concert", "music", "steam",
                    "fortnite",
                ],
            ),
            CategoryRule::new(
                "Shopping",
                ["walmart", "target", "amazon", "mall", "store", "purchase"],
            ),
            CategoryRule::new(
                "Income",
                [
                    "deposit",
                    "salary",
                    "payroll",
                    "transfer from employer",
                    "income",
                ],
            ),
            CategoryRule::new(
                "Health",
                [
                    "pharmacy",
                    "doctor",
                    "hospital",
                    "clinic",
                    "medication",
                    "dentist",
                ],
            ),
            CategoryRule::new(
                "Travel",
                ["hotel", "airbnb", "booking", "expedia", "trip", "travel"],
            ),
        ])
    }
}

/// Maps descriptions to category labels using a [`CategoryTable`]
#[derive(Debug, Clone, Default)]
pub struct Categorizer {
    table: CategoryTable,
}

impl Categorizer {
    pub fn new(table: CategoryTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &CategoryTable {
        &self.table
    }

    /// Category label for a description, or [`OTHER_CATEGORY`]
    pub fn categorize(&self, description: &str) -> &str {
        let lowered = description.to_lowercase();

        match self.table.rules.iter().find(|rule| rule.matches(&lowered)) {
            Some(rule) => {
                trace!(description, category = %rule.label, "Categorized");
                &rule.label
            }
            None => OTHER_CATEGORY,
        }
    }
}
