//! Merchant text normalization and keyword extraction

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::{Error, Result};

/// Words that carry no merchant or purchase signal
const STOPWORDS: &[&str] = &[
    "the",
    "and",
    "for",
    "of",
    "to",
    "a",
    "in",
    "on",
    "at",
    "payment",
    "purchase",
    "transaction",
    "from",
    "with",
    "store",
];

fn non_letters() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^a-zA-Z\s]").expect("valid regex"))
}

fn whitespace_runs() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("valid regex"))
}

fn letter_runs() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[a-zA-Z]+").expect("valid regex"))
}

/// Keep only ASCII letters and single spaces, lowercased.
///
/// This is the merchant key used for recurrence grouping, so
/// "Netflix", "NETFLIX!!" and "netflix " all collapse to `netflix`.
///
/// ```
/// use spendlens_core::text::normalize_text;
///
/// assert_eq!(normalize_text("Starbucks Coffee #123!"), "starbucks coffee");
/// assert_eq!(normalize_text("Amount: $45.50"), "amount");
/// ```
pub fn normalize_text(text: &str) -> String {
    let letters = non_letters().replace_all(text, "");
    let collapsed = whitespace_runs().replace_all(&letters, " ");
    collapsed.trim().to_lowercase()
}

/// Extract the most frequent meaningful words from a description.
///
/// Tokens are lowercase ASCII letter runs longer than two characters that are
/// not finance stopwords. Ties keep the order in which words first appear.
pub fn extract_keywords(description: &str, top_k: usize) -> Result<Vec<String>> {
    if top_k == 0 {
        return Err(Error::InvalidInput(
            "top_k must be a positive integer".to_string(),
        ));
    }

    let lowered = description.to_lowercase();
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();

    for token in letter_runs().find_iter(&lowered).map(|m| m.as_str()) {
        if token.len() <= 2 || STOPWORDS.contains(&token) {
            continue;
        }
        let count = counts.entry(token).or_insert(0);
        if *count == 0 {
            order.push(token);
        }
        *count += 1;
    }

    // Stable sort keeps first-appearance order among equal counts
    order.sort_by(|a, b| counts[b].cmp(&counts[a]));

    Ok(order
        .into_iter()
        .take(top_k)
        .map(|word| word.to_string())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text("Netflix"), "netflix");
        assert_eq!(normalize_text("NETFLIX!!"), "netflix");
        assert_eq!(normalize_text("netflix "), "netflix");
        assert_eq!(normalize_text("  Trader   Joe's\t#552 "), "trader joes");
    }

    #[test]
    fn test_normalize_text_empty() {
        assert_eq!(normalize_text(""), "");
        assert_eq!(normalize_text("#123 $9.99"), "");
    }

    #[test]
    fn test_normalize_text_drops_non_ascii_letters() {
        assert_eq!(normalize_text("Café Olé"), "caf ol");
    }

    #[test]
    fn test_extract_keywords() {
        let keywords =
            extract_keywords("Amazon Prime Video Subscription - Entertainment", 4).unwrap();
        assert_eq!(keywords, vec!["amazon", "prime", "video", "subscription"]);
    }

    #[test]
    fn test_extract_keywords_ranks_by_frequency() {
        let keywords = extract_keywords("Coffee shop coffee beans from the coffee store", 2).unwrap();
        assert_eq!(keywords, vec!["coffee", "shop"]);
    }

    #[test]
    fn test_extract_keywords_only_stopwords() {
        assert!(extract_keywords("Payment for the purchase", 3)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_extract_keywords_zero_top_k() {
        assert!(matches!(
            extract_keywords("anything", 0),
            Err(Error::InvalidInput(_))
        ));
    }
}
