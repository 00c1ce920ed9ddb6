//! Category and overall spending aggregation

use chrono::NaiveDate;
use tracing::debug;

use crate::categorize::Categorizer;
use crate::dates::parse_date;
use crate::error::{Error, Result};
use crate::models::{round_cents, CategoryTotals, Transaction};

/// Sums expense transactions, per category or overall
pub struct Aggregator<'a> {
    categorizer: &'a Categorizer,
}

impl<'a> Aggregator<'a> {
    pub fn new(categorizer: &'a Categorizer) -> Self {
        Self { categorizer }
    }

    /// Expense totals per category, rounded to cents.
    /// Income transactions are ignored.
    pub fn totals_by_category(&self, transactions: &[Transaction]) -> CategoryTotals {
        let mut totals = CategoryTotals::new();

        for tx in transactions.iter().filter(|t| t.is_expense()) {
            let category = self.categorizer.categorize(&tx.description);
            *totals.entry(category.to_string()).or_insert(0.0) += tx.amount;
        }

        for total in totals.values_mut() {
            *total = round_cents(*total);
        }

        totals
    }

    /// Sum of all expense amounts, rounded to cents.
    ///
    /// Fails with [`Error::NoExpenseData`] when there is no expense or the
    /// expenses add up to zero.
    pub fn total_spent(&self, transactions: &[Transaction]) -> Result<f64> {
        let mut count = 0usize;
        let mut total = 0.0;
        for tx in transactions.iter().filter(|t| t.is_expense()) {
            count += 1;
            total += tx.amount;
        }

        if count == 0 || total == 0.0 {
            return Err(Error::NoExpenseData);
        }

        debug!(expenses = count, total, "Computed total spending");
        Ok(round_cents(total))
    }

    /// Mean expense amount, optionally restricted to one category
    pub fn average_spending(
        &self,
        transactions: &[Transaction],
        category: Option<&str>,
    ) -> Result<f64> {
        let amounts: Vec<f64> = transactions
            .iter()
            .filter(|t| t.is_expense())
            .filter(|t| match category {
                Some(c) => self.categorizer.categorize(&t.description) == c,
                None => true,
            })
            .map(|t| t.amount)
            .collect();

        if amounts.is_empty() {
            return Err(Error::NoExpenseData);
        }

        Ok(round_cents(amounts.iter().sum::<f64>() / amounts.len() as f64))
    }

    /// The `n` largest spending categories, highest first
    pub fn top_categories(&self, transactions: &[Transaction], n: usize) -> Vec<(String, f64)> {
        let mut ranked: Vec<(String, f64)> =
            self.totals_by_category(transactions).into_iter().collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked.truncate(n);
        ranked
    }
}

/// Transactions dated within `[start, end]`. A missing bound is unbounded.
pub fn filter_by_date_range(
    transactions: &[Transaction],
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Vec<Transaction> {
    transactions
        .iter()
        .filter(|t| start.map_or(true, |s| t.date >= s))
        .filter(|t| end.map_or(true, |e| t.date <= e))
        .cloned()
        .collect()
}

/// Like [`filter_by_date_range`], with bounds given as date strings
pub fn filter_by_date_strings(
    transactions: &[Transaction],
    start: Option<&str>,
    end: Option<&str>,
) -> Result<Vec<Transaction>> {
    let start = start.map(parse_date).transpose()?;
    let end = end.map(parse_date).transpose()?;
    Ok(filter_by_date_range(transactions, start, end))
}

/// Case-insensitive description search
pub fn search(transactions: &[Transaction], query: &str) -> Vec<Transaction> {
    let query = query.to_lowercase();
    transactions
        .iter()
        .filter(|t| t.description.to_lowercase().contains(&query))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Transaction> {
        vec![
            Transaction::expense(8.0, "Starbucks", "2024-01-03").unwrap(),
            Transaction::expense(12.0, "Uber ride", "2024-01-10").unwrap(),
            Transaction::expense(4.5, "Coffee", "2024-02-01").unwrap(),
            Transaction::expense(30.0, "Walmart groceries", "2024-02-14").unwrap(),
            Transaction::income(1500.0, "Payroll Deposit", "2024-02-15").unwrap(),
            Transaction::expense(20.0, "Lunch", "2024-03-01").unwrap(),
        ]
    }

    #[test]
    fn test_totals_by_category() {
        let categorizer = Categorizer::default();
        let totals = Aggregator::new(&categorizer).totals_by_category(&sample());

        assert_eq!(totals.get("Food"), Some(&12.5));
        assert_eq!(totals.get("Transportation"), Some(&12.0));
        assert_eq!(totals.get("Shopping"), Some(&30.0));
        assert_eq!(totals.get("Other"), Some(&20.0));
        // Income never shows up as spending
        assert!(!totals.contains_key("Income"));
    }

    #[test]
    fn test_totals_empty() {
        let categorizer = Categorizer::default();
        assert!(Aggregator::new(&categorizer)
            .totals_by_category(&[])
            .is_empty());
    }

    #[test]
    fn test_total_spent() {
        let categorizer = Categorizer::default();
        let total = Aggregator::new(&categorizer).total_spent(&sample()).unwrap();
        assert_eq!(total, 74.5);
    }

    #[test]
    fn test_total_spent_all_income_fails() {
        let categorizer = Categorizer::default();
        let txs = vec![
            Transaction::income(1000.0, "Salary", "2024-01-01").unwrap(),
            Transaction::income(50.0, "Refund deposit", "2024-01-02").unwrap(),
        ];
        let result = Aggregator::new(&categorizer).total_spent(&txs);
        assert!(matches!(result, Err(Error::NoExpenseData)));
    }

    #[test]
    fn test_total_spent_zero_valued_expenses_fails() {
        let categorizer = Categorizer::default();
        let txs = vec![
            Transaction::expense(0.0, "Free trial", "2024-01-01").unwrap(),
            Transaction::income(100.0, "Salary", "2024-01-02").unwrap(),
        ];
        let result = Aggregator::new(&categorizer).total_spent(&txs);
        assert!(matches!(result, Err(Error::NoExpenseData)));
    }

    #[test]
    fn test_total_spent_empty_fails() {
        let categorizer = Categorizer::default();
        assert!(matches!(
            Aggregator::new(&categorizer).total_spent(&[]),
            Err(Error::NoExpenseData)
        ));
    }

    #[test]
    fn test_average_spending() {
        let categorizer = Categorizer::default();
        let aggregator = Aggregator::new(&categorizer);
        let txs = sample();

        assert_eq!(aggregator.average_spending(&txs, None).unwrap(), 14.9);
        assert_eq!(
            aggregator.average_spending(&txs, Some("Food")).unwrap(),
            6.25
        );
        assert!(matches!(
            aggregator.average_spending(&txs, Some("Health")),
            Err(Error::NoExpenseData)
        ));
    }

    #[test]
    fn test_top_categories() {
        let categorizer = Categorizer::default();
        let top = Aggregator::new(&categorizer).top_categories(&sample(), 2);

        assert_eq!(
            top,
            vec![("Shopping".to_string(), 30.0), ("Other".to_string(), 20.0)]
        );
    }

    #[test]
    fn test_filter_by_date_range_inclusive() {
        let txs = sample();
        let start = NaiveDate::from_ymd_opt(2024, 1, 10);
        let end = NaiveDate::from_ymd_opt(2024, 2, 14);

        let filtered = filter_by_date_range(&txs, start, end);
        let descriptions: Vec<_> = filtered.iter().map(|t| t.description.as_str()).collect();
        assert_eq!(descriptions, vec!["Uber ride", "Coffee", "Walmart groceries"]);
    }

    #[test]
    fn test_filter_open_bounds() {
        let txs = sample();
        assert_eq!(filter_by_date_range(&txs, None, None).len(), txs.len());

        let from_feb = filter_by_date_range(&txs, NaiveDate::from_ymd_opt(2024, 2, 1), None);
        assert_eq!(from_feb.len(), 4);

        let until_jan = filter_by_date_range(&txs, None, NaiveDate::from_ymd_opt(2024, 1, 31));
        assert_eq!(until_jan.len(), 2);
    }

    #[test]
    fn test_filter_by_date_strings() {
        let txs = sample();
        let filtered = filter_by_date_strings(&txs, Some("02/01/2024"), Some("Feb 28, 2024")).unwrap();
        assert_eq!(filtered.len(), 3);

        assert!(matches!(
            filter_by_date_strings(&txs, Some("soon"), None),
            Err(Error::UnparseableDate(_))
        ));
    }

    #[test]
    fn test_search() {
        let txs = sample();
        let found = search(&txs, "WALMART");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].amount, 30.0);

        assert!(search(&txs, "netflix").is_empty());
    }
}
