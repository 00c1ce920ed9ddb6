//! Month-over-month spending trends

use std::collections::BTreeMap;

use tracing::debug;

use crate::dates::month_key;
use crate::error::{Error, Result};
use crate::models::{round_cents, Transaction, Trend, TrendReport};

/// Thresholds (in percent) used to classify a sequence of change rates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendThresholds {
    /// Every rate must be beyond this for increasing/decreasing
    pub direction: f64,
    /// Any rate beyond this makes a mixed sequence fluctuating
    pub volatility: f64,
}

impl Default for TrendThresholds {
    fn default() -> Self {
        Self {
            direction: 2.0,
            volatility: 15.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TrendAnalyzer {
    thresholds: TrendThresholds,
}

impl TrendAnalyzer {
    pub fn new(thresholds: TrendThresholds) -> Self {
        Self { thresholds }
    }

    /// Bucket expenses by month and classify the direction of change.
    ///
    /// A transition out of a zero-spending month has no defined rate and is
    /// left out of `change_rates`, so the sequence can be shorter than the
    /// number of month transitions.
    pub fn analyze(&self, transactions: &[Transaction]) -> Result<TrendReport> {
        let mut monthly: BTreeMap<String, f64> = BTreeMap::new();
        for tx in transactions.iter().filter(|t| t.is_expense()) {
            *monthly.entry(month_key(tx.date)).or_insert(0.0) += tx.amount;
        }

        if monthly.is_empty() {
            return Err(Error::NoExpenseData);
        }

        // BTreeMap iterates "YYYY-MM" keys in chronological order
        let totals: Vec<f64> = monthly.values().copied().collect();
        let change_rates: Vec<f64> = totals
            .windows(2)
            .filter(|w| w[0] != 0.0)
            .map(|w| round_cents((w[1] - w[0]) / w[0] * 100.0))
            .collect();

        let trend = self.classify(&change_rates);
        debug!(
            months = monthly.len(),
            trend = trend.as_str(),
            "Spending trend analyzed"
        );

        Ok(TrendReport {
            monthly_totals: monthly
                .into_iter()
                .map(|(month, total)| (month, round_cents(total)))
                .collect(),
            trend,
            change_rates,
        })
    }

    /// Classify a sequence of percentage changes
    pub fn classify(&self, change_rates: &[f64]) -> Trend {
        let TrendThresholds {
            direction,
            volatility,
        } = self.thresholds;

        if change_rates.is_empty() {
            Trend::Stable
        } else if change_rates.iter().all(|&r| r > direction) {
            Trend::Increasing
        } else if change_rates.iter().all(|&r| r < -direction) {
            Trend::Decreasing
        } else if change_rates.iter().any(|r| r.abs() > volatility) {
            Trend::Fluctuating
        } else {
            Trend::Stable
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expenses(points: &[(f64, &str)]) -> Vec<Transaction> {
        points
            .iter()
            .map(|(amount, date)| Transaction::expense(*amount, "spend", date).unwrap())
            .collect()
    }

    #[test]
    fn test_mixed_sequence_with_large_moves_is_fluctuating() {
        let txs = expenses(&[
            (100.0, "2024-01-10"),
            (120.0, "2024-02-15"),
            (160.0, "2024-03-12"),
            (155.0, "2024-04-18"),
        ]);

        let report = TrendAnalyzer::default().analyze(&txs).unwrap();

        assert_eq!(report.change_rates, vec![20.0, 33.33, -3.12]);
        // The final -3.12 breaks a uniform increase, and 20/33.33 exceed 15
        assert_eq!(report.trend, Trend::Fluctuating);
        assert_eq!(
            report.monthly_totals.keys().collect::<Vec<_>>(),
            vec!["2024-01", "2024-02", "2024-03", "2024-04"]
        );
    }

    #[test]
    fn test_increasing() {
        let txs = expenses(&[
            (100.0, "2024-01-10"),
            (110.0, "2024-02-10"),
            (121.0, "2024-03-10"),
        ]);
        let report = TrendAnalyzer::default().analyze(&txs).unwrap();

        assert_eq!(report.change_rates, vec![10.0, 10.0]);
        assert_eq!(report.trend, Trend::Increasing);
    }

    #[test]
    fn test_decreasing() {
        let txs = expenses(&[(200.0, "2024-01-10"), (150.0, "2024-02-10")]);
        let report = TrendAnalyzer::default().analyze(&txs).unwrap();

        assert_eq!(report.change_rates, vec![-25.0]);
        assert_eq!(report.trend, Trend::Decreasing);
    }

    #[test]
    fn test_small_mixed_moves_are_stable() {
        let analyzer = TrendAnalyzer::default();
        assert_eq!(analyzer.classify(&[5.0, -1.0, 3.0]), Trend::Stable);
        assert_eq!(analyzer.classify(&[2.0, 2.0]), Trend::Stable);
        assert_eq!(analyzer.classify(&[]), Trend::Stable);
        assert_eq!(analyzer.classify(&[-2.5, -40.0]), Trend::Decreasing);
        assert_eq!(analyzer.classify(&[1.0, -16.0]), Trend::Fluctuating);
    }

    #[test]
    fn test_single_month_is_stable() {
        let txs = expenses(&[(10.0, "2024-05-01"), (15.0, "2024-05-20")]);
        let report = TrendAnalyzer::default().analyze(&txs).unwrap();

        assert!(report.change_rates.is_empty());
        assert_eq!(report.trend, Trend::Stable);
        assert_eq!(report.monthly_totals["2024-05"], 25.0);
    }

    #[test]
    fn test_zero_month_transition_is_skipped() {
        let txs = expenses(&[
            (0.0, "2024-01-05"),
            (50.0, "2024-02-05"),
            (100.0, "2024-03-05"),
        ]);
        let report = TrendAnalyzer::default().analyze(&txs).unwrap();

        assert_eq!(report.monthly_totals.len(), 3);
        assert_eq!(report.change_rates, vec![100.0]);
    }

    #[test]
    fn test_income_is_ignored() {
        let mut txs = expenses(&[(100.0, "2024-01-10"), (100.0, "2024-02-10")]);
        txs.push(Transaction::income(5000.0, "Salary", "2024-02-01").unwrap());

        let report = TrendAnalyzer::default().analyze(&txs).unwrap();
        assert_eq!(report.change_rates, vec![0.0]);
        assert_eq!(report.trend, Trend::Stable);
    }

    #[test]
    fn test_no_expenses_fails() {
        let txs = vec![Transaction::income(5000.0, "Salary", "2024-02-01").unwrap()];
        assert!(matches!(
            TrendAnalyzer::default().analyze(&txs),
            Err(Error::NoExpenseData)
        ));
    }

    #[test]
    fn test_months_sort_across_years() {
        let txs = expenses(&[(50.0, "2024-01-02"), (100.0, "2023-12-30")]);
        let report = TrendAnalyzer::default().analyze(&txs).unwrap();

        assert_eq!(report.change_rates, vec![-50.0]);
    }
}
