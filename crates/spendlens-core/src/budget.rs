//! Budget-vs-actual comparison

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{round_cents, BudgetLimits, BudgetState, BudgetStatus, CategoryTotals};

/// Fraction of a limit at which a category is flagged as approaching
pub const DEFAULT_WARNING_THRESHOLD: f64 = 0.9;

/// Compares category totals against configured limits
#[derive(Debug, Clone, Copy)]
pub struct BudgetEvaluator {
    warning_threshold: f64,
}

impl Default for BudgetEvaluator {
    fn default() -> Self {
        Self {
            warning_threshold: DEFAULT_WARNING_THRESHOLD,
        }
    }
}

impl BudgetEvaluator {
    pub fn new(warning_threshold: f64) -> Result<Self> {
        if !warning_threshold.is_finite() || warning_threshold < 0.0 {
            return Err(Error::InvalidInput(format!(
                "warning threshold must be a non-negative number, got {}",
                warning_threshold
            )));
        }
        Ok(Self { warning_threshold })
    }

    pub fn warning_threshold(&self) -> f64 {
        self.warning_threshold
    }

    /// Status for every category that has a limit.
    ///
    /// Categories with spending but no limit are left out of the result, and a
    /// limited category with no spending reports zero spent.
    pub fn evaluate(
        &self,
        totals: &CategoryTotals,
        limits: &BudgetLimits,
    ) -> BTreeMap<String, BudgetStatus> {
        let mut result = BTreeMap::new();

        for (category, &limit) in limits {
            let spent = totals.get(category).copied().unwrap_or(0.0);
            let status = self.status_for(spent, limit);

            if status.status != BudgetState::Under {
                debug!(
                    category = category.as_str(),
                    spent,
                    limit,
                    status = status.status.as_str(),
                    "Budget needs attention"
                );
            }

            result.insert(category.clone(), status);
        }

        result
    }

    /// Status of a single spent/limit pair
    pub fn status_for(&self, spent: f64, limit: f64) -> BudgetStatus {
        let percent_used = if limit > 0.0 {
            spent / limit * 100.0
        } else {
            0.0
        };

        // A non-positive limit means any spending at all is over budget
        let status = if spent > limit {
            BudgetState::Exceeded
        } else if limit > 0.0 && spent >= self.warning_threshold * limit {
            BudgetState::Approaching
        } else {
            BudgetState::Under
        };

        BudgetStatus {
            spent: round_cents(spent),
            limit,
            percent_used: round_cents(percent_used),
            remaining: round_cents((limit - spent).max(0.0)),
            status,
        }
    }
}
