//! Spending engine - one entry point over the analysis components
//!
//! Owns the loaded [`EngineConfig`] and a [`Categorizer`] built from its
//! category table, and runs each component with the configured settings.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::{debug, info};

use crate::aggregate::{filter_by_date_range, Aggregator};
use crate::budget::BudgetEvaluator;
use crate::categorize::Categorizer;
use crate::config::EngineConfig;
use crate::dates::{month_bounds, month_key};
use crate::error::Result;
use crate::models::{
    round_cents, BudgetLimits, BudgetStatus, CategoryTotals, MonthSummary, RecurrenceFinding,
    Transaction, TransactionRecord, TrendReport,
};
use crate::recurring::RecurrenceDetector;
use crate::trends::TrendAnalyzer;

#[derive(Debug, Clone)]
pub struct SpendingEngine {
    config: EngineConfig,
    categorizer: Categorizer,
    budget: BudgetEvaluator,
}

impl Default for SpendingEngine {
    fn default() -> Self {
        let config = EngineConfig::default();
        Self {
            categorizer: Categorizer::new(config.categories.clone()),
            budget: BudgetEvaluator::default(),
            config,
        }
    }
}

impl SpendingEngine {
    /// Engine with the built-in defaults and no budget limits
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EngineConfig) -> Result<Self> {
        let budget = BudgetEvaluator::new(config.warning_threshold)?;
        Ok(Self {
            categorizer: Categorizer::new(config.categories.clone()),
            budget,
            config,
        })
    }

    /// Load config (explicit path, data-dir override, or embedded) and build
    pub fn from_config_path(path: Option<&Path>) -> Result<Self> {
        Self::with_config(EngineConfig::load(path)?)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn categorizer(&self) -> &Categorizer {
        &self.categorizer
    }

    fn aggregator(&self) -> Aggregator<'_> {
        Aggregator::new(&self.categorizer)
    }

    /// Validate raw records, failing on the first bad one
    pub fn normalize_records(&self, records: &[TransactionRecord]) -> Result<Vec<Transaction>> {
        let transactions = records
            .iter()
            .map(Transaction::try_from)
            .collect::<Result<Vec<_>>>()?;

        debug!(count = transactions.len(), "Normalized transaction records");
        Ok(transactions)
    }

    pub fn categorize<'a>(&'a self, description: &str) -> &'a str {
        self.categorizer.categorize(description)
    }

    pub fn totals_by_category(&self, transactions: &[Transaction]) -> CategoryTotals {
        self.aggregator().totals_by_category(transactions)
    }

    pub fn total_spent(&self, transactions: &[Transaction]) -> Result<f64> {
        self.aggregator().total_spent(transactions)
    }

    pub fn average_spending(
        &self,
        transactions: &[Transaction],
        category: Option<&str>,
    ) -> Result<f64> {
        self.aggregator().average_spending(transactions, category)
    }

    pub fn top_categories(&self, transactions: &[Transaction], n: usize) -> Vec<(String, f64)> {
        self.aggregator().top_categories(transactions, n)
    }

    /// Budget status against `limits`, or the configured limits when `None`
    pub fn budget_status(
        &self,
        totals: &CategoryTotals,
        limits: Option<&BudgetLimits>,
    ) -> BTreeMap<String, BudgetStatus> {
        self.budget.evaluate(totals, limits.unwrap_or(&self.config.limits))
    }

    pub fn trends(&self, transactions: &[Transaction]) -> Result<TrendReport> {
        TrendAnalyzer::new(self.config.trends).analyze(transactions)
    }

    pub fn recurring(&self, transactions: &[Transaction]) -> Result<Vec<RecurrenceFinding>> {
        self.detector().detect(transactions)
    }

    /// Recurring detection straight from raw records, honoring the
    /// configured record policy
    pub fn recurring_records(
        &self,
        records: &[TransactionRecord],
    ) -> Result<Vec<RecurrenceFinding>> {
        self.detector().detect_records(records)
    }

    fn detector(&self) -> RecurrenceDetector {
        RecurrenceDetector::with_config(self.config.detection.clone())
    }

    /// Category totals and budget status for a single calendar month
    pub fn month_summary(
        &self,
        transactions: &[Transaction],
        year: i32,
        month: u32,
        limits: Option<&BudgetLimits>,
    ) -> Result<MonthSummary> {
        let (first, last) = month_bounds(year, month)?;
        let in_month = filter_by_date_range(transactions, Some(first), Some(last));

        let totals = self.totals_by_category(&in_month);
        let budget_status = self.budget_status(&totals, limits);

        info!(
            month = %month_key(first),
            transactions = in_month.len(),
            categories = totals.len(),
            "Built month summary"
        );

        Ok(MonthSummary {
            month: month_key(first),
            totals,
            budget_status,
        })
    }

    /// Income minus expenses, rounded to cents
    pub fn net_balance(&self, transactions: &[Transaction]) -> f64 {
        round_cents(transactions.iter().map(Transaction::signed_amount).sum())
    }
}
