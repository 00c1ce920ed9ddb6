//! Domain models for Spendlens

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::dates::parse_date;
use crate::error::{Error, Result};

/// Direction of money for a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Expense,
    Income,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Expense => "expense",
            Self::Income => "income",
        }
    }
}

impl std::str::FromStr for TransactionKind {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "expense" => Ok(Self::Expense),
            "income" => Ok(Self::Income),
            _ => Err(Error::InvalidInput(format!(
                "transaction kind must be 'expense' or 'income', got {:?}",
                s
            ))),
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A transaction as handed over by a collaborator, before validation
///
/// The date may be in any format accepted by [`parse_date`]. The amount is
/// kept as text so a single unreadable amount fails that record, not the
/// whole input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    #[serde(alias = "type")]
    pub kind: String,
    #[serde(deserialize_with = "amount_text")]
    pub amount: String,
    #[serde(default)]
    pub description: String,
    pub date: String,
}

impl TransactionRecord {
    pub fn new(
        kind: impl Into<String>,
        amount: impl ToString,
        description: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self {
            kind: kind.into(),
            amount: amount.to_string(),
            description: description.into(),
            date: date.into(),
        }
    }

    /// Parsed amount. Range checks happen in [`Transaction::new`].
    pub fn amount(&self) -> Result<f64> {
        self.amount.trim().parse::<f64>().map_err(|_| {
            Error::InvalidInput(format!("amount must be a number, got {:?}", self.amount))
        })
    }
}

/// Accept an amount written as a number, a string, or nothing at all
fn amount_text<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    struct AmountText;

    impl<'de> Visitor<'de> for AmountText {
        type Value = String;

        fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
            f.write_str("an amount")
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> std::result::Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_unit<E: de::Error>(self) -> std::result::Result<String, E> {
            Ok(String::new())
        }

        fn visit_none<E: de::Error>(self) -> std::result::Result<String, E> {
            Ok(String::new())
        }
    }

    deserializer.deserialize_any(AmountText)
}

/// A validated financial transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub kind: TransactionKind,
    /// Always finite and >= 0; direction comes from `kind`
    pub amount: f64,
    pub description: String,
    pub date: NaiveDate,
}

impl Transaction {
    pub fn new(
        kind: TransactionKind,
        amount: f64,
        description: impl Into<String>,
        date: NaiveDate,
    ) -> Result<Self> {
        if !amount.is_finite() {
            return Err(Error::InvalidInput(format!(
                "amount must be a finite number, got {}",
                amount
            )));
        }
        if amount < 0.0 {
            return Err(Error::InvalidInput(format!(
                "amount must be non-negative, got {}",
                amount
            )));
        }

        Ok(Self {
            kind,
            amount,
            description: description.into().trim().to_string(),
            date,
        })
    }

    /// Shorthand for an expense with an ISO or otherwise parseable date
    pub fn expense(amount: f64, description: &str, date: &str) -> Result<Self> {
        Self::new(TransactionKind::Expense, amount, description, parse_date(date)?)
    }

    /// Shorthand for an income with an ISO or otherwise parseable date
    pub fn income(amount: f64, description: &str, date: &str) -> Result<Self> {
        Self::new(TransactionKind::Income, amount, description, parse_date(date)?)
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionKind::Expense
    }

    /// Contribution to a running balance: expenses negative, income positive
    pub fn signed_amount(&self) -> f64 {
        match self.kind {
            TransactionKind::Expense => -self.amount,
            TransactionKind::Income => self.amount,
        }
    }
}

impl TryFrom<&TransactionRecord> for Transaction {
    type Error = Error;

    fn try_from(record: &TransactionRecord) -> Result<Self> {
        let kind = record.kind.parse()?;
        let amount = record.amount()?;
        let date = parse_date(&record.date)?;
        Transaction::new(kind, amount, record.description.as_str(), date)
    }
}

/// Category label -> accumulated expense amount
pub type CategoryTotals = BTreeMap<String, f64>;

/// Category label -> configured spending limit
pub type BudgetLimits = BTreeMap<String, f64>;

/// Where a category stands against its limit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetState {
    Under,
    Approaching,
    Exceeded,
}

impl BudgetState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Under => "under",
            Self::Approaching => "approaching",
            Self::Exceeded => "exceeded",
        }
    }
}

impl std::fmt::Display for BudgetState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Budget comparison for a single category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetStatus {
    pub spent: f64,
    pub limit: f64,
    /// 0-100+, zero when the limit is not positive
    pub percent_used: f64,
    /// Never negative
    pub remaining: f64,
    pub status: BudgetState,
}

/// Overall direction of month-over-month spending
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Increasing,
    Decreasing,
    Fluctuating,
    Stable,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Increasing => "increasing",
            Self::Decreasing => "decreasing",
            Self::Fluctuating => "fluctuating",
            Self::Stable => "stable",
        }
    }
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendReport {
    /// "YYYY-MM" -> total expenses, chronological
    pub monthly_totals: BTreeMap<String, f64>,
    pub trend: Trend,
    /// Percentage change between consecutive months
    pub change_rates: Vec<f64>,
}

/// A merchant that charges on a regular cadence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurrenceFinding {
    /// Normalized merchant key
    pub merchant: String,
    pub count: usize,
    pub average_amount: f64,
    pub cadence_days: i64,
    pub last_date: NaiveDate,
    pub next_expected_date: NaiveDate,
}

/// Category totals and budget standing for one calendar month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthSummary {
    pub month: String,
    pub totals: CategoryTotals,
    pub budget_status: BTreeMap<String, BudgetStatus>,
}

/// Round to cents on the exact decimal value of `value`.
///
/// Only values that are exact binary ties (like -3.125) go to even; 1.115 is
/// stored as 1.11499.. and rounds down.
pub(crate) fn round_cents(value: f64) -> f64 {
    format!("{:.2}", value).parse().unwrap_or(value)
}
