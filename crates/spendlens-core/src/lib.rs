//! Spendlens Core Library
//!
//! Spending analytics over plain transaction lists:
//! - Text and date normalization
//! - Keyword categorization with an ordered, configurable category table
//! - Category totals, averages and date filtering
//! - Budget-vs-actual evaluation
//! - Month-over-month trend classification
//! - Recurring charge detection from description and date alone
//! - CSV/JSON record input and TOML engine configuration

pub mod aggregate;
pub mod budget;
pub mod categorize;
pub mod config;
pub mod dates;
pub mod engine;
pub mod error;
pub mod import;
pub mod models;
pub mod recurring;
pub mod text;
pub mod trends;

pub use aggregate::{filter_by_date_range, filter_by_date_strings, search, Aggregator};
pub use budget::{BudgetEvaluator, DEFAULT_WARNING_THRESHOLD};
pub use categorize::{CategoryRule, CategoryTable, Categorizer, OTHER_CATEGORY};
pub use config::EngineConfig;
pub use dates::{month_bounds, month_key, parse_date, parse_month};
pub use engine::SpendingEngine;
pub use error::{Error, Result};
pub use import::{parse_csv, parse_json, parse_records, InputFormat};
pub use models::{
    BudgetLimits, BudgetState, BudgetStatus, CategoryTotals, MonthSummary, RecurrenceFinding,
    Transaction, TransactionKind, TransactionRecord, Trend, TrendReport,
};
pub use recurring::{dominant_cadence, DetectionConfig, RecordPolicy, RecurrenceDetector};
pub use text::{extract_keywords, normalize_text};
pub use trends::{TrendAnalyzer, TrendThresholds};
