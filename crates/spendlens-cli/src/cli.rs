//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Spendlens - Understand where the money goes
#[derive(Parser)]
#[command(name = "spendlens")]
#[command(about = "Spending analytics over CSV or JSON transaction lists", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Engine config file (TOML)
    ///
    /// Defaults to ~/.local/share/spendlens/config/spendlens.toml when it
    /// exists, otherwise the built-in configuration.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Transactions file (.csv or .json)
    #[arg(short, long, global = true)]
    pub input: Option<PathBuf>,

    /// Print machine-readable JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the category a description falls into
    Categorize {
        /// Transaction description
        text: String,
    },

    /// Extract the most frequent keywords from a description
    Keywords {
        /// Transaction description
        text: String,

        /// Number of keywords to return
        #[arg(short = 'k', long, default_value = "5")]
        top_k: usize,
    },

    /// Expense totals per category
    Totals {
        #[command(flatten)]
        range: DateRange,
    },

    /// Total spending across all expenses
    Spent {
        #[command(flatten)]
        range: DateRange,
    },

    /// Average expense amount
    Average {
        /// Restrict to one category
        #[arg(short, long)]
        category: Option<String>,

        #[command(flatten)]
        range: DateRange,
    },

    /// Income minus expenses
    Balance {
        #[command(flatten)]
        range: DateRange,
    },

    /// Compare category spending with the configured budget limits
    Budget {
        #[command(flatten)]
        range: DateRange,
    },

    /// Month-over-month spending trend
    Trends,

    /// Detect recurring charges (subscriptions, rent, memberships)
    Recurring {
        /// Minimum charges for a merchant to count as recurring
        #[arg(long)]
        min_occurrences: Option<usize>,

        /// Days two gaps may differ and still share a cadence
        #[arg(long)]
        tolerance_days: Option<i64>,
    },

    /// Category totals and budget status for one month
    Month {
        /// Month as YYYY-MM
        month: String,
    },

    /// Find transactions whose description contains a query
    Search {
        /// Case-insensitive text to look for
        query: String,
    },

    /// Largest spending categories
    Top {
        /// Number of categories to show
        #[arg(short, default_value = "3")]
        n: usize,

        #[command(flatten)]
        range: DateRange,
    },
}

/// Inclusive date bounds, in any supported date format
#[derive(clap::Args, Debug, Clone, Default)]
pub struct DateRange {
    /// Start date (inclusive)
    #[arg(long)]
    pub from: Option<String>,

    /// End date (inclusive)
    #[arg(long)]
    pub to: Option<String>,
}
