//! Spendlens CLI - Spending analytics engine
//!
//! Usage:
//!   spendlens -i ledger.csv totals           Expense totals per category
//!   spendlens -i ledger.csv budget           Budget status against config limits
//!   spendlens -i ledger.csv recurring        Detect recurring charges
//!   spendlens categorize "Starbucks #123"    Categorize a single description

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;
use commands::Context;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr).compact())
        .init();

    let ctx = Context {
        config: cli.config.as_deref(),
        input: cli.input.as_deref(),
        json: cli.json,
    };

    match cli.command {
        Commands::Categorize { text } => commands::cmd_categorize(&ctx, &text),
        Commands::Keywords { text, top_k } => commands::cmd_keywords(&ctx, &text, top_k),
        Commands::Totals { range } => commands::cmd_totals(&ctx, &range),
        Commands::Spent { range } => commands::cmd_spent(&ctx, &range),
        Commands::Average { category, range } => {
            commands::cmd_average(&ctx, category.as_deref(), &range)
        }
        Commands::Balance { range } => commands::cmd_balance(&ctx, &range),
        Commands::Budget { range } => commands::cmd_budget(&ctx, &range),
        Commands::Trends => commands::cmd_trends(&ctx),
        Commands::Recurring {
            min_occurrences,
            tolerance_days,
        } => commands::cmd_recurring(&ctx, min_occurrences, tolerance_days),
        Commands::Month { month } => commands::cmd_month(&ctx, &month),
        Commands::Search { query } => commands::cmd_search(&ctx, &query),
        Commands::Top { n, range } => commands::cmd_top(&ctx, n, &range),
    }
}
