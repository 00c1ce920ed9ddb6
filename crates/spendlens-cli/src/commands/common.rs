//! Shared command utilities

use std::fs::File;
use std::path::Path;

use anyhow::{Context as _, Result};
use serde::Serialize;
use spendlens_core::import::{parse_records, InputFormat};
use spendlens_core::{
    filter_by_date_strings, EngineConfig, SpendingEngine, Transaction, TransactionRecord,
};
use tracing::debug;

use crate::cli::DateRange;

/// Global options shared by every command
#[derive(Debug, Clone, Copy, Default)]
pub struct Context<'a> {
    pub config: Option<&'a Path>,
    pub input: Option<&'a Path>,
    pub json: bool,
}

impl<'a> Context<'a> {
    pub fn load_config(&self) -> Result<EngineConfig> {
        EngineConfig::load(self.config).context("Failed to load engine config")
    }

    pub fn engine(&self) -> Result<SpendingEngine> {
        SpendingEngine::with_config(self.load_config()?).context("Invalid engine config")
    }

    /// Raw records from the `--input` file
    pub fn records(&self) -> Result<Vec<TransactionRecord>> {
        let path = self
            .input
            .ok_or_else(|| anyhow::anyhow!("No input file. Pass --input <file.csv|file.json>"))?;

        let format = InputFormat::from_path(path)?;
        let file = File::open(path)
            .with_context(|| format!("Failed to open input file: {}", path.display()))?;
        let records = parse_records(file, format)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        debug!(path = %path.display(), records = records.len(), "Loaded input");
        Ok(records)
    }

    /// Validated transactions from `--input`, restricted to `range`
    pub fn transactions(
        &self,
        engine: &SpendingEngine,
        range: &DateRange,
    ) -> Result<Vec<Transaction>> {
        let records = self.records()?;
        let transactions = engine
            .normalize_records(&records)
            .context("Input contains an invalid transaction")?;

        filter_by_date_strings(&transactions, range.from.as_deref(), range.to.as_deref())
            .context("Invalid --from/--to date")
    }
}

/// Print a value as pretty JSON on stdout
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}

/// Format an amount as dollars
pub fn money(amount: f64) -> String {
    format!("${:.2}", amount)
}
