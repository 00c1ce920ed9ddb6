//! Recurring charge command

use anyhow::{Context as _, Result};
use spendlens_core::{RecurrenceFinding, SpendingEngine};

use super::{money, print_json, truncate, Context};

/// Detect recurring charges straight from the input records.
///
/// Malformed records are skipped or fatal according to the configured
/// `record_policy`.
pub fn cmd_recurring(
    ctx: &Context,
    min_occurrences: Option<usize>,
    tolerance_days: Option<i64>,
) -> Result<()> {
    let mut config = ctx.load_config()?;
    if let Some(min) = min_occurrences {
        config.detection.min_occurrences = min;
    }
    if let Some(tolerance) = tolerance_days {
        config.detection.tolerance_days = tolerance;
    }
    let engine = SpendingEngine::with_config(config).context("Invalid engine config")?;

    let records = ctx.records()?;
    let findings = engine
        .recurring_records(&records)
        .context("Recurring detection failed")?;

    if ctx.json {
        return print_json(&findings);
    }

    print_findings(&findings);
    Ok(())
}

fn print_findings(findings: &[RecurrenceFinding]) {
    if findings.is_empty() {
        println!("No recurring charges found.");
        return;
    }

    println!();
    println!("🔁 Recurring Charges");
    println!("   ─────────────────────────────────────────────────────────────────────");

    for f in findings {
        println!(
            "   {:24} │ {:>2}× {:>9} │ every {:>3}d │ last {} │ next {}",
            truncate(&f.merchant, 24),
            f.count,
            money(f.average_amount),
            f.cadence_days,
            f.last_date,
            f.next_expected_date
        );
    }
}
