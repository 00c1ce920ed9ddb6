//! Report command implementations

use std::collections::BTreeMap;

use anyhow::{Context as _, Result};
use serde_json::json;
use spendlens_core::{parse_month, search, BudgetState, BudgetStatus, CategoryTotals, Trend};

use super::{money, print_json, truncate, Context};
use crate::cli::DateRange;

pub fn cmd_totals(ctx: &Context, range: &DateRange) -> Result<()> {
    let engine = ctx.engine()?;
    let transactions = ctx.transactions(&engine, range)?;
    let totals = engine.totals_by_category(&transactions);

    if ctx.json {
        return print_json(&totals);
    }

    print_totals("📊 Spending by Category", &totals);
    Ok(())
}

pub fn cmd_spent(ctx: &Context, range: &DateRange) -> Result<()> {
    let engine = ctx.engine()?;
    let transactions = ctx.transactions(&engine, range)?;
    let total = engine.total_spent(&transactions)?;

    if ctx.json {
        return print_json(&json!({ "total_spent": total }));
    }

    println!("Total spent: {}", money(total));
    Ok(())
}

pub fn cmd_average(ctx: &Context, category: Option<&str>, range: &DateRange) -> Result<()> {
    let engine = ctx.engine()?;
    let transactions = ctx.transactions(&engine, range)?;
    let average = engine.average_spending(&transactions, category)?;

    if ctx.json {
        return print_json(&json!({ "category": category, "average": average }));
    }

    match category {
        Some(c) => println!("Average {} expense: {}", c, money(average)),
        None => println!("Average expense: {}", money(average)),
    }
    Ok(())
}

pub fn cmd_balance(ctx: &Context, range: &DateRange) -> Result<()> {
    let engine = ctx.engine()?;
    let transactions = ctx.transactions(&engine, range)?;
    let balance = engine.net_balance(&transactions);

    if ctx.json {
        return print_json(&json!({ "net_balance": balance }));
    }

    println!("Net balance: {}", money(balance));
    Ok(())
}

pub fn cmd_budget(ctx: &Context, range: &DateRange) -> Result<()> {
    let engine = ctx.engine()?;
    let transactions = ctx.transactions(&engine, range)?;
    let totals = engine.totals_by_category(&transactions);
    let status = engine.budget_status(&totals, None);

    if ctx.json {
        return print_json(&status);
    }

    if status.is_empty() {
        println!("No budget limits configured. Add a [budget.limits] table to your config.");
        return Ok(());
    }

    print_budget(&status);
    Ok(())
}

pub fn cmd_trends(ctx: &Context) -> Result<()> {
    let engine = ctx.engine()?;
    let transactions = ctx.transactions(&engine, &DateRange::default())?;
    let report = engine.trends(&transactions)?;

    if ctx.json {
        return print_json(&report);
    }

    let icon = match report.trend {
        Trend::Increasing => "📈",
        Trend::Decreasing => "📉",
        Trend::Fluctuating => "〰️",
        Trend::Stable => "➡️",
    };

    println!();
    println!("{} Spending trend: {}", icon, report.trend);
    println!("   ─────────────────────────────");
    for (month, total) in &report.monthly_totals {
        println!("   {} │ {:>12}", month, money(*total));
    }
    if !report.change_rates.is_empty() {
        let rates: Vec<String> = report
            .change_rates
            .iter()
            .map(|r| format!("{:+.2}%", r))
            .collect();
        println!("   Change: {}", rates.join(", "));
    }
    Ok(())
}

pub fn cmd_month(ctx: &Context, month: &str) -> Result<()> {
    let (year, month) = parse_month(month).context("Invalid month (use YYYY-MM)")?;

    let engine = ctx.engine()?;
    let transactions = ctx.transactions(&engine, &DateRange::default())?;
    let summary = engine.month_summary(&transactions, year, month, None)?;

    if ctx.json {
        return print_json(&summary);
    }

    print_totals(&format!("📅 {}", summary.month), &summary.totals);
    if !summary.budget_status.is_empty() {
        print_budget(&summary.budget_status);
    }
    Ok(())
}

pub fn cmd_top(ctx: &Context, n: usize, range: &DateRange) -> Result<()> {
    let engine = ctx.engine()?;
    let transactions = ctx.transactions(&engine, range)?;
    let top = engine.top_categories(&transactions, n);

    if ctx.json {
        let rows: Vec<_> = top
            .iter()
            .map(|(category, total)| json!({ "category": category, "total": total }))
            .collect();
        return print_json(&rows);
    }

    if top.is_empty() {
        println!("No expenses found.");
        return Ok(());
    }

    for (i, (category, total)) in top.iter().enumerate() {
        println!("{:>2}. {:20} {:>12}", i + 1, category, money(*total));
    }
    Ok(())
}

pub fn cmd_search(ctx: &Context, query: &str) -> Result<()> {
    let engine = ctx.engine()?;
    let transactions = ctx.transactions(&engine, &DateRange::default())?;
    let found = search(&transactions, query);

    if ctx.json {
        return print_json(&found);
    }

    if found.is_empty() {
        println!("No transactions match {:?}.", query);
        return Ok(());
    }

    for tx in &found {
        println!(
            "{} │ {:7} │ {:30} │ {:>10} │ {}",
            tx.date,
            tx.kind.as_str(),
            truncate(&tx.description, 30),
            money(tx.amount),
            engine.categorize(&tx.description)
        );
    }
    Ok(())
}

fn print_totals(title: &str, totals: &CategoryTotals) {
    if totals.is_empty() {
        println!("No expenses found.");
        return;
    }

    println!();
    println!("{}", title);
    println!("   ───────────────────────────────");
    for (category, total) in totals {
        println!("   {:16} │ {:>12}", category, money(*total));
    }
}

fn print_budget(status: &BTreeMap<String, BudgetStatus>) {
    println!();
    println!("💰 Budget");
    println!("   ──────────────────────────────────────────────────────────────");

    for (category, s) in status {
        let icon = match s.status {
            BudgetState::Under => "✅",
            BudgetState::Approaching => "⚠️",
            BudgetState::Exceeded => "🚨",
        };
        println!(
            "   {} {:16} │ {:>10} of {:>10} │ {:>6.1}% │ {:>10} left",
            icon,
            category,
            money(s.spent),
            money(s.limit),
            s.percent_used,
            money(s.remaining)
        );
    }
}
