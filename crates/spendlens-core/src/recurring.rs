//! Recurring charge detection
//!
//! Finds merchants that charge on a regular cadence (subscriptions, rent,
//! memberships) from nothing but the description text and payment dates:
//! - Expenses are grouped by normalized merchant key
//! - Day gaps between consecutive charges are clustered within a tolerance
//! - The most populated cluster is the merchant's cadence

use std::collections::HashMap;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::dates::parse_date;
use crate::error::{Error, Result};
use crate::models::{round_cents, RecurrenceFinding, Transaction, TransactionKind, TransactionRecord};
use crate::text::normalize_text;

/// What to do with a record that cannot be validated during a scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordPolicy {
    /// Skip the record and keep scanning
    #[default]
    Skip,
    /// Fail the whole pass on the first bad record
    Abort,
}

/// Detection configuration
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionConfig {
    /// Minimum number of charges for a merchant to count as recurring
    pub min_occurrences: usize,
    /// Maximum difference (days) for two gaps to count as the same cadence
    pub tolerance_days: i64,
    /// Handling of malformed raw records
    pub record_policy: RecordPolicy,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            min_occurrences: 3,
            tolerance_days: 4,
            record_policy: RecordPolicy::Skip,
        }
    }
}

/// One charge in a merchant's history
#[derive(Debug, Clone, Copy)]
struct ChargeEvent {
    date: NaiveDate,
    amount: f64,
}

/// Charges grouped by merchant key, in first-seen merchant order
#[derive(Debug, Default)]
struct MerchantSeries {
    index: HashMap<String, usize>,
    series: Vec<(String, Vec<ChargeEvent>)>,
}

impl MerchantSeries {
    fn push(&mut self, merchant: String, event: ChargeEvent) {
        match self.index.get(&merchant) {
            Some(&i) => self.series[i].1.push(event),
            None => {
                self.index.insert(merchant.clone(), self.series.len());
                self.series.push((merchant, vec![event]));
            }
        }
    }
}

/// Detects merchants that charge on a regular cadence
#[derive(Debug, Clone, Default)]
pub struct RecurrenceDetector {
    config: DetectionConfig,
}

impl RecurrenceDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: DetectionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    /// Detect recurring charges in validated transactions
    pub fn detect(&self, transactions: &[Transaction]) -> Result<Vec<RecurrenceFinding>> {
        self.validate_config()?;

        let mut series = MerchantSeries::default();
        for tx in transactions {
            if let Some((merchant, event)) = charge_event(tx.kind, tx.amount, &tx.description, tx.date)
            {
                series.push(merchant, event);
            }
        }

        Ok(self.findings(series))
    }

    /// Detect recurring charges in raw records.
    ///
    /// Records that fail validation are handled per [`RecordPolicy`]: skipped
    /// (and logged) by default, or fatal to the call under `Abort`.
    pub fn detect_records(&self, records: &[TransactionRecord]) -> Result<Vec<RecurrenceFinding>> {
        self.validate_config()?;

        let mut series = MerchantSeries::default();
        let mut skipped = 0usize;

        for (i, record) in records.iter().enumerate() {
            match record_event(record) {
                Ok(Some((merchant, event))) => series.push(merchant, event),
                Ok(None) => {}
                Err(e) => match self.config.record_policy {
                    RecordPolicy::Skip => {
                        debug!(record = i, error = %e, "Skipping malformed record");
                        skipped += 1;
                    }
                    RecordPolicy::Abort => return Err(e),
                },
            }
        }

        if skipped > 0 {
            info!(skipped, total = records.len(), "Skipped malformed records during detection");
        }

        Ok(self.findings(series))
    }

    fn validate_config(&self) -> Result<()> {
        if self.config.tolerance_days < 0 {
            return Err(Error::InvalidInput(format!(
                "tolerance_days must be non-negative, got {}",
                self.config.tolerance_days
            )));
        }
        Ok(())
    }

    fn findings(&self, series: MerchantSeries) -> Vec<RecurrenceFinding> {
        let merchant_count = series.series.len();
        let mut findings: Vec<RecurrenceFinding> = series
            .series
            .into_iter()
            .filter_map(|(merchant, events)| self.evaluate_merchant(merchant, events))
            .collect();

        // Most occurrences first, then larger amounts; stable for full ties
        findings.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| b.average_amount.total_cmp(&a.average_amount))
        });

        info!(
            merchants = merchant_count,
            recurring = findings.len(),
            "Recurrence detection complete"
        );

        findings
    }

    fn evaluate_merchant(
        &self,
        merchant: String,
        mut events: Vec<ChargeEvent>,
    ) -> Option<RecurrenceFinding> {
        let min_occurrences = self.config.min_occurrences;
        if events.len() < min_occurrences {
            return None;
        }

        events.sort_by_key(|e| e.date);
        let gaps: Vec<i64> = events
            .windows(2)
            .map(|w| (w[1].date - w[0].date).num_days())
            .collect();

        let (cadence, count) = dominant_cadence(&gaps, self.config.tolerance_days)?;
        // `count` gaps imply `count + 1` charges
        if count + 1 < min_occurrences {
            debug!(
                merchant = merchant.as_str(),
                cadence, count, "No cadence with enough charges"
            );
            return None;
        }

        let last = events.last()?;
        let last_date = last.date;
        let next_expected_date = last_date.checked_add_signed(Duration::days(cadence))?;
        let average_amount =
            round_cents(events.iter().map(|e| e.amount).sum::<f64>() / events.len() as f64);

        debug!(
            merchant = merchant.as_str(),
            charges = events.len(),
            cadence,
            "Found recurring charge"
        );

        Some(RecurrenceFinding {
            merchant,
            count: events.len(),
            average_amount,
            cadence_days: cadence,
            last_date,
            next_expected_date,
        })
    }
}

/// Cluster gaps greedily and return the most populated `(representative, count)`.
///
/// Each gap joins the first existing representative within `tolerance` (in
/// the order representatives were created), otherwise it starts a new one.
/// The result depends on gap order and is not a nearest-match clustering.
/// Ties go to the earliest representative. `None` when there are no gaps.
pub fn dominant_cadence(gaps: &[i64], tolerance: i64) -> Option<(i64, usize)> {
    let mut clusters: Vec<(i64, usize)> = Vec::new();

    for &gap in gaps {
        match clusters
            .iter_mut()
            .find(|(rep, _)| (gap - *rep).abs() <= tolerance)
        {
            Some((_, count)) => *count += 1,
            None => clusters.push((gap, 1)),
        }
    }

    let mut best: Option<(i64, usize)> = None;
    for (rep, count) in clusters {
        if best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((rep, count));
        }
    }
    best
}

/// Merchant key and charge for a transaction, if it can take part in detection
fn charge_event(
    kind: TransactionKind,
    amount: f64,
    description: &str,
    date: NaiveDate,
) -> Option<(String, ChargeEvent)> {
    if kind != TransactionKind::Expense || amount <= 0.0 {
        return None;
    }
    let merchant = normalize_text(description);
    if merchant.is_empty() {
        return None;
    }
    Some((merchant, ChargeEvent { date, amount }))
}

/// Validate just enough of a raw record to place it in a merchant series
fn record_event(record: &TransactionRecord) -> Result<Option<(String, ChargeEvent)>> {
    let kind: TransactionKind = record.kind.parse()?;
    if kind != TransactionKind::Expense {
        return Ok(None);
    }
    let amount = record.amount()?;
    if !amount.is_finite() {
        return Err(Error::InvalidInput(format!(
            "amount must be a finite number, got {}",
            amount
        )));
    }
    let date = parse_date(&record.date)?;
    Ok(charge_event(kind, amount, &record.description, date))
}
