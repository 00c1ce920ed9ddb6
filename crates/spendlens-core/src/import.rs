//! Transaction record input (CSV and JSON)
//!
//! Both formats produce raw [`TransactionRecord`]s. Validation of kind, amount
//! and date happens later, when records become [`Transaction`]s.
//!
//! [`Transaction`]: crate::models::Transaction

use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::TransactionRecord;

/// Supported input formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Csv,
    Json,
}

impl InputFormat {
    /// Pick a format from a file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("csv") => Ok(Self::Csv),
            Some("json") => Ok(Self::Json),
            _ => Err(Error::InvalidInput(format!(
                "cannot infer input format from {}; expected .csv or .json",
                path.display()
            ))),
        }
    }
}

/// Parse records from a reader in the given format
pub fn parse_records<R: Read>(reader: R, format: InputFormat) -> Result<Vec<TransactionRecord>> {
    match format {
        InputFormat::Csv => parse_csv(reader),
        InputFormat::Json => parse_json(reader),
    }
}

/// Parse CSV with a header row.
///
/// Columns are matched by name: `kind` (or `type`), `amount`, `description`
/// and `date`. Column order does not matter and extra columns are ignored.
pub fn parse_csv<R: Read>(reader: R) -> Result<Vec<TransactionRecord>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    for result in rdr.deserialize() {
        let record: TransactionRecord = result?;
        records.push(record);
    }

    debug!(records = records.len(), "Parsed CSV records");
    Ok(records)
}

/// Parse a JSON array of record objects
pub fn parse_json<R: Read>(reader: R) -> Result<Vec<TransactionRecord>> {
    let records: Vec<TransactionRecord> = serde_json::from_reader(reader)?;
    debug!(records = records.len(), "Parsed JSON records");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_csv() {
        let data = "\
kind,amount,description,date
expense,15.99,Netflix Subscription,2024-01-10
income, 2500.00 , Payroll Deposit ,01/31/2024
";
        let records = parse_csv(data.as_bytes()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(
            records[0],
            TransactionRecord::new("expense", 15.99, "Netflix Subscription", "2024-01-10")
        );
        assert_eq!(records[1].amount().unwrap(), 2500.0);
        assert_eq!(records[1].description, "Payroll Deposit");
    }

    #[test]
    fn test_parse_csv_type_header_and_column_order() {
        let data = "\
date,type,amount,memo,description
2024-02-01,expense,4.50,ignored,Coffee
";
        let records = parse_csv(data.as_bytes()).unwrap();
        assert_eq!(records[0].kind, "expense");
        assert_eq!(records[0].description, "Coffee");
        assert_eq!(records[0].date, "2024-02-01");
    }

    #[test]
    fn test_parse_csv_missing_description() {
        let data = "kind,amount,date\nexpense,3.00,2024-02-01\n";
        let records = parse_csv(data.as_bytes()).unwrap();
        assert_eq!(records[0].description, "");
    }

    #[test]
    fn test_parse_csv_keeps_unreadable_amount() {
        let data = "kind,amount,description,date\n\
                    expense,lots,Coffee,2024-02-01\n\
                    expense,,Tea,2024-02-02\n\
                    expense,3.50,Bagel,2024-02-03\n";
        let records = parse_csv(data.as_bytes()).unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].amount, "lots");
        assert!(matches!(records[0].amount(), Err(Error::InvalidInput(_))));
        assert!(records[1].amount().is_err());
        assert_eq!(records[2].amount().unwrap(), 3.5);
    }

    #[test]
    fn test_parse_csv_malformed_row_fails() {
        let data = "kind,amount,description,date\nexpense,\"3.00,Coffee\n";
        assert!(matches!(parse_csv(data.as_bytes()), Err(Error::Csv(_))));
    }

    #[test]
    fn test_parse_json() {
        let data = r#"[
            {"type": "expense", "amount": 9.99, "description": "Spotify", "date": "Mar 05, 2024"},
            {"kind": "income", "amount": 100, "date": "2024-03-06"},
            {"kind": "expense", "amount": "12.40", "date": "2024-03-07"},
            {"kind": "expense", "amount": null, "date": "2024-03-08"}
        ]"#;
        let records = parse_json(data.as_bytes()).unwrap();

        assert_eq!(records.len(), 4);
        assert_eq!(records[0].kind, "expense");
        assert_eq!(records[1].description, "");
        assert_eq!(records[1].amount().unwrap(), 100.0);
        assert_eq!(records[2].amount().unwrap(), 12.4);
        assert!(records[3].amount().is_err());
    }

    #[test]
    fn test_parse_json_not_an_array() {
        assert!(matches!(
            parse_json(r#"{"kind": "expense"}"#.as_bytes()),
            Err(Error::Json(_))
        ));
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            InputFormat::from_path(Path::new("ledger.CSV")).unwrap(),
            InputFormat::Csv
        );
        assert_eq!(
            InputFormat::from_path(Path::new("/tmp/ledger.json")).unwrap(),
            InputFormat::Json
        );
        assert!(InputFormat::from_path(Path::new("ledger.xlsx")).is_err());
        assert!(InputFormat::from_path(Path::new("ledger")).is_err());
    }
}
