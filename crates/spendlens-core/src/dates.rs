//! Date normalization
//!
//! Transaction dates arrive in whatever format the source happened to use.
//! Everything downstream works on `NaiveDate`, so parsing happens once here.

use chrono::{Datelike, NaiveDate};

use crate::error::{Error, Result};

/// Accepted formats, tried in order.
///
/// `%m/%d/%Y` comes before `%d/%m/%Y`, so `03/04/2024` is March 4. A slash
/// date only falls through to the day-first form when the first field cannot
/// be a month (e.g. `13/04/2024`). `%b` also accepts full month names.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d", // 2024-03-05
    "%Y/%m/%d", // 2024/03/05
    "%m/%d/%Y", // 03/05/2024
    "%d/%m/%Y", // 25/03/2024
    "%b %d, %Y", // Mar 5, 2024
    "%B %d, %Y", // March 5, 2024
];

/// Parse a date string in any supported format
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(date);
        }
    }

    Err(Error::UnparseableDate(s.to_string()))
}

/// Calendar month bucket key, e.g. `2024-03`
pub fn month_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

/// Parse a `YYYY-MM` month key into (year, month)
pub fn parse_month(s: &str) -> Result<(i32, u32)> {
    let s = s.trim();
    let invalid = || Error::InvalidInput(format!("expected a YYYY-MM month, got {:?}", s));

    let (year, month) = s.split_once('-').ok_or_else(invalid)?;
    let year: i32 = year.parse().map_err(|_| invalid())?;
    let month: u32 = month.parse().map_err(|_| invalid())?;
    if !(1..=12).contains(&month) {
        return Err(invalid());
    }

    Ok((year, month))
}

/// First and last day of a calendar month
pub fn month_bounds(year: i32, month: u32) -> Result<(NaiveDate, NaiveDate)> {
    let invalid = || Error::InvalidInput(format!("invalid month: {}-{:02}", year, month));

    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
    let next_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(invalid)?;
    let last = next_first.pred_opt().ok_or_else(invalid)?;

    Ok((first, last))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_supported_formats() {
        assert_eq!(parse_date("2024-03-05").unwrap(), ymd(2024, 3, 5));
        assert_eq!(parse_date("2024/03/05").unwrap(), ymd(2024, 3, 5));
        assert_eq!(parse_date("03/05/2024").unwrap(), ymd(2024, 3, 5));
        assert_eq!(parse_date("Mar 5, 2024").unwrap(), ymd(2024, 3, 5));
        assert_eq!(parse_date("March 5, 2024").unwrap(), ymd(2024, 3, 5));
    }

    #[test]
    fn test_parse_trims_whitespace() {
        assert_eq!(parse_date("  2024-03-05\n").unwrap(), ymd(2024, 3, 5));
    }

    #[test]
    fn test_month_first_wins_for_ambiguous_slash_dates() {
        // Both fields could be a month; month-first is tried first
        assert_eq!(parse_date("03/04/2024").unwrap(), ymd(2024, 3, 4));
        // 13 cannot be a month, so the day-first form applies
        assert_eq!(parse_date("13/04/2024").unwrap(), ymd(2024, 4, 13));
    }

    #[test]
    fn test_unpadded_iso() {
        assert_eq!(parse_date("2025-1-05").unwrap(), ymd(2025, 1, 5));
    }

    #[test]
    fn test_unparseable() {
        assert!(matches!(
            parse_date("next tuesday"),
            Err(Error::UnparseableDate(_))
        ));
        assert!(matches!(parse_date(""), Err(Error::UnparseableDate(_))));
        assert!(matches!(
            parse_date("2024-02-30"),
            Err(Error::UnparseableDate(_))
        ));
    }

    #[test]
    fn test_iso_round_trip_is_fixed_point() {
        for input in ["2024-03-05", "03/05/2024", "March 5, 2024", "2024/12/31"] {
            let once = parse_date(input).unwrap();
            let twice = parse_date(&once.to_string()).unwrap();
            assert_eq!(once, twice);
            assert_eq!(twice.to_string(), once.to_string());
        }
    }

    #[test]
    fn test_month_key() {
        assert_eq!(month_key(ymd(2024, 3, 12)), "2024-03");
        assert_eq!(month_key(ymd(987, 11, 1)), "0987-11");
    }

    #[test]
    fn test_month_bounds() {
        assert_eq!(
            month_bounds(2024, 2).unwrap(),
            (ymd(2024, 2, 1), ymd(2024, 2, 29))
        );
        assert_eq!(
            month_bounds(2023, 12).unwrap(),
            (ymd(2023, 12, 1), ymd(2023, 12, 31))
        );
        assert!(matches!(month_bounds(2024, 13), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_parse_month() {
        assert_eq!(parse_month("2024-03").unwrap(), (2024, 3));
        assert_eq!(parse_month(" 2023-12 ").unwrap(), (2023, 12));
        assert!(matches!(parse_month("2024-13"), Err(Error::InvalidInput(_))));
        assert!(matches!(parse_month("2024-00"), Err(Error::InvalidInput(_))));
        assert!(parse_month("March").is_err());
        assert!(parse_month("2024-xx").is_err());
    }
}
