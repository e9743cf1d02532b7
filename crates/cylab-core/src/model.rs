//! Core data model types for cylab.
//!
//! A `TestRecord` is one compression test of one concrete cylinder. Records
//! are only built by the store's validated insertion and never change
//! afterwards, so every field is read through an accessor.

use std::fmt::Write;

use chrono::NaiveDate;
use serde::Serialize;

/// Upper bound on accepted strength, in MPa, unless configured otherwise.
pub const DEFAULT_MAX_STRENGTH: f64 = 100.0;

/// Date format used in the CSV export.
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Date format the laboratory writes by hand.
pub const DISPLAY_DATE_FORMAT: &str = "%d/%m/%Y";

/// A single compression test result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestRecord {
    id: String,
    strength: f64,
    date: NaiveDate,
}

impl TestRecord {
    /// Build a record without validation. Only the store calls this.
    pub(crate) fn new(id: String, strength: f64, date: NaiveDate) -> Self {
        Self { id, strength, date }
    }

    /// Cylinder identifier, e.g. `CIL-001`.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Compressive strength in megapascals.
    pub fn strength(&self) -> f64 {
        self.strength
    }

    /// Day the cylinder was tested.
    pub fn date(&self) -> NaiveDate {
        self.date
    }
}

/// Parse a test date given either as `YYYY-MM-DD` or `DD/MM/YYYY`.
pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, ISO_DATE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(s, DISPLAY_DATE_FORMAT))
        .map_err(|_| format!("unrecognised date: {s} (expected YYYY-MM-DD or DD/MM/YYYY)"))
}

/// Render a date with a `chrono` format string.
///
/// Falls back to ISO when `format` asks for fields a date does not have.
pub fn format_date(date: NaiveDate, format: &str) -> String {
    let mut out = String::new();
    if write!(out, "{}", date.format(format)).is_err() {
        out.clear();
        let _ = write!(out, "{}", date.format(ISO_DATE_FORMAT));
    }
    out
}

/// Render a strength as a plain decimal number.
///
/// Whole values keep one fractional digit (`30.0`, not `30`) so the column
/// always reads as a measurement.
pub fn format_strength(strength: f64) -> String {
    let s = strength.to_string();
    if s.contains('.') || !strength.is_finite() {
        s
    } else {
        format!("{s}.0")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_date_accepts_both_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        assert_eq!(parse_date("2024-05-01").unwrap(), expected);
        assert_eq!(parse_date("01/05/2024").unwrap(), expected);
        assert_eq!(parse_date(" 2024-05-01 ").unwrap(), expected);
        assert!(parse_date("2024-13-01").is_err());
        assert!(parse_date("yesterday").is_err());
    }

    #[test]
    fn date_formatting_never_panics() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        assert_eq!(format_date(date, DISPLAY_DATE_FORMAT), "01/05/2024");
        assert_eq!(format_date(date, "%H:%M"), "2024-05-01");
        assert_eq!(format_date(date, "%Q"), "2024-05-01");
    }

    #[test]
    fn strength_formatting() {
        assert_eq!(format_strength(28.5), "28.5");
        assert_eq!(format_strength(30.0), "30.0");
        assert_eq!(format_strength(0.1), "0.1");
        assert_eq!(format_strength(100.0), "100.0");
    }

    #[test]
    fn record_serializes_with_iso_date() {
        let record = TestRecord::new(
            "CIL-001".into(),
            28.5,
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        );
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(
            json,
            r#"{"id":"CIL-001","strength":28.5,"date":"2024-05-01"}"#
        );
    }
}
