//! CSV export and import of test records.
//!
//! The export is a fixed three-column document:
//!
//! ```text
//! ID,Strength_MPa,Test_Date
//! CIL-001,28.5,2024-05-01
//! ```
//!
//! Dates are always ISO `YYYY-MM-DD` and strengths plain decimals, so the
//! output does not depend on locale. Ids containing a comma, quote or line
//! break are quoted RFC 4180 style; all other ids are written verbatim.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;

use crate::error::CsvError;
use crate::model::{format_strength, parse_date, TestRecord, ISO_DATE_FORMAT};

/// Header line of every export.
pub const CSV_HEADER: [&str; 3] = ["ID", "Strength_MPa", "Test_Date"];

/// MIME type offered with a download.
pub const CSV_MIME_TYPE: &str = "text/csv";

/// File name prefix used when none is configured.
pub const DEFAULT_EXPORT_PREFIX: &str = "ensayos_concreto";

/// Serialize records to CSV, one line per record in the given order.
pub fn to_csv(records: &[TestRecord]) -> Result<String> {
    let mut wtr = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(vec![]);

    wtr.write_record(CSV_HEADER)?;
    for r in records {
        let strength = format_strength(r.strength());
        let date = r.date().format(ISO_DATE_FORMAT).to_string();
        wtr.write_record([r.id(), strength.as_str(), date.as_str()])?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// One decoded data row of an export.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvRow {
    /// 1-based line number in the source document.
    pub line: u64,
    pub id: String,
    pub strength: f64,
    pub date: NaiveDate,
}

/// Parse an export back into rows.
///
/// Rows are decoded but not validated against the store's rules; feed them
/// through `RecordStore::import` for that.
pub fn from_csv(text: &str) -> Result<Vec<CsvRow>, CsvError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut records = reader.records();
    let header = records.next().ok_or(CsvError::MissingHeader)??;
    if header.iter().map(str::trim).ne(CSV_HEADER) {
        return Err(CsvError::UnexpectedHeader(
            header.iter().collect::<Vec<_>>().join(","),
        ));
    }

    let mut rows = Vec::new();
    for record in records {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        if record.len() != CSV_HEADER.len() {
            return Err(CsvError::Row {
                line,
                message: format!("expected 3 fields, found {}", record.len()),
            });
        }

        let strength = record[1].trim().parse::<f64>().map_err(|e| CsvError::Row {
            line,
            message: format!("invalid strength {:?}: {e}", &record[1]),
        })?;
        let date = parse_date(&record[2]).map_err(|message| CsvError::Row { line, message })?;

        rows.push(CsvRow {
            line,
            id: record[0].to_string(),
            strength,
            date,
        });
    }

    Ok(rows)
}

/// File name for an export made on `date`: `{prefix}_{YYYYMMDD}.csv`.
pub fn export_file_name(prefix: &str, date: NaiveDate) -> String {
    format!("{prefix}_{}.csv", date.format("%Y%m%d"))
}

/// Write the export into `dir` under the dated file name and return its path.
pub fn write_csv(records: &[TestRecord], dir: &Path, prefix: &str, date: NaiveDate) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create export dir: {}", dir.display()))?;
    let path = dir.join(export_file_name(prefix, date));
    write_csv_to(records, &path)?;
    Ok(path)
}

/// Write the export to an explicit path.
pub fn write_csv_to(records: &[TestRecord], path: &Path) -> Result<()> {
    std::fs::write(path, to_csv(records)?)
        .with_context(|| format!("failed to write CSV to {}", path.display()))?;
    tracing::info!(path = %path.display(), records = records.len(), "exported CSV");
    Ok(())
}

/// Read and parse an export from disk.
pub fn read_csv(path: &Path) -> Result<Vec<CsvRow>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read CSV from {}", path.display()))?;
    from_csv(&content).with_context(|| format!("failed to parse CSV: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::RecordStore;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn single_record_export() {
        let mut store = RecordStore::new();
        store.add("CIL-001", 28.5, day(2024, 5, 1)).unwrap();

        assert_eq!(
            to_csv(store.list()).unwrap(),
            "ID,Strength_MPa,Test_Date\nCIL-001,28.5,2024-05-01\n"
        );
    }

    #[test]
    fn empty_export_is_header_only() {
        assert_eq!(to_csv(&[]).unwrap(), "ID,Strength_MPa,Test_Date\n");
    }

    #[test]
    fn export_keeps_insertion_order() {
        let mut store = RecordStore::new();
        store.add("B", 30.0, day(2024, 2, 1)).unwrap();
        store.add("A", 25.25, day(2024, 3, 1)).unwrap();

        assert_eq!(
            to_csv(store.list()).unwrap(),
            "ID,Strength_MPa,Test_Date\nB,30.0,2024-02-01\nA,25.25,2024-03-01\n"
        );
    }

    #[test]
    fn export_parses_back() {
        let mut store = RecordStore::new();
        store.add("CIL-001", 28.5, day(2024, 5, 1)).unwrap();
        store.add("CIL-002", 41.0, day(2024, 5, 3)).unwrap();

        let rows = from_csv(&to_csv(store.list()).unwrap()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, "CIL-001");
        assert_eq!(rows[0].strength, 28.5);
        assert_eq!(rows[0].date, day(2024, 5, 1));
        assert_eq!(rows[0].line, 2);
        assert_eq!(rows[1].line, 3);
    }

    #[test]
    fn awkward_ids_are_quoted() {
        let mut store = RecordStore::new();
        store.add("CIL,7", 20.0, day(2024, 1, 1)).unwrap();
        store.add("say \"hi\"", 21.0, day(2024, 1, 2)).unwrap();
        store.add("two\nlines", 22.0, day(2024, 1, 3)).unwrap();

        let text = to_csv(store.list()).unwrap();
        assert!(text.contains("\"CIL,7\",20.0,2024-01-01\n"));
        assert!(text.contains("\"say \"\"hi\"\"\",21.0,2024-01-02\n"));
        assert!(text.contains("\"two\nlines\",22.0,2024-01-03\n"));

        let rows = from_csv(&text).unwrap();
        assert_eq!(rows[0].id, "CIL,7");
        assert_eq!(rows[1].id, "say \"hi\"");
        assert_eq!(rows[2].id, "two\nlines");
    }

    #[test]
    fn import_rejects_foreign_header() {
        let err = from_csv("ID_Cilindro,Resistencia_MPa,Fecha_Ensayo\nA,1,2024-01-01\n").unwrap_err();
        assert!(matches!(err, CsvError::UnexpectedHeader(_)));

        assert!(matches!(from_csv(""), Err(CsvError::MissingHeader)));
    }

    #[test]
    fn import_reports_bad_rows_by_line() {
        let err = from_csv("ID,Strength_MPa,Test_Date\nA,abc,2024-01-01\n").unwrap_err();
        assert!(matches!(err, CsvError::Row { line: 2, .. }));

        let err = from_csv("ID,Strength_MPa,Test_Date\nA,10,2024-01-01\nB,10\n").unwrap_err();
        assert!(matches!(err, CsvError::Row { line: 3, .. }));

        let err = from_csv("ID,Strength_MPa,Test_Date\nA,10,someday\n").unwrap_err();
        assert!(matches!(err, CsvError::Row { line: 2, .. }));
    }

    #[test]
    fn file_name_uses_compact_date() {
        assert_eq!(
            export_file_name(DEFAULT_EXPORT_PREFIX, day(2024, 5, 1)),
            "ensayos_concreto_20240501.csv"
        );
    }

    #[test]
    fn write_and_read_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = RecordStore::new();
        store.add("CIL-001", 28.5, day(2024, 5, 1)).unwrap();

        let path = write_csv(store.list(), &dir.path().join("out"), "lab", day(2024, 6, 9)).unwrap();
        assert!(path.ends_with("lab_20240609.csv"));

        let rows = read_csv(&path).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, "CIL-001");
    }
}
