//! Record and CSV error types.
//!
//! `RecordError` covers the expected, recoverable conditions a user can hit
//! while entering or summarising tests. `CsvError` covers reading an exported
//! document back in.

use thiserror::Error;

/// Errors raised by the record store and the statistics calculator.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    /// Blank identifier or strength outside the accepted range.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A record with the same identifier already exists.
    #[error("duplicate id: {0}")]
    DuplicateId(String),

    /// Aggregates were requested over zero records.
    #[error("no records to summarise")]
    EmptySet,
}

impl RecordError {
    /// Returns `true` if the error was caused by what the user typed, as
    /// opposed to asking for a summary of nothing.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            RecordError::InvalidInput(_) | RecordError::DuplicateId(_)
        )
    }
}

/// Errors raised while parsing a CSV export.
#[derive(Debug, Error)]
pub enum CsvError {
    /// The underlying reader failed (malformed quoting, bad UTF-8, I/O).
    #[error("csv: {0}")]
    Csv(#[from] csv::Error),

    /// The document is empty.
    #[error("missing header line")]
    MissingHeader,

    /// The header does not match the export format.
    #[error("unexpected header: {0}")]
    UnexpectedHeader(String),

    /// A data row could not be decoded.
    #[error("line {line}: {message}")]
    Row { line: u64, message: String },
}
