//! The session-scoped record store.
//!
//! `RecordStore` is the only mutable state in the core. It owns validation
//! and id uniqueness; every derived view is computed from `list()` on demand.

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::RecordError;
use crate::export::CsvRow;
use crate::model::{TestRecord, DEFAULT_MAX_STRENGTH};

/// Holds the test records of one session in insertion order.
#[derive(Debug, Clone)]
pub struct RecordStore {
    records: Vec<TestRecord>,
    max_strength: f64,
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordStore {
    /// Create an empty store accepting strengths up to 100 MPa.
    pub fn new() -> Self {
        Self::with_max_strength(DEFAULT_MAX_STRENGTH)
    }

    /// Create an empty store with a custom upper strength bound.
    pub fn with_max_strength(max_strength: f64) -> Self {
        Self {
            records: Vec::new(),
            max_strength,
        }
    }

    /// Upper strength bound enforced by `add`.
    pub fn max_strength(&self) -> f64 {
        self.max_strength
    }

    /// Validate and append a new record.
    ///
    /// The identifier is stored exactly as given and must not match an
    /// existing one byte for byte. On error the store is left untouched.
    pub fn add(
        &mut self,
        id: &str,
        strength: f64,
        date: NaiveDate,
    ) -> Result<&TestRecord, RecordError> {
        if id.trim().is_empty() {
            return Err(RecordError::InvalidInput("id must not be blank".into()));
        }
        if !strength.is_finite() || strength <= 0.0 || strength > self.max_strength {
            return Err(RecordError::InvalidInput(format!(
                "strength must be in (0, {}] MPa, got {strength}",
                self.max_strength
            )));
        }
        if self.contains(id) {
            return Err(RecordError::DuplicateId(id.to_string()));
        }

        tracing::debug!(id, strength, %date, "record added");
        self.records
            .push(TestRecord::new(id.to_string(), strength, date));
        Ok(&self.records[self.records.len() - 1])
    }

    /// Remove every record. Clearing an empty store is a no-op.
    pub fn clear(&mut self) {
        if !self.records.is_empty() {
            tracing::info!(removed = self.records.len(), "store cleared");
        }
        self.records.clear();
    }

    /// All records in insertion order.
    pub fn list(&self) -> &[TestRecord] {
        &self.records
    }

    /// Records ordered most recent first; same-day records keep insertion order.
    pub fn list_for_display(&self) -> Vec<&TestRecord> {
        let mut sorted: Vec<&TestRecord> = self.records.iter().collect();
        sorted.sort_by(|a, b| b.date().cmp(&a.date()));
        sorted
    }

    /// Returns `true` if a record with exactly this id exists.
    pub fn contains(&self, id: &str) -> bool {
        self.records.iter().any(|r| r.id() == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Insert parsed CSV rows one by one through `add`.
    ///
    /// Rows that fail validation are collected instead of aborting the import.
    pub fn import(&mut self, rows: Vec<CsvRow>) -> ImportSummary {
        let mut summary = ImportSummary::default();
        for row in rows {
            match self.add(&row.id, row.strength, row.date) {
                Ok(_) => summary.added += 1,
                Err(error) => {
                    tracing::warn!(line = row.line, id = %row.id, "rejected row: {error}");
                    summary.rejected.push(RejectedRow {
                        line: row.line,
                        id: row.id,
                        error,
                    });
                }
            }
        }
        summary
    }
}

/// Outcome of `RecordStore::import`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportSummary {
    /// Number of rows inserted.
    pub added: usize,
    /// Rows the store refused.
    pub rejected: Vec<RejectedRow>,
}

/// A CSV row that failed validation during import.
#[derive(Debug, Clone, Serialize)]
pub struct RejectedRow {
    pub line: u64,
    pub id: String,
    #[serde(serialize_with = "serialize_error")]
    pub error: RecordError,
}

fn serialize_error<S: serde::Serializer>(error: &RecordError, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(error)
}
