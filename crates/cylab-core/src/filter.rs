//! Inclusive strength-range filtering.

use serde::Serialize;

use crate::error::RecordError;
use crate::model::TestRecord;

/// A closed strength interval `[lo, hi]` in MPa.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StrengthRange {
    lo: f64,
    hi: f64,
}

impl StrengthRange {
    /// Build a range, rejecting non-finite or inverted bounds.
    pub fn new(lo: f64, hi: f64) -> Result<Self, RecordError> {
        if !lo.is_finite() || !hi.is_finite() {
            return Err(RecordError::InvalidInput(format!(
                "range bounds must be finite, got [{lo}, {hi}]"
            )));
        }
        if lo > hi {
            return Err(RecordError::InvalidInput(format!(
                "range lower bound {lo} exceeds upper bound {hi}"
            )));
        }
        Ok(Self { lo, hi })
    }

    /// The observed `[min, max]` of a record set, or `None` when it is empty.
    pub fn observed(records: &[TestRecord]) -> Option<Self> {
        let mut strengths = records.iter().map(TestRecord::strength);
        let first = strengths.next()?;
        let (lo, hi) = strengths.fold((first, first), |(lo, hi), s| (lo.min(s), hi.max(s)));
        Some(Self { lo, hi })
    }

    pub fn lo(&self) -> f64 {
        self.lo
    }

    pub fn hi(&self) -> f64 {
        self.hi
    }

    /// Returns `true` if `strength` lies inside the range, bounds included.
    pub fn contains(&self, strength: f64) -> bool {
        self.lo <= strength && strength <= self.hi
    }

    /// Select the records inside this range, keeping their order.
    pub fn apply(&self, records: &[TestRecord]) -> Vec<TestRecord> {
        filter_by_range(records, self.lo, self.hi)
    }
}

/// Records whose strength satisfies `lo <= strength <= hi`, in their
/// original relative order.
///
/// An inverted range matches nothing.
pub fn filter_by_range(records: &[TestRecord], lo: f64, hi: f64) -> Vec<TestRecord> {
    let matched: Vec<TestRecord> = records
        .iter()
        .filter(|r| lo <= r.strength() && r.strength() <= hi)
        .cloned()
        .collect();
    tracing::debug!(lo, hi, matched = matched.len(), total = records.len(), "filtered by strength");
    matched
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::RecordStore;
    use chrono::NaiveDate;

    fn records(strengths: &[f64]) -> Vec<TestRecord> {
        let mut store = RecordStore::new();
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        for (i, s) in strengths.iter().enumerate() {
            store.add(&format!("CIL-{i:03}"), *s, date).unwrap();
        }
        store.list().to_vec()
    }

    fn strengths(records: &[TestRecord]) -> Vec<f64> {
        records.iter().map(TestRecord::strength).collect()
    }

    #[test]
    fn bounds_are_inclusive() {
        let recs = records(&[10.0, 20.0, 30.0]);
        assert_eq!(strengths(&filter_by_range(&recs, 20.0, 20.0)), [20.0]);
        assert_eq!(
            strengths(&filter_by_range(&recs, 10.0, 30.0)),
            [10.0, 20.0, 30.0]
        );
    }

    #[test]
    fn order_is_preserved() {
        let recs = records(&[30.0, 10.0, 25.0, 20.0]);
        assert_eq!(
            strengths(&filter_by_range(&recs, 15.0, 30.0)),
            [30.0, 25.0, 20.0]
        );
    }

    #[test]
    fn empty_result_is_not_an_error() {
        let recs = records(&[10.0, 20.0]);
        assert!(filter_by_range(&recs, 50.0, 60.0).is_empty());
        assert!(filter_by_range(&[], 0.0, 100.0).is_empty());
        assert!(filter_by_range(&recs, 30.0, 5.0).is_empty());
    }

    #[test]
    fn observed_range_matches_everything() {
        let recs = records(&[22.5, 18.0, 35.25]);
        let range = StrengthRange::observed(&recs).unwrap();
        assert_eq!(range.lo(), 18.0);
        assert_eq!(range.hi(), 35.25);
        assert_eq!(range.apply(&recs).len(), 3);

        assert!(StrengthRange::observed(&[]).is_none());
    }

    #[test]
    fn range_validation() {
        assert!(StrengthRange::new(10.0, 20.0).is_ok());
        assert!(StrengthRange::new(20.0, 20.0).is_ok());
        assert!(matches!(
            StrengthRange::new(20.0, 10.0),
            Err(RecordError::InvalidInput(_))
        ));
        assert!(StrengthRange::new(f64::NAN, 10.0).is_err());

        let range = StrengthRange::new(10.0, 20.0).unwrap();
        assert!(range.contains(10.0));
        assert!(range.contains(20.0));
        assert!(!range.contains(20.01));
    }
}
