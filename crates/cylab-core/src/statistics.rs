//! Summary statistics over a set of test records.
//!
//! Count, mean, max and min of the strength column, plus the equal-width
//! binning the histogram view draws from.

use serde::{Deserialize, Serialize};

use crate::error::RecordError;
use crate::model::TestRecord;

/// Default cap on the number of histogram bins.
pub const DEFAULT_HISTOGRAM_BINS: usize = 10;

/// Aggregate strength figures for a record set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrengthStats {
    /// Number of records.
    pub count: usize,
    /// Arithmetic mean strength in MPa.
    pub mean: f64,
    /// Highest strength in MPa.
    pub max: f64,
    /// Lowest strength in MPa.
    pub min: f64,
}

/// Compute count, mean, max and min strength.
///
/// Returns `EmptySet` when there is nothing to summarise.
pub fn compute_stats(records: &[TestRecord]) -> Result<StrengthStats, RecordError> {
    if records.is_empty() {
        return Err(RecordError::EmptySet);
    }

    let (sum, max, min) = records.iter().map(TestRecord::strength).fold(
        (0.0f64, f64::NEG_INFINITY, f64::INFINITY),
        |(sum, max, min), s| (sum + s, max.max(s), min.min(s)),
    );
    let count = records.len();
    let stats = StrengthStats {
        count,
        mean: sum / count as f64,
        max,
        min,
    };
    tracing::debug!(?stats, "computed strength statistics");
    Ok(stats)
}

/// One bar of the strength histogram. `upper` is exclusive except for the
/// last bin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Number of bins used for `n` records: `min(max_bins, n / 2 + 1)`.
pub fn bin_count(n: usize, max_bins: usize) -> usize {
    max_bins.min(n / 2 + 1).max(1)
}

/// Bin strengths into equal-width intervals spanning the observed range.
///
/// When every strength is the same the range is widened by half a MPa on
/// each side so the single value sits in the middle bin.
pub fn histogram(records: &[TestRecord], max_bins: usize) -> Result<Vec<HistogramBin>, RecordError> {
    let stats = compute_stats(records)?;
    let bins = bin_count(stats.count, max_bins);

    let (lo, hi) = if stats.max > stats.min {
        (stats.min, stats.max)
    } else {
        (stats.min - 0.5, stats.max + 0.5)
    };
    let width = (hi - lo) / bins as f64;

    let mut out: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            lower: lo + width * i as f64,
            upper: if i + 1 == bins {
                hi
            } else {
                lo + width * (i + 1) as f64
            },
            count: 0,
        })
        .collect();

    for s in records.iter().map(TestRecord::strength) {
        let idx = (((s - lo) / width) as usize).min(bins - 1);
        out[idx].count += 1;
    }

    Ok(out)
}
