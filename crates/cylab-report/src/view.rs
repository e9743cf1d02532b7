//! Presentation-neutral views derived from a record store.
//!
//! Every view is rebuilt from the store on demand. Numbers are formatted here
//! once so the terminal, Markdown and HTML renderers all agree.

use chrono::NaiveDate;
use serde::Serialize;

use cylab_core::config::CylabConfig;
use cylab_core::filter::StrengthRange;
use cylab_core::model::format_date;
use cylab_core::statistics::{compute_stats, histogram, HistogramBin, StrengthStats};
use cylab_core::{RecordStore, TestRecord};

/// Histograms are only drawn once there are more records than this.
pub const HISTOGRAM_THRESHOLD: usize = 3;

/// Format a strength for display: two decimals and the unit.
pub fn format_mpa(value: f64) -> String {
    format!("{value:.2} MPa")
}

/// One headline figure of the summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricCard {
    pub label: &'static str,
    pub value: String,
}

/// The four summary cards: total, mean, max, min.
pub fn metric_cards(stats: &StrengthStats) -> Vec<MetricCard> {
    vec![
        MetricCard {
            label: "Total tests",
            value: stats.count.to_string(),
        },
        MetricCard {
            label: "Mean strength",
            value: format_mpa(stats.mean),
        },
        MetricCard {
            label: "Max strength",
            value: format_mpa(stats.max),
        },
        MetricCard {
            label: "Min strength",
            value: format_mpa(stats.min),
        },
    ]
}

/// A formatted row of the results table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub id: String,
    pub strength: String,
    pub date: String,
}

impl TableRow {
    pub fn from_record(record: &TestRecord, date_format: &str) -> Self {
        Self {
            id: record.id().to_string(),
            strength: format!("{:.2}", record.strength()),
            date: format_date(record.date(), date_format),
        }
    }
}

/// Column headings matching `TableRow`.
pub const TABLE_HEADERS: [&str; 3] = ["ID", "Strength (MPa)", "Date"];

pub fn table_rows<'a>(
    records: impl IntoIterator<Item = &'a TestRecord>,
    date_format: &str,
) -> Vec<TableRow> {
    records
        .into_iter()
        .map(|r| TableRow::from_record(r, date_format))
        .collect()
}

/// One bar of the per-cylinder strength chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrengthBar {
    pub id: String,
    pub strength: f64,
}

/// Strength of every cylinder, in insertion order.
pub fn strength_bars(records: &[TestRecord]) -> Vec<StrengthBar> {
    records
        .iter()
        .map(|r| StrengthBar {
            id: r.id().to_string(),
            strength: r.strength(),
        })
        .collect()
}

/// Records inside a strength range, with the counts behind the caption.
#[derive(Debug, Clone, Serialize)]
pub struct FilterView {
    pub range: StrengthRange,
    pub rows: Vec<TableRow>,
    pub matched: usize,
    pub total: usize,
}

impl FilterView {
    /// Filter `records` by `range`, defaulting to the observed min/max.
    ///
    /// Returns `None` for fewer than two records, where a range cannot be
    /// narrowed meaningfully.
    pub fn build(
        records: &[TestRecord],
        range: Option<StrengthRange>,
        date_format: &str,
    ) -> Option<Self> {
        if records.len() < 2 {
            return None;
        }
        let range = range.or_else(|| StrengthRange::observed(records))?;
        let matched = range.apply(records);
        Some(Self {
            range,
            rows: table_rows(&matched, date_format),
            matched: matched.len(),
            total: records.len(),
        })
    }

    /// Returns `true` when the range hides at least one record.
    pub fn is_subset(&self) -> bool {
        self.matched < self.total
    }

    /// `showing X of Y tests`, only when some records are hidden.
    pub fn caption(&self) -> Option<String> {
        self.is_subset()
            .then(|| format!("showing {} of {} tests", self.matched, self.total))
    }
}

/// Everything a front end needs to draw one screen of the session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    /// Day the view was generated.
    pub generated_on: NaiveDate,
    /// Results in display order (most recent first).
    pub rows: Vec<TableRow>,
    /// Strength per cylinder in insertion order.
    pub strengths: Vec<StrengthBar>,
    /// Raw statistics, absent for an empty store.
    pub stats: Option<StrengthStats>,
    /// Formatted summary cards, empty for an empty store.
    pub metrics: Vec<MetricCard>,
    /// Range filter, absent for fewer than two records.
    pub filter: Option<FilterView>,
    /// Strength distribution, empty until there are enough records.
    pub histogram: Vec<HistogramBin>,
}

impl SessionView {
    pub fn build(
        store: &RecordStore,
        config: &CylabConfig,
        range: Option<StrengthRange>,
        generated_on: NaiveDate,
    ) -> Self {
        let records = store.list();
        let date_format = config.display_date_format.as_str();

        // EmptySet only means there is nothing to show yet.
        let stats = compute_stats(records).ok();
        let bins = if records.len() > HISTOGRAM_THRESHOLD {
            histogram(records, config.histogram_max_bins).unwrap_or_default()
        } else {
            Vec::new()
        };

        Self {
            generated_on,
            rows: table_rows(store.list_for_display(), date_format),
            strengths: strength_bars(records),
            metrics: stats.as_ref().map(metric_cards).unwrap_or_default(),
            stats,
            filter: FilterView::build(records, range, date_format),
            histogram: bins,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
