//! Terminal rendering of report views.

use comfy_table::{Cell, CellAlignment, Table};

use cylab_core::statistics::HistogramBin;
use cylab_report::view::{FilterView, MetricCard, StrengthBar, TableRow, TABLE_HEADERS};
use cylab_report::SessionView;

pub fn records_table(rows: &[TableRow]) -> Table {
    let mut table = Table::new();
    table.set_header(TABLE_HEADERS.to_vec());
    for r in rows {
        table.add_row(vec![
            Cell::new(&r.id),
            Cell::new(&r.strength).set_alignment(CellAlignment::Right),
            Cell::new(&r.date),
        ]);
    }
    table
}

pub fn metrics_table(cards: &[MetricCard]) -> Table {
    let mut table = Table::new();
    table.set_header(cards.iter().map(|c| c.label).collect::<Vec<_>>());
    table.add_row(cards.iter().map(|c| Cell::new(&c.value)).collect::<Vec<_>>());
    table
}

pub fn histogram_table(bins: &[HistogramBin]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Range (MPa)", "Count", ""]);
    let widest = bins.iter().map(|b| b.count).max().unwrap_or(0).max(1);
    for bin in bins {
        let bar = "#".repeat(bin.count * 30 / widest);
        table.add_row(vec![
            Cell::new(format!("{:.2} to {:.2}", bin.lower, bin.upper)),
            Cell::new(bin.count).set_alignment(CellAlignment::Right),
            Cell::new(bar),
        ]);
    }
    table
}

/// Strength per cylinder as a horizontal bar chart.
pub fn strength_table(bars: &[StrengthBar]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["ID", "Strength (MPa)", ""]);
    let tallest = bars.iter().map(|b| b.strength).fold(0.0, f64::max);
    for bar in bars {
        let width = if tallest > 0.0 {
            (bar.strength / tallest * 30.0).round() as usize
        } else {
            0
        };
        table.add_row(vec![
            Cell::new(&bar.id),
            Cell::new(format!("{:.2}", bar.strength)).set_alignment(CellAlignment::Right),
            Cell::new("#".repeat(width)),
        ]);
    }
    table
}

/// Range line, caption, and the subset table when the range hides records.
pub fn filter_text(filter: &FilterView) -> String {
    let mut out = format!(
        "Range: {:.2} to {:.2} MPa\n",
        filter.range.lo(),
        filter.range.hi()
    );
    match filter.caption() {
        Some(caption) => {
            out.push_str(&caption);
            out.push('\n');
            out.push_str(&records_table(&filter.rows).to_string());
            out.push('\n');
        }
        None => out.push_str(&format!("showing all {} tests\n", filter.total)),
    }
    out
}

/// Full plain-text rendering of a session view.
pub fn render_text(view: &SessionView) -> String {
    if view.is_empty() {
        return "No tests recorded.\n".to_string();
    }

    let mut out = String::new();
    out.push_str("Results\n");
    out.push_str(&records_table(&view.rows).to_string());
    out.push_str("\n\nStatistics\n");
    out.push_str(&metrics_table(&view.metrics).to_string());
    out.push_str("\n\nStrength by cylinder\n");
    out.push_str(&strength_table(&view.strengths).to_string());
    out.push('\n');

    if !view.histogram.is_empty() {
        out.push_str("\nDistribution\n");
        out.push_str(&histogram_table(&view.histogram).to_string());
        out.push('\n');
    }

    if let Some(filter) = &view.filter {
        out.push_str("\nFilter\n");
        out.push_str(&filter_text(filter));
    }

    out
}
