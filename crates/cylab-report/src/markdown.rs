//! Markdown session report.

use crate::view::{SessionView, TableRow, TABLE_HEADERS};

/// Escape a value for a Markdown table cell.
fn cell(s: &str) -> String {
    s.replace('|', "\\|").replace(['\r', '\n'], " ")
}

fn push_table(md: &mut String, rows: &[TableRow]) {
    md.push_str(&format!("| {} |\n", TABLE_HEADERS.join(" | ")));
    md.push_str("|----|----------------|------|\n");
    for r in rows {
        md.push_str(&format!("| {} | {} | {} |\n", cell(&r.id), r.strength, r.date));
    }
    md.push('\n');
}

/// Render the session view as a Markdown document.
pub fn to_markdown(view: &SessionView) -> String {
    let mut md = String::new();

    md.push_str("# Concrete Cylinder Compression Tests\n\n");
    md.push_str(&format!(
        "_Generated {}_\n\n",
        view.generated_on.format("%Y-%m-%d")
    ));

    if view.is_empty() {
        md.push_str("No tests recorded.\n");
        return md;
    }

    md.push_str("## Results\n\n");
    push_table(&mut md, &view.rows);

    md.push_str("## Statistics\n\n");
    for card in &view.metrics {
        md.push_str(&format!("- **{}:** {}\n", card.label, card.value));
    }
    md.push('\n');

    md.push_str("## Strength by Cylinder\n\n");
    md.push_str("| ID | Strength (MPa) | |\n");
    md.push_str("|----|----------------|-|\n");
    let tallest = view.strengths.iter().map(|b| b.strength).fold(0.0, f64::max);
    for bar in &view.strengths {
        let width = if tallest > 0.0 {
            (bar.strength / tallest * 20.0).round() as usize
        } else {
            0
        };
        md.push_str(&format!(
            "| {} | {:.2} | `{}` |\n",
            cell(&bar.id),
            bar.strength,
            "#".repeat(width)
        ));
    }
    md.push('\n');

    if !view.histogram.is_empty() {
        md.push_str("## Distribution\n\n");
        md.push_str("| Range (MPa) | Count |\n");
        md.push_str("|-------------|-------|\n");
        for bin in &view.histogram {
            md.push_str(&format!(
                "| {:.2} to {:.2} | {} |\n",
                bin.lower, bin.upper, bin.count
            ));
        }
        md.push('\n');
    }

    if let Some(filter) = &view.filter {
        md.push_str("## Filter\n\n");
        md.push_str(&format!(
            "Range: {:.2} to {:.2} MPa\n\n",
            filter.range.lo(),
            filter.range.hi()
        ));
        if let Some(caption) = filter.caption() {
            md.push_str(&format!("_{caption}_\n\n"));
            push_table(&mut md, &filter.rows);
        }
    }

    md
}
