//! HTML session report.
//!
//! Produces a self-contained HTML file with all CSS inlined.

use std::path::Path;

use anyhow::{Context, Result};

use crate::view::{SessionView, TableRow, TABLE_HEADERS};

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

fn push_table(html: &mut String, rows: &[TableRow]) {
    html.push_str("<table class=\"results-table\">\n<thead><tr>");
    for h in TABLE_HEADERS {
        html.push_str(&format!("<th>{}</th>", html_escape(h)));
    }
    html.push_str("</tr></thead>\n<tbody>\n");
    for r in rows {
        html.push_str(&format!(
            "<tr><td>{}</td><td class=\"num\">{}</td><td>{}</td></tr>\n",
            html_escape(&r.id),
            r.strength,
            html_escape(&r.date)
        ));
    }
    html.push_str("</tbody></table>\n");
}

/// Generate an HTML report from a session view.
pub fn generate_html(view: &SessionView) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str("<title>Concrete Cylinder Compression Tests</title>\n");
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    html.push_str("<header>\n");
    html.push_str("<h1>Concrete Cylinder Compression Tests</h1>\n");
    html.push_str(&format!(
        "<p class=\"meta\">{} tests | generated {}</p>\n",
        view.rows.len(),
        view.generated_on.format("%Y-%m-%d")
    ));
    html.push_str("</header>\n");

    if view.is_empty() {
        html.push_str("<p class=\"empty\">No tests recorded.</p>\n");
        html.push_str("</body>\n</html>\n");
        return html;
    }

    html.push_str("<section class=\"results\">\n<h2>Results</h2>\n");
    push_table(&mut html, &view.rows);
    html.push_str("</section>\n");

    html.push_str("<section class=\"dashboard\">\n<h2>Statistics</h2>\n");
    for card in &view.metrics {
        html.push_str(&format!(
            "<div class=\"metric\"><span class=\"label\">{}</span><span class=\"value\">{}</span></div>\n",
            html_escape(card.label),
            html_escape(&card.value)
        ));
    }
    html.push_str("</section>\n");

    html.push_str("<section class=\"strengths\">\n<h2>Strength by Cylinder</h2>\n");
    html.push_str("<table class=\"chart\">\n<tbody>\n");
    let tallest = view.strengths.iter().map(|b| b.strength).fold(0.0, f64::max);
    for bar in &view.strengths {
        let pct = if tallest > 0.0 {
            bar.strength / tallest * 100.0
        } else {
            0.0
        };
        html.push_str(&format!(
            "<tr><td>{}</td><td class=\"num\">{:.2}</td><td class=\"bar-cell\"><div class=\"bar\" style=\"width: {:.1}%\"></div></td></tr>\n",
            html_escape(&bar.id),
            bar.strength,
            pct
        ));
    }
    html.push_str("</tbody></table>\n</section>\n");

    if !view.histogram.is_empty() {
        html.push_str("<section class=\"distribution\">\n<h2>Distribution</h2>\n");
        html.push_str("<table class=\"summary\">\n");
        html.push_str("<thead><tr><th>Range (MPa)</th><th>Count</th></tr></thead>\n<tbody>\n");
        for bin in &view.histogram {
            html.push_str(&format!(
                "<tr><td>{:.2} to {:.2}</td><td class=\"num\">{}</td></tr>\n",
                bin.lower, bin.upper, bin.count
            ));
        }
        html.push_str("</tbody></table>\n</section>\n");
    }

    if let Some(filter) = &view.filter {
        html.push_str("<section class=\"filter\">\n<h2>Filter</h2>\n");
        html.push_str(&format!(
            "<p class=\"meta\">Range: {:.2} to {:.2} MPa</p>\n",
            filter.range.lo(),
            filter.range.hi()
        ));
        if let Some(caption) = filter.caption() {
            html.push_str(&format!("<p class=\"caption\">{}</p>\n", html_escape(&caption)));
            push_table(&mut html, &filter.rows);
        }
        html.push_str("</section>\n");
    }

    // Raw JSON
    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(&html_escape(
        &serde_json::to_string_pretty(view).unwrap_or_default(),
    ));
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    html.push_str("</body>\n</html>\n");
    html
}

/// Write the HTML report to a file, creating parent directories.
pub fn write_html_report(view: &SessionView, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, generate_html(view))
        .with_context(|| format!("failed to write HTML report to {}", path.display()))?;
    Ok(())
}

const CSS: &str = r#"
body { font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif; margin: 2rem; color: #1f2933; }
header h1 { margin-bottom: 0.25rem; }
.meta { color: #616e7c; }
table { border-collapse: collapse; margin: 1rem 0; }
th, td { border: 1px solid #d9e2ec; padding: 0.4rem 0.8rem; text-align: left; }
th { background: #f0f4f8; }
td.num { text-align: right; font-variant-numeric: tabular-nums; }
.dashboard { display: flex; flex-wrap: wrap; gap: 1rem; }
.dashboard h2 { flex-basis: 100%; }
.metric { border: 1px solid #d9e2ec; border-radius: 6px; padding: 0.8rem 1.2rem; min-width: 10rem; }
.metric .label { display: block; color: #616e7c; font-size: 0.85rem; }
.metric .value { display: block; font-size: 1.4rem; font-weight: 600; }
.bar-cell { width: 20rem; }
.bar { height: 0.9rem; background: #7cc4fa; border: 1px solid #1f4e79; }
.caption { font-style: italic; }
.empty { color: #616e7c; }
pre { background: #f5f7fa; padding: 1rem; overflow-x: auto; }
"#;
