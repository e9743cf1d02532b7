//! The `cylab report` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Local;

use cylab_core::config::load_config_from;
use cylab_core::export::read_csv;
use cylab_core::filter::StrengthRange;
use cylab_report::html::generate_html;
use cylab_report::markdown::to_markdown;
use cylab_report::SessionView;

use crate::render::render_text;

pub fn execute(
    input: PathBuf,
    format: String,
    output: Option<PathBuf>,
    min: Option<f64>,
    max: Option<f64>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    let mut store = config.new_store();
    let summary = store.import(read_csv(&input)?);
    for r in &summary.rejected {
        eprintln!("Warning: line {} ({}) skipped: {}", r.line, r.id, r.error);
    }

    // Missing bounds fall back to the observed range.
    let range = match (min, max, StrengthRange::observed(store.list())) {
        (None, None, _) | (_, _, None) => None,
        (lo, hi, Some(observed)) => Some(StrengthRange::new(
            lo.unwrap_or(observed.lo()),
            hi.unwrap_or(observed.hi()),
        )?),
    };

    let view = SessionView::build(&store, &config, range, Local::now().date_naive());

    let rendered = match format.as_str() {
        "text" => render_text(&view),
        "markdown" | "md" => to_markdown(&view),
        "html" => generate_html(&view),
        "json" => serde_json::to_string_pretty(&view)?,
        other => anyhow::bail!("unknown format: {other} (expected text, markdown, html or json)"),
    };

    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create report dir: {}", parent.display()))?;
            }
            std::fs::write(&path, rendered)
                .with_context(|| format!("failed to write report to {}", path.display()))?;
            println!("Report written to {}", path.display());
        }
        None => print!("{rendered}"),
    }

    Ok(())
}
