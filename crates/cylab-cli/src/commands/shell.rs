//! The `cylab shell` command.
//!
//! One session owns one store. Each input line is one trigger: at most one
//! mutation of the store, then views derived fresh from it.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::{Local, NaiveDate};
use uuid::Uuid;

use cylab_core::config::{load_config_from, CylabConfig};
use cylab_core::export::{read_csv, write_csv, write_csv_to, CSV_MIME_TYPE};
use cylab_core::filter::StrengthRange;
use cylab_core::model::{format_date, parse_date};
use cylab_core::statistics::{compute_stats, histogram};
use cylab_core::{RecordError, RecordStore};
use cylab_report::view::{
    format_mpa, metric_cards, strength_bars, table_rows, FilterView, HISTOGRAM_THRESHOLD,
};

use crate::render;

const HELP: &str = "\
Commands:
  add <id> <strength> [date]   record a test (date YYYY-MM-DD or DD/MM/YYYY, default today)
  list                         show all tests, most recent first
  stats                        total, mean, max and min strength
  filter [lo hi]               tests with lo <= strength <= hi (default: observed range)
  chart                        strength per cylinder
  hist                         strength distribution
  export [path]                write the CSV export
  import <path>                load tests from a CSV export
  clear                        remove every test
  help                         show this help
  quit                         end the session";

/// Whether the read loop should keep going.
#[derive(Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// An interactive session and the store it owns.
pub struct Session {
    id: Uuid,
    store: RecordStore,
    config: CylabConfig,
}

impl Session {
    pub fn new(config: CylabConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            store: config.new_store(),
            config,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Run one input line against the session.
    ///
    /// Record and file errors are reported to `out`; only a failure to write
    /// to `out` itself is returned.
    pub fn handle(&mut self, line: &str, out: &mut impl Write, today: NaiveDate) -> Result<Flow> {
        let args: Vec<&str> = line.split_whitespace().collect();
        let Some((&command, args)) = args.split_first() else {
            return Ok(Flow::Continue);
        };

        let message = match command {
            "add" => self.add(args, today),
            "list" => self.list(),
            "stats" => self.stats(),
            "filter" => self.filter(args),
            "chart" => self.chart(),
            "hist" => self.hist(),
            "export" => self.export(args, today),
            "import" => self.import(args),
            "clear" => {
                self.store.clear();
                Ok("Cleared all tests.".to_string())
            }
            "help" => Ok(HELP.to_string()),
            "quit" | "exit" => return Ok(Flow::Quit),
            other => Ok(format!("Unknown command: {other} (type `help`)")),
        };

        match message {
            Ok(text) => writeln!(out, "{}", text.trim_end())?,
            Err(e) => writeln!(out, "Error: {e:#}")?,
        }
        Ok(Flow::Continue)
    }

    fn add(&mut self, args: &[&str], today: NaiveDate) -> Result<String> {
        let (id, strength, date) = match args {
            [id, strength] => (*id, *strength, today),
            [id, strength, date] => (*id, *strength, parse_date(date).map_err(RecordError::InvalidInput)?),
            _ => anyhow::bail!("usage: add <id> <strength> [date]"),
        };
        let strength: f64 = strength
            .parse()
            .map_err(|_| RecordError::InvalidInput(format!("strength is not a number: {strength}")))?;

        let record = self.store.add(id, strength, date)?;
        Ok(format!(
            "Added {} ({}, {})",
            record.id(),
            format_mpa(record.strength()),
            format_date(record.date(), &self.config.display_date_format)
        ))
    }

    fn list(&self) -> Result<String> {
        if self.store.is_empty() {
            return Ok("No tests recorded.".to_string());
        }
        let rows = table_rows(self.store.list_for_display(), &self.config.display_date_format);
        Ok(render::records_table(&rows).to_string())
    }

    fn stats(&self) -> Result<String> {
        match compute_stats(self.store.list()) {
            Ok(stats) => Ok(render::metrics_table(&metric_cards(&stats)).to_string()),
            Err(RecordError::EmptySet) => Ok("No tests recorded.".to_string()),
            Err(e) => Err(e.into()),
        }
    }

    fn filter(&self, args: &[&str]) -> Result<String> {
        let range = match args {
            [] => None,
            [lo, hi] => {
                let parse = |s: &str| {
                    s.parse::<f64>()
                        .map_err(|_| RecordError::InvalidInput(format!("bound is not a number: {s}")))
                };
                Some(StrengthRange::new(parse(*lo)?, parse(*hi)?)?)
            }
            _ => anyhow::bail!("usage: filter [lo hi]"),
        };

        match FilterView::build(self.store.list(), range, &self.config.display_date_format) {
            Some(view) => Ok(render::filter_text(&view)),
            None => Ok("Filtering needs at least two tests.".to_string()),
        }
    }

    fn chart(&self) -> Result<String> {
        if self.store.is_empty() {
            return Ok("No tests recorded.".to_string());
        }
        Ok(render::strength_table(&strength_bars(self.store.list())).to_string())
    }

    fn hist(&self) -> Result<String> {
        if self.store.len() <= HISTOGRAM_THRESHOLD {
            return Ok(format!(
                "The histogram needs more than {HISTOGRAM_THRESHOLD} tests."
            ));
        }
        let bins = histogram(self.store.list(), self.config.histogram_max_bins)?;
        Ok(render::histogram_table(&bins).to_string())
    }

    fn export(&self, args: &[&str], today: NaiveDate) -> Result<String> {
        let path = match args {
            [] => write_csv(
                self.store.list(),
                &self.config.export_dir,
                &self.config.export_prefix,
                today,
            )?,
            [path] => {
                let path = PathBuf::from(path);
                write_csv_to(self.store.list(), &path)?;
                path
            }
            _ => anyhow::bail!("usage: export [path]"),
        };
        Ok(format!(
            "Exported {} tests to {} ({CSV_MIME_TYPE})",
            self.store.len(),
            path.display()
        ))
    }

    fn import(&mut self, args: &[&str]) -> Result<String> {
        let [path] = args else {
            anyhow::bail!("usage: import <path>");
        };
        let rows = read_csv(Path::new(path))?;
        let summary = self.store.import(rows);

        let mut text = format!("Imported {} tests", summary.added);
        if !summary.rejected.is_empty() {
            text.push_str(&format!(", skipped {}:", summary.rejected.len()));
            for r in &summary.rejected {
                text.push_str(&format!("\n  line {}: {}", r.line, r.error));
            }
        }
        Ok(text)
    }
}

/// Feed lines from `input` to the session until it ends or input runs out.
pub fn run(session: &mut Session, input: impl BufRead, mut out: impl Write) -> Result<()> {
    writeln!(out, "cylab session {} (type `help` for commands)", session.id())?;
    for line in input.lines() {
        let line = line?;
        let today = Local::now().date_naive();
        if session.handle(&line, &mut out, today)? == Flow::Quit {
            break;
        }
    }
    Ok(())
}

pub fn execute(config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let mut session = Session::new(config);

    let span = tracing::info_span!("session", id = %session.id());
    let _guard = span.enter();
    tracing::info!("session started");

    let stdin = io::stdin();
    let stdout = io::stdout();
    run(&mut session, stdin.lock(), stdout.lock())?;

    tracing::info!(tests = session.store.len(), "session ended");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn run_lines(session: &mut Session, lines: &[&str]) -> String {
        let mut out = Vec::new();
        for line in lines {
            session.handle(line, &mut out, day(2024, 6, 1)).unwrap();
        }
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn add_and_list() {
        let mut session = Session::new(CylabConfig::default());
        let out = run_lines(
            &mut session,
            &["add CIL-001 28.5 2024-05-01", "add CIL-002 31 02/05/2024", "list"],
        );

        assert!(out.contains("Added CIL-001 (28.50 MPa, 01/05/2024)"));
        assert!(out.contains("Added CIL-002 (31.00 MPa, 02/05/2024)"));
        let newest = out.rfind("CIL-002").unwrap();
        let oldest = out.rfind("CIL-001").unwrap();
        assert!(newest < oldest, "most recent test should be listed first");
    }

    #[test]
    fn add_defaults_to_today() {
        let mut session = Session::new(CylabConfig::default());
        let out = run_lines(&mut session, &["add CIL-001 28.5"]);
        assert!(out.contains("01/06/2024"));
    }

    #[test]
    fn errors_keep_the_session_alive() {
        let mut session = Session::new(CylabConfig::default());
        let out = run_lines(
            &mut session,
            &[
                "add CIL-001 28.5",
                "add CIL-001 30",
                "add CIL-002 150",
                "add CIL-003 abc",
                "add CIL-004",
                "stats",
            ],
        );

        assert!(out.contains("Error: duplicate id: CIL-001"));
        assert!(out.contains("Error: invalid input: strength must be in (0, 100] MPa"));
        assert!(out.contains("Error: invalid input: strength is not a number: abc"));
        assert!(out.contains("usage: add"));
        assert_eq!(session.store.len(), 1);
    }

    #[test]
    fn stats_and_filter() {
        let mut session = Session::new(CylabConfig::default());
        let out = run_lines(
            &mut session,
            &[
                "stats",
                "add A 10",
                "filter",
                "add B 20",
                "add C 30",
                "stats",
                "filter 20 20",
                "filter 30 10",
            ],
        );

        assert!(out.contains("No tests recorded."));
        assert!(out.contains("Filtering needs at least two tests."));
        assert!(out.contains("20.00 MPa"));
        assert!(out.contains("showing 1 of 3 tests"));
        assert!(out.contains("exceeds upper bound"));
    }

    #[test]
    fn hist_needs_enough_tests() {
        let mut session = Session::new(CylabConfig::default());
        let out = run_lines(&mut session, &["add A 10", "hist"]);
        assert!(out.contains("needs more than 3 tests"));

        let out = run_lines(&mut session, &["add B 20", "add C 30", "add D 40", "hist"]);
        assert!(out.contains("10.00 to 20.00"));
    }

    #[test]
    fn chart_shows_every_cylinder() {
        let mut session = Session::new(CylabConfig::default());
        let out = run_lines(&mut session, &["chart"]);
        assert!(out.contains("No tests recorded."));

        let out = run_lines(&mut session, &["add A 40", "add B 20", "chart"]);
        assert!(out.contains(&"#".repeat(30)));
        assert!(out.contains("20.00"));
    }

    #[test]
    fn export_clear_import() {
        let dir = tempfile::tempdir().unwrap();
        let config = CylabConfig {
            export_dir: dir.path().to_path_buf(),
            ..Default::default()
        };
        let mut session = Session::new(config);

        let out = run_lines(&mut session, &["add CIL-001 28.5 2024-05-01", "export"]);
        let path = dir.path().join("ensayos_concreto_20240601.csv");
        assert!(out.contains("Exported 1 tests"));
        assert!(out.contains("text/csv"));
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "ID,Strength_MPa,Test_Date\nCIL-001,28.5,2024-05-01\n"
        );

        let import = format!("import {}", path.display());
        let out = run_lines(&mut session, &[import.as_str(), "clear", import.as_str()]);
        assert!(out.contains("Imported 0 tests, skipped 1:"));
        assert!(out.contains("line 2: duplicate id: CIL-001"));
        assert!(out.contains("Cleared all tests."));
        assert!(out.contains("Imported 1 tests"));
        assert_eq!(session.store.len(), 1);
    }

    #[test]
    fn quit_and_unknown_commands() {
        let mut session = Session::new(CylabConfig::default());
        let mut out = Vec::new();
        let today = day(2024, 6, 1);

        assert_eq!(session.handle("", &mut out, today).unwrap(), Flow::Continue);
        assert_eq!(session.handle("frobnicate", &mut out, today).unwrap(), Flow::Continue);
        assert_eq!(session.handle("quit", &mut out, today).unwrap(), Flow::Quit);
        assert!(String::from_utf8(out).unwrap().contains("Unknown command: frobnicate"));
    }
}
