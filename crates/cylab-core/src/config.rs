//! Laboratory configuration.

use std::fmt::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::export::DEFAULT_EXPORT_PREFIX;
use crate::model::{DEFAULT_MAX_STRENGTH, DISPLAY_DATE_FORMAT};
use crate::statistics::DEFAULT_HISTOGRAM_BINS;
use crate::store::RecordStore;

/// Top-level cylab configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CylabConfig {
    /// Highest accepted strength in MPa.
    #[serde(default = "default_max_strength")]
    pub max_strength: f64,
    /// File name prefix for CSV exports.
    #[serde(default = "default_export_prefix")]
    pub export_prefix: String,
    /// Directory CSV exports are written to.
    #[serde(default = "default_export_dir")]
    pub export_dir: PathBuf,
    /// Cap on histogram bins.
    #[serde(default = "default_histogram_bins")]
    pub histogram_max_bins: usize,
    /// `chrono` format string for dates in tables.
    #[serde(default = "default_display_date_format")]
    pub display_date_format: String,
}

fn default_max_strength() -> f64 {
    DEFAULT_MAX_STRENGTH
}
fn default_export_prefix() -> String {
    DEFAULT_EXPORT_PREFIX.to_string()
}
fn default_export_dir() -> PathBuf {
    PathBuf::from(".")
}
fn default_histogram_bins() -> usize {
    DEFAULT_HISTOGRAM_BINS
}
fn default_display_date_format() -> String {
    DISPLAY_DATE_FORMAT.to_string()
}

impl Default for CylabConfig {
    fn default() -> Self {
        Self {
            max_strength: default_max_strength(),
            export_prefix: default_export_prefix(),
            export_dir: default_export_dir(),
            histogram_max_bins: default_histogram_bins(),
            display_date_format: default_display_date_format(),
        }
    }
}

impl CylabConfig {
    /// Reject settings the store or exporter cannot work with.
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            self.max_strength.is_finite() && self.max_strength > 0.0,
            "max_strength must be a positive number, got {}",
            self.max_strength
        );
        anyhow::ensure!(
            self.histogram_max_bins >= 1,
            "histogram_max_bins must be at least 1"
        );
        anyhow::ensure!(
            !self.export_prefix.trim().is_empty(),
            "export_prefix must not be blank"
        );
        // A plain date cannot fill time or offset fields, so those fail here too.
        let mut sample = String::new();
        anyhow::ensure!(
            write!(sample, "{}", NaiveDate::MIN.format(&self.display_date_format)).is_ok(),
            "invalid display_date_format: {} (only date fields are allowed)",
            self.display_date_format
        );
        Ok(())
    }

    /// A fresh, empty store honouring `max_strength`.
    pub fn new_store(&self) -> RecordStore {
        RecordStore::with_max_strength(self.max_strength)
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `cylab.toml` in the current directory
/// 2. `~/.config/cylab/config.toml`
///
/// Environment variable override: `CYLAB_EXPORT_DIR`.
pub fn load_config() -> Result<CylabConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<CylabConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("cylab.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            tracing::debug!(path = %path.display(), "loaded config");
            toml::from_str::<CylabConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => CylabConfig::default(),
    };

    if let Ok(dir) = std::env::var("CYLAB_EXPORT_DIR") {
        config.export_dir = PathBuf::from(dir);
    }

    config.validate()?;
    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("cylab"))
}
