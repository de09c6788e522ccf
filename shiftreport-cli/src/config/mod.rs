//! Configuration loaded from a TOML file
//!
//! Every field has a default, so a missing or partial file is valid.
//! Lookup order: explicit path, then `SHIFTREPORT_CONFIG`, then
//! `<config dir>/shiftreport/config.toml`, else built-in defaults.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::report::schema::DEFAULT_SCAN_ROWS;
use crate::report::tables;
use crate::report::types::MonthLocale;
use crate::report::{AggregateOptions, ExportOptions, IngestOptions};

/// Environment variable naming a config file
pub const CONFIG_ENV: &str = "SHIFTREPORT_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub ingest: IngestConfig,
    pub report: ReportConfig,
    pub export: ExportConfig,
}

/// Source reading settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Leading rows searched for a header signature
    pub header_scan_rows: usize,
    /// Sheet read when none is given on the command line
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sheet: Option<String>,
}

/// Report composition settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Month names used in period labels
    pub locale: MonthLocale,
    /// Tables that ignore the attendant filter
    pub unfiltered_tables: Vec<String>,
    /// Tables kept when none are selected on the command line
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tables: Option<Vec<String>>,
}

/// Workbook layout settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub max_column_width: f64,
    pub column_padding: usize,
    pub date_padding: usize,
    /// Default output workbook
    pub output: PathBuf,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            header_scan_rows: DEFAULT_SCAN_ROWS,
            sheet: None,
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            locale: MonthLocale::default(),
            unfiltered_tables: vec![
                tables::MONTHLY_SUMMARY.to_string(),
                tables::HOURLY_DISTRIBUTION.to_string(),
            ],
            tables: None,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        let layout = ExportOptions::default();
        Self {
            max_column_width: layout.max_column_width,
            column_padding: layout.column_padding,
            date_padding: layout.date_padding,
            output: PathBuf::from("reporte_operaciones.xlsx"),
        }
    }
}

/// Default location of the config file
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("shiftreport").join("config.toml"))
}

/// Check that every name is a known table
fn check_table_names<'a>(setting: &str, names: impl IntoIterator<Item = &'a String>) -> Result<()> {
    for name in names {
        if !tables::ALL.contains(&name.as_str()) {
            anyhow::bail!(
                "Unknown table '{}' in {} (expected one of: {})",
                name,
                setting,
                tables::ALL.join(", ")
            );
        }
    }
    Ok(())
}

impl Config {
    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).context("Invalid configuration")?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }

    pub fn validate(&self) -> Result<()> {
        if self.ingest.header_scan_rows == 0 {
            anyhow::bail!("ingest.header_scan_rows must be at least 1");
        }
        if !(self.export.max_column_width > 0.0) {
            anyhow::bail!("export.max_column_width must be positive");
        }
        check_table_names("report.unfiltered_tables", &self.report.unfiltered_tables)?;
        if let Some(selected) = &self.report.tables {
            check_table_names("report.tables", selected)?;
        }
        Ok(())
    }

    /// Read a config file
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to load config file: {}", path.display()))
    }

    /// Load from the first location in the lookup order
    ///
    /// An explicit or environment-named file must exist; the default file is
    /// optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            log::debug!("Loading config from --config: {}", path.display());
            return Self::from_path(path);
        }

        if let Ok(path) = std::env::var(CONFIG_ENV) {
            if !path.trim().is_empty() {
                log::debug!("Loading config from {}: {}", CONFIG_ENV, path);
                return Self::from_path(Path::new(&path));
            }
        }

        match default_config_path() {
            Some(path) if path.exists() => {
                log::debug!("Loading config from {}", path.display());
                Self::from_path(&path)
            }
            _ => {
                log::debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn ingest_options(&self) -> IngestOptions {
        IngestOptions {
            header_scan_rows: self.ingest.header_scan_rows,
        }
    }

    pub fn aggregate_options(&self) -> AggregateOptions {
        AggregateOptions {
            locale: self.report.locale,
        }
    }

    pub fn export_options(&self) -> ExportOptions {
        ExportOptions {
            max_column_width: self.export.max_column_width,
            column_padding: self.export.column_padding,
            date_padding: self.export.date_padding,
        }
    }
}
