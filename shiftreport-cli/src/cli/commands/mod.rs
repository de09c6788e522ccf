pub mod attendants;
pub mod config;
pub mod inspect;
pub mod report;

use anyhow::{Context, Result};

use super::SourceArgs;
use crate::config::Config;
use crate::report::types::NormalizedBatch;
use crate::report::{SpreadsheetSource, detect_and_normalize};

/// Read and normalize the sheet named by the command line or config
pub(crate) fn load_batch(args: &SourceArgs, config: &Config) -> Result<NormalizedBatch> {
    if !args.file.exists() {
        anyhow::bail!("Source file does not exist: {}", args.file.display());
    }

    let sheet = args.sheet.as_deref().or(config.ingest.sheet.as_deref());
    let source = SpreadsheetSource::path(&args.file);

    detect_and_normalize(&source, sheet, &config.ingest_options())
        .with_context(|| format!("Failed to load {}", args.file.display()))
}
