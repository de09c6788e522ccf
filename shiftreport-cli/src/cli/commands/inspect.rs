use anyhow::Result;
use colored::*;

use crate::cli::{SourceArgs, configure_color};
use crate::config::Config;
use crate::report::types::NormalizedBatch;

use super::load_batch;

fn summary_lines(batch: &NormalizedBatch) -> Vec<(&'static str, String)> {
    let header = if batch.header_detected {
        format!("row {}", batch.header_row + 1)
    } else {
        "row 1 (no signature found)".to_string()
    };

    let first = batch.records.iter().map(|r| r.timestamp).min();
    let last = batch.records.iter().map(|r| r.timestamp).max();
    let range = match (first, last) {
        (Some(a), Some(b)) => format!("{} .. {}", a, b),
        _ => "-".to_string(),
    };

    let stats = &batch.stats;
    vec![
        ("Sheet", batch.sheet.clone()),
        ("Record type", batch.record_type.to_string()),
        ("Header", header),
        ("Columns", batch.columns.join(", ")),
        ("Rows seen", stats.rows_seen.to_string()),
        ("Blank rows", stats.blank_rows.to_string()),
        ("Kept", stats.kept.to_string()),
        ("No timestamp", stats.missing_timestamp.to_string()),
        ("No shift", stats.missing_shift_reference.to_string()),
        ("No attendant", stats.missing_attendant.to_string()),
        ("Off schedule", stats.off_schedule.to_string()),
        ("Attendants", batch.attendants().len().to_string()),
        ("Time range", range),
    ]
}

/// Show what detection and normalization made of a sheet
pub fn handle_inspect_command(args: SourceArgs, config: &Config) -> Result<()> {
    configure_color(args.no_color);

    let batch = load_batch(&args, config)?;

    for (label, value) in summary_lines(&batch) {
        println!("{}{}", format!("{:<14}", format!("{}:", label)).bold(), value);
    }

    if !batch.header_detected {
        println!();
        println!(
            "{}",
            "Header row was not recognised; most rows may have been dropped".yellow()
        );
    }

    Ok(())
}
