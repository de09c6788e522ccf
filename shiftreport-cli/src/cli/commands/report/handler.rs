//! Report command handler

use anyhow::Result;
use colored::*;

use super::compose::{TableSelection, compose_report};
use crate::cli::commands::load_batch;
use crate::cli::output::{print_tables, tables_json};
use crate::cli::{OutputFormat, ReportArgs, configure_color};
use crate::config::Config;
use crate::report::{AttendantFilter, export_to_path, tables, write_csv_dir};

/// Handle the report command: load, aggregate, print and export
pub fn handle_report_command(args: ReportArgs, config: &Config) -> Result<()> {
    configure_color(args.source.no_color);

    for name in &args.tables {
        if !tables::ALL.contains(&name.as_str()) {
            anyhow::bail!(
                "Unknown table '{}' (expected one of: {})",
                name,
                tables::ALL.join(", ")
            );
        }
    }

    let batch = load_batch(&args.source, config)?;

    let filter = if args.attendants.is_empty() {
        AttendantFilter::All
    } else {
        let known = batch.attendants();
        for id in &args.attendants {
            if !known.contains(id) {
                log::warn!("Attendant '{}' does not appear in {}", id, batch.sheet);
            }
        }
        AttendantFilter::only(args.attendants.iter().cloned())
    };

    let selection = TableSelection::resolve(&args.tables, config.report.tables.as_deref());
    let set = compose_report(
        batch.record_type,
        &batch.records,
        &filter,
        &config.report.unfiltered_tables,
        &selection,
        &config.aggregate_options(),
    );

    match args.format {
        OutputFormat::Text => print_tables(&set),
        OutputFormat::Json => println!("{}", tables_json(&set)?),
    }

    let output = args.output.unwrap_or_else(|| config.export.output.clone());
    export_to_path(&set, &config.export_options(), &output)?;
    eprintln!(
        "Report saved to: {} ({} tables, {} records)",
        output.display().to_string().bright_green(),
        set.len(),
        batch.stats.kept
    );

    if let Some(dir) = args.csv_dir {
        let paths = write_csv_dir(&set, &dir)?;
        eprintln!(
            "CSV files saved to: {} ({} files)",
            dir.display().to_string().bright_green(),
            paths.len()
        );
    }

    Ok(())
}
