use anyhow::Result;
use colored::*;

use crate::cli::{SourceArgs, configure_color};
use crate::config::Config;

use super::load_batch;

/// List distinct attendants, one per line
pub fn handle_attendants_command(args: SourceArgs, config: &Config) -> Result<()> {
    configure_color(args.no_color);

    let batch = load_batch(&args, config)?;
    let attendants = batch.attendants();

    if attendants.is_empty() {
        eprintln!("{}", "No attendants found".yellow());
        return Ok(());
    }

    for attendant in &attendants {
        println!("{}", attendant);
    }
    eprintln!(
        "{}",
        format!("{} attendants in {} ({})", attendants.len(), batch.sheet, batch.record_type).dimmed()
    );

    Ok(())
}
