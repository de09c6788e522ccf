//! Command line interface

pub mod commands;
pub mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use is_terminal::IsTerminal;

use crate::config::Config;

#[derive(Parser, Debug)]
#[command(name = "shiftreport")]
#[command(about = "Shift-aware operations and payout reports from casino floor spreadsheets", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file (defaults to $SHIFTREPORT_CONFIG, then the user config dir)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Show debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build report tables and write them to a workbook
    Report(ReportArgs),
    /// List the attendants found in a source sheet
    Attendants(SourceArgs),
    /// Show header detection and row statistics for a source sheet
    Inspect(SourceArgs),
    /// Print the effective configuration
    Config,
}

/// Which spreadsheet to read
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Source workbook (xlsx, xlsm, xls, xlsb, ods)
    pub file: PathBuf,

    /// Sheet to read (defaults to the configured sheet, then the first one)
    #[arg(short, long)]
    pub sheet: Option<String>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ReportArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Restrict to these attendants (repeatable)
    #[arg(short, long = "attendant", value_name = "ID")]
    pub attendants: Vec<String>,

    /// Only keep these tables (repeatable)
    #[arg(short, long = "table", value_name = "NAME")]
    pub tables: Vec<String>,

    /// Output workbook (defaults to the configured output)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Also write one CSV per table into this directory
    #[arg(long, value_name = "DIR")]
    pub csv_dir: Option<PathBuf>,

    /// How tables are printed
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Aligned tables
    Text,
    /// Pretty-printed JSON
    Json,
}

/// Turn off colors when asked or when stdout is not a terminal
pub fn configure_color(no_color: bool) {
    if no_color || !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }
}

/// Dispatch a parsed command line
pub fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Report(args) => commands::report::handle_report_command(args, &config),
        Commands::Attendants(args) => commands::attendants::handle_attendants_command(args, &config),
        Commands::Inspect(args) => commands::inspect::handle_inspect_command(args, &config),
        Commands::Config => commands::config::handle_config_command(&config),
    }
}
