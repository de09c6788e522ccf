//! CSV export, one file per report table

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use csv::Writer;

use crate::report::types::{ReportSet, ReportTable};

/// File stem for a table: lowercase ascii words joined by underscores
pub fn csv_file_stem(table_name: &str) -> String {
    let stem = table_name
        .to_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_");

    if stem.is_empty() { "table".to_string() } else { stem }
}

/// Write one table as CSV (header + rows)
pub fn write_table_csv<W: Write>(table: &ReportTable, writer: W) -> Result<()> {
    let mut wtr = Writer::from_writer(writer);

    wtr.write_record(table.columns.iter().map(|c| c.name.as_str()))
        .context("Failed to write CSV header")?;

    for (idx, row) in table.rows.iter().enumerate() {
        wtr.write_record(row.iter().map(|v| v.to_string()))
            .with_context(|| format!("Failed to write {} row {}", table.name, idx + 1))?;
    }

    wtr.flush().context("Failed to flush CSV writer")?;
    Ok(())
}

/// Write every table into `dir`, returning the created paths
pub fn write_csv_dir(set: &ReportSet, dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    let mut paths = Vec::with_capacity(set.len());
    for table in set.iter() {
        let mut path = dir.join(format!("{}.csv", csv_file_stem(&table.name)));
        let mut n = 2;
        while paths.contains(&path) {
            path = dir.join(format!("{}_{}.csv", csv_file_stem(&table.name), n));
            n += 1;
        }

        let file = std::fs::File::create(&path)
            .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;
        write_table_csv(table, file)?;

        log::info!("CSV file exported to: {}", path.display());
        paths.push(path);
    }

    Ok(paths)
}
