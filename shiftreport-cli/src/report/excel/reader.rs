//! Read one sheet of a source workbook into raw cells

use std::io::{Cursor, Read, Seek};
use std::path::PathBuf;

use calamine::{Data, Reader, Sheets, open_workbook_auto, open_workbook_auto_from_rs};

use crate::report::error::IngestError;
use crate::report::normalize::parse::{excel_serial_to_datetime, parse_datetime_str};
use crate::report::types::{Cell, RawSheet};

/// Where a source workbook comes from
#[derive(Debug, Clone)]
pub enum SpreadsheetSource {
    /// File on disk; format detected from the extension
    Path(PathBuf),
    /// In-memory upload; format detected from the content
    Bytes { name: String, data: Vec<u8> },
}

impl SpreadsheetSource {
    pub fn path(path: impl Into<PathBuf>) -> Self {
        SpreadsheetSource::Path(path.into())
    }

    pub fn bytes(name: impl Into<String>, data: Vec<u8>) -> Self {
        SpreadsheetSource::Bytes {
            name: name.into(),
            data,
        }
    }

    /// Name used in messages
    pub fn name(&self) -> String {
        match self {
            SpreadsheetSource::Path(p) => p.display().to_string(),
            SpreadsheetSource::Bytes { name, .. } => name.clone(),
        }
    }
}

/// Convert a calamine cell into an engine cell
fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Float(f) => Cell::Number(*f),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => excel_serial_to_datetime(dt.as_f64())
            .map(Cell::DateTime)
            .unwrap_or(Cell::Number(dt.as_f64())),
        Data::DateTimeIso(s) => parse_datetime_str(s)
            .map(Cell::DateTime)
            .unwrap_or_else(|| Cell::Text(s.clone())),
        Data::DurationIso(s) => Cell::Text(s.clone()),
    }
}

fn read_from<RS: Read + Seek>(
    mut workbook: Sheets<RS>,
    source_name: &str,
    sheet: Option<&str>,
) -> Result<RawSheet, IngestError> {
    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();

    let sheet_name = match sheet {
        Some(requested) => {
            if !sheet_names.iter().any(|n| n == requested) {
                return Err(IngestError::MissingSheet {
                    requested: requested.to_string(),
                    available: sheet_names,
                });
            }
            requested.to_string()
        }
        None => sheet_names
            .first()
            .cloned()
            .ok_or_else(|| IngestError::EmptyWorkbook {
                source_name: source_name.to_string(),
            })?,
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| IngestError::SheetRead {
            sheet: sheet_name.clone(),
            reason: e.to_string(),
        })?;

    // calamine ranges start at the first used cell; pad back to A1
    let (first_row, first_col) = range.start().unwrap_or((0, 0));
    let mut rows: Vec<Vec<Cell>> = vec![Vec::new(); first_row as usize];
    rows.extend(range.rows().map(|row| {
        std::iter::repeat_n(Cell::Empty, first_col as usize)
            .chain(row.iter().map(cell_from_data))
            .collect()
    }));

    log::debug!(
        "Read sheet '{}' from '{}': {} rows",
        sheet_name,
        source_name,
        rows.len()
    );

    Ok(RawSheet::new(sheet_name, rows))
}

/// Read a sheet (by name, or the first one) from a source workbook
pub fn read_sheet(source: &SpreadsheetSource, sheet: Option<&str>) -> Result<RawSheet, IngestError> {
    let source_name = source.name();
    let unreadable = |e: calamine::Error| IngestError::UnreadableSource {
        source_name: source_name.clone(),
        reason: e.to_string(),
    };

    match source {
        SpreadsheetSource::Path(path) => {
            let workbook = open_workbook_auto(path).map_err(unreadable)?;
            read_from(workbook, &source_name, sheet)
        }
        SpreadsheetSource::Bytes { data, .. } => {
            let workbook = open_workbook_auto_from_rs(Cursor::new(data.clone())).map_err(unreadable)?;
            read_from(workbook, &source_name, sheet)
        }
    }
}
