//! Write a ReportSet to an Excel workbook, one sheet per table

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use unicode_width::UnicodeWidthStr;

use crate::report::types::{ColumnKind, ReportSet, ReportTable, TableValue};

use super::ExportOptions;

/// Excel's limit on sheet name length
pub const MAX_SHEET_NAME: usize = 31;

const FORBIDDEN_SHEET_CHARS: [char; 7] = ['[', ']', ':', '*', '?', '/', '\\'];

/// Cell formats shared by every sheet
struct Formats {
    header: Format,
    decimal: Format,
    date: Format,
    datetime: Format,
}

impl Formats {
    fn new() -> Self {
        Self {
            header: Format::new().set_bold(),
            decimal: Format::new().set_num_format("0.00"),
            date: Format::new().set_num_format("yyyy-mm-dd"),
            datetime: Format::new().set_num_format("yyyy-mm-dd hh:mm:ss"),
        }
    }
}

/// Sheet names for a sequence of table names: legal, at most 31 chars,
/// unique ignoring case
pub fn sheet_names<'a>(table_names: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut taken: HashSet<String> = HashSet::new();
    let mut names = Vec::new();

    for table_name in table_names {
        let cleaned: String = table_name
            .chars()
            .map(|c| if FORBIDDEN_SHEET_CHARS.contains(&c) { '_' } else { c })
            .collect();
        let cleaned = cleaned.trim_matches('\'');
        let base: String = if cleaned.is_empty() {
            "Sheet".to_string()
        } else {
            cleaned.chars().take(MAX_SHEET_NAME).collect()
        };

        let mut candidate = base.clone();
        let mut n = 2;
        while taken.contains(&candidate.to_lowercase()) {
            let suffix = format!(" ({})", n);
            let keep = MAX_SHEET_NAME - suffix.chars().count();
            candidate = format!("{}{}", base.chars().take(keep).collect::<String>(), suffix);
            n += 1;
        }

        taken.insert(candidate.to_lowercase());
        names.push(candidate);
    }

    names
}

/// Column widths: longest rendered value plus padding, capped
fn column_widths(table: &ReportTable, options: &ExportOptions) -> Vec<f64> {
    table
        .columns
        .iter()
        .enumerate()
        .map(|(col, column)| {
            let longest = table
                .rows
                .iter()
                .filter_map(|row| row.get(col))
                .map(|value| value.to_string().width())
                .chain(std::iter::once(column.name.width()))
                .max()
                .unwrap_or(0);

            // mixed columns (e.g. QA values) may hold dates under a text kind
            let holds_dates = column.kind.is_temporal()
                || table.rows.iter().any(|row| {
                    matches!(row.get(col), Some(TableValue::Date(_) | TableValue::DateTime(_)))
                });

            let mut width = longest + options.column_padding;
            if holds_dates {
                width += options.date_padding;
            }
            (width as f64).min(options.max_column_width)
        })
        .collect()
}

fn write_value(
    ws: &mut Worksheet,
    row: u32,
    col: u16,
    value: &TableValue,
    kind: ColumnKind,
    formats: &Formats,
) -> Result<()> {
    match value {
        TableValue::Empty => { /* Leave cell empty */ }
        TableValue::Text(s) => { ws.write_string(row, col, s)?; }
        TableValue::Int(i) => { ws.write_number(row, col, *i as f64)?; }
        TableValue::Decimal(d) => match d.to_f64() {
            Some(f) => { ws.write_number_with_format(row, col, f, &formats.decimal)?; }
            None => { ws.write_string(row, col, &d.to_string())?; }
        },
        TableValue::Date(d) => { ws.write_datetime_with_format(row, col, d, &formats.date)?; }
        TableValue::DateTime(dt) => {
            // A datetime in a date column keeps only its date format
            let format = if kind == ColumnKind::Date { &formats.date } else { &formats.datetime };
            ws.write_datetime_with_format(row, col, dt, format)?;
        }
    }
    Ok(())
}

fn write_table(
    ws: &mut Worksheet,
    table: &ReportTable,
    options: &ExportOptions,
    formats: &Formats,
) -> Result<()> {
    for (col, column) in table.columns.iter().enumerate() {
        ws.write_string_with_format(0, col as u16, &column.name, &formats.header)?;
    }
    ws.set_freeze_panes(1, 0)?;

    for (row_idx, row) in table.rows.iter().enumerate() {
        let row_num = (row_idx + 1) as u32;
        for (col, (value, column)) in row.iter().zip(&table.columns).enumerate() {
            write_value(ws, row_num, col as u16, value, column.kind, formats)
                .with_context(|| format!("Failed to write {} row {}", table.name, row_num))?;
        }
    }

    for (col, width) in column_widths(table, options).into_iter().enumerate() {
        ws.set_column_width(col as u16, width)?;
    }

    Ok(())
}

fn build_workbook(set: &ReportSet, options: &ExportOptions) -> Result<Workbook> {
    let mut workbook = Workbook::new();
    let formats = Formats::new();
    let names = sheet_names(set.iter().map(|t| t.name.as_str()));

    for (table, sheet_name) in set.iter().zip(names) {
        let worksheet = workbook.add_worksheet();
        worksheet
            .set_name(&sheet_name)
            .with_context(|| format!("Invalid sheet name: {}", sheet_name))?;
        write_table(worksheet, table, options, &formats)?;
    }

    Ok(workbook)
}

/// Export a report set as an in-memory .xlsx document
pub fn export(set: &ReportSet, options: &ExportOptions) -> Result<Vec<u8>> {
    let mut workbook = build_workbook(set, options)?;
    let bytes = workbook
        .save_to_buffer()
        .context("Failed to serialize report workbook")?;

    log::debug!("Exported {} tables ({} bytes)", set.len(), bytes.len());
    Ok(bytes)
}

/// Export a report set to an .xlsx file
pub fn export_to_path(set: &ReportSet, options: &ExportOptions, path: &Path) -> Result<()> {
    let mut workbook = build_workbook(set, options)?;
    workbook
        .save(path)
        .with_context(|| format!("Failed to save Excel file: {}", path.display()))?;

    log::info!("Report exported to: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::excel::{SpreadsheetSource, read_sheet};
    use crate::report::types::{Cell, Column};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn monthly() -> ReportTable {
        let mut table = ReportTable::new(
            "Monthly Summary",
            vec![
                Column::new("Period", ColumnKind::Text),
                Column::new("Operations", ColumnKind::Integer),
                Column::new("Amount", ColumnKind::Decimal),
            ],
        );
        table.push_row(vec!["Marzo 2024".into(), 3usize.into(), dec!(140.50).into()]);
        table
    }

    #[test]
    fn test_sheet_names_truncate_and_dedupe() {
        let names = sheet_names([
            "Payout Category by Machine (Month)",
            "Payout Category by Machine (Monthly)",
            "QA",
            "qa",
            "a/b",
        ]);

        assert_eq!(names[0], "Payout Category by Machine (Mon");
        assert_eq!(names[1], "Payout Category by Machine  (2)");
        assert_eq!(names[2], "QA");
        assert_eq!(names[3], "qa (2)");
        assert_eq!(names[4], "a_b");
        assert!(names.iter().all(|n| n.chars().count() <= MAX_SHEET_NAME));
    }

    #[test]
    fn test_column_widths_are_capped() {
        let mut table = ReportTable::new(
            "Wide",
            vec![
                Column::new("Id", ColumnKind::Text),
                Column::new("Day", ColumnKind::Date),
            ],
        );
        table.push_row(vec![
            "x".repeat(80).into(),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap().into(),
        ]);

        let widths = column_widths(&table, &ExportOptions::default());
        assert_eq!(widths[0], 40.0);
        // "2024-03-01" is 10 wide, + padding 2 + date padding 4
        assert_eq!(widths[1], 16.0);
    }

    #[test]
    fn test_dates_in_text_column_get_date_padding() {
        let mut table = ReportTable::new(
            "QA",
            vec![
                Column::new("Metric", ColumnKind::Text),
                Column::new("Value", ColumnKind::Text),
            ],
        );
        let ts = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap().and_hms_opt(10, 0, 0).unwrap();
        table.push_row(vec!["rows_used".into(), 3usize.into()]);
        table.push_row(vec!["min_timestamp".into(), ts.into()]);

        let widths = column_widths(&table, &ExportOptions::default());
        // "rows_used" + 2, no date padding
        assert_eq!(widths[0], 15.0);
        // "2024-03-01 10:00:00" is 19 wide, + padding 2 + date padding 4
        assert_eq!(widths[1], 25.0);
    }

    #[test]
    fn test_export_reads_back() {
        let mut set = ReportSet::new();
        set.insert(monthly());

        let mut records = ReportTable::new(
            "Attendant Record",
            vec![
                Column::new("Attendant", ColumnKind::Text),
                Column::new("Shift Day", ColumnKind::Date),
            ],
        );
        records.push_row(vec!["A1".into(), NaiveDate::from_ymd_opt(2024, 3, 1).unwrap().into()]);
        set.insert(records);

        let bytes = export(&set, &ExportOptions::default()).unwrap();
        let source = SpreadsheetSource::bytes("report.xlsx", bytes);

        let sheet = read_sheet(&source, Some("Monthly Summary")).unwrap();
        assert_eq!(sheet.rows[0][0], Cell::Text("Period".into()));
        assert_eq!(sheet.rows[1][0], Cell::Text("Marzo 2024".into()));
        assert_eq!(sheet.rows[1][1], Cell::Number(3.0));
        assert_eq!(sheet.rows[1][2], Cell::Number(140.5));

        let sheet = read_sheet(&source, Some("Attendant Record")).unwrap();
        let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
        assert_eq!(sheet.rows[1][1], Cell::DateTime(day));
    }

    #[test]
    fn test_export_empty_table_keeps_header() {
        let mut set = ReportSet::new();
        set.insert(ReportTable::new("QA", vec![Column::new("Metric", ColumnKind::Text)]));

        let bytes = export(&set, &ExportOptions::default()).unwrap();
        let sheet = read_sheet(&SpreadsheetSource::bytes("r.xlsx", bytes), Some("QA")).unwrap();

        assert_eq!(sheet.rows.len(), 1);
    }
}
