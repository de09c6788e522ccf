//! Terminal rendering of report tables

use anyhow::{Context, Result};
use colored::*;
use unicode_width::UnicodeWidthStr;

use crate::report::types::{ColumnKind, ReportSet, ReportTable};

/// Pad `text` to `width` display columns, right-aligned for numbers
fn pad(text: &str, width: usize, right: bool) -> String {
    let fill = " ".repeat(width.saturating_sub(text.width()));
    if right {
        format!("{}{}", fill, text)
    } else {
        format!("{}{}", text, fill)
    }
}

/// Render one table as aligned plain text (no colors)
pub fn table_lines(table: &ReportTable) -> Vec<String> {
    let cells: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|row| row.iter().map(|v| v.to_string()).collect())
        .collect();

    let widths: Vec<usize> = table
        .columns
        .iter()
        .enumerate()
        .map(|(col, column)| {
            cells
                .iter()
                .filter_map(|row| row.get(col))
                .map(|s| s.width())
                .chain(std::iter::once(column.name.width()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let numeric: Vec<bool> = table
        .columns
        .iter()
        .map(|c| matches!(c.kind, ColumnKind::Integer | ColumnKind::Decimal))
        .collect();

    let mut lines = Vec::with_capacity(cells.len() + 2);
    let header = table
        .columns
        .iter()
        .zip(&widths)
        .map(|(c, w)| pad(&c.name, *w, false))
        .collect::<Vec<_>>()
        .join("  ");
    lines.push(header.trim_end().to_string());
    lines.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("  "),
    );

    for row in &cells {
        let line = row
            .iter()
            .enumerate()
            .map(|(col, s)| pad(s, widths[col], numeric[col]))
            .collect::<Vec<_>>()
            .join("  ");
        lines.push(line.trim_end().to_string());
    }

    lines
}

/// Print every table with a colored title
pub fn print_tables(set: &ReportSet) {
    for table in set.iter() {
        println!("{} {}", table.name.bright_cyan().bold(), format!("({} rows)", table.len()).dimmed());

        let lines = table_lines(table);
        for (idx, line) in lines.iter().enumerate() {
            if idx == 0 {
                println!("{}", line.bold());
            } else {
                println!("{}", line);
            }
        }
        println!();
    }
}

pub fn tables_json(set: &ReportSet) -> Result<String> {
    serde_json::to_string_pretty(set).context("Failed to format JSON output")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::types::{Column, TableValue};

    #[test]
    fn test_aligned_lines() {
        let mut table = ReportTable::new(
            "Attendant Record",
            vec![
                Column::new("Attendant", ColumnKind::Text),
                Column::new("Total Operations", ColumnKind::Integer),
            ],
        );
        table.push_row(vec!["Peña".into(), 12usize.into()]);
        table.push_row(vec!["B2".into(), 3usize.into()]);

        let lines = table_lines(&table);
        assert_eq!(lines[0], "Attendant  Total Operations");
        assert_eq!(lines[1], "---------  ----------------");
        assert_eq!(lines[2], format!("Peña{}12", " ".repeat(21)));
        assert_eq!(lines[3], format!("B2{}3", " ".repeat(24)));
    }

    #[test]
    fn test_json_output() {
        let mut table = ReportTable::new("QA", vec![Column::new("Metric", ColumnKind::Text)]);
        table.push_row(vec![TableValue::from("rows_used")]);
        let mut set = ReportSet::new();
        set.insert(table);

        let json: serde_json::Value = serde_json::from_str(&tables_json(&set).unwrap()).unwrap();
        assert_eq!(json[0]["name"], "QA");
        assert_eq!(json[0]["rows"][0][0], "rows_used");
    }
}
