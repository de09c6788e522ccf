//! Lightweight self-check table

use std::collections::BTreeSet;

use crate::report::types::{Column, ColumnKind, NormalizedRecord, ReportTable, TableValue};

use super::tables;

pub fn qa_summary(records: &[&NormalizedRecord]) -> ReportTable {
    let mut table = ReportTable::new(
        tables::QA,
        vec![
            Column::new("Metric", ColumnKind::Text),
            Column::new("Value", ColumnKind::Text),
        ],
    );

    let min = records.iter().map(|r| r.timestamp).min();
    let max = records.iter().map(|r| r.timestamp).max();
    let hours: BTreeSet<u32> = records.iter().map(|r| r.hour_of_day()).collect();
    let hours = hours
        .iter()
        .map(|h| h.to_string())
        .collect::<Vec<_>>()
        .join(", ");

    table.push_row(vec!["rows_used".into(), records.len().into()]);
    table.push_row(vec!["min_timestamp".into(), min.map_or(TableValue::Empty, TableValue::from)]);
    table.push_row(vec!["max_timestamp".into(), max.map_or(TableValue::Empty, TableValue::from)]);
    table.push_row(vec!["hours_present".into(), hours.into()]);

    table
}
