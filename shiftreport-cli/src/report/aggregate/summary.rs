//! Monthly and hourly summaries

use crate::report::types::{
    Column, ColumnKind, MonthLocale, NormalizedRecord, OPERATING_HOURS, ReportTable, TableValue,
};

use super::{tables, tally_by};

/// Count and amount per period, oldest first
pub fn monthly_summary(records: &[&NormalizedRecord], locale: MonthLocale) -> ReportTable {
    let mut table = ReportTable::new(
        tables::MONTHLY_SUMMARY,
        vec![
            Column::new("Period", ColumnKind::Text),
            Column::new("Operations", ColumnKind::Integer),
            Column::new("Amount", ColumnKind::Decimal),
        ],
    );

    for (period, tally) in tally_by(records, |r| r.period()) {
        table.push_row(vec![
            period.label(locale).into(),
            tally.count.into(),
            tally.amount.into(),
        ]);
    }

    table
}

/// Count and amount per hour, one row per operating hour in schedule order
pub fn hourly_distribution(records: &[&NormalizedRecord]) -> ReportTable {
    let mut table = ReportTable::new(
        tables::HOURLY_DISTRIBUTION,
        vec![
            Column::new("Hour", ColumnKind::Integer),
            Column::new("Operations", ColumnKind::Integer),
            Column::new("Amount", ColumnKind::Decimal),
        ],
    );

    let by_hour = tally_by(records, |r| r.hour_of_day());
    for hour in OPERATING_HOURS {
        let tally = by_hour.get(&hour).copied().unwrap_or_default();
        table.push_row(vec![hour.into(), tally.count.into(), tally.amount.into()]);
    }

    table
}

/// Total surviving operations across a monthly summary
pub fn total_operations(summary: &ReportTable) -> usize {
    summary
        .column_values("Operations")
        .into_iter()
        .map(|v| match v {
            TableValue::Int(n) => *n as usize,
            _ => 0,
        })
        .sum()
}
