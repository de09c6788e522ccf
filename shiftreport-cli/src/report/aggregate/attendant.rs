//! Per-attendant tables: busiest shift day and monthly totals

use std::cmp::Reverse;
use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::report::types::{
    Column, ColumnKind, MonthLocale, NormalizedRecord, RecordType, ReportTable,
};

use super::{tables, tally_by};

/// Busiest shift day of one attendant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendantRecord {
    pub attendant_id: String,
    pub shift_day: NaiveDate,
    pub operations: usize,
}

/// For every attendant, the shift day with the most operations
///
/// Ties between days resolve to the most recent day. Output is sorted by
/// count descending, then attendant id.
pub fn attendant_records(records: &[&NormalizedRecord]) -> Vec<AttendantRecord> {
    let per_day = tally_by(records, |r| (r.attendant_id.clone(), r.shift_day()));

    let mut best: BTreeMap<String, (NaiveDate, usize)> = BTreeMap::new();
    // per_day iterates days ascending within an attendant, so `>=` keeps the latest tie
    for ((attendant, day), tally) in per_day {
        best.entry(attendant)
            .and_modify(|current| {
                if tally.count >= current.1 {
                    *current = (day, tally.count);
                }
            })
            .or_insert((day, tally.count));
    }

    let mut out: Vec<AttendantRecord> = best
        .into_iter()
        .map(|(attendant_id, (shift_day, operations))| AttendantRecord {
            attendant_id,
            shift_day,
            operations,
        })
        .collect();
    out.sort_by(|a, b| {
        b.operations
            .cmp(&a.operations)
            .then_with(|| a.attendant_id.cmp(&b.attendant_id))
    });
    out
}

pub fn attendant_record_table(records: &[&NormalizedRecord]) -> ReportTable {
    let mut table = ReportTable::new(
        tables::ATTENDANT_RECORD,
        vec![
            Column::new("Attendant", ColumnKind::Text),
            Column::new("Shift Day", ColumnKind::Date),
            Column::new("Total Operations", ColumnKind::Integer),
        ],
    );

    for rec in attendant_records(records) {
        table.push_row(vec![
            rec.attendant_id.into(),
            rec.shift_day.into(),
            rec.operations.into(),
        ]);
    }

    table
}

/// Count (and amount, for payment files) per attendant and period
pub fn attendant_month_table(
    records: &[&NormalizedRecord],
    record_type: RecordType,
    locale: MonthLocale,
) -> ReportTable {
    let with_amount = record_type == RecordType::Getnet;

    let mut columns = vec![
        Column::new("Attendant", ColumnKind::Text),
        Column::new("Period", ColumnKind::Text),
        Column::new("Operations", ColumnKind::Integer),
    ];
    if with_amount {
        columns.push(Column::new("Amount", ColumnKind::Decimal));
    }
    let mut table = ReportTable::new(tables::ATTENDANT_MONTH, columns);

    let mut groups: Vec<_> = tally_by(records, |r| (r.period(), r.attendant_id.clone()))
        .into_iter()
        .collect();
    groups.sort_by_key(|((period, attendant), tally)| (*period, Reverse(tally.count), attendant.clone()));

    for ((period, attendant), tally) in groups {
        let mut row = vec![attendant.into(), period.label(locale).into(), tally.count.into()];
        if with_amount {
            row.push(tally.amount.into());
        }
        table.push_row(row);
    }

    table
}
