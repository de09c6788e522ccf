//! Record normalization - applies a bound schema to raw rows
//!
//! A row survives only when it has a timestamp, a shift reference and an
//! attendant, and its timestamp hour lies inside the operating window.
//! Unparseable amounts become zero; the row is kept.

pub mod parse;

use chrono::{Duration, NaiveDateTime, NaiveTime};

use crate::report::schema::{Binding, BoundSchema, Field};
use crate::report::types::{
    Cell, Header, NormalizeStats, NormalizedRecord, RawRow, SHIFT_START_HOUR, is_operating_hour,
};

use parse::{parse_amount, parse_datetime, parse_decimal};

/// Why a row was dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    Blank,
    MissingTimestamp,
    MissingShiftReference,
    MissingAttendant,
    OffSchedule { hour: u32 },
}

impl NormalizeStats {
    fn record_drop(&mut self, reason: DropReason) {
        match reason {
            DropReason::Blank => self.blank_rows += 1,
            DropReason::MissingTimestamp => self.missing_timestamp += 1,
            DropReason::MissingShiftReference => self.missing_shift_reference += 1,
            DropReason::MissingAttendant => self.missing_attendant += 1,
            DropReason::OffSchedule { .. } => self.off_schedule += 1,
        }
    }
}

/// Shift reference for sources without a shift column
///
/// A payout at 02:00 belongs to the shift that opened at 10:00 the previous
/// calendar day.
pub fn derive_shift_reference(timestamp: NaiveDateTime) -> NaiveDateTime {
    (timestamp - Duration::hours(SHIFT_START_HOUR))
        .date()
        .and_time(NaiveTime::MIN)
}

fn cell<'a>(schema: &BoundSchema, row: &RawRow<'a>, field: Field) -> Option<&'a Cell> {
    match schema.binding(field) {
        Binding::Column(col) => row.at(col),
        Binding::ShiftFromTimestamp | Binding::Missing => None,
    }
}

fn text(schema: &BoundSchema, row: &RawRow<'_>, field: Field) -> Option<String> {
    cell(schema, row, field).and_then(Cell::as_text)
}

/// Normalize one row; rows are independent of each other
pub fn normalize_row(schema: &BoundSchema, row: &RawRow<'_>) -> Result<NormalizedRecord, DropReason> {
    if row.is_blank() {
        return Err(DropReason::Blank);
    }

    let timestamp = cell(schema, row, Field::Timestamp)
        .and_then(parse_datetime)
        .ok_or(DropReason::MissingTimestamp)?;

    let shift_reference = match schema.binding(Field::ShiftReference) {
        Binding::ShiftFromTimestamp => Some(derive_shift_reference(timestamp)),
        _ => cell(schema, row, Field::ShiftReference).and_then(parse_datetime),
    }
    .ok_or(DropReason::MissingShiftReference)?;

    let attendant_id =
        text(schema, row, Field::AttendantId).ok_or(DropReason::MissingAttendant)?;

    let mut record = NormalizedRecord::new(
        schema.record_type,
        timestamp,
        shift_reference,
        attendant_id,
        parse_amount(cell(schema, row, Field::Amount)),
    );

    let hour = record.hour_of_day();
    if !is_operating_hour(hour) {
        return Err(DropReason::OffSchedule { hour });
    }

    record.client_id = text(schema, row, Field::ClientId);
    record.payment_method = text(schema, row, Field::PaymentMethod);
    record.validator = text(schema, row, Field::Validator);
    record.income_channel = text(schema, row, Field::IncomeChannel);
    record.voucher_or_machine = text(schema, row, Field::VoucherOrMachine);
    record.tip = cell(schema, row, Field::Tip).and_then(parse_decimal);

    Ok(record)
}

/// Normalize all data rows under a header
pub fn normalize_rows(
    schema: &BoundSchema,
    header: &Header,
    rows: &[Vec<Cell>],
) -> (Vec<NormalizedRecord>, NormalizeStats) {
    let mut stats = NormalizeStats::default();
    let mut records = Vec::with_capacity(rows.len());

    for (idx, cells) in rows.iter().enumerate() {
        let row = RawRow::new(header, cells);
        match normalize_row(schema, &row) {
            Ok(record) => records.push(record),
            Err(DropReason::Blank) => {
                stats.record_drop(DropReason::Blank);
                continue;
            }
            Err(reason) => {
                log::debug!("Dropping data row {}: {:?}", idx + 1, reason);
                stats.record_drop(reason);
            }
        }
        stats.rows_seen += 1;
    }

    stats.kept = records.len();
    (records, stats)
}
