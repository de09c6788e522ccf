//! Normalized records produced from a source sheet

use std::collections::BTreeSet;
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::schedule::Period;

/// Source-file family, decided once per file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordType {
    /// Payment operations
    Getnet,
    /// Payout / prize events
    Premios,
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordType::Getnet => write!(f, "GETNET"),
            RecordType::Premios => write!(f, "PREMIOS"),
        }
    }
}

/// One cleaned transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    pub timestamp: NaiveDateTime,
    /// Nominal shift timestamp; may differ from `timestamp`
    pub shift_reference: NaiveDateTime,
    pub amount: Decimal,
    pub attendant_id: String,
    pub record_type: RecordType,
    pub client_id: Option<String>,
    pub payment_method: Option<String>,
    pub validator: Option<String>,
    pub income_channel: Option<String>,
    pub voucher_or_machine: Option<String>,
    pub tip: Option<Decimal>,
}

impl NormalizedRecord {
    /// Minimal record with all optional fields empty
    pub fn new(
        record_type: RecordType,
        timestamp: NaiveDateTime,
        shift_reference: NaiveDateTime,
        attendant_id: impl Into<String>,
        amount: Decimal,
    ) -> Self {
        Self {
            timestamp,
            shift_reference,
            amount,
            attendant_id: attendant_id.into(),
            record_type,
            client_id: None,
            payment_method: None,
            validator: None,
            income_channel: None,
            voucher_or_machine: None,
            tip: None,
        }
    }

    /// Operational day the record is attributed to
    pub fn shift_day(&self) -> NaiveDate {
        self.shift_reference.date()
    }

    pub fn hour_of_day(&self) -> u32 {
        self.timestamp.hour()
    }

    pub fn period(&self) -> Period {
        Period::of(self.shift_day())
    }
}

/// Counters for rows dropped during normalization
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NormalizeStats {
    pub rows_seen: usize,
    pub blank_rows: usize,
    pub missing_timestamp: usize,
    pub missing_shift_reference: usize,
    pub missing_attendant: usize,
    pub off_schedule: usize,
    pub kept: usize,
}

impl NormalizeStats {
    pub fn dropped(&self) -> usize {
        self.missing_timestamp + self.missing_shift_reference + self.missing_attendant + self.off_schedule
    }
}

/// Everything produced by detection + normalization of one sheet
#[derive(Debug, Clone)]
pub struct NormalizedBatch {
    pub sheet: String,
    pub record_type: RecordType,
    /// Header row index within the sheet
    pub header_row: usize,
    /// Whether the header row was found by signature (false = fallback to row 0)
    pub header_detected: bool,
    pub columns: Vec<String>,
    pub records: Vec<NormalizedRecord>,
    pub stats: NormalizeStats,
}

impl NormalizedBatch {
    /// Sorted distinct attendant ids
    pub fn attendants(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|r| r.attendant_id.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_derived_fields_follow_shift_reference() {
        let record = NormalizedRecord::new(
            RecordType::Getnet,
            at(2024, 4, 1, 2),
            at(2024, 3, 31, 0),
            "A1",
            Decimal::ZERO,
        );

        assert_eq!(record.hour_of_day(), 2);
        assert_eq!(record.shift_day(), NaiveDate::from_ymd_opt(2024, 3, 31).unwrap());
        assert_eq!(record.period(), Period { year: 2024, month: 3 });
    }

    #[test]
    fn test_batch_attendants_sorted_distinct() {
        let mk = |id: &str| {
            NormalizedRecord::new(RecordType::Premios, at(2024, 1, 1, 12), at(2024, 1, 1, 0), id, Decimal::ONE)
        };
        let batch = NormalizedBatch {
            sheet: "Data".into(),
            record_type: RecordType::Premios,
            header_row: 0,
            header_detected: true,
            columns: vec![],
            records: vec![mk("b"), mk("a"), mk("b")],
            stats: NormalizeStats::default(),
        };

        assert_eq!(batch.attendants(), vec!["a".to_string(), "b".to_string()]);
    }
}
