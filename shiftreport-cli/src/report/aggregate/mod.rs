//! Aggregation engine - builds report tables from normalized records
//!
//! Every table is recomputed from scratch on each call. The attendant filter
//! is applied once, up front, to every table produced by [`aggregate`].

mod attendant;
mod payout;
mod qa;
mod summary;

use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::Decimal;

use crate::report::types::{MonthLocale, NormalizedRecord, RecordType, ReportSet};

pub use attendant::{AttendantRecord, attendant_month_table, attendant_record_table, attendant_records};
pub use payout::{CategoryCounts, PayoutCategory, payout_tables};
pub use qa::qa_summary;
pub use summary::{hourly_distribution, monthly_summary, total_operations};

/// Stable table names
pub mod tables {
    pub const MONTHLY_SUMMARY: &str = "Monthly Summary";
    pub const HOURLY_DISTRIBUTION: &str = "Hourly Distribution";
    pub const ATTENDANT_RECORD: &str = "Attendant Record";
    pub const ATTENDANT_MONTH: &str = "Attendant-Month Summary";
    pub const PAYOUT_BY_MONTH: &str = "Payout Category by Month";
    pub const PAYOUT_ANNUAL: &str = "Payout Category Annual";
    pub const PAYOUT_TOTAL: &str = "Payout Category Total";
    pub const PAYOUT_MACHINE_MONTH: &str = "Payout Category by Machine (Month)";
    pub const PAYOUT_MACHINE_TOTAL: &str = "Payout Category by Machine (Total)";
    pub const QA: &str = "QA";

    /// All table names in report order
    pub const ALL: [&str; 10] = [
        MONTHLY_SUMMARY,
        HOURLY_DISTRIBUTION,
        ATTENDANT_RECORD,
        ATTENDANT_MONTH,
        PAYOUT_BY_MONTH,
        PAYOUT_ANNUAL,
        PAYOUT_TOTAL,
        PAYOUT_MACHINE_MONTH,
        PAYOUT_MACHINE_TOTAL,
        QA,
    ];
}

/// Which attendants the aggregation covers
///
/// An empty `Only` set selects nobody; "everyone" must be asked for with `All`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AttendantFilter {
    #[default]
    All,
    Only(BTreeSet<String>),
}

impl AttendantFilter {
    pub fn only<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        AttendantFilter::Only(ids.into_iter().map(Into::into).collect())
    }

    pub fn allows(&self, attendant_id: &str) -> bool {
        match self {
            AttendantFilter::All => true,
            AttendantFilter::Only(ids) => ids.contains(attendant_id),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, AttendantFilter::All)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AggregateOptions {
    pub locale: MonthLocale,
}

/// Count and amount of a group
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Tally {
    pub count: usize,
    pub amount: Decimal,
}

/// Group records by key, counting them and summing their amounts
pub(crate) fn tally_by<K: Ord>(
    records: &[&NormalizedRecord],
    key: impl Fn(&NormalizedRecord) -> K,
) -> BTreeMap<K, Tally> {
    let mut groups: BTreeMap<K, Tally> = BTreeMap::new();
    for record in records {
        let tally = groups.entry(key(*record)).or_default();
        tally.count += 1;
        tally.amount += record.amount;
    }
    groups
}

/// Build every report table for a record collection
pub fn aggregate(
    record_type: RecordType,
    records: &[NormalizedRecord],
    filter: &AttendantFilter,
    options: &AggregateOptions,
) -> ReportSet {
    let selected: Vec<&NormalizedRecord> = records
        .iter()
        .filter(|r| filter.allows(&r.attendant_id))
        .collect();

    log::debug!(
        "Aggregating {} of {} {} records",
        selected.len(),
        records.len(),
        record_type
    );

    let mut set = ReportSet::new();
    set.insert(monthly_summary(&selected, options.locale));
    set.insert(hourly_distribution(&selected));
    set.insert(attendant_record_table(&selected));
    set.insert(attendant_month_table(&selected, record_type, options.locale));

    if record_type == RecordType::Premios {
        for table in payout_tables(&selected, options.locale) {
            set.insert(table);
        }
    }

    set.insert(qa_summary(&selected));
    set
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{NaiveDate, NaiveDateTime};
    use rust_decimal::Decimal;

    use crate::report::types::{NormalizedRecord, RecordType};

    fn at((y, m, d, h): (i32, u32, u32, u32)) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    pub fn getnet(
        attendant: &str,
        timestamp: (i32, u32, u32, u32),
        shift_day: (i32, u32, u32),
        amount: i64,
    ) -> NormalizedRecord {
        let (y, m, d) = shift_day;
        NormalizedRecord::new(
            RecordType::Getnet,
            at(timestamp),
            at((y, m, d, 0)),
            attendant,
            Decimal::from(amount),
        )
    }

    pub fn payout(
        attendant: &str,
        timestamp: (i32, u32, u32, u32),
        method: &str,
        machine: Option<&str>,
        amount: i64,
    ) -> NormalizedRecord {
        let ts = at(timestamp);
        let mut record = NormalizedRecord::new(
            RecordType::Premios,
            ts,
            crate::report::normalize::derive_shift_reference(ts),
            attendant,
            Decimal::from(amount),
        );
        record.payment_method = Some(method.to_string());
        record.voucher_or_machine = machine.map(str::to_string);
        record
    }

    pub fn refs(records: &[NormalizedRecord]) -> Vec<&NormalizedRecord> {
        records.iter().collect()
    }
}
