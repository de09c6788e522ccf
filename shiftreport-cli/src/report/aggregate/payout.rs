//! Payout-category breakdowns for payout (Premios) files
//!
//! Each payout is classified by its payment method into one of four fixed
//! categories. Records matching none of them are left out of these tables
//! only. Every table sorts on the Premios count first (descending).

use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::fmt;

use chrono::Datelike;
use rust_decimal::Decimal;

use crate::report::types::{
    Column, ColumnKind, MonthLocale, NormalizedRecord, Period, ReportTable, TableValue,
};

use super::tables;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PayoutCategory {
    Premios,
    Mdc,
    CancelCredit,
    ChipCashHandPay,
}

impl PayoutCategory {
    pub const ALL: [PayoutCategory; 4] = [
        PayoutCategory::Premios,
        PayoutCategory::Mdc,
        PayoutCategory::CancelCredit,
        PayoutCategory::ChipCashHandPay,
    ];

    /// Classify a payment method (case-insensitive, whitespace-insensitive)
    pub fn classify(payment_method: &str) -> Option<Self> {
        let key = payment_method
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();

        match key.as_str() {
            "jackpot hp" | "progresive jackpot hp" | "progressive jackpot hp" => {
                Some(PayoutCategory::Premios)
            }
            "mdc purse clear" => Some(PayoutCategory::Mdc),
            "cancel credit" => Some(PayoutCategory::CancelCredit),
            "chip cash handpay" => Some(PayoutCategory::ChipCashHandPay),
            _ => None,
        }
    }

    fn index(&self) -> usize {
        match self {
            PayoutCategory::Premios => 0,
            PayoutCategory::Mdc => 1,
            PayoutCategory::CancelCredit => 2,
            PayoutCategory::ChipCashHandPay => 3,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PayoutCategory::Premios => "Premios",
            PayoutCategory::Mdc => "MDC",
            PayoutCategory::CancelCredit => "Cancel Credit",
            PayoutCategory::ChipCashHandPay => "Chip Cash Handpay",
        }
    }
}

impl fmt::Display for PayoutCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Category counts for one group, plus the amount paid as Premios
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategoryCounts {
    counts: [usize; 4],
    pub premios_amount: Decimal,
}

impl CategoryCounts {
    fn add(&mut self, category: PayoutCategory, amount: Decimal) {
        self.counts[category.index()] += 1;
        if category == PayoutCategory::Premios {
            self.premios_amount += amount;
        }
    }

    pub fn get(&self, category: PayoutCategory) -> usize {
        self.counts[category.index()]
    }

    pub fn premios(&self) -> usize {
        self.get(PayoutCategory::Premios)
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    fn values(&self) -> Vec<TableValue> {
        PayoutCategory::ALL
            .iter()
            .map(|c| self.get(*c).into())
            .collect()
    }
}

/// Classified payouts; unclassifiable payment methods are dropped here
fn classified<'a>(
    records: &[&'a NormalizedRecord],
) -> Vec<(&'a NormalizedRecord, PayoutCategory)> {
    records
        .iter()
        .filter_map(|r| {
            r.payment_method
                .as_deref()
                .and_then(PayoutCategory::classify)
                .map(|c| (*r, c))
        })
        .collect()
}

fn count_by<K: Ord>(
    payouts: &[(&NormalizedRecord, PayoutCategory)],
    key: impl Fn(&NormalizedRecord) -> Option<K>,
) -> BTreeMap<K, CategoryCounts> {
    let mut groups: BTreeMap<K, CategoryCounts> = BTreeMap::new();
    for (record, category) in payouts {
        if let Some(k) = key(*record) {
            groups.entry(k).or_default().add(*category, record.amount);
        }
    }
    groups
}

/// Groups sorted by Premios count descending, then by key
fn ranked<K: Ord>(groups: BTreeMap<K, CategoryCounts>) -> Vec<(K, CategoryCounts)> {
    let mut out: Vec<_> = groups.into_iter().collect();
    // stable sort keeps the key order among equal Premios counts
    out.sort_by_key(|(_, counts)| Reverse(counts.premios()));
    out
}

fn category_columns() -> Vec<Column> {
    PayoutCategory::ALL
        .iter()
        .map(|c| Column::new(c.label(), ColumnKind::Integer))
        .collect()
}

fn year_of(record: &NormalizedRecord) -> i32 {
    record.shift_day().year()
}

fn machine_of(record: &NormalizedRecord) -> Option<String> {
    record.voucher_or_machine.clone()
}

/// The five payout breakdown tables, in report order
pub fn payout_tables(records: &[&NormalizedRecord], locale: MonthLocale) -> Vec<ReportTable> {
    let payouts = classified(records);
    log::debug!(
        "Payout breakdown: {} of {} records classified",
        payouts.len(),
        records.len()
    );

    vec![
        by_month(&payouts, locale),
        annual(&payouts),
        total(&payouts),
        machine_by_month(&payouts, locale),
        machine_total(&payouts),
    ]
}

fn by_month(payouts: &[(&NormalizedRecord, PayoutCategory)], locale: MonthLocale) -> ReportTable {
    let mut columns = vec![
        Column::new("Period", ColumnKind::Text),
        Column::new("Attendant", ColumnKind::Text),
    ];
    columns.extend(category_columns());
    let mut table = ReportTable::new(tables::PAYOUT_BY_MONTH, columns);

    let groups = count_by(payouts, |r| Some((r.period(), r.attendant_id.clone())));
    for ((period, attendant), counts) in ranked(groups) {
        let mut row: Vec<TableValue> = vec![period.label(locale).into(), attendant.into()];
        row.extend(counts.values());
        table.push_row(row);
    }

    table
}

fn annual(payouts: &[(&NormalizedRecord, PayoutCategory)]) -> ReportTable {
    let mut columns = vec![
        Column::new("Year", ColumnKind::Integer),
        Column::new("Attendant", ColumnKind::Text),
    ];
    columns.extend(category_columns());
    let mut table = ReportTable::new(tables::PAYOUT_ANNUAL, columns);

    let groups = count_by(payouts, |r| Some((year_of(r), r.attendant_id.clone())));
    for ((year, attendant), counts) in ranked(groups) {
        let mut row: Vec<TableValue> = vec![year.into(), attendant.into()];
        row.extend(counts.values());
        table.push_row(row);
    }

    table
}

fn total(payouts: &[(&NormalizedRecord, PayoutCategory)]) -> ReportTable {
    let mut table = ReportTable::new(
        tables::PAYOUT_TOTAL,
        vec![
            Column::new("Year", ColumnKind::Integer),
            Column::new("Attendant", ColumnKind::Text),
            Column::new(PayoutCategory::Premios.label(), ColumnKind::Integer),
            Column::new("Total", ColumnKind::Integer),
        ],
    );

    let groups = count_by(payouts, |r| Some((year_of(r), r.attendant_id.clone())));
    for ((year, attendant), counts) in ranked(groups) {
        table.push_row(vec![
            year.into(),
            attendant.into(),
            counts.premios().into(),
            counts.total().into(),
        ]);
    }

    table
}

fn machine_by_month(
    payouts: &[(&NormalizedRecord, PayoutCategory)],
    locale: MonthLocale,
) -> ReportTable {
    let mut columns = vec![
        Column::new("Period", ColumnKind::Text),
        Column::new("Machine", ColumnKind::Text),
    ];
    columns.extend(category_columns());
    columns.push(Column::new("Premios Amount", ColumnKind::Decimal));
    let mut table = ReportTable::new(tables::PAYOUT_MACHINE_MONTH, columns);

    let groups: BTreeMap<(Period, String), CategoryCounts> =
        count_by(payouts, |r| machine_of(r).map(|m| (r.period(), m)));
    for ((period, machine), counts) in ranked(groups) {
        let mut row: Vec<TableValue> = vec![period.label(locale).into(), machine.into()];
        row.extend(counts.values());
        row.push(counts.premios_amount.into());
        table.push_row(row);
    }

    table
}

fn machine_total(payouts: &[(&NormalizedRecord, PayoutCategory)]) -> ReportTable {
    let mut columns = vec![
        Column::new("Year", ColumnKind::Integer),
        Column::new("Machine", ColumnKind::Text),
    ];
    columns.extend(category_columns());
    columns.push(Column::new("Premios Amount", ColumnKind::Decimal));
    let mut table = ReportTable::new(tables::PAYOUT_MACHINE_TOTAL, columns);

    let groups = count_by(payouts, |r| machine_of(r).map(|m| (year_of(r), m)));
    for ((year, machine), counts) in ranked(groups) {
        let mut row: Vec<TableValue> = vec![year.into(), machine.into()];
        row.extend(counts.values());
        row.push(counts.premios_amount.into());
        table.push_row(row);
    }

    table
}
