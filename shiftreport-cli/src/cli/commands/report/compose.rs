//! Caller-side report composition
//!
//! With an attendant filter, some tables still describe the whole floor:
//! they come from the unfiltered aggregation. A table selection then keeps
//! only the named tables, in engine order.

use crate::report::types::{NormalizedRecord, RecordType, ReportSet};
use crate::report::{AggregateOptions, AttendantFilter, aggregate};

/// Tables to keep in the final report
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TableSelection {
    #[default]
    All,
    Named(Vec<String>),
}

impl TableSelection {
    /// Command line names win, then configured names, then everything
    pub fn resolve(cli: &[String], configured: Option<&[String]>) -> Self {
        if !cli.is_empty() {
            TableSelection::Named(cli.to_vec())
        } else if let Some(names) = configured {
            TableSelection::Named(names.to_vec())
        } else {
            TableSelection::All
        }
    }

    pub fn keeps(&self, table_name: &str) -> bool {
        match self {
            TableSelection::All => true,
            TableSelection::Named(names) => names.iter().any(|n| n == table_name),
        }
    }
}

pub fn compose_report(
    record_type: RecordType,
    records: &[NormalizedRecord],
    filter: &AttendantFilter,
    unfiltered_tables: &[String],
    selection: &TableSelection,
    options: &AggregateOptions,
) -> ReportSet {
    let mut set = aggregate(record_type, records, filter, options);

    if !filter.is_all() && !unfiltered_tables.is_empty() {
        let everyone = aggregate(record_type, records, &AttendantFilter::All, options);
        for name in unfiltered_tables {
            if let Some(table) = everyone.get(name) {
                set.insert(table.clone());
            }
        }
    }

    set.retain(|table| selection.keeps(&table.name));
    set
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::aggregate::test_support::getnet;
    use crate::report::tables;
    use crate::report::types::TableValue;

    fn records() -> Vec<NormalizedRecord> {
        vec![
            getnet("A1", (2024, 3, 1, 12), (2024, 3, 1), 100),
            getnet("B2", (2024, 3, 1, 13), (2024, 3, 1), 50),
            getnet("B2", (2024, 3, 1, 14), (2024, 3, 1), 50),
        ]
    }

    fn operations(set: &ReportSet, table: &str) -> TableValue {
        set.get(table).unwrap().rows[0][1].clone()
    }

    #[test]
    fn test_unfiltered_tables_ignore_filter() {
        let unfiltered = vec![tables::MONTHLY_SUMMARY.to_string()];
        let set = compose_report(
            RecordType::Getnet,
            &records(),
            &AttendantFilter::only(["A1"]),
            &unfiltered,
            &TableSelection::All,
            &AggregateOptions::default(),
        );

        assert_eq!(operations(&set, tables::MONTHLY_SUMMARY), TableValue::Int(3));
        assert_eq!(set.get(tables::ATTENDANT_RECORD).unwrap().len(), 1);
        assert_eq!(set.names()[0], tables::MONTHLY_SUMMARY);
    }

    #[test]
    fn test_no_filter_skips_second_pass() {
        let unfiltered = vec![tables::MONTHLY_SUMMARY.to_string()];
        let set = compose_report(
            RecordType::Getnet,
            &records(),
            &AttendantFilter::All,
            &unfiltered,
            &TableSelection::All,
            &AggregateOptions::default(),
        );

        assert_eq!(set, aggregate(RecordType::Getnet, &records(), &AttendantFilter::All, &AggregateOptions::default()));
    }

    #[test]
    fn test_selection_keeps_engine_order() {
        let selection = TableSelection::Named(vec![tables::QA.into(), tables::MONTHLY_SUMMARY.into()]);
        let set = compose_report(
            RecordType::Getnet,
            &records(),
            &AttendantFilter::All,
            &[],
            &selection,
            &AggregateOptions::default(),
        );

        assert_eq!(set.names(), vec![tables::MONTHLY_SUMMARY, tables::QA]);
    }

    #[test]
    fn test_selection_resolution() {
        let configured = vec!["QA".to_string()];

        assert_eq!(TableSelection::resolve(&[], None), TableSelection::All);
        assert_eq!(
            TableSelection::resolve(&[], Some(configured.as_slice())),
            TableSelection::Named(configured.clone())
        );
        assert_eq!(
            TableSelection::resolve(&["Monthly Summary".to_string()], Some(configured.as_slice())),
            TableSelection::Named(vec!["Monthly Summary".to_string()])
        );
    }
}
