//! Report engine
//!
//! Three entry points: [`detect_and_normalize`] turns a source sheet into
//! normalized records, [`aggregate`] builds the named report tables, and
//! [`export`] serializes them to a workbook.

pub mod aggregate;
pub mod error;
pub mod excel;
pub mod normalize;
pub mod schema;
pub mod types;

pub use aggregate::{AggregateOptions, AttendantFilter, aggregate, tables};
pub use error::IngestError;
pub use excel::{ExportOptions, SpreadsheetSource, export, export_to_path, read_sheet, write_csv_dir};

use schema::{DEFAULT_SCAN_ROWS, HeaderMatch, SchemaMapping, classify};
use types::{Header, NormalizedBatch, RawSheet};

/// Settings for header detection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestOptions {
    /// How many leading rows are searched for a header signature
    pub header_scan_rows: usize,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            header_scan_rows: DEFAULT_SCAN_ROWS,
        }
    }
}

/// Detect the header and record type of an already-read sheet, then
/// normalize its data rows
pub fn normalize_sheet(sheet: &RawSheet, options: &IngestOptions) -> NormalizedBatch {
    let detected = classify(&sheet.rows, options.header_scan_rows);
    let header_row = detected.header_row();
    let header = Header::from_cells(sheet.rows.get(header_row).map(Vec::as_slice).unwrap_or(&[]));

    let record_type = match detected {
        HeaderMatch::Signature { record_type, .. } => record_type,
        HeaderMatch::Ambiguous => {
            let inferred = SchemaMapping::infer_type(&header);
            log::warn!(
                "No header signature in the first {} rows of sheet '{}'; using row 0 as {} header",
                options.header_scan_rows,
                sheet.name,
                inferred
            );
            inferred
        }
    };

    let schema = SchemaMapping::for_type(record_type).bind(&header);
    for field in schema.missing_fields() {
        log::debug!("Sheet '{}' has no column for {}", sheet.name, field);
    }

    let data_rows = sheet.rows.get(header_row + 1..).unwrap_or(&[]);
    let (records, stats) = normalize::normalize_rows(&schema, &header, data_rows);

    log::info!(
        "Sheet '{}': {} {} records kept, {} dropped, {} blank",
        sheet.name,
        stats.kept,
        record_type,
        stats.dropped(),
        stats.blank_rows
    );

    NormalizedBatch {
        sheet: sheet.name.clone(),
        record_type,
        header_row,
        header_detected: detected.is_detected(),
        columns: header.names().to_vec(),
        records,
        stats,
    }
}

/// Read a sheet (by name, or the first one) and normalize it
///
/// Only an unusable source is an error; bad rows are dropped and counted.
pub fn detect_and_normalize(
    source: &SpreadsheetSource,
    sheet: Option<&str>,
    options: &IngestOptions,
) -> Result<NormalizedBatch, IngestError> {
    let raw = read_sheet(source, sheet)?;
    Ok(normalize_sheet(&raw, options))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::types::{RecordType, TableValue};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use rust_xlsxwriter::Workbook;

    fn getnet_source() -> SpreadsheetSource {
        let mut workbook = Workbook::new();
        let ws = workbook.add_worksheet();
        ws.set_name("Data anual").unwrap();
        ws.write_string(0, 0, "SGOS - Operaciones Getnet").unwrap();

        let header = ["Jornada", "Fecha", "Monto", "Slot Attendant", "Id Cliente", "Forma Pago"];
        for (col, name) in header.iter().enumerate() {
            ws.write_string(2, col as u16, *name).unwrap();
        }

        let rows = [
            ["01/03/2024", "01/03/2024 12:30", "1500", "A1", "C9", "Debito"],
            ["01/03/2024", "02/03/2024 01:15", "abc", "A1", "C9", "Credito"],
            ["01/03/2024", "01/03/2024 09:10", "300", "A1", "C8", "Debito"],
            ["01/03/2024", "01/03/2024 15:00", "200", "", "C7", "Debito"],
            ["02/03/2024", "02/03/2024 18:45", "700", "B2", "C7", "Debito"],
        ];
        for (r, row) in rows.iter().enumerate() {
            for (col, value) in row.iter().enumerate() {
                if !value.is_empty() {
                    ws.write_string(3 + r as u32, col as u16, *value).unwrap();
                }
            }
        }
        ws.write_number(8, 0, 45352.0).unwrap();
        ws.write_number(8, 1, 45352.5).unwrap();
        ws.write_number(8, 2, 50.0).unwrap();
        ws.write_number(8, 3, 17.0).unwrap();

        SpreadsheetSource::bytes("getnet.xlsx", workbook.save_to_buffer().unwrap())
    }

    fn premios_source() -> SpreadsheetSource {
        let mut workbook = Workbook::new();
        let ws = workbook.add_worksheet();

        let header = ["Fecha", "Monto Transferido", "Slot Attendant", "Transferencia Final", "Tipo de Pago", "Máquina"];
        for (col, name) in header.iter().enumerate() {
            ws.write_string(0, col as u16, *name).unwrap();
        }
        let rows = [
            ["2024-03-01 02:00:00", "100", "P1", "100", "  Jackpot   HP ", "M-7"],
            ["2024-03-01 22:00:00", "40", "P2", "40", "Cancel Credit", "M-7"],
        ];
        for (r, row) in rows.iter().enumerate() {
            for (col, value) in row.iter().enumerate() {
                ws.write_string(1 + r as u32, col as u16, *value).unwrap();
            }
        }

        SpreadsheetSource::bytes("premios.xlsx", workbook.save_to_buffer().unwrap())
    }

    #[test]
    fn test_getnet_end_to_end() {
        let batch = detect_and_normalize(&getnet_source(), None, &IngestOptions::default()).unwrap();

        assert_eq!(batch.record_type, RecordType::Getnet);
        assert_eq!(batch.header_row, 2);
        assert!(batch.header_detected);
        assert_eq!(batch.stats.rows_seen, 6);
        assert_eq!(batch.stats.off_schedule, 1);
        assert_eq!(batch.stats.missing_attendant, 1);
        assert_eq!(batch.records.len(), 4);
        assert_eq!(batch.attendants(), vec!["17", "A1", "B2"]);

        // Unparseable amount kept as zero
        assert_eq!(batch.records[1].amount, dec!(0));
        // Excel serial date and numeric attendant
        let noon = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap().and_hms_opt(12, 0, 0).unwrap();
        assert_eq!(batch.records[3].timestamp, noon);
        assert_eq!(batch.records[3].attendant_id, "17");

        let set = aggregate(batch.record_type, &batch.records, &AttendantFilter::All, &AggregateOptions::default());
        let monthly = set.get(tables::MONTHLY_SUMMARY).unwrap();
        assert_eq!(monthly.rows[0][0], TableValue::from("Marzo 2024"));
        assert_eq!(monthly.rows[0][1], TableValue::Int(4));
        assert_eq!(monthly.rows[0][2], TableValue::Decimal(dec!(2250)));
    }

    #[test]
    fn test_premios_without_jornada_derives_shift_day() {
        let batch = detect_and_normalize(&premios_source(), None, &IngestOptions::default()).unwrap();

        assert_eq!(batch.record_type, RecordType::Premios);
        assert_eq!(batch.records.len(), 2);
        assert_eq!(batch.records[0].shift_day(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert_eq!(batch.records[0].voucher_or_machine.as_deref(), Some("M-7"));

        let set = aggregate(batch.record_type, &batch.records, &AttendantFilter::All, &AggregateOptions::default());
        assert_eq!(set.len(), tables::ALL.len());

        let total = set.get(tables::PAYOUT_TOTAL).unwrap();
        assert_eq!(total.column_values("Attendant")[0], &TableValue::from("P1"));
    }

    #[test]
    fn test_ambiguous_header_falls_back_to_row_zero() {
        let sheet = RawSheet::new(
            "Hoja1",
            vec![
                vec![types::Cell::Text("Reporte".into())],
                vec![types::Cell::Text("x".into())],
            ],
        );
        let batch = normalize_sheet(&sheet, &IngestOptions::default());

        assert!(!batch.header_detected);
        assert_eq!(batch.header_row, 0);
        assert_eq!(batch.record_type, RecordType::Getnet);
        assert!(batch.records.is_empty());
        assert_eq!(batch.stats.missing_timestamp, 1);
    }

    #[test]
    fn test_header_row_counts_blank_leading_rows_and_columns() {
        let mut workbook = Workbook::new();
        let ws = workbook.add_worksheet();
        ws.write_string(2, 1, "Reporte Getnet").unwrap();
        for (col, name) in ["Jornada", "Fecha", "Monto", "Slot Attendant"].iter().enumerate() {
            ws.write_string(4, 1 + col as u16, *name).unwrap();
        }
        for (col, value) in ["01/03/2024", "01/03/2024 12:30", "1500", "A1"].iter().enumerate() {
            ws.write_string(5, 1 + col as u16, *value).unwrap();
        }
        let source = SpreadsheetSource::bytes("offset.xlsx", workbook.save_to_buffer().unwrap());

        let batch = detect_and_normalize(&source, None, &IngestOptions::default()).unwrap();

        assert!(batch.header_detected);
        assert_eq!(batch.header_row, 4);
        assert_eq!(batch.records.len(), 1);
        assert_eq!(batch.records[0].attendant_id, "A1");
        assert_eq!(batch.records[0].amount, dec!(1500));
    }

    #[test]
    fn test_getnet_signature_wins_over_premios_columns() {
        let text = |s: &str| types::Cell::Text(s.into());
        let sheet = RawSheet::new(
            "Mixta",
            vec![
                ["Jornada", "Fecha", "Monto", "Monto Transferido", "Slot Attendant", "Transferencia Final"]
                    .iter()
                    .map(|s| text(s))
                    .collect(),
                ["01/03/2024", "01/03/2024 12:30", "150", "90", "A1", "90"]
                    .iter()
                    .map(|s| text(s))
                    .collect(),
            ],
        );

        let batch = normalize_sheet(&sheet, &IngestOptions::default());

        assert!(batch.header_detected);
        assert_eq!(batch.header_row, 0);
        assert_eq!(batch.record_type, RecordType::Getnet);
        assert_eq!(batch.records.len(), 1);
        // Amount comes from the Getnet "Monto" column
        assert_eq!(batch.records[0].amount, dec!(150));
    }

    #[test]
    fn test_empty_sheet_yields_empty_batch() {
        let batch = normalize_sheet(&RawSheet::new("Vacía", vec![]), &IngestOptions::default());

        assert!(batch.records.is_empty());
        assert_eq!(batch.stats.rows_seen, 0);
    }
}
