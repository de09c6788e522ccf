//! Header-row detection
//!
//! Source sheets often carry a title block above the real header. The header
//! is the first row whose trimmed values contain every marker of a known
//! signature; the matching signature also decides the record type.

use std::collections::HashSet;

use crate::report::types::{Cell, RecordType};

/// A set of column names that identifies a header row for one record type
#[derive(Debug, Clone, Copy)]
pub struct HeaderSignature {
    pub record_type: RecordType,
    pub markers: &'static [&'static str],
}

/// Signatures in match order (first match wins within a row)
pub const SIGNATURES: [HeaderSignature; 2] = [
    HeaderSignature {
        record_type: RecordType::Getnet,
        markers: &["Jornada", "Fecha", "Monto"],
    },
    HeaderSignature {
        record_type: RecordType::Premios,
        markers: &["Monto Transferido", "Slot Attendant", "Transferencia Final"],
    },
];

/// Default number of leading rows scanned for a header
pub const DEFAULT_SCAN_ROWS: usize = 30;

/// Outcome of header detection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderMatch {
    /// A signature matched at this row
    Signature { row: usize, record_type: RecordType },
    /// Nothing matched inside the scan window; row 0 is used as header
    Ambiguous,
}

impl HeaderMatch {
    pub fn header_row(&self) -> usize {
        match self {
            HeaderMatch::Signature { row, .. } => *row,
            HeaderMatch::Ambiguous => 0,
        }
    }

    pub fn record_type(&self) -> Option<RecordType> {
        match self {
            HeaderMatch::Signature { record_type, .. } => Some(*record_type),
            HeaderMatch::Ambiguous => None,
        }
    }

    pub fn is_detected(&self) -> bool {
        matches!(self, HeaderMatch::Signature { .. })
    }
}

impl HeaderSignature {
    fn matches(&self, values: &HashSet<String>) -> bool {
        self.markers.iter().all(|m| values.contains(*m))
    }
}

/// Locate the header row and record type among the leading rows of a sheet
pub fn classify(rows: &[Vec<Cell>], scan_rows: usize) -> HeaderMatch {
    for (row_idx, row) in rows.iter().take(scan_rows).enumerate() {
        let values: HashSet<String> = row.iter().filter_map(Cell::as_text).collect();
        if values.is_empty() {
            continue;
        }

        if let Some(signature) = SIGNATURES.iter().find(|s| s.matches(&values)) {
            log::debug!(
                "Header found at row {} ({} signature)",
                row_idx,
                signature.record_type
            );
            return HeaderMatch::Signature {
                row: row_idx,
                record_type: signature.record_type,
            };
        }
    }

    HeaderMatch::Ambiguous
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(values: &[&str]) -> Vec<Cell> {
        values.iter().map(|v| Cell::Text(v.to_string())).collect()
    }

    #[test]
    fn test_getnet_header_below_title_block() {
        let rows = vec![
            row(&["SGOS - Reporte anual"]),
            vec![],
            row(&[" Jornada ", "Fecha", "Monto", "Slot Attendant"]),
            row(&["01/03/2024", "01/03/2024 10:00", "1000", "A1"]),
        ];

        assert_eq!(
            classify(&rows, DEFAULT_SCAN_ROWS),
            HeaderMatch::Signature {
                row: 2,
                record_type: RecordType::Getnet
            }
        );
    }

    #[test]
    fn test_premios_header() {
        let rows = vec![row(&[
            "Fecha Hora",
            "Monto Transferido",
            "Slot Attendant",
            "Transferencia Final",
        ])];

        let found = classify(&rows, DEFAULT_SCAN_ROWS);
        assert_eq!(found.header_row(), 0);
        assert_eq!(found.record_type(), Some(RecordType::Premios));
    }

    #[test]
    fn test_getnet_wins_when_both_signatures_in_row() {
        let rows = vec![row(&[
            "Jornada",
            "Fecha",
            "Monto",
            "Monto Transferido",
            "Slot Attendant",
            "Transferencia Final",
        ])];

        assert_eq!(classify(&rows, 5).record_type(), Some(RecordType::Getnet));
    }

    #[test]
    fn test_no_match_is_ambiguous() {
        let rows = vec![row(&["Fecha", "Monto"]), row(&["a", "b"])];
        let found = classify(&rows, DEFAULT_SCAN_ROWS);

        assert_eq!(found, HeaderMatch::Ambiguous);
        assert_eq!(found.header_row(), 0);
        assert!(!found.is_detected());
    }

    #[test]
    fn test_header_outside_scan_window_is_ambiguous() {
        let mut rows: Vec<Vec<Cell>> = (0..5).map(|_| row(&["x"])).collect();
        rows.push(row(&["Jornada", "Fecha", "Monto"]));

        assert_eq!(classify(&rows, 5), HeaderMatch::Ambiguous);
        assert!(classify(&rows, 6).is_detected());
    }
}
