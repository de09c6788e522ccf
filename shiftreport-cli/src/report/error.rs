//! Fatal source-level errors
//!
//! Row-level problems never surface here; they are absorbed by the
//! normalizer and only show up in its statistics.

/// The input cannot be used as a spreadsheet source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestError {
    /// Workbook could not be opened or its format was not recognised
    UnreadableSource { source_name: String, reason: String },
    /// Workbook contains no sheets
    EmptyWorkbook { source_name: String },
    /// Requested sheet does not exist
    MissingSheet {
        requested: String,
        available: Vec<String>,
    },
    /// Sheet exists but its cells could not be read
    SheetRead { sheet: String, reason: String },
}

impl std::fmt::Display for IngestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IngestError::UnreadableSource {
                source_name,
                reason,
            } => write!(f, "cannot open spreadsheet '{}': {}", source_name, reason),
            IngestError::EmptyWorkbook { source_name } => {
                write!(f, "spreadsheet '{}' has no sheets", source_name)
            }
            IngestError::MissingSheet {
                requested,
                available,
            } => write!(
                f,
                "sheet '{}' not found (available: {})",
                requested,
                available.join(", ")
            ),
            IngestError::SheetRead { sheet, reason } => {
                write!(f, "failed to read sheet '{}': {}", sheet, reason)
            }
        }
    }
}

impl std::error::Error for IngestError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_sheet_message_lists_available() {
        let err = IngestError::MissingSheet {
            requested: "Data anual".into(),
            available: vec!["Hoja1".into(), "Resumen".into()],
        };

        assert_eq!(
            err.to_string(),
            "sheet 'Data anual' not found (available: Hoja1, Resumen)"
        );
    }
}
