//! Spreadsheet I/O: reading source sheets, exporting report workbooks

mod csv_export;
mod reader;
mod writer;

pub use csv_export::{csv_file_stem, write_csv_dir, write_table_csv};
pub use reader::{SpreadsheetSource, read_sheet};
pub use writer::{MAX_SHEET_NAME, export, export_to_path, sheet_names};

/// Layout settings for exported workbooks
#[derive(Debug, Clone, PartialEq)]
pub struct ExportOptions {
    /// Upper bound on any column width
    pub max_column_width: f64,
    /// Added to the longest value in a column
    pub column_padding: usize,
    /// Extra width for date and datetime columns
    pub date_padding: usize,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            max_column_width: 40.0,
            column_padding: 2,
            date_padding: 4,
        }
    }
}
