//! Raw spreadsheet cells and rows, before any schema is applied

use std::collections::HashMap;

use chrono::NaiveDateTime;

/// A single cell as read from a source sheet
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    /// Empty or error cell
    #[default]
    Empty,
    /// Text cell (kept verbatim, trimming happens at use sites)
    Text(String),
    /// Numeric cell (Excel stores integers and serial dates as floats too)
    Number(f64),
    /// Boolean cell
    Bool(bool),
    /// Date/time cell already decoded by the reader
    DateTime(NaiveDateTime),
}

impl Cell {
    /// Check if this cell carries no usable content
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Trimmed textual rendering used for header matching and text fields
    ///
    /// Whole numbers render without a fractional part so that numeric ids
    /// ("1042") compare equal to their text form.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
            Cell::Number(n) => {
                if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
                    Some((*n as i64).to_string())
                } else {
                    Some(n.to_string())
                }
            }
            Cell::Bool(b) => Some(b.to_string()),
            Cell::DateTime(dt) => Some(dt.format("%Y-%m-%d %H:%M:%S").to_string()),
        }
    }
}

/// All rows of one sheet, header row included
#[derive(Debug, Clone, Default)]
pub struct RawSheet {
    pub name: String,
    pub rows: Vec<Vec<Cell>>,
}

impl RawSheet {
    pub fn new(name: impl Into<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }
}

/// Column names of a sheet, resolved from the detected header row
#[derive(Debug, Clone, Default)]
pub struct Header {
    names: Vec<String>,
    index: HashMap<String, usize>,
}

impl Header {
    /// Build a header from the cells of the header row
    ///
    /// Blank header cells get a positional name; for duplicated names the
    /// first occurrence wins on lookup.
    pub fn from_cells(cells: &[Cell]) -> Self {
        let mut names = Vec::with_capacity(cells.len());
        let mut index = HashMap::new();

        for (col, cell) in cells.iter().enumerate() {
            let name = cell
                .as_text()
                .unwrap_or_else(|| format!("Column {}", col + 1));
            index.entry(name.clone()).or_insert(col);
            names.push(name);
        }

        Self { names, index }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// One data row viewed through its sheet's header (column name -> cell)
#[derive(Debug, Clone, Copy)]
pub struct RawRow<'a> {
    header: &'a Header,
    cells: &'a [Cell],
}

impl<'a> RawRow<'a> {
    pub fn new(header: &'a Header, cells: &'a [Cell]) -> Self {
        Self { header, cells }
    }

    /// Cell under the named column, if the column exists and the row reaches it
    pub fn get(&self, column: &str) -> Option<&'a Cell> {
        self.header
            .position(column)
            .and_then(|col| self.cells.get(col))
    }

    /// Cell at a column position
    pub fn at(&self, col: usize) -> Option<&'a Cell> {
        self.cells.get(col)
    }

    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(Cell::is_blank)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_text_rendering() {
        assert_eq!(Cell::Text("  Fecha ".into()).as_text(), Some("Fecha".into()));
        assert_eq!(Cell::Text("   ".into()).as_text(), None);
        assert_eq!(Cell::Number(1042.0).as_text(), Some("1042".into()));
        assert_eq!(Cell::Number(12.5).as_text(), Some("12.5".into()));
        assert_eq!(Cell::Empty.as_text(), None);
    }

    #[test]
    fn test_header_blank_and_duplicate_names() {
        let header = Header::from_cells(&[
            Cell::Text("Fecha".into()),
            Cell::Empty,
            Cell::Text("Monto".into()),
            Cell::Text("Fecha".into()),
        ]);

        assert_eq!(header.len(), 4);
        assert_eq!(header.names()[1], "Column 2");
        assert_eq!(header.position("Fecha"), Some(0));
        assert_eq!(header.position("Monto"), Some(2));
        assert!(!header.contains("Jornada"));
    }

    #[test]
    fn test_raw_row_lookup() {
        let header = Header::from_cells(&[Cell::Text("A".into()), Cell::Text("B".into())]);
        let cells = vec![Cell::Number(1.0)];
        let row = RawRow::new(&header, &cells);

        assert_eq!(row.get("A"), Some(&Cell::Number(1.0)));
        assert_eq!(row.get("B"), None);
        assert_eq!(row.get("C"), None);
        assert!(!row.is_blank());
    }
}
