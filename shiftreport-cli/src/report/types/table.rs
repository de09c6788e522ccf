//! Report tables: named, ordered rows over a fixed column schema

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::Serialize;

/// Kind of values a column holds (drives export formatting)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Text,
    Integer,
    Decimal,
    Date,
    DateTime,
}

impl ColumnKind {
    pub fn is_temporal(&self) -> bool {
        matches!(self, ColumnKind::Date | ColumnKind::DateTime)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
}

impl Column {
    pub fn new(name: impl Into<String>, kind: ColumnKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// A single value in a report table
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TableValue {
    Empty,
    Text(String),
    Int(i64),
    Decimal(Decimal),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl From<&str> for TableValue {
    fn from(s: &str) -> Self {
        TableValue::Text(s.to_string())
    }
}

impl From<String> for TableValue {
    fn from(s: String) -> Self {
        TableValue::Text(s)
    }
}

impl From<usize> for TableValue {
    fn from(n: usize) -> Self {
        TableValue::Int(n as i64)
    }
}

impl From<u32> for TableValue {
    fn from(n: u32) -> Self {
        TableValue::Int(n as i64)
    }
}

impl From<i32> for TableValue {
    fn from(n: i32) -> Self {
        TableValue::Int(n as i64)
    }
}

impl From<Decimal> for TableValue {
    fn from(d: Decimal) -> Self {
        TableValue::Decimal(d)
    }
}

impl From<NaiveDate> for TableValue {
    fn from(d: NaiveDate) -> Self {
        TableValue::Date(d)
    }
}

impl From<NaiveDateTime> for TableValue {
    fn from(dt: NaiveDateTime) -> Self {
        TableValue::DateTime(dt)
    }
}

impl fmt::Display for TableValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableValue::Empty => Ok(()),
            TableValue::Text(s) => write!(f, "{}", s),
            TableValue::Int(i) => write!(f, "{}", i),
            TableValue::Decimal(d) => write!(f, "{}", d.normalize()),
            TableValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            TableValue::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

/// A derived report table; rows always have one value per column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportTable {
    pub name: String,
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<TableValue>>,
}

impl ReportTable {
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Self {
        Self {
            name: name.into(),
            columns,
            rows: Vec::new(),
        }
    }

    /// Append a row, padding or truncating it to the column count
    pub fn push_row(&mut self, mut row: Vec<TableValue>) {
        row.resize(self.columns.len(), TableValue::Empty);
        self.rows.push(row);
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// All values of one column, top to bottom
    pub fn column_values(&self, name: &str) -> Vec<&TableValue> {
        match self.column_index(name) {
            Some(idx) => self.rows.iter().map(|r| &r[idx]).collect(),
            None => Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Ordered collection of report tables keyed by name
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ReportSet {
    tables: Vec<ReportTable>,
}

impl ReportSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a table, replacing any table with the same name in place
    pub fn insert(&mut self, table: ReportTable) {
        match self.tables.iter_mut().find(|t| t.name == table.name) {
            Some(existing) => *existing = table,
            None => self.tables.push(table),
        }
    }

    pub fn get(&self, name: &str) -> Option<&ReportTable> {
        self.tables.iter().find(|t| t.name == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.tables.iter().map(|t| t.name.as_str()).collect()
    }

    /// Keep only the tables accepted by the predicate, preserving order
    pub fn retain(&mut self, mut keep: impl FnMut(&ReportTable) -> bool) {
        self.tables.retain(|t| keep(t));
    }

    pub fn iter(&self) -> impl Iterator<Item = &ReportTable> {
        self.tables.iter()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl IntoIterator for ReportSet {
    type Item = ReportTable;
    type IntoIter = std::vec::IntoIter<ReportTable>;

    fn into_iter(self) -> Self::IntoIter {
        self.tables.into_iter()
    }
}
