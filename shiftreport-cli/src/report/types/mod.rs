//! Core types for the report engine

mod cell;
mod record;
mod schedule;
mod table;

pub use cell::{Cell, Header, RawRow, RawSheet};
pub use record::{NormalizeStats, NormalizedBatch, NormalizedRecord, RecordType};
pub use schedule::{
    MonthLocale, OPERATING_HOURS, Period, SHIFT_START_HOUR, is_operating_hour, schedule_position,
};
pub use table::{Column, ColumnKind, ReportSet, ReportTable, TableValue};
