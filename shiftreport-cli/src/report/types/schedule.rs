//! Operating schedule and calendar periods
//!
//! A shift starts at 10:00 and runs past midnight until 08:59. Hour 9 is the
//! closed window and never counts.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Operating hours in schedule order (10..=23, then 0..=8)
pub const OPERATING_HOURS: [u32; 23] = [
    10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23, 0, 1, 2, 3, 4, 5, 6, 7, 8,
];

/// Hour at which a shift starts; payouts before it belong to the previous day
pub const SHIFT_START_HOUR: i64 = 10;

/// Check if an hour of day falls inside the operating window
pub fn is_operating_hour(hour: u32) -> bool {
    hour != 9 && hour < 24
}

/// Position of an hour in schedule order
pub fn schedule_position(hour: u32) -> Option<usize> {
    OPERATING_HOURS.iter().position(|h| *h == hour)
}

/// Language used for month names in period labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MonthLocale {
    #[default]
    Es,
    En,
}

impl MonthLocale {
    pub fn month_name(&self, month: u32) -> Option<&'static str> {
        const ES: [&str; 12] = [
            "Enero", "Febrero", "Marzo", "Abril", "Mayo", "Junio", "Julio", "Agosto",
            "Septiembre", "Octubre", "Noviembre", "Diciembre",
        ];
        const EN: [&str; 12] = [
            "January", "February", "March", "April", "May", "June", "July", "August",
            "September", "October", "November", "December",
        ];

        let idx = (month as usize).checked_sub(1)?;
        match self {
            MonthLocale::Es => ES.get(idx).copied(),
            MonthLocale::En => EN.get(idx).copied(),
        }
    }
}

/// Year-month bucket used for monthly aggregation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Period {
    pub year: i32,
    pub month: u32,
}

impl Period {
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Human label, e.g. "Marzo 2024"
    pub fn label(&self, locale: MonthLocale) -> String {
        match locale.month_name(self.month) {
            Some(name) => format!("{} {}", name, self.year),
            None => self.to_string(),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}
