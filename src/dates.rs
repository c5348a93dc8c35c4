//! Date helpers on top of chrono.
use std::fmt::Write;

use chrono::{Datelike, NaiveDate};

use crate::error::{Error, Result};

pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Every calendar day from `start` to `end` inclusive, formatted with the
/// same chrono `format` both inputs are parsed with. Empty if `start > end`.
pub fn dates_between(start: &str, end: &str, format: &str) -> Result<Vec<String>> {
    let first = parse_date(start, format)?;
    let last = parse_date(end, format)?;
    let mut out = Vec::new();
    let mut day = first;
    while day <= last {
        let mut text = String::new();
        // formats asking for time fields parse fine but cannot render a bare date
        write!(text, "{}", day.format(format)).map_err(|_| Error::DateFormat(format.to_string()))?;
        out.push(text);
        match day.succ_opt() {
            Some(next) => day = next,
            None => break,
        }
    }
    Ok(out)
}

fn parse_date(input: &str, format: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input, format).map_err(|source| Error::Date {
        input: input.to_string(),
        format: format.to_string(),
        source,
    })
}

/// ISO weekday (Monday = 1 .. Sunday = 7) to the Sunday-first 0..=6 scale.
/// Values outside 1..=7 wrap modulo 7.
pub fn normalized_day_of_week(iso_day: u32) -> u32 {
    iso_day % 7
}

/// Sunday-first weekday (0..=6) of a date.
pub fn day_of_week(date: NaiveDate) -> u32 {
    normalized_day_of_week(date.weekday().number_from_monday())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeParts {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

pub fn seconds_to_time(total: u64) -> TimeParts {
    TimeParts {
        days: total / 86_400,
        hours: total % 86_400 / 3_600,
        minutes: total % 3_600 / 60,
        seconds: total % 60,
    }
}
