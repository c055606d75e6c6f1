//! Calendar-aware differences between two dates.

use chrono::{Datelike, NaiveDate, TimeDelta};
use serde::Serialize;

/// Difference between two dates, as a calendar breakdown and as totals.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DateDifference {
    pub years: i32,
    pub months: u32,
    pub days: u32,
    pub total_days: i64,
    pub total_weeks: i64,
    pub total_hours: i64,
    pub total_minutes: i64,
    pub total_seconds: i64,
}

impl DateDifference {
    /// Build a difference from a non-negative elapsed duration and the
    /// calendar dates at either end.
    pub fn new(start: NaiveDate, end: NaiveDate, elapsed: TimeDelta) -> Self {
        let (years, months, days) = calendar_breakdown(start, end);
        let total_days = elapsed.num_days();

        Self {
            years,
            months,
            days,
            total_days,
            total_weeks: total_days / 7,
            total_hours: elapsed.num_hours(),
            total_minutes: elapsed.num_minutes(),
            total_seconds: elapsed.num_seconds(),
        }
    }
}

/// Clock-time difference between two instants.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct TimeDifference {
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
    pub total_hours: f64,
    pub total_minutes: f64,
    pub total_seconds: f64,
}

impl TimeDifference {
    pub fn new(elapsed: TimeDelta) -> Self {
        let elapsed = elapsed.abs();
        let total_seconds = elapsed.num_milliseconds() as f64 / 1000.0;

        Self {
            hours: elapsed.num_hours(),
            minutes: elapsed.num_minutes() % 60,
            seconds: elapsed.num_seconds() % 60,
            total_hours: total_seconds / 3600.0,
            total_minutes: total_seconds / 60.0,
            total_seconds,
        }
    }
}

/// Number of days in the given month.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };

    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map(|last| last.day())
        .unwrap_or(31)
}

pub fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Build a date, pulling the day back to the end of a shorter month.
pub fn clamped_date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day.min(days_in_month(year, month)))
}

/// Split the span between two dates into years, months and days.
///
/// Days are subtracted first. A negative day count borrows the length of the
/// month before the later date's month, then a negative month count borrows
/// a year. When borrowing still leaves the days negative, a start day past the
/// end of that shorter month counts from its last day, so the breakdown never
/// goes negative.
pub fn calendar_breakdown(start: NaiveDate, end: NaiveDate) -> (i32, u32, u32) {
    let (start, end) = if end < start { (end, start) } else { (start, end) };

    let mut years = end.year() - start.year();
    let mut months = end.month() as i32 - start.month() as i32;
    let mut days = end.day() as i32 - start.day() as i32;

    if days < 0 {
        months -= 1;
        let (prev_year, prev_month) = if end.month() == 1 {
            (end.year() - 1, 12)
        } else {
            (end.year(), end.month() - 1)
        };
        let borrowed = days_in_month(prev_year, prev_month) as i32;
        days += borrowed;
        if days < 0 {
            days = end.day() as i32 - (start.day() as i32).min(borrowed) + borrowed;
        }
    }
    if months < 0 {
        years -= 1;
        months += 12;
    }

    (years, months as u32, days as u32)
}

/// Human readable summary such as "1 year(s), 2 month(s), 3 day(s)".
pub fn format_difference(diff: &DateDifference) -> String {
    let mut parts = Vec::new();
    if diff.years > 0 {
        parts.push(format!("{} year(s)", diff.years));
    }
    if diff.months > 0 {
        parts.push(format!("{} month(s)", diff.months));
    }
    if diff.days > 0 {
        parts.push(format!("{} day(s)", diff.days));
    }

    if parts.is_empty() {
        "0 days".to_string()
    } else {
        parts.join(", ")
    }
}
