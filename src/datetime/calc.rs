//! The date/time calculator: a pair of held dates plus the operations on them.

use super::difference::{
    DateDifference, TimeDifference, calendar_breakdown, clamped_date, days_in_month, is_leap_year,
};
use super::error::DateError;
use super::input::DateOffset;
use chrono::{
    DateTime, Datelike, Days, Local, Months, NaiveDate, NaiveDateTime, TimeDelta, TimeZone, Utc,
    Weekday,
};
use serde::Serialize;
use std::fmt::Display;

/// Age of a person on a given day.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Age {
    pub years: i32,
    pub months: u32,
    pub days: u32,
    pub total_days: i64,
    pub next_birthday: NaiveDate,
    pub days_until_birthday: i64,
}

/// Holds a start and an end date in time zone `Tz`.
#[derive(Clone, Debug)]
pub struct DateTimeCalc<Tz: TimeZone = Local> {
    start: DateTime<Tz>,
    end: DateTime<Tz>,
}

impl DateTimeCalc<Local> {
    /// Both dates set to the current local time.
    pub fn new() -> Self {
        Self::now_in(Local)
    }
}

impl Default for DateTimeCalc<Local> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Tz: TimeZone> DateTimeCalc<Tz> {
    /// Both dates set to the current time in `tz`.
    pub fn now_in(tz: Tz) -> Self {
        let now = Utc::now().with_timezone(&tz);
        Self {
            start: now.clone(),
            end: now,
        }
    }

    pub fn with_dates(start: DateTime<Tz>, end: DateTime<Tz>) -> Self {
        Self { start, end }
    }

    pub fn start(&self) -> &DateTime<Tz> {
        &self.start
    }

    pub fn end(&self) -> &DateTime<Tz> {
        &self.end
    }

    fn timezone(&self) -> Tz {
        self.start.timezone()
    }

    fn resolve(
        &self,
        (year, month, day): (i32, u32, u32),
        (hour, minute, second): (u32, u32, u32),
    ) -> Result<DateTime<Tz>, DateError> {
        self.timezone()
            .with_ymd_and_hms(year, month, day, hour, minute, second)
            .earliest()
            .ok_or(DateError::InvalidDate { year, month, day })
    }

    fn local_to_tz(&self, naive: NaiveDateTime) -> Result<DateTime<Tz>, DateError> {
        self.timezone()
            .from_local_datetime(&naive)
            .earliest()
            .ok_or(DateError::OutOfRange)
    }

    pub fn set_start(&mut self, start: DateTime<Tz>) {
        self.start = start;
    }

    pub fn set_end(&mut self, end: DateTime<Tz>) {
        self.end = end;
    }

    /// Set the start to midnight of the given day.
    pub fn set_start_date(&mut self, year: i32, month: u32, day: u32) -> Result<(), DateError> {
        self.start = self.resolve((year, month, day), (0, 0, 0))?;
        Ok(())
    }

    /// Set the end to midnight of the given day.
    pub fn set_end_date(&mut self, year: i32, month: u32, day: u32) -> Result<(), DateError> {
        self.end = self.resolve((year, month, day), (0, 0, 0))?;
        Ok(())
    }

    pub fn set_start_date_time(
        &mut self,
        (year, month, day): (i32, u32, u32),
        (hour, minute, second): (u32, u32, u32),
    ) -> Result<(), DateError> {
        self.start = self.resolve((year, month, day), (hour, minute, second))?;
        Ok(())
    }

    pub fn set_end_date_time(
        &mut self,
        (year, month, day): (i32, u32, u32),
        (hour, minute, second): (u32, u32, u32),
    ) -> Result<(), DateError> {
        self.end = self.resolve((year, month, day), (hour, minute, second))?;
        Ok(())
    }

    /// Reset the start to the current time.
    pub fn today(&mut self) {
        self.start = Utc::now().with_timezone(&self.timezone());
    }

    /// The held dates, earliest first.
    fn ordered(&self) -> (&DateTime<Tz>, &DateTime<Tz>) {
        if self.end < self.start {
            (&self.end, &self.start)
        } else {
            (&self.start, &self.end)
        }
    }

    /// Difference between the held dates, in either order.
    pub fn calculate_difference(&self) -> DateDifference {
        let (start, end) = self.ordered();
        let elapsed = end.clone() - start.clone();
        DateDifference::new(start.date_naive(), end.date_naive(), elapsed)
    }

    /// Shift the start date by whole years, months and days. Month
    /// arithmetic clamps to the last day of shorter months.
    pub fn add_offset(&self, offset: DateOffset) -> Result<DateTime<Tz>, DateError> {
        let months = i64::from(offset.years) * 12 + i64::from(offset.months);
        let shifted = shift_months(self.start.clone(), months)?;
        shift_days(shifted, offset.days)
    }

    pub fn add_days(&self, days: i64) -> Result<DateTime<Tz>, DateError> {
        shift_days(self.start.clone(), days)
    }

    pub fn add_weeks(&self, weeks: i64) -> Result<DateTime<Tz>, DateError> {
        let days = weeks.checked_mul(7).ok_or(DateError::OutOfRange)?;
        self.add_days(days)
    }

    pub fn add_months(&self, months: i32) -> Result<DateTime<Tz>, DateError> {
        shift_months(self.start.clone(), i64::from(months))
    }

    pub fn add_years(&self, years: i32) -> Result<DateTime<Tz>, DateError> {
        shift_months(self.start.clone(), i64::from(years) * 12)
    }

    pub fn subtract_days(&self, days: i64) -> Result<DateTime<Tz>, DateError> {
        self.add_days(-days)
    }

    pub fn subtract_weeks(&self, weeks: i64) -> Result<DateTime<Tz>, DateError> {
        self.add_weeks(-weeks)
    }

    pub fn subtract_months(&self, months: i32) -> Result<DateTime<Tz>, DateError> {
        self.add_months(-months)
    }

    pub fn subtract_years(&self, years: i32) -> Result<DateTime<Tz>, DateError> {
        self.add_years(-years)
    }

    /// Calendar offset followed by a clock offset.
    pub fn add_time(
        &self,
        (years, months, days): (i32, i32, i64),
        (hours, minutes, seconds): (i64, i64, i64),
    ) -> Result<DateTime<Tz>, DateError> {
        let date = self.add_offset(DateOffset {
            years,
            months,
            days,
        })?;
        let clock = TimeDelta::try_hours(hours)
            .zip(TimeDelta::try_minutes(minutes))
            .zip(TimeDelta::try_seconds(seconds))
            .and_then(|((h, m), s)| h.checked_add(&m)?.checked_add(&s))
            .ok_or(DateError::OutOfRange)?;
        date.checked_add_signed(clock).ok_or(DateError::OutOfRange)
    }

    pub fn weekday(&self) -> Weekday {
        self.start.weekday()
    }

    /// ISO 8601 week number of the start date.
    pub fn week_number(&self) -> u32 {
        self.start.iso_week().week()
    }

    pub fn day_of_year(&self) -> u32 {
        self.start.ordinal()
    }

    pub fn is_leap_year(&self) -> bool {
        is_leap_year(self.start.year())
    }

    pub fn days_in_year(&self) -> u32 {
        if self.is_leap_year() { 366 } else { 365 }
    }

    /// Whole days left until the last second of the start date's year.
    pub fn days_until_end_of_year(&self) -> i64 {
        let start = self.start.naive_local();
        NaiveDate::from_ymd_opt(start.year(), 12, 31)
            .and_then(|d| d.and_hms_opt(23, 59, 59))
            .map(|end| (end - start).num_days())
            .unwrap_or(0)
    }

    pub fn days_until_end_of_month(&self) -> u32 {
        days_in_month(self.start.year(), self.start.month()) - self.start.day()
    }

    /// Age as of today in this calculator's time zone.
    pub fn age(&self, birth: NaiveDate) -> Result<Age, DateError> {
        age_at(birth, Utc::now().with_timezone(&self.timezone()).date_naive())
    }

    /// Days in the held range, both ends included.
    pub fn working_days(&self, exclude_weekends: bool) -> u64 {
        let (start, end) = self.ordered();
        start
            .date_naive()
            .iter_days()
            .take_while(|day| *day <= end.date_naive())
            .filter(|day| !exclude_weekends || !matches!(day.weekday(), Weekday::Sat | Weekday::Sun))
            .count() as u64
    }

    /// The first `weekday` strictly after the start date.
    pub fn next_weekday(&self, weekday: Weekday) -> Result<DateTime<Tz>, DateError> {
        let ahead = (7 + weekday.num_days_from_monday() - self.weekday().num_days_from_monday()) % 7;
        let ahead = if ahead == 0 { 7 } else { ahead };
        self.add_days(i64::from(ahead))
    }

    /// The last `weekday` strictly before the start date.
    pub fn previous_weekday(&self, weekday: Weekday) -> Result<DateTime<Tz>, DateError> {
        let back = (7 + self.weekday().num_days_from_monday() - weekday.num_days_from_monday()) % 7;
        let back = if back == 0 { 7 } else { back };
        self.subtract_days(i64::from(back))
    }

    /// Difference between two clock times, in either order.
    pub fn time_difference(&self, a: &DateTime<Tz>, b: &DateTime<Tz>) -> TimeDifference {
        TimeDifference::new(b.clone() - a.clone())
    }

    pub fn unix_timestamp(&self) -> i64 {
        self.start.timestamp()
    }

    pub fn from_unix_timestamp(&self, timestamp: i64) -> Result<DateTime<Tz>, DateError> {
        self.timezone()
            .timestamp_opt(timestamp, 0)
            .single()
            .ok_or(DateError::InvalidTimestamp(timestamp))
    }

    /// Render the start date with a strftime-style format.
    pub fn format_date(&self, format: &str) -> String
    where
        Tz::Offset: Display,
    {
        self.start.format(format).to_string()
    }

    /// Convert a plain date to midnight in this calculator's time zone.
    pub fn midnight(&self, date: NaiveDate) -> Result<DateTime<Tz>, DateError> {
        self.local_to_tz(date.and_time(chrono::NaiveTime::MIN))
    }
}

fn shift_months<Tz: TimeZone>(date: DateTime<Tz>, months: i64) -> Result<DateTime<Tz>, DateError> {
    let amount = u32::try_from(months.unsigned_abs()).map_err(|_| DateError::OutOfRange)?;
    let shifted = if months >= 0 {
        date.checked_add_months(Months::new(amount))
    } else {
        date.checked_sub_months(Months::new(amount))
    };
    shifted.ok_or(DateError::OutOfRange)
}

fn shift_days<Tz: TimeZone>(date: DateTime<Tz>, days: i64) -> Result<DateTime<Tz>, DateError> {
    let shifted = if days >= 0 {
        date.checked_add_days(Days::new(days.unsigned_abs()))
    } else {
        date.checked_sub_days(Days::new(days.unsigned_abs()))
    };
    shifted.ok_or(DateError::OutOfRange)
}

/// Age of someone born on `birth` as of `today`, using the same borrowing as
/// date differences.
pub fn age_at(birth: NaiveDate, today: NaiveDate) -> Result<Age, DateError> {
    if birth > today {
        return Err(DateError::FutureBirthDate);
    }

    let (years, months, days) = calendar_breakdown(birth, today);

    let mut next_birthday =
        clamped_date(today.year(), birth.month(), birth.day()).ok_or(DateError::OutOfRange)?;
    if next_birthday <= today {
        next_birthday = clamped_date(today.year() + 1, birth.month(), birth.day())
            .ok_or(DateError::OutOfRange)?;
    }

    Ok(Age {
        years,
        months,
        days,
        total_days: (today - birth).num_days(),
        next_birthday,
        days_until_birthday: (next_birthday - today).num_days(),
    })
}
