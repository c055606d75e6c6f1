//! Errors produced by the date/time calculator.

use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DateError {
    /// The year/month/day (and time) do not name an existing instant.
    #[error("invalid date {year:04}-{month:02}-{day:02}")]
    InvalidDate { year: i32, month: u32, day: u32 },
    /// Date arithmetic left the representable range.
    #[error("date out of range")]
    OutOfRange,
    #[error("birth date cannot be in the future")]
    FutureBirthDate,
    #[error("invalid timestamp {0}")]
    InvalidTimestamp(i64),
    /// Text could not be read as a DD/MM/YYYY date.
    #[error("invalid date format '{0}' (use DD/MM/YYYY)")]
    Format(String),
}
