//! Date/time calculator for the date mode.
//!
//! Independent of the calculation engine. Holds a start and an end date and
//! answers questions about them: differences, offsets, ages and calendar facts.

mod calc;
mod difference;
mod error;
mod input;

pub use calc::{Age, DateTimeCalc, age_at};
pub use difference::{
    DateDifference, TimeDifference, calendar_breakdown, days_in_month, format_difference,
    is_leap_year,
};
pub use error::DateError;
pub use input::{DATE_FORMAT, DateOffset, parse_date, parse_time_delta};
