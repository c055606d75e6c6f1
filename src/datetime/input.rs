//! Parsing of user-typed dates and offsets.

use super::error::DateError;
use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;

/// Format accepted for typed dates.
pub const DATE_FORMAT: &str = "%d/%m/%Y";

lazy_static! {
    /// One offset token: a signed integer followed by a unit letter.
    static ref DELTA_TOKEN: Regex = Regex::new(r"^([+-]?\d+)([ymwd])$").unwrap();
}

/// A calendar offset such as "1y 2m 3d".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DateOffset {
    pub years: i32,
    pub months: i32,
    pub days: i64,
}

impl DateOffset {
    pub fn is_zero(&self) -> bool {
        self.years == 0 && self.months == 0 && self.days == 0
    }
}

/// Parse a whitespace separated offset like "1y 2m 3d" or "2w".
///
/// Years, months and days take the last value given for them, weeks add
/// seven days each. Tokens that do not parse are skipped.
pub fn parse_time_delta(input: &str) -> DateOffset {
    let mut offset = DateOffset::default();

    for token in input.trim().to_lowercase().split_whitespace() {
        let Some(caps) = DELTA_TOKEN.captures(token) else {
            tracing::debug!(token, "skipping offset token");
            continue;
        };
        let Ok(amount) = caps[1].parse::<i32>() else {
            continue;
        };

        match &caps[2] {
            "y" => offset.years = amount,
            "m" => offset.months = amount,
            "d" => offset.days = i64::from(amount),
            "w" => offset.days += i64::from(amount) * 7,
            _ => {}
        }
    }

    offset
}

/// Parse a date typed as DD/MM/YYYY.
pub fn parse_date(input: &str) -> Result<NaiveDate, DateError> {
    let trimmed = input.trim();
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map_err(|_| DateError::Format(trimmed.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_offset() {
        let offset = parse_time_delta("1y 2m 3d");
        assert_eq!(
            offset,
            DateOffset {
                years: 1,
                months: 2,
                days: 3
            }
        );
    }

    #[test]
    fn test_weeks_accumulate() {
        assert_eq!(parse_time_delta("2w").days, 14);
        assert_eq!(parse_time_delta("3d 1w").days, 10);
        assert_eq!(parse_time_delta("1w 3d").days, 3);
    }

    #[test]
    fn test_negative_and_case() {
        let offset = parse_time_delta("  -5D  1Y ");
        assert_eq!(offset.days, -5);
        assert_eq!(offset.years, 1);
    }

    #[test]
    fn test_garbage_skipped() {
        assert!(parse_time_delta("soon x 5 d").is_zero());
        assert_eq!(parse_time_delta("tomorrow 4d").days, 4);
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("15/03/2024"),
            Ok(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap())
        );
        assert!(matches!(parse_date("2024-03-15"), Err(DateError::Format(_))));
        assert!(parse_date("31/02/2024").is_err());
    }
}
