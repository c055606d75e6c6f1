//! Number formatting and parsing for the display.
//!
//! Decimal values are rendered as floats with trailing zeros trimmed, while
//! the programmer bases render the value truncated to a 64-bit integer.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::num::ParseIntError;

/// Largest magnitude that is still rendered through the integer path.
const INTEGER_DISPLAY_LIMIT: f64 = 1e15;

/// Number base used for display and digit entry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum NumberBase {
    #[default]
    #[value(alias = "dec")]
    Decimal,
    #[value(alias = "bin")]
    Binary,
    #[value(alias = "oct")]
    Octal,
    #[value(alias = "hex")]
    Hexadecimal,
}

impl NumberBase {
    /// All bases in panel order.
    pub const ALL: [NumberBase; 4] = [Self::Hexadecimal, Self::Decimal, Self::Octal, Self::Binary];

    /// The radix of this base.
    pub fn radix(self) -> u32 {
        match self {
            Self::Decimal => 10,
            Self::Binary => 2,
            Self::Octal => 8,
            Self::Hexadecimal => 16,
        }
    }

    /// Short label shown next to the base readouts.
    pub fn label(self) -> &'static str {
        match self {
            Self::Decimal => "DEC",
            Self::Binary => "BIN",
            Self::Octal => "OCT",
            Self::Hexadecimal => "HEX",
        }
    }

    /// Check whether `digit` can be typed in this base.
    pub fn accepts_digit(self, digit: char) -> bool {
        digit.is_digit(self.radix())
    }
}

/// Format an integer in the given base.
///
/// Negative values keep a leading minus sign rather than being shown as their
/// two's-complement bit pattern. Hex digits are uppercase.
pub fn format_in_base(value: i64, base: NumberBase) -> String {
    let magnitude = value.unsigned_abs();
    let digits = match base {
        NumberBase::Decimal => magnitude.to_string(),
        NumberBase::Binary => format!("{:b}", magnitude),
        NumberBase::Octal => format!("{:o}", magnitude),
        NumberBase::Hexadecimal => format!("{:X}", magnitude),
    };

    if value < 0 {
        format!("-{}", digits)
    } else {
        digits
    }
}

/// Parse an integer written in the given base.
pub fn parse_in_base(text: &str, base: NumberBase) -> Result<i64, ParseIntError> {
    i64::from_str_radix(text, base.radix())
}

/// Format a value for the display in the given base.
pub fn format_number(value: f64, base: NumberBase) -> String {
    if base != NumberBase::Decimal {
        return format_in_base(value as i64, base);
    }
    format_decimal(value)
}

/// Format a decimal value without trailing zeros.
pub fn format_decimal(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < INTEGER_DISPLAY_LIMIT {
        format!("{}", value as i64)
    } else {
        let formatted = format!("{:.10}", value);
        if !formatted.contains('.') {
            // NaN and infinities have no fractional part to trim
            return formatted;
        }
        let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
        if trimmed == "-0" {
            "0".to_string()
        } else {
            trimmed.to_string()
        }
    }
}

/// Render the low `width` bits of `value`, most significant bit first,
/// grouped in nibbles separated by a space.
pub fn binary_string(value: u64, width: u32) -> String {
    let mut result = String::with_capacity(width as usize + width as usize / 4);
    for i in (0..width).rev() {
        let bit = (value.checked_shr(i).unwrap_or(0)) & 1;
        result.push(if bit == 1 { '1' } else { '0' });
        if i > 0 && i % 4 == 0 {
            result.push(' ');
        }
    }
    result
}
