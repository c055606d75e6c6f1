//! Key token detection for the keypad front end.
//!
//! Maps the text of a key press ("7", "+", "sin", "rol", "bit:3", ...) to a
//! [`Key`]. Hex digits are only recognised while hex entry is enabled, since
//! "c" and "e" otherwise mean clear and Euler's number.

use super::session::Mode;
use crate::calculator::{AngleMode, ArithOp, BitOp, BitWidth, MemoryOp, NumberBase, ScientificFn};
use lazy_static::lazy_static;
use regex::Regex;

/// A single key press.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Digit(char),
    DecimalPoint,
    Exponent,
    Operator(ArithOp),
    Bitwise(BitOp),
    Equals,
    Function(ScientificFn),
    Negate,
    Percent,
    Memory(MemoryOp),
    Backspace,
    Clear,
    ClearEntry,
    Base(NumberBase),
    Angle(AngleMode),
    Width(BitWidth),
    Mode(Mode),
    Not,
    ShiftLeft,
    ShiftRight,
    RotateLeft,
    RotateRight,
    CountBits,
    LeadingZeros,
    TrailingZeros,
    ByteSwap,
    TwosComplement,
    ToggleBit(u32),
    ShiftAmount(u32),
}

lazy_static! {
    /// Keys that carry a number: "bit:5", "shift:3".
    static ref PARAM_KEY: Regex = Regex::new(r"^(bit|shift):(\d{1,2})$").unwrap();

    /// Bit width selectors: "w8", "w16", "w32", "w64".
    static ref WIDTH_KEY: Regex = Regex::new(r"^w(8|16|32|64)$").unwrap();
}

/// Parse one key token.
///
/// Returns `None` for anything that is not a key.
pub fn parse_key(token: &str, hex_entry: bool) -> Option<Key> {
    let trimmed = token.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Some(digit) = single_digit(trimmed, hex_entry) {
        return Some(Key::Digit(digit));
    }

    let lower = trimmed.to_lowercase();

    if let Some(caps) = PARAM_KEY.captures(&lower) {
        let value: u32 = caps[2].parse().ok()?;
        return match &caps[1] {
            "bit" if value < 64 => Some(Key::ToggleBit(value)),
            "shift" => Some(Key::ShiftAmount(value)),
            _ => None,
        };
    }

    if let Some(caps) = WIDTH_KEY.captures(&lower) {
        let bits: u32 = caps[1].parse().ok()?;
        return BitWidth::try_from(bits).ok().map(Key::Width);
    }

    if let Some(key) = fixed_key(&lower) {
        return Some(key);
    }

    ScientificFn::from_name(&lower).map(Key::Function)
}

/// A single digit valid for the entry mode.
fn single_digit(token: &str, hex_entry: bool) -> Option<char> {
    let mut chars = token.chars();
    let c = chars.next()?;
    if chars.next().is_some() {
        return None;
    }

    if c.is_ascii_digit() || (hex_entry && c.is_ascii_hexdigit()) {
        Some(c.to_ascii_uppercase())
    } else {
        None
    }
}

fn fixed_key(token: &str) -> Option<Key> {
    let key = match token {
        "." | "," => Key::DecimalPoint,
        "ee" => Key::Exponent,
        "+" => Key::Operator(ArithOp::Add),
        "-" | "−" => Key::Operator(ArithOp::Subtract),
        "*" | "x" | "×" => Key::Operator(ArithOp::Multiply),
        "/" | "÷" => Key::Operator(ArithOp::Divide),
        "mod" => Key::Operator(ArithOp::Modulo),
        "^" | "pow" => Key::Operator(ArithOp::Power),
        "=" | "enter" => Key::Equals,
        "neg" | "±" => Key::Negate,
        "%" => Key::Percent,
        "mc" => Key::Memory(MemoryOp::Clear),
        "mr" => Key::Memory(MemoryOp::Recall),
        "m+" => Key::Memory(MemoryOp::Add),
        "m-" => Key::Memory(MemoryOp::Subtract),
        "ms" => Key::Memory(MemoryOp::Store),
        "bs" | "back" | "⌫" => Key::Backspace,
        "c" | "esc" => Key::Clear,
        "ce" | "del" => Key::ClearEntry,
        "hex" => Key::Base(NumberBase::Hexadecimal),
        "dec" => Key::Base(NumberBase::Decimal),
        "oct" => Key::Base(NumberBase::Octal),
        "bin" => Key::Base(NumberBase::Binary),
        "deg" => Key::Angle(AngleMode::Degrees),
        "rad" => Key::Angle(AngleMode::Radians),
        "grad" => Key::Angle(AngleMode::Gradians),
        "standard" => Key::Mode(Mode::Standard),
        "scientific" => Key::Mode(Mode::Scientific),
        "programmer" => Key::Mode(Mode::Programmer),
        "date" => Key::Mode(Mode::Date),
        "and" | "&" => Key::Bitwise(BitOp::And),
        "or" | "|" => Key::Bitwise(BitOp::Or),
        "xor" => Key::Bitwise(BitOp::Xor),
        "nand" => Key::Bitwise(BitOp::Nand),
        "nor" => Key::Bitwise(BitOp::Nor),
        "lsh" => Key::Bitwise(BitOp::LeftShift),
        "rsh" => Key::Bitwise(BitOp::RightShift),
        "not" | "~" => Key::Not,
        "<<" => Key::ShiftLeft,
        ">>" => Key::ShiftRight,
        "rol" => Key::RotateLeft,
        "ror" => Key::RotateRight,
        "cnt" => Key::CountBits,
        "lz" => Key::LeadingZeros,
        "tz" => Key::TrailingZeros,
        "swap" => Key::ByteSwap,
        "2s" => Key::TwosComplement,
        "x²" | "x2" => Key::Function(ScientificFn::Square),
        "x³" | "x3" => Key::Function(ScientificFn::Cube),
        "√" => Key::Function(ScientificFn::Sqrt),
        "∛" => Key::Function(ScientificFn::Cbrt),
        "1/x" => Key::Function(ScientificFn::Reciprocal),
        "n!" | "!" => Key::Function(ScientificFn::Factorial),
        "π" => Key::Function(ScientificFn::Pi),
        "|x|" => Key::Function(ScientificFn::Abs),
        _ => return None,
    };
    Some(key)
}

/// Split a line into key tokens.
pub fn tokenize(line: &str) -> impl Iterator<Item = &str> {
    line.split_whitespace()
}
