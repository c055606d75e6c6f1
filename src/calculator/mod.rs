//! Calculation engine for the standard, scientific and programmer modes.
//!
//! This module provides:
//! - An immediate-execution accumulator driven by key presses
//! - Scientific functions with angle-mode aware trigonometry
//! - Fixed-width bit manipulation for programmer mode
//! - Number formatting in decimal, binary, octal and hexadecimal

mod engine;
mod error;
mod format;
mod history;
mod programmer;
mod scientific;

pub use engine::{ArithOp, Engine, MemoryOp, PendingOperation};
pub use error::CalcError;
pub use format::{NumberBase, binary_string, format_decimal, format_in_base, format_number, parse_in_base};
pub use history::{HISTORY_LIMIT, History};
pub use programmer::{
    BaseReadouts, BitOp, BitWidth, byte_swap, leading_zeros, rotate_left, rotate_right,
    trailing_zeros, twos_complement,
};
pub use scientific::{AngleMode, ScientificFn};
