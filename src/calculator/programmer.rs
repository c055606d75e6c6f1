//! Fixed-width bit manipulation for programmer mode.
//!
//! The current value is reinterpreted as a 64-bit two's-complement integer.
//! Every result is masked to the engine's bit width; at 64 bits the masked
//! pattern is read back as a signed integer, at narrower widths it is the
//! non-negative masked value.

use super::engine::{Engine, PendingOperation};
use super::format::{NumberBase, binary_string, format_in_base};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Word size used by masking, rotation and zero counting.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum BitWidth {
    Bits8,
    Bits16,
    #[default]
    Bits32,
    Bits64,
}

impl BitWidth {
    /// Every supported width, narrowest first.
    pub const ALL: [BitWidth; 4] = [Self::Bits8, Self::Bits16, Self::Bits32, Self::Bits64];

    /// Number of bits in a word.
    pub fn bits(self) -> u32 {
        match self {
            Self::Bits8 => 8,
            Self::Bits16 => 16,
            Self::Bits32 => 32,
            Self::Bits64 => 64,
        }
    }

    /// All-ones mask covering this width.
    pub fn mask(self) -> u64 {
        match self {
            Self::Bits64 => u64::MAX,
            _ => (1u64 << self.bits()) - 1,
        }
    }
}

impl TryFrom<u32> for BitWidth {
    type Error = String;

    fn try_from(bits: u32) -> Result<Self, Self::Error> {
        match bits {
            8 => Ok(Self::Bits8),
            16 => Ok(Self::Bits16),
            32 => Ok(Self::Bits32),
            64 => Ok(Self::Bits64),
            other => Err(format!("unsupported bit width {}, expected 8, 16, 32 or 64", other)),
        }
    }
}

impl From<BitWidth> for u32 {
    fn from(width: BitWidth) -> Self {
        width.bits()
    }
}

impl fmt::Display for BitWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-bit", self.bits())
    }
}

/// Binary bitwise operators that can be left pending.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BitOp {
    And,
    Or,
    Xor,
    Nand,
    Nor,
    LeftShift,
    RightShift,
}

impl BitOp {
    /// Operator text used in history entries.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
            Self::Xor => "XOR",
            Self::Nand => "NAND",
            Self::Nor => "NOR",
            Self::LeftShift => "<<",
            Self::RightShift => ">>",
        }
    }

    /// Apply the operator to raw 64-bit patterns, before width masking.
    pub fn apply(self, lhs: u64, rhs: u64) -> u64 {
        match self {
            Self::And => lhs & rhs,
            Self::Or => lhs | rhs,
            Self::Xor => lhs ^ rhs,
            Self::Nand => !(lhs & rhs),
            Self::Nor => !(lhs | rhs),
            Self::LeftShift => shift_left(lhs, rhs),
            Self::RightShift => shift_right(lhs, rhs),
        }
    }
}

/// Reinterpret a display value as a 64-bit pattern.
pub fn to_bits(value: f64) -> u64 {
    value as i64 as u64
}

/// Mask `bits` to `width` and turn it back into a signed integer.
pub fn wrap(bits: u64, width: BitWidth) -> i64 {
    (bits & width.mask()) as i64
}

fn shift_left(value: u64, amount: u64) -> u64 {
    u32::try_from(amount)
        .ok()
        .and_then(|n| value.checked_shl(n))
        .unwrap_or(0)
}

fn shift_right(value: u64, amount: u64) -> u64 {
    u32::try_from(amount)
        .ok()
        .and_then(|n| value.checked_shr(n))
        .unwrap_or(0)
}

/// Rotate the low `width` bits left by `amount` modulo the width.
pub fn rotate_left(value: u64, amount: u32, width: BitWidth) -> u64 {
    let bits = width.bits();
    let value = value & width.mask();
    let amount = amount % bits;
    if amount == 0 {
        return value;
    }
    ((value << amount) | (value >> (bits - amount))) & width.mask()
}

/// Rotate the low `width` bits right by `amount` modulo the width.
pub fn rotate_right(value: u64, amount: u32, width: BitWidth) -> u64 {
    let bits = width.bits();
    let value = value & width.mask();
    let amount = amount % bits;
    if amount == 0 {
        return value;
    }
    ((value >> amount) | (value << (bits - amount))) & width.mask()
}

/// Zero bits above the highest set bit, counted within `width`.
pub fn leading_zeros(value: u64, width: BitWidth) -> u32 {
    let masked = value & width.mask();
    masked.leading_zeros() - (64 - width.bits())
}

/// Zero bits below the lowest set bit of the full 64-bit value.
///
/// Zero yields 64 whatever the configured width.
pub fn trailing_zeros(value: u64) -> u32 {
    value.trailing_zeros()
}

/// Reverse the byte order within `width`. Single bytes are left alone.
pub fn byte_swap(value: u64, width: BitWidth) -> u64 {
    match width {
        BitWidth::Bits8 => value & width.mask(),
        BitWidth::Bits16 => u64::from((value as u16).swap_bytes()),
        BitWidth::Bits32 => u64::from((value as u32).swap_bytes()),
        BitWidth::Bits64 => value.swap_bytes(),
    }
}

/// Arithmetic negation within `width` bits.
pub fn twos_complement(value: u64, width: BitWidth) -> u64 {
    value.wrapping_neg() & width.mask()
}

/// Bit position helper; positions past 63 select nothing.
fn bit_mask(position: u32) -> u64 {
    1u64.checked_shl(position).unwrap_or(0)
}

/// DEC/HEX/OCT/BIN readouts of one value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BaseReadouts {
    pub dec: String,
    pub hex: String,
    pub oct: String,
    pub bin: String,
}

impl Engine {
    /// Store an integer result of a bit operation.
    fn commit_bits(&mut self, bits: u64) -> i64 {
        let result = wrap(bits, self.bit_width);
        self.current_value = result as f64;
        self.display = format_in_base(result, self.number_base);
        self.new_input = true;
        self.error = None;
        result
    }

    fn bits(&self) -> u64 {
        to_bits(self.current_value)
    }

    /// Word size used by the bit operations.
    pub fn bit_width(&self) -> BitWidth {
        self.bit_width
    }

    /// Change the word size. The current value is left as is.
    pub fn set_bit_width(&mut self, width: BitWidth) {
        tracing::debug!(%width, "bit width changed");
        self.bit_width = width;
    }

    /// Select a pending bitwise operator. It is resolved by `calculate`.
    pub fn set_bitwise_operation(&mut self, op: BitOp) {
        self.set_pending(PendingOperation::Bitwise(op));
    }

    /// Resolve a pending bitwise operator against the stored operand.
    pub(crate) fn apply_bitwise(&self, op: BitOp) -> f64 {
        let lhs = to_bits(self.stored_value) & self.bit_width.mask();
        wrap(op.apply(lhs, self.bits()), self.bit_width) as f64
    }

    fn binary_with(&mut self, op: BitOp, other: i64) -> i64 {
        let lhs = self.bits() & self.bit_width.mask();
        let bits = op.apply(lhs, other as u64);
        self.commit_bits(bits)
    }

    /// Bitwise AND with `other`.
    pub fn and(&mut self, other: i64) -> i64 {
        self.binary_with(BitOp::And, other)
    }

    /// Bitwise OR with `other`.
    pub fn or(&mut self, other: i64) -> i64 {
        self.binary_with(BitOp::Or, other)
    }

    /// Bitwise XOR with `other`.
    pub fn xor(&mut self, other: i64) -> i64 {
        self.binary_with(BitOp::Xor, other)
    }

    /// Bitwise NAND with `other`.
    pub fn nand(&mut self, other: i64) -> i64 {
        self.binary_with(BitOp::Nand, other)
    }

    /// Bitwise NOR with `other`.
    pub fn nor(&mut self, other: i64) -> i64 {
        self.binary_with(BitOp::Nor, other)
    }

    /// Invert every bit within the word.
    pub fn not(&mut self) -> i64 {
        let bits = !self.bits();
        self.commit_bits(bits)
    }

    /// Logical shift of the width-masked value.
    pub fn left_shift(&mut self, amount: u32) -> i64 {
        let bits = shift_left(self.bits() & self.bit_width.mask(), u64::from(amount));
        self.commit_bits(bits)
    }

    /// Logical shift of the width-masked value.
    pub fn right_shift(&mut self, amount: u32) -> i64 {
        let bits = shift_right(self.bits() & self.bit_width.mask(), u64::from(amount));
        self.commit_bits(bits)
    }

    /// Rotate the word left by `amount`.
    pub fn rotate_left(&mut self, amount: u32) -> i64 {
        let bits = rotate_left(self.bits(), amount, self.bit_width);
        self.commit_bits(bits)
    }

    /// Rotate the word right by `amount`.
    pub fn rotate_right(&mut self, amount: u32) -> i64 {
        let bits = rotate_right(self.bits(), amount, self.bit_width);
        self.commit_bits(bits)
    }

    /// Value of the bit at `position`, 0 or 1.
    pub fn get_bit(&self, position: u32) -> u8 {
        u8::from(self.bits() & bit_mask(position) != 0)
    }

    /// Set the bit at `position` to 1.
    pub fn set_bit(&mut self, position: u32) -> i64 {
        let bits = self.bits() | bit_mask(position);
        self.commit_bits(bits)
    }

    /// Set the bit at `position` to 0.
    pub fn clear_bit(&mut self, position: u32) -> i64 {
        let bits = self.bits() & !bit_mask(position);
        self.commit_bits(bits)
    }

    /// Flip the bit at `position`.
    pub fn toggle_bit(&mut self, position: u32) -> i64 {
        let bits = self.bits() ^ bit_mask(position);
        self.commit_bits(bits)
    }

    /// Replace the value with its population count.
    pub fn count_bits(&mut self) -> i64 {
        let count = self.bits().count_ones();
        self.commit_bits(u64::from(count))
    }

    /// Replace the value with its leading zero count within the word.
    pub fn leading_zeros(&mut self) -> i64 {
        let count = leading_zeros(self.bits(), self.bit_width);
        self.commit_bits(u64::from(count))
    }

    /// Replace the value with its trailing zero count.
    pub fn trailing_zeros(&mut self) -> i64 {
        let count = trailing_zeros(self.bits());
        self.commit_bits(u64::from(count))
    }

    /// Reverse the byte order within the word.
    pub fn byte_swap(&mut self) -> i64 {
        let bits = byte_swap(self.bits(), self.bit_width);
        self.commit_bits(bits)
    }

    /// Negate the value within the word.
    pub fn twos_complement(&mut self) -> i64 {
        let bits = twos_complement(self.bits(), self.bit_width);
        self.commit_bits(bits)
    }

    /// Grouped binary rendering of the current value.
    pub fn binary_string(&self, width: BitWidth) -> String {
        binary_string(self.bits(), width.bits())
    }

    /// The current value in every base at once.
    pub fn all_bases(&self) -> BaseReadouts {
        let value = self.current_value as i64;
        BaseReadouts {
            dec: format_in_base(value, NumberBase::Decimal),
            hex: format_in_base(value, NumberBase::Hexadecimal),
            oct: format_in_base(value, NumberBase::Octal),
            bin: self.binary_string(BitWidth::Bits64),
        }
    }
}
