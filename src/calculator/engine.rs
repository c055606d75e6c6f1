//! The immediate-execution calculation engine.
//!
//! The engine interprets a stream of key presses: digits build up the current
//! operand, operators park it as the stored operand, and `calculate` resolves
//! the pending operation strictly left to right.

use super::error::CalcError;
use super::format::{NumberBase, format_number, parse_in_base};
use super::history::History;
use super::programmer::{BitOp, BitWidth};
use super::scientific::AngleMode;

/// Binary arithmetic operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Power,
}

impl ArithOp {
    /// Symbol used in history entries and the expression line.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "−",
            Self::Multiply => "×",
            Self::Divide => "÷",
            Self::Modulo => "mod",
            Self::Power => "^",
        }
    }

    fn apply(self, lhs: f64, rhs: f64) -> Result<f64, CalcError> {
        match self {
            Self::Add => Ok(lhs + rhs),
            Self::Subtract => Ok(lhs - rhs),
            Self::Multiply => Ok(lhs * rhs),
            Self::Divide if rhs == 0.0 => Err(CalcError::DivisionByZero),
            Self::Divide => Ok(lhs / rhs),
            Self::Modulo if rhs == 0.0 => Err(CalcError::DivisionByZero),
            // `%` on f64 truncates toward zero, keeping the sign of the dividend
            Self::Modulo => Ok(lhs % rhs),
            Self::Power => Ok(lhs.powf(rhs)),
        }
    }
}

/// A binary operator waiting for its right operand.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PendingOperation {
    #[default]
    None,
    Arithmetic(ArithOp),
    Bitwise(BitOp),
}

impl PendingOperation {
    /// Whether no operator is waiting for its right operand.
    pub fn is_none(self) -> bool {
        matches!(self, Self::None)
    }

    /// Symbol of the pending operator, empty when none.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::None => "",
            Self::Arithmetic(op) => op.symbol(),
            Self::Bitwise(op) => op.symbol(),
        }
    }
}

/// Single-slot memory operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MemoryOp {
    Clear,
    Recall,
    Add,
    Subtract,
    Store,
}

/// Calculator state for one session.
#[derive(Clone, Debug)]
pub struct Engine {
    pub(crate) display: String,
    pub(crate) current_value: f64,
    pub(crate) stored_value: f64,
    pub(crate) pending: PendingOperation,
    pub(crate) new_input: bool,
    pub(crate) memory: f64,
    pub(crate) history: History,
    pub(crate) angle_mode: AngleMode,
    pub(crate) number_base: NumberBase,
    pub(crate) bit_width: BitWidth,
    pub(crate) error: Option<CalcError>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// A fresh engine showing "0" in decimal.
    pub fn new() -> Self {
        Self {
            display: "0".to_string(),
            current_value: 0.0,
            stored_value: 0.0,
            pending: PendingOperation::None,
            new_input: true,
            memory: 0.0,
            history: History::new(),
            angle_mode: AngleMode::default(),
            number_base: NumberBase::default(),
            bit_width: BitWidth::default(),
            error: None,
        }
    }

    /// Current display text, including the "Error"/"Overflow" sentinels.
    pub fn display(&self) -> &str {
        &self.display
    }

    /// Numeric value of the operand on the display.
    pub fn current_value(&self) -> f64 {
        self.current_value
    }

    /// Left operand held for the pending operation.
    pub fn stored_value(&self) -> f64 {
        self.stored_value
    }

    /// The operation waiting for its right operand.
    pub fn pending(&self) -> PendingOperation {
        self.pending
    }

    /// Whether the next digit starts a new operand.
    pub fn is_new_input(&self) -> bool {
        self.new_input
    }

    /// Contents of the memory slot.
    pub fn memory(&self) -> f64 {
        self.memory
    }

    /// Completed calculations, oldest first.
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Base used for entry and display.
    pub fn number_base(&self) -> NumberBase {
        self.number_base
    }

    /// The error currently shown on the display, if any.
    pub fn error(&self) -> Option<CalcError> {
        self.error
    }

    /// Store a successful result and finish the operand. Programmer bases
    /// keep only the integer part, matching what they display.
    pub(crate) fn commit(&mut self, value: f64) {
        let value = if self.number_base == NumberBase::Decimal {
            value
        } else {
            value.trunc()
        };
        self.current_value = value;
        self.display = self.format_number(value);
        self.new_input = true;
        self.error = None;
    }

    /// Show the sentinel for `err` without touching the numeric state.
    pub(crate) fn fail(&mut self, err: CalcError) -> CalcError {
        tracing::debug!(%err, value = self.current_value, "operation rejected");
        self.display = err.sentinel().to_string();
        self.new_input = true;
        self.error = Some(err);
        err
    }

    pub(crate) fn format_number(&self, value: f64) -> String {
        format_number(value, self.number_base)
    }

    /// Reset everything except memory, history and configuration.
    pub fn clear(&mut self) {
        self.display = "0".to_string();
        self.current_value = 0.0;
        self.stored_value = 0.0;
        self.pending = PendingOperation::None;
        self.new_input = true;
        self.error = None;
    }

    /// Reset the current operand only.
    pub fn clear_entry(&mut self) {
        self.display = "0".to_string();
        self.current_value = 0.0;
        self.new_input = true;
        self.error = None;
    }

    /// Type a digit in the current base. Digits the base does not accept are
    /// ignored.
    pub fn input_digit(&mut self, digit: char) {
        if !self.number_base.accepts_digit(digit) {
            tracing::debug!(%digit, base = ?self.number_base, "ignoring digit");
            return;
        }
        let digit = digit.to_ascii_uppercase();

        if self.new_input {
            self.display = digit.to_string();
            self.new_input = false;
            self.error = None;
        } else if self.display == "0" {
            self.display = digit.to_string();
        } else {
            self.display.push(digit);
        }
        self.reparse_display();
    }

    /// Start the fractional part of a decimal operand.
    pub fn input_decimal_point(&mut self) {
        if self.number_base != NumberBase::Decimal {
            return;
        }
        if self.new_input {
            self.display = "0.".to_string();
            self.current_value = 0.0;
            self.new_input = false;
            self.error = None;
        } else if !self.display.contains('.') {
            self.display.push('.');
        }
    }

    /// Start the exponent of a decimal operand in scientific notation.
    pub fn input_exponent(&mut self) {
        if self.number_base != NumberBase::Decimal {
            return;
        }
        if self.new_input {
            self.display = "1e".to_string();
            self.current_value = 1.0;
            self.new_input = false;
            self.error = None;
        } else if !self.display.to_ascii_lowercase().contains('e') {
            self.display.push('e');
        }
    }

    /// Re-read the current value from the display buffer. Incomplete input
    /// such as "1e" keeps the previous value.
    fn reparse_display(&mut self) {
        let parsed = if self.number_base == NumberBase::Decimal {
            self.display.parse::<f64>().ok()
        } else {
            parse_in_base(&self.display, self.number_base)
                .ok()
                .map(|v| v as f64)
        };

        if let Some(value) = parsed {
            self.current_value = value;
        }
    }

    /// Select a binary arithmetic operator.
    pub fn set_operation(&mut self, op: ArithOp) {
        self.set_pending(PendingOperation::Arithmetic(op));
    }

    /// Park the current operand and wait for the right operand. A pending
    /// operation with a freshly typed operand is resolved first.
    pub(crate) fn set_pending(&mut self, op: PendingOperation) {
        if !self.pending.is_none() && !self.new_input {
            // A failure already shows its sentinel; chaining just continues.
            let _ = self.calculate();
        }
        self.stored_value = self.current_value;
        self.pending = op;
        self.new_input = true;
    }

    /// Resolve the pending operation.
    ///
    /// Returns the current value unchanged when nothing is pending. Division
    /// by zero keeps the operands and the pending operation as they were.
    pub fn calculate(&mut self) -> Result<f64, CalcError> {
        let result = match self.pending {
            PendingOperation::None => return Ok(self.current_value),
            PendingOperation::Arithmetic(op) => {
                match op.apply(self.stored_value, self.current_value) {
                    Ok(value) => value,
                    Err(err) => return Err(self.fail(err)),
                }
            }
            PendingOperation::Bitwise(op) => self.apply_bitwise(op),
        };

        let entry = format!(
            "{} {} {} = {}",
            self.format_number(self.stored_value),
            self.pending.symbol(),
            self.format_number(self.current_value),
            self.format_number(result)
        );
        self.history.push(entry);

        self.commit(result);
        self.pending = PendingOperation::None;
        Ok(self.current_value)
    }

    /// Flip the sign of the current operand.
    pub fn negate(&mut self) {
        self.current_value = -self.current_value;
        self.display = self.format_number(self.current_value);
        self.error = None;
    }

    /// Percent of the stored operand for add/subtract, otherwise a plain
    /// division by one hundred.
    pub fn percent(&mut self) {
        let value = match self.pending {
            PendingOperation::Arithmetic(ArithOp::Add | ArithOp::Subtract) => {
                self.stored_value * (self.current_value / 100.0)
            }
            _ => self.current_value / 100.0,
        };
        self.commit(value);
    }

    /// Run one of the MC/MR/M+/M-/MS keys.
    pub fn memory_op(&mut self, op: MemoryOp) {
        match op {
            MemoryOp::Clear => self.memory = 0.0,
            MemoryOp::Recall => self.commit(self.memory),
            MemoryOp::Add => self.memory += self.current_value,
            MemoryOp::Subtract => self.memory -= self.current_value,
            MemoryOp::Store => self.memory = self.current_value,
        }
    }

    /// MC: zero the memory slot.
    pub fn memory_clear(&mut self) {
        self.memory_op(MemoryOp::Clear);
    }

    /// MR: load memory into the current operand.
    pub fn memory_recall(&mut self) {
        self.memory_op(MemoryOp::Recall);
    }

    /// M+: add the current operand to memory.
    pub fn memory_add(&mut self) {
        self.memory_op(MemoryOp::Add);
    }

    /// M-: subtract the current operand from memory.
    pub fn memory_subtract(&mut self) {
        self.memory_op(MemoryOp::Subtract);
    }

    /// MS: replace memory with the current operand.
    pub fn memory_store(&mut self) {
        self.memory_op(MemoryOp::Store);
    }

    /// Remove the last typed character.
    pub fn backspace(&mut self) {
        if self.error.is_none() && self.display.chars().count() > 1 {
            self.display.pop();
            if self.display == "-" {
                self.display = "0".to_string();
                self.current_value = 0.0;
            } else {
                self.reparse_display();
            }
        } else {
            self.display = "0".to_string();
            self.current_value = 0.0;
            self.error = None;
        }
    }

    /// Switch the display base. The value is truncated to an integer when
    /// entering a programmer base and kept as is for decimal.
    pub fn set_number_base(&mut self, base: NumberBase) {
        tracing::debug!(from = ?self.number_base, to = ?base, value = self.current_value, "number base changed");
        self.number_base = base;
        if base != NumberBase::Decimal {
            self.current_value = (self.current_value as i64) as f64;
        }
        self.display = self.format_number(self.current_value);
        self.error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_digits(engine: &mut Engine, digits: &str) {
        for d in digits.chars() {
            if d == '.' {
                engine.input_decimal_point();
            } else {
                engine.input_digit(d);
            }
        }
    }

    #[test]
    fn test_simple_addition() {
        let mut engine = Engine::new();
        type_digits(&mut engine, "5");
        engine.set_operation(ArithOp::Add);
        type_digits(&mut engine, "3");
        assert_eq!(engine.calculate(), Ok(8.0));
        assert_eq!(engine.display(), "8");
        assert!(engine.history().contains("5 + 3 = 8"));
        assert!(engine.pending().is_none());
    }

    #[test]
    fn test_digits_match_display() {
        let mut engine = Engine::new();
        type_digits(&mut engine, "0012034");
        assert_eq!(engine.display(), "12034");
        assert_eq!(engine.current_value(), 12034.0);
    }

    #[test]
    fn test_calculate_without_pending_is_noop() {
        let mut engine = Engine::new();
        type_digits(&mut engine, "42");
        assert_eq!(engine.calculate(), Ok(42.0));
        assert_eq!(engine.calculate(), Ok(42.0));
        assert_eq!(engine.display(), "42");
        assert!(engine.history().is_empty());
    }

    #[test]
    fn test_chaining_left_to_right() {
        let mut engine = Engine::new();
        type_digits(&mut engine, "2");
        engine.set_operation(ArithOp::Add);
        type_digits(&mut engine, "3");
        engine.set_operation(ArithOp::Multiply);
        assert_eq!(engine.display(), "5");
        type_digits(&mut engine, "4");
        assert_eq!(engine.calculate(), Ok(20.0));
    }

    #[test]
    fn test_changing_operator_does_not_calculate() {
        let mut engine = Engine::new();
        type_digits(&mut engine, "9");
        engine.set_operation(ArithOp::Add);
        engine.set_operation(ArithOp::Subtract);
        type_digits(&mut engine, "4");
        assert_eq!(engine.calculate(), Ok(5.0));
        assert!(engine.history().contains("9 − 4 = 5"));
    }

    #[test]
    fn test_division_by_zero() {
        let mut engine = Engine::new();
        type_digits(&mut engine, "7");
        engine.set_operation(ArithOp::Divide);
        type_digits(&mut engine, "0");
        assert_eq!(engine.calculate(), Err(CalcError::DivisionByZero));
        assert_eq!(engine.display(), "Error");
        assert_eq!(engine.current_value(), 0.0);
        assert_eq!(engine.stored_value(), 7.0);
        assert!(engine.history().is_empty());
    }

    #[test]
    fn test_modulo_by_zero() {
        let mut engine = Engine::new();
        type_digits(&mut engine, "7");
        engine.set_operation(ArithOp::Modulo);
        type_digits(&mut engine, "0");
        assert_eq!(engine.calculate(), Err(CalcError::DivisionByZero));
        assert_eq!(engine.display(), "Error");
    }

    #[test]
    fn test_modulo_and_power() {
        let mut engine = Engine::new();
        type_digits(&mut engine, "17");
        engine.set_operation(ArithOp::Modulo);
        type_digits(&mut engine, "5");
        assert_eq!(engine.calculate(), Ok(2.0));
        assert!(engine.history().contains("17 mod 5 = 2"));

        engine.set_operation(ArithOp::Power);
        type_digits(&mut engine, "10");
        assert_eq!(engine.calculate(), Ok(1024.0));
    }

    #[test]
    fn test_decimal_and_exponent_input() {
        let mut engine = Engine::new();
        engine.input_decimal_point();
        type_digits(&mut engine, "25");
        assert_eq!(engine.display(), "0.25");
        assert_eq!(engine.current_value(), 0.25);
        engine.input_decimal_point();
        assert_eq!(engine.display(), "0.25");

        engine.clear();
        type_digits(&mut engine, "3");
        engine.input_exponent();
        assert_eq!(engine.current_value(), 3.0);
        type_digits(&mut engine, "2");
        assert_eq!(engine.display(), "3e2");
        assert_eq!(engine.current_value(), 300.0);
    }

    #[test]
    fn test_percent() {
        let mut engine = Engine::new();
        type_digits(&mut engine, "200");
        engine.set_operation(ArithOp::Add);
        type_digits(&mut engine, "10");
        engine.percent();
        assert_eq!(engine.display(), "20");
        assert_eq!(engine.calculate(), Ok(220.0));

        engine.clear();
        type_digits(&mut engine, "50");
        engine.percent();
        assert_eq!(engine.display(), "0.5");
    }

    #[test]
    fn test_memory() {
        let mut engine = Engine::new();
        type_digits(&mut engine, "12");
        engine.memory_store();
        engine.clear_entry();
        type_digits(&mut engine, "3");
        engine.memory_add();
        engine.memory_add();
        assert_eq!(engine.memory(), 18.0);
        engine.memory_subtract();
        engine.memory_recall();
        assert_eq!(engine.display(), "15");
        assert!(engine.is_new_input());
        engine.memory_clear();
        assert_eq!(engine.memory(), 0.0);
    }

    #[test]
    fn test_backspace() {
        let mut engine = Engine::new();
        type_digits(&mut engine, "123");
        engine.backspace();
        assert_eq!(engine.display(), "12");
        assert_eq!(engine.current_value(), 12.0);
        engine.backspace();
        engine.backspace();
        assert_eq!(engine.display(), "0");
        assert_eq!(engine.current_value(), 0.0);
    }

    #[test]
    fn test_backspace_clears_error() {
        let mut engine = Engine::new();
        type_digits(&mut engine, "1");
        engine.set_operation(ArithOp::Divide);
        type_digits(&mut engine, "0");
        assert!(engine.calculate().is_err());
        engine.backspace();
        assert_eq!(engine.display(), "0");
        assert!(engine.error().is_none());
    }

    #[test]
    fn test_negate() {
        let mut engine = Engine::new();
        type_digits(&mut engine, "5");
        engine.negate();
        assert_eq!(engine.display(), "-5");
        engine.backspace();
        assert_eq!(engine.display(), "0");
    }

    #[test]
    fn test_clear_resets_pending() {
        let mut engine = Engine::new();
        type_digits(&mut engine, "5");
        engine.set_operation(ArithOp::Add);
        engine.clear();
        assert!(engine.pending().is_none());
        assert_eq!(engine.display(), "0");
    }

    #[test]
    fn test_hex_input_and_base_switch() {
        let mut engine = Engine::new();
        engine.set_number_base(NumberBase::Hexadecimal);
        engine.input_digit('F');
        engine.input_digit('f');
        assert_eq!(engine.display(), "FF");
        assert_eq!(engine.current_value(), 255.0);
        engine.set_number_base(NumberBase::Decimal);
        assert_eq!(engine.display(), "255");
    }

    #[test]
    fn test_hex_digits_rejected_in_decimal() {
        let mut engine = Engine::new();
        type_digits(&mut engine, "1A");
        assert_eq!(engine.display(), "1");
    }

    #[test]
    fn test_programmer_base_truncates_results() {
        let mut engine = Engine::new();
        engine.set_number_base(NumberBase::Binary);
        type_digits(&mut engine, "111");
        engine.set_operation(ArithOp::Divide);
        type_digits(&mut engine, "10");
        assert_eq!(engine.calculate(), Ok(3.0));
        assert_eq!(engine.display(), "11");
        assert!(engine.history().contains("111 ÷ 10 = 11"));
    }

    #[test]
    fn test_base_switch_keeps_value_and_display_in_step() {
        let mut engine = Engine::new();
        type_digits(&mut engine, "2.5");
        engine.set_number_base(NumberBase::Decimal);
        assert_eq!(engine.display(), "2.5");
        assert_eq!(engine.current_value(), 2.5);

        engine.set_number_base(NumberBase::Hexadecimal);
        assert_eq!(engine.display(), "2");
        assert_eq!(engine.current_value(), 2.0);
    }

    #[test]
    fn test_programmer_base_truncates_percent_and_recall() {
        let mut engine = Engine::new();
        engine.set_number_base(NumberBase::Hexadecimal);
        type_digits(&mut engine, "C5");
        engine.percent();
        assert_eq!(engine.display(), "1");
        assert_eq!(engine.current_value(), 1.0);

        engine.set_number_base(NumberBase::Decimal);
        type_digits(&mut engine, "7.5");
        engine.memory_store();
        engine.set_number_base(NumberBase::Octal);
        engine.memory_recall();
        assert_eq!(engine.display(), "7");
        assert_eq!(engine.current_value(), 7.0);
    }

    #[test]
    fn test_decimal_point_ignored_in_hex() {
        let mut engine = Engine::new();
        engine.set_number_base(NumberBase::Hexadecimal);
        engine.input_digit('A');
        engine.input_decimal_point();
        engine.input_exponent();
        assert_eq!(engine.display(), "A");
    }
}
