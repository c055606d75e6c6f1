//! A calculator session: the engine plus the keypad state around it.

use super::detection::{Key, parse_key, tokenize};
use super::readout::Readout;
use crate::calculator::{CalcError, Engine, NumberBase};
use crate::config::Config;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest shift/rotate amount selectable on the keypad.
const MAX_SHIFT: u32 = 63;

/// Calculator mode, selecting which keypad is active.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Standard,
    Scientific,
    Programmer,
    Date,
}

impl Mode {
    /// Display name of the mode.
    pub fn label(self) -> &'static str {
        match self {
            Self::Standard => "Standard",
            Self::Scientific => "Scientific",
            Self::Programmer => "Programmer",
            Self::Date => "Date",
        }
    }
}

/// Failure of a single key token.
#[derive(Debug, Error)]
pub enum KeypadError {
    #[error("unknown key '{0}'")]
    UnknownKey(String),
    #[error(transparent)]
    Calc(#[from] CalcError),
}

/// Owns the engine for one run and routes key presses into it.
#[derive(Clone, Debug)]
pub struct Session {
    engine: Engine,
    mode: Mode,
    shift_amount: u32,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl Session {
    /// A session starting from the configured mode, base, angle unit and width.
    pub fn new(config: &Config) -> Self {
        let mut engine = Engine::new();
        engine.set_angle_mode(config.angle_mode);
        engine.set_bit_width(config.bit_width);
        engine.set_number_base(config.number_base);

        Self {
            engine,
            mode: config.mode,
            shift_amount: 1,
        }
    }

    /// The engine behind the keypad.
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// The active mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Bit count used by the shift and rotate keys.
    pub fn shift_amount(&self) -> u32 {
        self.shift_amount
    }

    /// Switch modes. Moving into or out of programmer mode returns the
    /// display to decimal.
    pub fn set_mode(&mut self, mode: Mode) {
        if mode == self.mode {
            return;
        }
        tracing::info!(from = self.mode.label(), to = mode.label(), "mode changed");
        if mode == Mode::Programmer || self.mode == Mode::Programmer {
            self.engine.set_number_base(NumberBase::Decimal);
        }
        self.mode = mode;
    }

    /// Whether letters A-F are read as digits.
    fn hex_entry(&self) -> bool {
        self.engine.number_base() == NumberBase::Hexadecimal
    }

    /// Apply one key press. Calculation errors are already shown on the
    /// display when they are returned.
    pub fn press(&mut self, key: Key) -> Result<(), CalcError> {
        let engine = &mut self.engine;
        match key {
            Key::Digit(d) => engine.input_digit(d),
            Key::DecimalPoint => engine.input_decimal_point(),
            Key::Exponent => engine.input_exponent(),
            Key::Operator(op) => engine.set_operation(op),
            Key::Bitwise(op) => engine.set_bitwise_operation(op),
            Key::Equals => {
                engine.calculate()?;
            }
            Key::Function(function) => {
                engine.apply_function(function)?;
            }
            Key::Negate => engine.negate(),
            Key::Percent => engine.percent(),
            Key::Memory(op) => engine.memory_op(op),
            Key::Backspace => engine.backspace(),
            Key::Clear => engine.clear(),
            Key::ClearEntry => engine.clear_entry(),
            Key::Base(base) => engine.set_number_base(base),
            Key::Angle(mode) => engine.set_angle_mode(mode),
            Key::Width(width) => engine.set_bit_width(width),
            Key::Mode(mode) => self.set_mode(mode),
            Key::Not => {
                engine.not();
            }
            Key::ShiftLeft => {
                engine.left_shift(self.shift_amount);
            }
            Key::ShiftRight => {
                engine.right_shift(self.shift_amount);
            }
            Key::RotateLeft => {
                engine.rotate_left(self.shift_amount);
            }
            Key::RotateRight => {
                engine.rotate_right(self.shift_amount);
            }
            Key::CountBits => {
                engine.count_bits();
            }
            Key::LeadingZeros => {
                engine.leading_zeros();
            }
            Key::TrailingZeros => {
                engine.trailing_zeros();
            }
            Key::ByteSwap => {
                engine.byte_swap();
            }
            Key::TwosComplement => {
                engine.twos_complement();
            }
            Key::ToggleBit(position) => {
                engine.toggle_bit(position);
            }
            Key::ShiftAmount(amount) => self.shift_amount = amount.clamp(1, MAX_SHIFT),
        }
        Ok(())
    }

    /// Parse and apply one token. A run of digits such as "128" is typed
    /// digit by digit.
    pub fn press_token(&mut self, token: &str) -> Result<(), KeypadError> {
        if let Some(key) = parse_key(token, self.hex_entry()) {
            return self.press(key).map_err(KeypadError::from);
        }

        let base = self.engine.number_base();
        let is_number = token.chars().count() > 1
            && token
                .chars()
                .all(|c| base.accepts_digit(c) || (c == '.' && base == NumberBase::Decimal));
        if !is_number {
            return Err(KeypadError::UnknownKey(token.to_string()));
        }

        for c in token.chars() {
            let key = if c == '.' { Key::DecimalPoint } else { Key::Digit(c) };
            self.press(key)?;
        }
        Ok(())
    }

    /// Apply every token on a line. Unknown keys are skipped and reported
    /// after the rest of the line has run.
    pub fn press_line(&mut self, line: &str) -> Vec<KeypadError> {
        let mut errors = Vec::new();
        for token in tokenize(line) {
            if let Err(err) = self.press_token(token) {
                tracing::debug!(token, %err, "key failed");
                errors.push(err);
            }
        }
        errors
    }

    /// What the calculator shows right now.
    pub fn readout(&self) -> Readout {
        Readout::from_session(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::BitWidth;

    #[test]
    fn test_addition_scenario() {
        let mut session = Session::default();
        assert!(session.press_line("5 + 3 =").is_empty());
        assert_eq!(session.engine().display(), "8");
        assert!(session.engine().history().contains("5 + 3 = 8"));
    }

    #[test]
    fn test_hex_scenario() {
        let mut session = Session::default();
        session.press_line("programmer hex F F");
        assert_eq!(session.engine().display(), "FF");
        session.press_line("dec");
        assert_eq!(session.engine().display(), "255");
    }

    #[test]
    fn test_multi_digit_tokens() {
        let mut session = Session::default();
        session.press_line("12.5 * 4 =");
        assert_eq!(session.engine().display(), "50");
    }

    #[test]
    fn test_unknown_keys_reported() {
        let mut session = Session::default();
        let errors = session.press_line("1 frobnicate + 2 =");
        assert_eq!(errors.len(), 1);
        assert!(matches!(&errors[0], KeypadError::UnknownKey(k) if k == "frobnicate"));
        assert_eq!(session.engine().display(), "3");
    }

    #[test]
    fn test_calc_errors_reported() {
        let mut session = Session::default();
        let errors = session.press_line("1 / 0 =");
        assert!(matches!(errors[0], KeypadError::Calc(CalcError::DivisionByZero)));
        assert_eq!(session.engine().display(), "Error");
    }

    #[test]
    fn test_shift_amount_and_rotate() {
        let mut session = Session::default();
        session.press_line("programmer w8 shift:4 15 rol");
        assert_eq!(session.engine().display(), "240");
        session.press_line("shift:0");
        assert_eq!(session.shift_amount(), 1);
        session.press_line("shift:99");
        assert_eq!(session.shift_amount(), 63);
    }

    #[test]
    fn test_mode_switch_resets_base() {
        let mut session = Session::default();
        session.press_line("programmer hex A");
        session.press_line("scientific");
        assert_eq!(session.engine().number_base(), NumberBase::Decimal);
        assert_eq!(session.engine().display(), "10");
        assert_eq!(session.mode(), Mode::Scientific);
    }

    #[test]
    fn test_mode_switch_keeps_display_and_value_in_step() {
        let mut session = Session::default();
        session.press_line("2.5 programmer");
        assert_eq!(session.engine().display(), "2.5");
        assert_eq!(session.engine().current_value(), 2.5);
        session.press_line("+ 1 =");
        assert_eq!(session.engine().display(), "3.5");

        session.press_line("hex");
        assert_eq!(session.engine().display(), "3");
        assert_eq!(session.engine().current_value(), 3.0);
    }

    #[test]
    fn test_function_result_truncated_in_hex() {
        let mut session = Session::default();
        session.press_line("programmer hex 2 sqrt");
        assert_eq!(session.engine().display(), "1");
        assert_eq!(session.engine().current_value(), 1.0);
    }

    #[test]
    fn test_config_applied() {
        let config = Config {
            mode: Mode::Programmer,
            number_base: NumberBase::Binary,
            bit_width: BitWidth::Bits8,
            ..Config::default()
        };
        let mut session = Session::new(&config);
        session.press_line("101 not");
        assert_eq!(session.engine().display(), "11111010");
    }
}
