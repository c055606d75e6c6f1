//! Snapshot of what the calculator is showing.

use super::session::{Mode, Session};
use crate::calculator::{BaseReadouts, PendingOperation};
use serde::Serialize;

/// Everything a front end needs to draw the calculator after a key press.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Readout {
    /// The parked operand and operator, e.g. "12 +". Empty when nothing is pending.
    pub expression: String,
    /// Main display text, or the error sentinel.
    pub display: String,
    pub is_error: bool,
    pub mode: Mode,
    /// Programmer mode only: the value in every base.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bases: Option<BaseReadouts>,
    /// Programmer mode only: grouped bits at the current width.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bits: Option<String>,
}

impl Readout {
    /// Snapshot the session after its last key press.
    pub fn from_session(session: &Session) -> Self {
        let engine = session.engine();
        let expression = match engine.pending() {
            PendingOperation::None => String::new(),
            pending => format!(
                "{} {}",
                crate::calculator::format_number(engine.stored_value(), engine.number_base()),
                pending.symbol()
            ),
        };

        let programmer = session.mode() == Mode::Programmer;
        Self {
            expression,
            display: engine.display().to_string(),
            is_error: engine.error().is_some(),
            mode: session.mode(),
            bases: programmer.then(|| engine.all_bases()),
            bits: programmer.then(|| engine.binary_string(engine.bit_width())),
        }
    }

    /// Plain text rendering for a terminal.
    pub fn text(&self) -> String {
        let mut lines = Vec::new();
        if !self.expression.is_empty() {
            lines.push(self.expression.clone());
        }
        lines.push(self.display.clone());

        if let Some(bases) = &self.bases {
            lines.push(format!("HEX {}", bases.hex));
            lines.push(format!("DEC {}", bases.dec));
            lines.push(format!("OCT {}", bases.oct));
        }
        if let Some(bits) = &self.bits {
            lines.push(format!("BIN {bits}"));
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_readout() {
        let mut session = Session::default();
        session.press_line("12 +");
        let readout = session.readout();
        assert_eq!(readout.expression, "12 +");
        assert_eq!(readout.display, "12");
        assert!(!readout.is_error);
        assert!(readout.bases.is_none());
        assert_eq!(readout.text(), "12 +\n12");
    }

    #[test]
    fn test_error_readout() {
        let mut session = Session::default();
        session.press_line("1 neg sqrt");
        let readout = session.readout();
        assert!(readout.is_error);
        assert_eq!(readout.display, "Error");
    }

    #[test]
    fn test_programmer_readout() {
        let mut session = Session::default();
        session.press_line("programmer w8 255");
        let readout = session.readout();
        let bases = readout.bases.as_ref().unwrap();
        assert_eq!(bases.hex, "FF");
        assert_eq!(bases.oct, "377");
        assert_eq!(readout.bits.as_deref(), Some("1111 1111"));
        assert!(readout.text().contains("HEX FF"));
    }

    #[test]
    fn test_json_skips_programmer_fields() {
        let mut session = Session::default();
        session.press_line("7");
        let json = serde_json::to_value(session.readout()).unwrap();
        assert_eq!(json["display"], "7");
        assert_eq!(json["mode"], "standard");
        assert!(json.get("bases").is_none());
    }
}
