//! Errors produced by the calculation engine.

use thiserror::Error;

/// A recoverable failure of an engine operation.
///
/// The engine never panics on bad input. Instead the operation returns one of
/// these and the display switches to the matching sentinel text until the next
/// digit or clear.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum CalcError {
    /// Division or modulo with a zero right operand.
    #[error("division by zero")]
    DivisionByZero,
    /// The operand lies outside the function's domain.
    #[error("{function}: argument outside domain")]
    Domain { function: &'static str },
    /// The result is too large to represent.
    #[error("{function}: result overflows")]
    Overflow { function: &'static str },
}

impl CalcError {
    /// Text shown on the display while this error is active.
    pub fn sentinel(&self) -> &'static str {
        match self {
            Self::DivisionByZero | Self::Domain { .. } => "Error",
            Self::Overflow { .. } => "Overflow",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinels() {
        assert_eq!(CalcError::DivisionByZero.sentinel(), "Error");
        assert_eq!(CalcError::Domain { function: "sqrt" }.sentinel(), "Error");
        assert_eq!(
            CalcError::Overflow {
                function: "factorial"
            }
            .sentinel(),
            "Overflow"
        );
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            CalcError::Domain { function: "ln" }.to_string(),
            "ln: argument outside domain"
        );
    }
}
