//! Unary scientific functions.
//!
//! Every function validates its domain first. A rejected operand leaves the
//! current value untouched and puts the engine into its error display.

use super::engine::Engine;
use super::error::CalcError;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::f64::consts::{E, PI};

/// Largest integer whose factorial fits in an f64.
const FACTORIAL_LIMIT: f64 = 170.0;

/// Unit used for trigonometric arguments and inverse results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum AngleMode {
    #[default]
    #[value(alias = "deg")]
    Degrees,
    #[value(alias = "rad")]
    Radians,
    #[value(alias = "grad")]
    Gradians,
}

impl AngleMode {
    /// Convert an angle in this unit to radians.
    pub fn to_radians(self, angle: f64) -> f64 {
        match self {
            Self::Degrees => angle * PI / 180.0,
            Self::Gradians => angle * PI / 200.0,
            Self::Radians => angle,
        }
    }

    /// Convert radians to this unit.
    pub fn from_radians(self, rad: f64) -> f64 {
        match self {
            Self::Degrees => rad * 180.0 / PI,
            Self::Gradians => rad * 200.0 / PI,
            Self::Radians => rad,
        }
    }

    /// Short name for the readout.
    pub fn label(self) -> &'static str {
        match self {
            Self::Degrees => "DEG",
            Self::Radians => "RAD",
            Self::Gradians => "GRAD",
        }
    }
}

/// A function applied to the current operand.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScientificFn {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Sinh,
    Cosh,
    Tanh,
    Asinh,
    Acosh,
    Atanh,
    /// Base-10 logarithm.
    Log,
    Ln,
    Log2,
    Exp,
    Exp10,
    Exp2,
    Sqrt,
    Cbrt,
    Square,
    Cube,
    Reciprocal,
    Factorial,
    Abs,
    Floor,
    Ceil,
    Round,
    Pi,
    E,
}

impl ScientificFn {
    /// Name used on the keypad and in error messages.
    pub fn name(self) -> &'static str {
        match self {
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::Tan => "tan",
            Self::Asin => "asin",
            Self::Acos => "acos",
            Self::Atan => "atan",
            Self::Sinh => "sinh",
            Self::Cosh => "cosh",
            Self::Tanh => "tanh",
            Self::Asinh => "asinh",
            Self::Acosh => "acosh",
            Self::Atanh => "atanh",
            Self::Log => "log",
            Self::Ln => "ln",
            Self::Log2 => "log2",
            Self::Exp => "exp",
            Self::Exp10 => "exp10",
            Self::Exp2 => "exp2",
            Self::Sqrt => "sqrt",
            Self::Cbrt => "cbrt",
            Self::Square => "sqr",
            Self::Cube => "cube",
            Self::Reciprocal => "recip",
            Self::Factorial => "fact",
            Self::Abs => "abs",
            Self::Floor => "floor",
            Self::Ceil => "ceil",
            Self::Round => "round",
            Self::Pi => "pi",
            Self::E => "e",
        }
    }

    /// Look up a function by its keypad name.
    pub fn from_name(name: &str) -> Option<Self> {
        ALL_FUNCTIONS.iter().copied().find(|f| f.name() == name)
    }

    /// Evaluate the function for `x`.
    pub fn apply(self, x: f64, angle: AngleMode) -> Result<f64, CalcError> {
        let domain = |ok: bool| {
            if ok {
                Ok(())
            } else {
                Err(CalcError::Domain {
                    function: self.name(),
                })
            }
        };

        let value = match self {
            Self::Sin => angle.to_radians(x).sin(),
            Self::Cos => angle.to_radians(x).cos(),
            Self::Tan => angle.to_radians(x).tan(),
            Self::Asin => {
                domain((-1.0..=1.0).contains(&x))?;
                angle.from_radians(x.asin())
            }
            Self::Acos => {
                domain((-1.0..=1.0).contains(&x))?;
                angle.from_radians(x.acos())
            }
            Self::Atan => angle.from_radians(x.atan()),
            Self::Sinh => x.sinh(),
            Self::Cosh => x.cosh(),
            Self::Tanh => x.tanh(),
            Self::Asinh => x.asinh(),
            Self::Acosh => {
                domain(x >= 1.0)?;
                x.acosh()
            }
            Self::Atanh => {
                domain(x > -1.0 && x < 1.0)?;
                x.atanh()
            }
            Self::Log => {
                domain(x > 0.0)?;
                x.log10()
            }
            Self::Ln => {
                domain(x > 0.0)?;
                x.ln()
            }
            Self::Log2 => {
                domain(x > 0.0)?;
                x.log2()
            }
            Self::Exp => x.exp(),
            Self::Exp10 => 10f64.powf(x),
            Self::Exp2 => x.exp2(),
            Self::Sqrt => {
                domain(x >= 0.0)?;
                x.sqrt()
            }
            Self::Cbrt => x.cbrt(),
            Self::Square => x * x,
            Self::Cube => x * x * x,
            Self::Reciprocal => {
                domain(x != 0.0)?;
                1.0 / x
            }
            Self::Factorial => factorial(x)?,
            Self::Abs => x.abs(),
            Self::Floor => x.floor(),
            Self::Ceil => x.ceil(),
            Self::Round => x.round(),
            Self::Pi => PI,
            Self::E => E,
        };

        Ok(value)
    }
}

const ALL_FUNCTIONS: [ScientificFn; 30] = [
    ScientificFn::Sin,
    ScientificFn::Cos,
    ScientificFn::Tan,
    ScientificFn::Asin,
    ScientificFn::Acos,
    ScientificFn::Atan,
    ScientificFn::Sinh,
    ScientificFn::Cosh,
    ScientificFn::Tanh,
    ScientificFn::Asinh,
    ScientificFn::Acosh,
    ScientificFn::Atanh,
    ScientificFn::Log,
    ScientificFn::Ln,
    ScientificFn::Log2,
    ScientificFn::Exp,
    ScientificFn::Exp10,
    ScientificFn::Exp2,
    ScientificFn::Sqrt,
    ScientificFn::Cbrt,
    ScientificFn::Square,
    ScientificFn::Cube,
    ScientificFn::Reciprocal,
    ScientificFn::Factorial,
    ScientificFn::Abs,
    ScientificFn::Floor,
    ScientificFn::Ceil,
    ScientificFn::Round,
    ScientificFn::Pi,
    ScientificFn::E,
];

fn factorial(x: f64) -> Result<f64, CalcError> {
    if x < 0.0 || x.fract() != 0.0 {
        return Err(CalcError::Domain {
            function: ScientificFn::Factorial.name(),
        });
    }
    if x > FACTORIAL_LIMIT {
        return Err(CalcError::Overflow {
            function: ScientificFn::Factorial.name(),
        });
    }

    let n = x as u32;
    Ok((2..=n).fold(1.0, |acc, i| acc * f64::from(i)))
}

impl Engine {
    /// Apply a unary function to the current operand.
    pub fn apply_function(&mut self, function: ScientificFn) -> Result<f64, CalcError> {
        match function.apply(self.current_value, self.angle_mode) {
            Ok(value) => {
                self.commit(value);
                Ok(self.current_value)
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Select the unit for trigonometric functions.
    pub fn set_angle_mode(&mut self, mode: AngleMode) {
        tracing::debug!(?mode, "angle mode changed");
        self.angle_mode = mode;
    }

    /// Unit used by the trigonometric functions.
    pub fn angle_mode(&self) -> AngleMode {
        self.angle_mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {} but got {}",
            expected,
            actual
        );
    }

    #[test]
    fn test_trig_in_degrees() {
        assert_close(ScientificFn::Sin.apply(90.0, AngleMode::Degrees).unwrap(), 1.0);
        assert_close(ScientificFn::Cos.apply(180.0, AngleMode::Degrees).unwrap(), -1.0);
        assert_close(ScientificFn::Asin.apply(1.0, AngleMode::Degrees).unwrap(), 90.0);
    }

    #[test]
    fn test_trig_in_gradians_and_radians() {
        assert_close(ScientificFn::Sin.apply(100.0, AngleMode::Gradians).unwrap(), 1.0);
        assert_close(ScientificFn::Atan.apply(1.0, AngleMode::Gradians).unwrap(), 50.0);
        assert_close(ScientificFn::Cos.apply(PI, AngleMode::Radians).unwrap(), -1.0);
    }

    #[test]
    fn test_domain_guards() {
        let cases = [
            (ScientificFn::Asin, 1.5),
            (ScientificFn::Acos, -1.01),
            (ScientificFn::Acosh, 0.5),
            (ScientificFn::Atanh, 1.0),
            (ScientificFn::Atanh, -1.0),
            (ScientificFn::Log, 0.0),
            (ScientificFn::Ln, -3.0),
            (ScientificFn::Log2, 0.0),
            (ScientificFn::Sqrt, -4.0),
            (ScientificFn::Reciprocal, 0.0),
        ];
        for (function, x) in cases {
            assert!(
                matches!(function.apply(x, AngleMode::Radians), Err(CalcError::Domain { .. })),
                "{:?}({}) should be rejected",
                function,
                x
            );
        }
    }

    #[test]
    fn test_factorial() {
        assert_eq!(ScientificFn::Factorial.apply(0.0, AngleMode::Degrees), Ok(1.0));
        assert_eq!(ScientificFn::Factorial.apply(5.0, AngleMode::Degrees), Ok(120.0));
        assert!(ScientificFn::Factorial.apply(170.0, AngleMode::Degrees).unwrap().is_finite());
        assert_eq!(
            ScientificFn::Factorial.apply(171.0, AngleMode::Degrees),
            Err(CalcError::Overflow { function: "fact" })
        );
        assert_eq!(
            ScientificFn::Factorial.apply(2.5, AngleMode::Degrees),
            Err(CalcError::Domain { function: "fact" })
        );
        assert_eq!(
            ScientificFn::Factorial.apply(-1.0, AngleMode::Degrees),
            Err(CalcError::Domain { function: "fact" })
        );
    }

    #[test]
    fn test_engine_error_keeps_value() {
        let mut engine = Engine::new();
        engine.input_digit('4');
        engine.negate();
        let err = engine.apply_function(ScientificFn::Sqrt).unwrap_err();
        assert_eq!(err, CalcError::Domain { function: "sqrt" });
        assert_eq!(engine.display(), "Error");
        assert_eq!(engine.current_value(), -4.0);
        assert!(engine.is_new_input());
    }

    #[test]
    fn test_engine_overflow_display() {
        let mut engine = Engine::new();
        for d in ['2', '0', '0'] {
            engine.input_digit(d);
        }
        assert!(engine.apply_function(ScientificFn::Factorial).is_err());
        assert_eq!(engine.display(), "Overflow");
        assert_eq!(engine.current_value(), 200.0);
    }

    #[test]
    fn test_engine_applies_function() {
        let mut engine = Engine::new();
        engine.input_digit('9');
        assert_eq!(engine.apply_function(ScientificFn::Sqrt), Ok(3.0));
        assert_eq!(engine.display(), "3");
        engine.input_digit('2');
        assert_eq!(engine.display(), "2");
    }

    #[test]
    fn test_constants_and_rounding() {
        let mut engine = Engine::new();
        engine.apply_function(ScientificFn::Pi).unwrap();
        assert_eq!(engine.display(), "3.1415926536");
        engine.apply_function(ScientificFn::Round).unwrap();
        assert_eq!(engine.display(), "3");
    }

    #[test]
    fn test_function_names_round_trip() {
        for function in ALL_FUNCTIONS {
            assert_eq!(ScientificFn::from_name(function.name()), Some(function));
        }
        assert_eq!(ScientificFn::from_name("nope"), None);
    }
}
