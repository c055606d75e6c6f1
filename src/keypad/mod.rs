//! Keypad front end over the calculation engine.
//!
//! Turns key tokens into engine operations, tracks the active mode and the
//! shift amount, and produces a [`Readout`] of what should be on screen.

mod detection;
mod readout;
mod session;

pub use detection::{Key, parse_key, tokenize};
pub use readout::Readout;
pub use session::{KeypadError, Mode, Session};
