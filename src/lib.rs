//! A multi-mode calculator: standard, scientific, programmer and date-time.

pub mod calculator;
pub mod config;
pub mod datetime;
pub mod keypad;
