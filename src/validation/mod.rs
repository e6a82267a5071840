//! Local validation subsystem.
//!
//! Validation failures are recovered immediately and surfaced as inline form
//! errors; they never reach the chain. Nothing here performs I/O.

pub mod amount;
pub mod rules;

pub use amount::{format_base_units, parse_amount, AmountParseError};
pub use rules::{validate, ValidationContext, ValidationError};
