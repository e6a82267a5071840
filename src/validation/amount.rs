//! Decimal amount parsing and formatting.

use alloy::primitives::utils::{format_units, parse_units};
use alloy::primitives::U256;

/// Why a typed amount failed to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountParseError {
    Empty,
    Negative,
    Malformed,
    Zero,
}

/// Parse a user-typed decimal string into base units under `decimals`.
///
/// Rejects empty, negative, malformed, and over-precise inputs, and zero;
/// every action here requires a strictly positive amount.
pub fn parse_amount(input: &str, decimals: u8) -> Result<U256, AmountParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AmountParseError::Empty);
    }
    if trimmed.starts_with('-') {
        return Err(AmountParseError::Negative);
    }

    let parsed = parse_units(trimmed, decimals).map_err(|_| AmountParseError::Malformed)?;
    let value = parsed.get_absolute();

    if value.is_zero() {
        return Err(AmountParseError::Zero);
    }
    Ok(value)
}

/// Render base units as a decimal string under `decimals`, without
/// trailing fractional zeros.
pub fn format_base_units(value: U256, decimals: u8) -> String {
    let rendered = format_units(value, decimals).unwrap_or_else(|_| value.to_string());
    match rendered.split_once('.') {
        Some((whole, frac)) => {
            let frac = frac.trim_end_matches('0');
            if frac.is_empty() {
                whole.to_string()
            } else {
                format!("{whole}.{frac}")
            }
        }
        None => rendered,
    }
}
