//! Decimal helpers for amounts that are persisted as strings.

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::error::{ AppError, Result };

/// Fractional digits kept for quantities and amounts.
pub const SCALE: u32 = 8;

/// Parse an amount read back from storage.
pub fn parse_stored(value: &str) -> Result<Decimal> {
    Decimal::from_str(value.trim()).map_err(|e|
        AppError::Internal(format!("Corrupt stored amount '{}': {}", value, e))
    )
}

/// Canonical storage form: rounded to [`SCALE`] digits, trailing zeros removed.
pub fn to_stored(value: Decimal) -> String {
    value.round_dp(SCALE).normalize().to_string()
}

// Decimal's operators panic on overflow; amounts from requests go through these instead.

pub fn add(lhs: Decimal, rhs: Decimal) -> Result<Decimal> {
    lhs.checked_add(rhs).ok_or_else(out_of_range)
}

pub fn sub(lhs: Decimal, rhs: Decimal) -> Result<Decimal> {
    lhs.checked_sub(rhs).ok_or_else(out_of_range)
}

pub fn mul(lhs: Decimal, rhs: Decimal) -> Result<Decimal> {
    lhs.checked_mul(rhs).ok_or_else(out_of_range)
}

pub fn div(lhs: Decimal, rhs: Decimal) -> Result<Decimal> {
    lhs.checked_div(rhs).ok_or_else(out_of_range)
}

fn out_of_range() -> AppError {
    AppError::InvalidInput("Amount out of range".to_string())
}

pub fn require_positive(value: Decimal, field: &'static str) -> Result<Decimal> {
    if value <= Decimal::ZERO {
        return Err(AppError::InvalidInput(format!("{} must be greater than zero", field)));
    }
    Ok(value)
}

pub fn require_non_negative(value: Decimal, field: &'static str) -> Result<Decimal> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(AppError::InvalidInput(format!("{} must not be negative", field)));
    }
    Ok(value)
}
