//! Money calculation using rust_decimal for precision
//!
//! Order totals are computed with `Decimal` internally and compared against
//! the client-supplied total within a fixed tolerance, so float drift in the
//! storefront never silently changes what a customer is charged.

use crate::utils::error::{AppError, AppResult};
use rust_decimal::prelude::*;

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Tolerance for monetary comparisons (0.01)
pub const MONEY_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Maximum allowed unit price (€1,000,000)
const MAX_PRICE: f64 = 1_000_000.0;

fn require_finite(value: f64, field_name: &str) -> AppResult<Decimal> {
    if !value.is_finite() {
        return Err(AppError::validation(format!(
            "{} must be a finite number, got {}",
            field_name, value
        )));
    }
    Decimal::from_f64(value)
        .ok_or_else(|| AppError::validation(format!("{} is not representable: {}", field_name, value)))
}

/// Compute the order total from its lines
pub fn line_total(unit_price: f64, quantity: i64) -> AppResult<Decimal> {
    if !(0.0..=MAX_PRICE).contains(&unit_price) {
        return Err(AppError::validation(format!(
            "unit_price out of range: {}",
            unit_price
        )));
    }
    let price = require_finite(unit_price, "unit_price")?;
    Ok((price * Decimal::from(quantity)).round_dp(DECIMAL_PLACES))
}

/// Verify a client-computed total against the line arithmetic
pub fn verify_total(lines: &[(f64, i64)], claimed: f64) -> AppResult<Decimal> {
    let claimed_dec = require_finite(claimed, "total")?;
    let mut computed = Decimal::ZERO;
    for (unit_price, quantity) in lines {
        computed += line_total(*unit_price, *quantity)?;
    }
    computed = computed.round_dp(DECIMAL_PLACES);

    if (computed - claimed_dec).abs() > MONEY_TOLERANCE {
        return Err(AppError::validation(format!(
            "Order total mismatch: computed {}, claimed {}",
            computed, claimed
        )));
    }
    Ok(computed)
}
