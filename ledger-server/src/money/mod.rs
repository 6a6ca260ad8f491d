//! Money calculation utilities using rust_decimal for precision
//!
//! All arithmetic is done using `Decimal` internally, then converted to `f64`
//! for storage/serialization (the store holds plain numbers). Every edit to
//! line items or tax must run [`recalculate`] before the invoice is
//! persisted; the stored `amount`, `subtotal` and `total_amount` fields are
//! derived values, never authoritative.

use crate::db::models::LineItem;
use rust_decimal::prelude::*;
use shared::{AppError, AppResult};

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Tolerance for monetary comparisons (0.01)
pub const MONEY_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Maximum allowed unit rate per line item
const MAX_UNIT_RATE: f64 = 1_000_000.0;
/// Maximum allowed quantity per line item
const MAX_QUANTITY: i32 = 9999;
/// Maximum allowed tax amount
const MAX_TAX: f64 = 1_000_000.0;

/// Validate that a f64 value is finite (not NaN, not Infinity)
#[inline]
fn require_finite(value: f64, field_name: &str) -> AppResult<()> {
    if !value.is_finite() {
        return Err(AppError::validation(format!(
            "{} must be a finite number, got {}",
            field_name, value
        )));
    }
    Ok(())
}

/// Convert f64 to Decimal for calculation
///
/// Input values should be pre-validated via `require_finite()` at the
/// boundary. If NaN/Infinity somehow reaches here, logs an error and returns
/// ZERO to avoid silent data corruption in financial calculations.
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_else(|| {
        tracing::error!(value = ?value, "Non-finite f64 in monetary calculation, defaulting to zero");
        Decimal::ZERO
    })
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        // SAFETY: Decimal rounded to 2dp with inputs bounded at the boundary
        // is always within f64 representable range
        .expect("Decimal rounded to 2dp is always representable as f64")
}

/// Round a Decimal to minor-unit precision
#[inline]
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Compute one line amount: quantity × unit_rate, rounded
///
/// quantity must be a positive integer, unit_rate a finite non-negative
/// number within bounds.
pub fn line_amount(quantity: i32, unit_rate: f64) -> AppResult<Decimal> {
    if quantity < 1 {
        return Err(AppError::invalid_line_item(format!(
            "quantity must be at least 1, got {}",
            quantity
        )));
    }
    if quantity > MAX_QUANTITY {
        return Err(AppError::invalid_line_item(format!(
            "quantity exceeds maximum allowed ({}), got {}",
            MAX_QUANTITY, quantity
        )));
    }
    require_finite(unit_rate, "unit rate")
        .map_err(|e| AppError::invalid_line_item(e.message.clone()))?;
    if unit_rate < 0.0 {
        return Err(AppError::invalid_line_item(format!(
            "unit rate must be non-negative, got {}",
            unit_rate
        )));
    }
    if unit_rate > MAX_UNIT_RATE {
        return Err(AppError::invalid_line_item(format!(
            "unit rate exceeds maximum allowed ({}), got {}",
            MAX_UNIT_RATE, unit_rate
        )));
    }

    Ok(round_money(Decimal::from(quantity) * to_decimal(unit_rate)))
}

/// Sum of all line amounts; an empty item list yields zero
pub fn subtotal(items: &[LineItem]) -> AppResult<Decimal> {
    let mut sum = Decimal::ZERO;
    for item in items {
        sum += line_amount(item.quantity, item.unit_rate)?;
    }
    Ok(sum)
}

/// Grand total: subtotal + tax
///
/// tax must be a finite non-negative number within bounds.
pub fn total(subtotal: Decimal, tax: f64) -> AppResult<Decimal> {
    require_finite(tax, "tax amount").map_err(|e| AppError::invalid_tax(e.message.clone()))?;
    if tax < 0.0 {
        return Err(AppError::invalid_tax(format!(
            "tax amount must be non-negative, got {}",
            tax
        )));
    }
    if tax > MAX_TAX {
        return Err(AppError::invalid_tax(format!(
            "tax amount exceeds maximum allowed ({}), got {}",
            MAX_TAX, tax
        )));
    }
    Ok(round_money(subtotal + to_decimal(tax)))
}

/// Derived amounts for an invoice, ready for storage
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Totals {
    pub subtotal: f64,
    pub tax_amount: f64,
    pub total_amount: f64,
}

/// Recalculate all derived amounts from items and tax
///
/// Rewrites each item's `amount` in place and returns the storable totals.
/// This is the single entry point every invoice mutation runs before
/// persistence.
pub fn recalculate(items: &mut [LineItem], tax: f64) -> AppResult<Totals> {
    let mut sum = Decimal::ZERO;
    for item in items.iter_mut() {
        let amount = line_amount(item.quantity, item.unit_rate)?;
        item.amount = to_f64(amount);
        sum += amount;
    }
    let total = total(sum, tax)?;
    Ok(Totals {
        subtotal: to_f64(sum),
        tax_amount: to_f64(to_decimal(tax)),
        total_amount: to_f64(total),
    })
}

/// Compare two monetary values for equality (within 0.01 tolerance)
pub fn money_eq(a: f64, b: f64) -> bool {
    let diff = (to_decimal(a) - to_decimal(b)).abs();
    diff < MONEY_TOLERANCE
}

#[cfg(test)]
mod tests;
