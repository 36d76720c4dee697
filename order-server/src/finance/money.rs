//! Money arithmetic and input validation
//!
//! All amounts are `Decimal` with two fractional digits. Rounding is half away
//! from zero.

use rust_decimal::{Decimal, RoundingStrategy};
use shared::request::NewItem;

use crate::utils::{AppError, AppResult};

const DECIMAL_PLACES: u32 = 2;

/// Maximum quantity per line item
pub const MAX_QUANTITY: i32 = 999_999;
/// Maximum unit price / single amount (1,000,000,000.00)
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// `quantity × unit_price`, rounded
pub fn line_total(quantity: i32, unit_price: Decimal) -> Decimal {
    round_money(Decimal::from(quantity) * unit_price)
}

pub fn validate_quantity(quantity: i32) -> AppResult<()> {
    if quantity <= 0 {
        return Err(AppError::validation(format!(
            "quantity must be positive, got {}",
            quantity
        )));
    }
    if quantity > MAX_QUANTITY {
        return Err(AppError::validation(format!(
            "quantity exceeds maximum allowed ({}), got {}",
            MAX_QUANTITY, quantity
        )));
    }
    Ok(())
}

pub fn validate_unit_price(unit_price: Decimal) -> AppResult<()> {
    if unit_price.is_sign_negative() && !unit_price.is_zero() {
        return Err(AppError::validation(format!(
            "unit_price must be non-negative, got {}",
            unit_price
        )));
    }
    if unit_price > MAX_AMOUNT {
        return Err(AppError::validation(format!(
            "unit_price exceeds maximum allowed ({}), got {}",
            MAX_AMOUNT, unit_price
        )));
    }
    Ok(())
}

/// Positive amount with at most two decimals (payments, discounts)
pub fn validate_amount(amount: Decimal, field: &str) -> AppResult<()> {
    if amount <= Decimal::ZERO {
        return Err(AppError::validation(format!(
            "{} must be positive, got {}",
            field, amount
        )));
    }
    if amount > MAX_AMOUNT {
        return Err(AppError::validation(format!(
            "{} exceeds maximum allowed ({}), got {}",
            field, MAX_AMOUNT, amount
        )));
    }
    if amount.normalize().scale() > DECIMAL_PLACES {
        return Err(AppError::validation(format!(
            "{} must have at most {} decimal places, got {}",
            field, DECIMAL_PLACES, amount
        )));
    }
    Ok(())
}

/// Tax rate as a fraction in `[0, 1]`
pub fn validate_tax_rate(rate: Decimal) -> AppResult<()> {
    if rate < Decimal::ZERO || rate > Decimal::ONE {
        return Err(AppError::validation(format!(
            "tax_rate must be between 0 and 1, got {}",
            rate
        )));
    }
    Ok(())
}

pub fn validate_item(item: &NewItem) -> AppResult<()> {
    if item.description.trim().is_empty() {
        return Err(AppError::validation("item description must not be empty"));
    }
    validate_quantity(item.quantity)?;
    validate_unit_price(item.unit_price)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_round_half_away_from_zero() {
        assert_eq!(round_money(d("24.705")), d("24.71"));
        assert_eq!(round_money(d("24.704")), d("24.70"));
        assert_eq!(round_money(d("-0.005")), d("-0.01"));
    }

    #[test]
    fn test_line_total() {
        assert_eq!(line_total(3, d("33.335")), d("100.01"));
        assert_eq!(line_total(2, d("50")), d("100"));
    }

    #[test]
    fn test_amount_validation() {
        assert!(validate_amount(d("0.01"), "amount").is_ok());
        assert!(validate_amount(d("10.50"), "amount").is_ok());
        assert!(validate_amount(Decimal::ZERO, "amount").is_err());
        assert!(validate_amount(d("-5"), "amount").is_err());
        assert!(validate_amount(d("1.001"), "amount").is_err());
    }

    #[test]
    fn test_item_validation() {
        let ok = NewItem {
            description: "Banner".into(),
            quantity: 2,
            unit_price: d("50"),
        };
        assert!(validate_item(&ok).is_ok());
        assert!(validate_item(&NewItem { quantity: 0, ..ok.clone() }).is_err());
        assert!(validate_item(&NewItem { unit_price: d("-1"), ..ok.clone() }).is_err());
        assert!(validate_item(&NewItem { description: " ".into(), ..ok }).is_err());
    }

    #[test]
    fn test_tax_rate_bounds() {
        assert!(validate_tax_rate(d("0.19")).is_ok());
        assert!(validate_tax_rate(d("1.5")).is_err());
        assert!(validate_tax_rate(d("-0.1")).is_err());
    }
}
