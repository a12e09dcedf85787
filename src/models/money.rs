//! Fixed-point money helpers.
//!
//! Amounts are held as [`Decimal`] and stored at a fixed scale of two
//! fractional digits. With the `serde-with-str` feature of `rust_decimal` a
//! stored amount serializes as its canonical string, e.g. `"2000.00"`.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{EngineError, EngineResult};

/// Number of fractional digits every stored amount carries.
pub const MONEY_SCALE: u32 = 2;

/// Rounds an amount to [`MONEY_SCALE`] digits and pins its scale, so that
/// `100` and `100.0` both become `100.00`.
///
/// # Example
///
/// ```
/// use payroll_engine::models::to_money;
/// use rust_decimal::Decimal;
///
/// assert_eq!(to_money(Decimal::from(2000)).to_string(), "2000.00");
/// assert_eq!(to_money(Decimal::new(12345, 3)).to_string(), "12.35");
/// ```
pub fn to_money(amount: Decimal) -> Decimal {
    let mut rounded =
        amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(MONEY_SCALE);
    rounded
}

/// Parses a non-negative amount with at most two fractional digits.
///
/// Accepted inputs look like `"150"`, `"150.5"` or `"150.50"`. Signs,
/// exponents, separators and extra precision are rejected rather than
/// silently rounded.
///
/// # Example
///
/// ```
/// use payroll_engine::models::parse_money;
///
/// assert_eq!(parse_money("150.5").unwrap().to_string(), "150.50");
/// assert!(parse_money("150.555").is_err());
/// assert!(parse_money("-3").is_err());
/// ```
pub fn parse_money(raw: &str) -> EngineResult<Decimal> {
    let invalid = |message: &str| EngineError::InvalidAmount {
        value: raw.to_string(),
        message: message.to_string(),
    };

    let (whole, fraction) = match raw.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (raw, None),
    };

    if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid("expected digits before the decimal point"));
    }
    if let Some(fraction) = fraction {
        if fraction.is_empty() || fraction.len() > MONEY_SCALE as usize {
            return Err(invalid("expected one or two fractional digits"));
        }
        if !fraction.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid("expected digits after the decimal point"));
        }
    }

    let value: Decimal = raw.parse().map_err(|e: rust_decimal::Error| invalid(&e.to_string()))?;
    Ok(to_money(value))
}

/// Checks an amount already held as a [`Decimal`] against the same rules as
/// [`parse_money`] and returns it at money scale.
///
/// Trailing zeros do not count as precision, so `10.500` is accepted while
/// `10.005` and `-50.00` are not.
///
/// # Example
///
/// ```
/// use payroll_engine::models::check_money;
/// use rust_decimal::Decimal;
///
/// assert_eq!(check_money(Decimal::new(10500, 3)).unwrap().to_string(), "10.50");
/// assert!(check_money(Decimal::new(10005, 3)).is_err());
/// assert!(check_money(Decimal::new(-5000, 2)).is_err());
/// ```
pub fn check_money(amount: Decimal) -> EngineResult<Decimal> {
    parse_money(&amount.normalize().to_string())
}
