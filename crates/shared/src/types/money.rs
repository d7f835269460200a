//! Rupiah amount helpers.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Amounts are `rust_decimal::Decimal` holding whole Rupiah; the backend
//! sends them as plain JSON numbers.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds an amount to whole Rupiah, half away from zero.
#[must_use]
pub fn round_rupiah(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Largest amount accepted from user text: one quadrillion Rupiah.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xA4C6_8000, 0x0003_8D7E, 0, false, 0);

/// Parses user-entered amount text as whole Rupiah.
///
/// Every non-digit character is dropped, so `Rp 1.500.000` reads as
/// 1500000 (`.` groups thousands). Text without digits is zero. Values
/// above [`MAX_AMOUNT`] saturate at it.
#[must_use]
pub fn parse_amount(input: &str) -> Decimal {
    let digits: String = input.chars().filter(char::is_ascii_digit).collect();
    let digits = digits.trim_start_matches('0');
    if digits.is_empty() {
        return Decimal::ZERO;
    }

    match digits.parse::<Decimal>() {
        Ok(value) => value.min(MAX_AMOUNT),
        Err(_) => MAX_AMOUNT,
    }
}

/// Percentage of `part` in `whole`, rounded to two decimals.
///
/// Returns zero when `whole` is zero.
#[must_use]
pub fn percentage_of(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        Decimal::ZERO
    } else {
        (part / whole * Decimal::ONE_HUNDRED).round_dp(2)
    }
}
