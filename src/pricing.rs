//! Pricing

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{
    Money, MoneyError,
    iso::{BRL, Currency, EUR, GBP, USD},
};
use thiserror::Error;

/// A monetary amount, always backed by integer minor units.
pub type Price = Money<'static, Currency>;

/// Errors that can occur while parsing a price string.
#[derive(Debug, Error, PartialEq)]
pub enum PriceParseError {
    /// The string was not in the `AMOUNT CURRENCY` format.
    #[error("expected format 'AMOUNT CURRENCY', got: {0}")]
    InvalidFormat(String),

    /// The amount was not a non-negative value with at most two decimal places.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// The currency code is not supported.
    #[error("unknown currency code: {0}")]
    UnknownCurrency(String),
}

/// Look up a supported currency by its ISO code.
///
/// # Errors
///
/// Returns [`PriceParseError::UnknownCurrency`] if the code is not supported.
pub fn parse_currency(code: &str) -> Result<&'static Currency, PriceParseError> {
    match code.trim() {
        "BRL" => Ok(BRL),
        "USD" => Ok(USD),
        "EUR" => Ok(EUR),
        "GBP" => Ok(GBP),
        other => Err(PriceParseError::UnknownCurrency(other.to_string())),
    }
}

/// Parse a price string (e.g. `"25.00 BRL"`) into a [`Price`].
///
/// # Errors
///
/// Returns an error if the string is not in the `AMOUNT CURRENCY` format, if the
/// amount is negative or has more than two decimal places, or if the currency is
/// not recognised.
pub fn parse_price(s: &str) -> Result<Price, PriceParseError> {
    let mut parts = s.split_whitespace();

    let (Some(amount), Some(code), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(PriceParseError::InvalidFormat(s.to_string()));
    };

    let amount = amount
        .parse::<Decimal>()
        .map_err(|_err| PriceParseError::InvalidAmount(s.to_string()))?;

    if amount.is_sign_negative() || amount.normalize().scale() > 2 {
        return Err(PriceParseError::InvalidAmount(s.to_string()));
    }

    let minor_units = amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|value| value.to_i64())
        .ok_or_else(|| PriceParseError::InvalidAmount(s.to_string()))?;

    Ok(Money::from_minor(minor_units, parse_currency(code)?))
}

/// Calculates the sum of a sequence of prices in the given currency.
///
/// An empty sequence sums to zero.
///
/// # Errors
///
/// Returns a [`MoneyError`] if any price is in a different currency.
pub fn total_price(
    prices: impl IntoIterator<Item = Price>,
    currency: &'static Currency,
) -> Result<Price, MoneyError> {
    prices
        .into_iter()
        .try_fold(Money::from_minor(0, currency), |acc, price| acc.add(price))
}

/// Multiplies a price by a quantity, returning `None` on overflow.
pub(crate) fn checked_scale(price: Price, quantity: u32) -> Option<Price> {
    price
        .to_minor_units()
        .checked_mul(i64::from(quantity))
        .map(|minor| Money::from_minor(minor, price.currency()))
}

/// Formats a price with two decimal places and a comma separator, e.g. `R$ 25,00`.
pub fn format_price(price: &Price) -> String {
    let minor = price.to_minor_units();
    let sign = if minor < 0 { "-" } else { "" };
    let units = minor.unsigned_abs();

    format!(
        "{} {sign}{},{:02}",
        price.currency().symbol,
        units / 100,
        units % 100
    )
}
