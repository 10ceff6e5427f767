//! Catalog Fixtures

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use rusty_money::{
    Money,
    iso::{self, Currency},
};
use serde::Deserialize;

use crate::{discounts::major_to_minor, fixtures::FixtureError};

/// Wrapper for categories and products in YAML
#[derive(Debug, Deserialize)]
pub struct CatalogFixture {
    /// Map of category key -> category fixture
    #[serde(default)]
    pub categories: FxHashMap<String, CategoryFixture>,

    /// Map of product key -> product fixture
    #[serde(default)]
    pub products: FxHashMap<String, ProductFixture>,
}

/// Category Fixture
#[derive(Debug, Deserialize)]
pub struct CategoryFixture {
    /// Category name
    pub name: String,
}

/// Product Fixture
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// Product name
    pub name: String,

    /// Category key
    pub category: String,

    /// Unit price (e.g., "2.99 GBP")
    pub price: String,
}

/// Parse price string (e.g., "2.99 GBP") into money.
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY", if the amount is not
/// a decimal with at most the currency's minor unit precision, or if the currency code is not
/// recognized.
pub fn parse_price(s: &str) -> Result<Money<'static, Currency>, FixtureError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    let [amount, currency_code] = parts.as_slice() else {
        return Err(FixtureError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let amount = amount
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    let currency = parse_currency(currency_code)?;

    let minor_units =
        major_to_minor(amount, currency).map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    Ok(Money::from_minor(minor_units, currency))
}

/// Parse an ISO currency code.
///
/// # Errors
///
/// Returns [`FixtureError::UnknownCurrency`] if the code is not an ISO 4217 currency.
pub fn parse_currency(code: &str) -> Result<&'static Currency, FixtureError> {
    iso::find(code).ok_or_else(|| FixtureError::UnknownCurrency(code.to_string()))
}

/// Parse percentage string (e.g., "15" or "15%") into a percentage in `0..=100` units.
///
/// # Errors
///
/// Returns an error if the string is not a decimal number.
pub fn parse_percentage(s: &str) -> Result<Decimal, FixtureError> {
    let trimmed = s.trim();
    let number = trimmed.strip_suffix('%').unwrap_or(trimmed).trim();

    number
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPercentage(s.to_string()))
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{CHF, EUR, JPY, USD};

    use super::*;

    #[test]
    fn parse_price_rejects_invalid_format() {
        let result = parse_price("2.99GBP");

        assert!(matches!(result, Err(FixtureError::InvalidPrice(_))));
    }

    #[test]
    fn parse_price_rejects_unknown_currency() {
        let result = parse_price("2.99 ABC");

        assert!(matches!(result, Err(FixtureError::UnknownCurrency(code)) if code == "ABC"));
    }

    #[test]
    fn parse_price_rejects_sub_minor_precision() {
        let result = parse_price("2.995 GBP");

        assert!(matches!(result, Err(FixtureError::InvalidPrice(_))));
    }

    #[test]
    fn parse_price_accepts_usd_eur_and_jpy() -> Result<(), FixtureError> {
        assert_eq!(parse_price("1.00 USD")?, Money::from_minor(100, USD));
        assert_eq!(parse_price("2.50 EUR")?, Money::from_minor(250, EUR));
        assert_eq!(parse_price("500 JPY")?, Money::from_minor(500, JPY));

        Ok(())
    }

    #[test]
    fn parse_currency_resolves_any_iso_code() -> Result<(), FixtureError> {
        assert_eq!(parse_currency("CHF")?, CHF);
        assert_eq!(parse_price("12.40 CHF")?, Money::from_minor(12_40, CHF));

        Ok(())
    }

    #[test]
    fn parse_percentage_accepts_both_formats() -> Result<(), FixtureError> {
        assert_eq!(parse_percentage("15")?, Decimal::from(15));
        assert_eq!(parse_percentage("  12.5%  ")?, Decimal::new(125, 1));

        Ok(())
    }

    #[test]
    fn parse_percentage_rejects_invalid_format() {
        let result = parse_percentage("fifteen");

        assert!(matches!(result, Err(FixtureError::InvalidPercentage(_))));
    }
}
