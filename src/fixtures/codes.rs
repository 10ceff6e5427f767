//! Discount Code Fixtures

use jiff::Timestamp;
use serde::Deserialize;

use crate::{
    codes::{DiscountCode, DiscountKind, DiscountValue, Scope, ValidationError},
    fixtures::{
        FixtureError,
        catalog::{parse_percentage, parse_price},
    },
    products::{CategoryKey, ProductKey},
};

/// Wrapper for discount codes in YAML
#[derive(Debug, Deserialize)]
pub struct CodesFixture {
    /// Discount code records, in file order
    pub codes: Vec<DiscountCodeFixture>,
}

/// Flat discount code record, as an admin tool would store it.
#[derive(Debug, Deserialize)]
pub struct DiscountCodeFixture {
    /// Code string
    pub code: String,

    /// Discount kind
    pub kind: DiscountKind,

    /// Percentage (e.g. "15") or price (e.g. "5.00 GBP") depending on `kind`
    pub value: String,

    /// Cap for percentage codes (e.g. "10.00 GBP")
    #[serde(default)]
    pub max_discount: Option<String>,

    /// RFC 3339 expiry instant
    #[serde(default)]
    pub expires_at: Option<Timestamp>,

    /// Total redemptions allowed
    #[serde(default)]
    pub usage_limit: Option<u32>,

    /// Redemptions so far
    #[serde(default)]
    pub usage_count: u32,

    /// Only for first purchases
    #[serde(default)]
    pub first_purchase_only: bool,

    /// Product keys the code is restricted to
    #[serde(default)]
    pub products: Vec<String>,

    /// Category keys the code is restricted to
    #[serde(default)]
    pub categories: Vec<String>,

    /// Minimum order total (e.g. "20.00 GBP")
    #[serde(default)]
    pub min_purchase: Option<String>,

    /// Whether the code is live
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl DiscountCodeFixture {
    /// Convert into a discount code, resolving product and category keys.
    ///
    /// # Errors
    ///
    /// Returns an error if a price or percentage cannot be parsed, a referenced product or
    /// category is unknown, or `max_discount` is set on a fixed amount code.
    pub fn try_into_code(
        self,
        product_key: impl Fn(&str) -> Result<ProductKey, FixtureError>,
        category_key: impl Fn(&str) -> Result<CategoryKey, FixtureError>,
    ) -> Result<DiscountCode<'static>, FixtureError> {
        let max_discount = self.max_discount.as_deref().map(parse_price).transpose()?;

        let value = match self.kind {
            DiscountKind::Percentage => DiscountValue::Percentage {
                percent: parse_percentage(&self.value)?,
                max_discount,
            },
            DiscountKind::FixedAmount => {
                if max_discount.is_some() {
                    return Err(ValidationError::MaxDiscountOnFixedAmount.into());
                }

                DiscountValue::FixedAmount(parse_price(&self.value)?)
            }
        };

        let scope = Scope {
            products: self
                .products
                .iter()
                .map(|key| product_key(key))
                .collect::<Result<_, _>>()?,
            categories: self
                .categories
                .iter()
                .map(|key| category_key(key))
                .collect::<Result<_, _>>()?,
        };

        Ok(DiscountCode {
            code: self.code,
            value,
            expires_at: self.expires_at,
            usage_limit: self.usage_limit,
            usage_count: self.usage_count,
            first_purchase_only: self.first_purchase_only,
            scope,
            min_purchase: self.min_purchase.as_deref().map(parse_price).transpose()?,
            active: self.active,
        })
    }
}
