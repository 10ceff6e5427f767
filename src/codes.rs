//! Discount Codes
//!
//! A [`DiscountCode`] is the record an administrator creates: what it takes off an order
//! ([`DiscountValue`]) and the restrictions that decide whether it applies at all.

use jiff::Timestamp;
use rust_decimal::Decimal;
use rustc_hash::FxHashSet;
use rusty_money::{Money, iso::Currency};
use serde::Deserialize;
use thiserror::Error;

use crate::{
    orders::LineItem,
    products::{CategoryKey, ProductKey},
};

/// Precondition violations in a discount code record.
///
/// These indicate bad data rather than a code that legitimately does not apply.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// The code string is empty or whitespace.
    #[error("discount code must not be empty")]
    EmptyCode,

    /// Percentage outside `0..=100`.
    #[error("percentage {0} is outside 0..=100")]
    PercentageOutOfRange(Decimal),

    /// A money field is below zero.
    #[error("{field} must not be negative")]
    NegativeAmount {
        /// Name of the offending field.
        field: &'static str,
    },

    /// A cap was supplied for a fixed amount code.
    #[error("max_discount only applies to percentage codes")]
    MaxDiscountOnFixedAmount,

    /// Usage limits must allow at least one redemption.
    #[error("usage_limit must be at least 1")]
    ZeroUsageLimit,

    /// The code's money fields use more than one currency.
    #[error("discount code mixes currencies {0} and {1}")]
    MixedCurrencies(&'static str, &'static str),
}

/// Discount kind, as stored in flat records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountKind {
    /// Percentage of the eligible base.
    Percentage,

    /// Fixed amount off the eligible base.
    FixedAmount,
}

/// What a code takes off an order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DiscountValue<'a> {
    /// Percentage of the eligible base (`15` means 15%), optionally capped.
    Percentage {
        /// Percentage in `0..=100`.
        percent: Decimal,

        /// Upper bound on the discount amount.
        max_discount: Option<Money<'a, Currency>>,
    },

    /// Fixed amount off, never more than the eligible base.
    FixedAmount(Money<'a, Currency>),
}

impl<'a> DiscountValue<'a> {
    /// Uncapped percentage.
    pub fn percentage(percent: Decimal) -> Self {
        Self::Percentage {
            percent,
            max_discount: None,
        }
    }

    /// Percentage capped at `max_discount`.
    pub fn capped_percentage(percent: Decimal, max_discount: Money<'a, Currency>) -> Self {
        Self::Percentage {
            percent,
            max_discount: Some(max_discount),
        }
    }

    /// Return the kind tag for this value.
    pub fn kind(&self) -> DiscountKind {
        match self {
            Self::Percentage { .. } => DiscountKind::Percentage,
            Self::FixedAmount(_) => DiscountKind::FixedAmount,
        }
    }

    fn money(&self) -> Option<Money<'a, Currency>> {
        match self {
            Self::Percentage { max_discount, .. } => *max_discount,
            Self::FixedAmount(amount) => Some(*amount),
        }
    }
}

/// Product and category restriction on a code.
///
/// An empty scope applies to every line item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scope {
    /// Products the code applies to.
    pub products: FxHashSet<ProductKey>,

    /// Categories the code applies to. Matching is exact; parent categories are not considered.
    pub categories: FxHashSet<CategoryKey>,
}

impl Scope {
    /// Scope that applies to every line item.
    pub fn unrestricted() -> Self {
        Self::default()
    }

    /// Scope restricted to the given products.
    pub fn for_products(products: impl IntoIterator<Item = ProductKey>) -> Self {
        Self {
            products: products.into_iter().collect(),
            categories: FxHashSet::default(),
        }
    }

    /// Scope restricted to the given categories.
    pub fn for_categories(categories: impl IntoIterator<Item = CategoryKey>) -> Self {
        Self {
            products: FxHashSet::default(),
            categories: categories.into_iter().collect(),
        }
    }

    /// Whether any product or category restriction is set.
    pub fn is_restricted(&self) -> bool {
        !self.products.is_empty() || !self.categories.is_empty()
    }

    /// Whether a line item falls inside the scope.
    pub fn matches(&self, item: &LineItem<'_>) -> bool {
        !self.is_restricted()
            || self.products.contains(&item.product())
            || self.categories.contains(&item.category())
    }
}

/// Discount code record, immutable for the duration of an evaluation.
#[derive(Debug, Clone)]
pub struct DiscountCode<'a> {
    /// Unique code string customers enter.
    pub code: String,

    /// Discount amount rule.
    pub value: DiscountValue<'a>,

    /// Code is invalid at or after this instant.
    pub expires_at: Option<Timestamp>,

    /// Total redemptions allowed.
    pub usage_limit: Option<u32>,

    /// Redemptions so far.
    pub usage_count: u32,

    /// Only applies to a customer's first purchase.
    pub first_purchase_only: bool,

    /// Product/category restriction.
    pub scope: Scope,

    /// Minimum order total.
    pub min_purchase: Option<Money<'a, Currency>>,

    /// Inactive or deleted codes never apply.
    pub active: bool,
}

impl<'a> DiscountCode<'a> {
    /// Create an active, unrestricted code.
    pub fn new(code: impl Into<String>, value: DiscountValue<'a>) -> Self {
        Self {
            code: code.into(),
            value,
            expires_at: None,
            usage_limit: None,
            usage_count: 0,
            first_purchase_only: false,
            scope: Scope::unrestricted(),
            min_purchase: None,
            active: true,
        }
    }

    /// Create an uncapped percentage code.
    pub fn percentage(code: impl Into<String>, percent: Decimal) -> Self {
        Self::new(code, DiscountValue::percentage(percent))
    }

    /// Create a fixed amount code.
    pub fn fixed_amount(code: impl Into<String>, amount: Money<'a, Currency>) -> Self {
        Self::new(code, DiscountValue::FixedAmount(amount))
    }

    /// Set the expiry instant.
    #[must_use]
    pub fn with_expiry(mut self, expires_at: Timestamp) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// Set the usage limit and current usage count.
    #[must_use]
    pub fn with_usage(mut self, limit: u32, count: u32) -> Self {
        self.usage_limit = Some(limit);
        self.usage_count = count;
        self
    }

    /// Restrict to first purchases.
    #[must_use]
    pub fn for_first_purchase(mut self) -> Self {
        self.first_purchase_only = true;
        self
    }

    /// Restrict to a product/category scope.
    #[must_use]
    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    /// Require a minimum order total.
    #[must_use]
    pub fn with_min_purchase(mut self, min_purchase: Money<'a, Currency>) -> Self {
        self.min_purchase = Some(min_purchase);
        self
    }

    /// Mark the code inactive.
    #[must_use]
    pub fn deactivated(mut self) -> Self {
        self.active = false;
        self
    }

    /// Currency of the code's money fields, if it has any.
    ///
    /// An uncapped percentage code without a minimum purchase is currency agnostic.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MixedCurrencies`] if the money fields disagree.
    pub fn currency(&self) -> Result<Option<&'a Currency>, ValidationError> {
        let mut currencies = [self.value.money(), self.min_purchase]
            .into_iter()
            .flatten()
            .map(|money| money.currency());

        let Some(first) = currencies.next() else {
            return Ok(None);
        };

        match currencies.find(|currency| *currency != first) {
            Some(other) => Err(ValidationError::MixedCurrencies(
                first.iso_alpha_code,
                other.iso_alpha_code,
            )),
            None => Ok(Some(first)),
        }
    }

    /// Check the record's invariants.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.code.trim().is_empty() {
            return Err(ValidationError::EmptyCode);
        }

        match self.value {
            DiscountValue::Percentage {
                percent,
                max_discount,
            } => {
                if percent < Decimal::ZERO || percent > Decimal::ONE_HUNDRED {
                    return Err(ValidationError::PercentageOutOfRange(percent));
                }

                ensure_non_negative(max_discount, "max_discount")?;
            }
            DiscountValue::FixedAmount(amount) => ensure_non_negative(Some(amount), "value")?,
        }

        ensure_non_negative(self.min_purchase, "min_purchase_amount")?;

        if self.usage_limit == Some(0) {
            return Err(ValidationError::ZeroUsageLimit);
        }

        self.currency()?;

        Ok(())
    }
}

fn ensure_non_negative(
    money: Option<Money<'_, Currency>>,
    field: &'static str,
) -> Result<(), ValidationError> {
    match money {
        Some(money) if money.to_minor_units() < 0 => Err(ValidationError::NegativeAmount { field }),
        _ => Ok(()),
    }
}
