//! Orders

use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;
use thiserror::Error;

use crate::products::{CategoryKey, ProductKey};

/// Errors related to order construction or totals.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrderError {
    /// A line item's currency differs from the order currency (index, item currency, order currency).
    #[error("Line item {0} has currency {1}, but order has currency {2}")]
    CurrencyMismatch(usize, &'static str, &'static str),

    /// The explicit order total has a different currency (total currency, order currency).
    #[error("Order total has currency {0}, but order has currency {1}")]
    TotalCurrencyMismatch(&'static str, &'static str),

    /// A line item has a negative amount.
    #[error("Line item {0} has a negative amount")]
    NegativeAmount(usize),

    /// The explicit order total is negative.
    #[error("Order total must not be negative")]
    NegativeTotal,

    /// Summing line items overflowed the minor unit range.
    #[error("Order subtotal overflowed")]
    Overflow,
}

/// A single priced line on an order.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LineItem<'a> {
    product: ProductKey,
    category: CategoryKey,
    amount: Money<'a, Currency>,
}

impl<'a> LineItem<'a> {
    /// Creates a new line item for a product in a category.
    pub fn new(product: ProductKey, category: CategoryKey, amount: Money<'a, Currency>) -> Self {
        Self {
            product,
            category,
            amount,
        }
    }

    /// Returns the product key
    pub fn product(&self) -> ProductKey {
        self.product
    }

    /// Returns the category key
    pub fn category(&self) -> CategoryKey {
        self.category
    }

    /// Returns the line amount
    pub fn amount(&self) -> &Money<'a, Currency> {
        &self.amount
    }
}

/// Read-only order snapshot handed to the evaluator.
#[derive(Debug, Clone)]
pub struct Order<'a> {
    line_items: SmallVec<[LineItem<'a>; 8]>,
    total: Money<'a, Currency>,
    first_purchase: bool,
    currency: &'static Currency,
}

impl<'a> Order<'a> {
    /// Create an order whose total is the sum of its line items.
    ///
    /// # Errors
    ///
    /// Returns an `OrderError` if a line item has a different currency or a negative amount,
    /// or if the subtotal overflows.
    pub fn with_line_items(
        line_items: impl IntoIterator<Item = LineItem<'a>>,
        currency: &'static Currency,
    ) -> Result<Self, OrderError> {
        let line_items: SmallVec<[LineItem<'a>; 8]> = line_items.into_iter().collect();

        check_line_items(&line_items, currency)?;

        let subtotal = subtotal_minor(&line_items)?;

        Ok(Order {
            line_items,
            total: Money::from_minor(subtotal, currency),
            first_purchase: false,
            currency,
        })
    }

    /// Create an order with an explicit total, e.g. one that already includes shipping.
    ///
    /// # Errors
    ///
    /// Returns an `OrderError` if any amount has a different currency or is negative.
    pub fn with_total(
        line_items: impl IntoIterator<Item = LineItem<'a>>,
        total: Money<'a, Currency>,
        currency: &'static Currency,
    ) -> Result<Self, OrderError> {
        let line_items: SmallVec<[LineItem<'a>; 8]> = line_items.into_iter().collect();

        check_line_items(&line_items, currency)?;

        if total.currency() != currency {
            return Err(OrderError::TotalCurrencyMismatch(
                total.currency().iso_alpha_code,
                currency.iso_alpha_code,
            ));
        }

        if total.to_minor_units() < 0 {
            return Err(OrderError::NegativeTotal);
        }

        Ok(Order {
            line_items,
            total,
            first_purchase: false,
            currency,
        })
    }

    /// Mark whether this is the customer's first purchase.
    #[must_use]
    pub fn with_first_purchase(mut self, first_purchase: bool) -> Self {
        self.first_purchase = first_purchase;
        self
    }

    /// Order total
    pub fn total(&self) -> &Money<'a, Currency> {
        &self.total
    }

    /// Calculate the sum of the line items.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::Overflow`] if the sum does not fit in minor units.
    pub fn subtotal(&self) -> Result<Money<'a, Currency>, OrderError> {
        Ok(Money::from_minor(
            subtotal_minor(&self.line_items)?,
            self.currency,
        ))
    }

    /// Whether this is the customer's first purchase.
    pub fn is_first_purchase(&self) -> bool {
        self.first_purchase
    }

    /// Line items on the order
    pub fn line_items(&self) -> &[LineItem<'a>] {
        &self.line_items
    }

    /// Get the number of line items.
    pub fn len(&self) -> usize {
        self.line_items.len()
    }

    /// Check if the order has no line items.
    pub fn is_empty(&self) -> bool {
        self.line_items.is_empty()
    }

    /// Get the currency of the order.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}

fn check_line_items(line_items: &[LineItem<'_>], currency: &Currency) -> Result<(), OrderError> {
    line_items.iter().enumerate().try_for_each(|(i, item)| {
        let item_currency = item.amount().currency();

        if item_currency != currency {
            return Err(OrderError::CurrencyMismatch(
                i,
                item_currency.iso_alpha_code,
                currency.iso_alpha_code,
            ));
        }

        if item.amount().to_minor_units() < 0 {
            return Err(OrderError::NegativeAmount(i));
        }

        Ok(())
    })
}

/// Sum line item amounts in minor units.
pub(crate) fn subtotal_minor<'i, 'a: 'i>(
    line_items: impl IntoIterator<Item = &'i LineItem<'a>>,
) -> Result<i64, OrderError> {
    line_items.into_iter().try_fold(0i64, |acc, item| {
        acc.checked_add(item.amount().to_minor_units())
            .ok_or(OrderError::Overflow)
    })
}
