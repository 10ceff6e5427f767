//! Evaluation
//!
//! [`Evaluator`] decides whether a [`DiscountCode`] applies to an [`Order`] and, if it does,
//! how much it takes off. Evaluation is pure: inputs are never mutated and identical inputs
//! always produce identical results.
//!
//! Precondition violations (an invalid code, a currency mismatch) are returned as
//! [`EvaluationError`]. A code that simply does not apply is not an error; it is an
//! [`EvaluationResult::Rejected`] value.

use jiff::Timestamp;
use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;
use thiserror::Error;
use tracing::debug;

use crate::{
    codes::{DiscountCode, ValidationError},
    discounts::{DiscountError, discount_minor, final_minor},
    orders::Order,
    rules::{
        Active, Expiration, FirstPurchase, MinimumPurchase, Rejection, Rule, RuleContext,
        ScopeMatch, UsageLimit, scope::eligible_base,
    },
};

/// Precondition violations raised before any rule runs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EvaluationError {
    /// The discount code record breaks one of its invariants.
    #[error("invalid discount code: {0}")]
    InvalidCode(#[from] ValidationError),

    /// The code's money fields are in a different currency from the order.
    #[error("discount code currency {code} does not match order currency {order}")]
    CurrencyMismatch {
        /// Code currency
        code: &'static str,

        /// Order currency
        order: &'static str,
    },

    /// Amount computation failed.
    #[error(transparent)]
    Discount(#[from] DiscountError),
}

/// Outcome of evaluating a code against an order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EvaluationResult<'a> {
    /// The code does not apply.
    Rejected {
        /// First rule that failed.
        reason: Rejection,
    },

    /// The code applies.
    Applied {
        /// Amount taken off the order.
        discount_amount: Money<'a, Currency>,

        /// Order total after the discount, never below zero.
        final_amount: Money<'a, Currency>,
    },
}

impl<'a> EvaluationResult<'a> {
    /// Whether the code applied.
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }

    /// Rejection reason, if the code was rejected.
    pub fn rejection(&self) -> Option<Rejection> {
        match self {
            Self::Rejected { reason } => Some(*reason),
            Self::Applied { .. } => None,
        }
    }

    /// Discount amount, if the code applied.
    pub fn discount_amount(&self) -> Option<Money<'a, Currency>> {
        match self {
            Self::Rejected { .. } => None,
            Self::Applied {
                discount_amount, ..
            } => Some(*discount_amount),
        }
    }
}

/// Ordered chain of rules followed by amount computation.
#[derive(Debug)]
pub struct Evaluator {
    rules: SmallVec<[Box<dyn Rule>; 8]>,
}

impl Evaluator {
    /// The standard rule chain: expiration, usage limit, first purchase, minimum purchase,
    /// scope, then active.
    pub fn standard() -> Self {
        let rules: [Box<dyn Rule>; 6] = [
            Box::new(Expiration),
            Box::new(UsageLimit),
            Box::new(FirstPurchase),
            Box::new(MinimumPurchase),
            Box::new(ScopeMatch),
            Box::new(Active),
        ];

        Self {
            rules: rules.into_iter().collect(),
        }
    }

    /// Append a rule after the existing ones.
    #[must_use]
    pub fn with_rule(mut self, rule: impl Rule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Number of rules in the chain.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the chain has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Evaluate a code against an order at `now`.
    ///
    /// # Errors
    ///
    /// Returns an [`EvaluationError`] if the code is invalid, its currency differs from the
    /// order's, or the amount computation overflows.
    pub fn evaluate<'a>(
        &self,
        code: &DiscountCode<'a>,
        order: &Order<'a>,
        now: Timestamp,
    ) -> Result<EvaluationResult<'a>, EvaluationError> {
        code.validate()?;

        ensure_currency(code, order)?;

        let context = RuleContext { code, order, now };

        if let Some(reason) = self.rules.iter().find_map(|rule| rule.check(&context).err()) {
            debug!(code = %code.code, %reason, "discount code rejected");

            return Ok(EvaluationResult::Rejected { reason });
        }

        let eligible = eligible_base(&code.scope, order)?;
        let discount = discount_minor(&code.value, eligible)?;
        let total = order.total().to_minor_units();
        let remaining = final_minor(total, discount);

        debug!(
            code = %code.code,
            eligible_minor = eligible,
            discount_minor = discount,
            final_minor = remaining,
            "discount code applied"
        );

        Ok(EvaluationResult::Applied {
            discount_amount: Money::from_minor(discount, order.currency()),
            final_amount: Money::from_minor(remaining, order.currency()),
        })
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::standard()
    }
}

/// Evaluate a code against an order with the standard rule chain.
///
/// # Errors
///
/// See [`Evaluator::evaluate`].
pub fn evaluate<'a>(
    code: &DiscountCode<'a>,
    order: &Order<'a>,
    now: Timestamp,
) -> Result<EvaluationResult<'a>, EvaluationError> {
    Evaluator::standard().evaluate(code, order, now)
}

fn ensure_currency(code: &DiscountCode<'_>, order: &Order<'_>) -> Result<(), EvaluationError> {
    match code.currency()? {
        Some(currency) if currency != order.currency() => Err(EvaluationError::CurrencyMismatch {
            code: currency.iso_alpha_code,
            order: order.currency().iso_alpha_code,
        }),
        _ => Ok(()),
    }
}
