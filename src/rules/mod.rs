//! Rules
//!
//! Each restriction on a discount code is an independent [`Rule`]. The evaluator runs its rules
//! in order and stops at the first [`Rejection`].

use std::fmt;

use jiff::Timestamp;

use crate::{codes::DiscountCode, orders::Order};

pub mod active;
pub mod expiration;
pub mod first_purchase;
pub mod minimum_purchase;
pub mod scope;
pub mod usage_limit;

#[cfg(test)]
pub(crate) mod test_support;

pub use self::{
    active::Active, expiration::Expiration, first_purchase::FirstPurchase,
    minimum_purchase::MinimumPurchase, scope::ScopeMatch, usage_limit::UsageLimit,
};

/// Why a code did not apply to an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rejection {
    /// `now` is at or after the code's expiry.
    Expired,

    /// The code has been redeemed as often as it allows.
    UsageLimitReached,

    /// The code is for first purchases and this is not one.
    NotFirstPurchase,

    /// The order total is below the code's minimum purchase.
    BelowMinimum,

    /// No line item falls inside the code's scope.
    NotApplicableToOrder,

    /// The code has been deactivated or deleted.
    Inactive,

    /// Rejected by a caller-supplied rule.
    Custom(&'static str),
}

impl Rejection {
    /// Stable identifier for logs and reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Expired => "expired",
            Self::UsageLimitReached => "usage_limit_reached",
            Self::NotFirstPurchase => "not_first_purchase",
            Self::BelowMinimum => "below_minimum",
            Self::NotApplicableToOrder => "not_applicable_to_order",
            Self::Inactive => "inactive",
            Self::Custom(reason) => *reason,
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inputs shared by every rule for one evaluation.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'c, 'a> {
    /// Code being evaluated.
    pub code: &'c DiscountCode<'a>,

    /// Order snapshot.
    pub order: &'c Order<'a>,

    /// Evaluation instant, supplied by the caller.
    pub now: Timestamp,
}

/// A single restriction check.
pub trait Rule: fmt::Debug + Send + Sync {
    /// Check the code against the order.
    ///
    /// # Errors
    ///
    /// Returns the [`Rejection`] if the code does not apply.
    fn check(&self, context: &RuleContext<'_, '_>) -> Result<(), Rejection>;
}
