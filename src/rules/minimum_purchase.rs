//! Minimum Purchase

use super::{Rejection, Rule, RuleContext};

/// Rejects orders whose total is below the code's minimum purchase.
#[derive(Debug, Clone, Copy, Default)]
pub struct MinimumPurchase;

impl Rule for MinimumPurchase {
    fn check(&self, context: &RuleContext<'_, '_>) -> Result<(), Rejection> {
        match context.code.min_purchase {
            Some(minimum)
                if context.order.total().to_minor_units() < minimum.to_minor_units() =>
            {
                Err(Rejection::BelowMinimum)
            }
            _ => Ok(()),
        }
    }
}
