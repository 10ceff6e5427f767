//! First Purchase

use super::{Rejection, Rule, RuleContext};

/// Rejects first-purchase codes on repeat orders.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstPurchase;

impl Rule for FirstPurchase {
    fn check(&self, context: &RuleContext<'_, '_>) -> Result<(), Rejection> {
        if context.code.first_purchase_only && !context.order.is_first_purchase() {
            return Err(Rejection::NotFirstPurchase);
        }

        Ok(())
    }
}
