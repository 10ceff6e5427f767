//! Usage Limit

use super::{Rejection, Rule, RuleContext};

/// Rejects codes that have been redeemed as often as their limit allows.
#[derive(Debug, Clone, Copy, Default)]
pub struct UsageLimit;

impl Rule for UsageLimit {
    fn check(&self, context: &RuleContext<'_, '_>) -> Result<(), Rejection> {
        match context.code.usage_limit {
            Some(limit) if context.code.usage_count >= limit => Err(Rejection::UsageLimitReached),
            _ => Ok(()),
        }
    }
}
