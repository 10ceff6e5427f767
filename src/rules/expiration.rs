//! Expiration

use super::{Rejection, Rule, RuleContext};

/// Rejects codes at or after their expiry instant.
#[derive(Debug, Clone, Copy, Default)]
pub struct Expiration;

impl Rule for Expiration {
    fn check(&self, context: &RuleContext<'_, '_>) -> Result<(), Rejection> {
        match context.code.expires_at {
            Some(expires_at) if context.now >= expires_at => Err(Rejection::Expired),
            _ => Ok(()),
        }
    }
}
