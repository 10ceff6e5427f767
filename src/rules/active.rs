//! Active

use super::{Rejection, Rule, RuleContext};

/// Rejects deactivated or deleted codes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Active;

impl Rule for Active {
    fn check(&self, context: &RuleContext<'_, '_>) -> Result<(), Rejection> {
        if context.code.active {
            Ok(())
        } else {
            Err(Rejection::Inactive)
        }
    }
}
