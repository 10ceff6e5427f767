//! Scope

use crate::{
    codes::Scope,
    discounts::DiscountError,
    orders::{Order, subtotal_minor},
};

use super::{Rejection, Rule, RuleContext};

/// Rejects scoped codes when no line item falls inside the scope.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScopeMatch;

impl Rule for ScopeMatch {
    fn check(&self, context: &RuleContext<'_, '_>) -> Result<(), Rejection> {
        let scope = &context.code.scope;

        if !scope.is_restricted() {
            return Ok(());
        }

        if context
            .order
            .line_items()
            .iter()
            .any(|item| scope.matches(item))
        {
            Ok(())
        } else {
            Err(Rejection::NotApplicableToOrder)
        }
    }
}

/// Amount the discount applies to, in minor units.
///
/// The full order total for an unrestricted scope, otherwise the sum of matching line items.
///
/// # Errors
///
/// Returns [`DiscountError::Overflow`] if the matching line items overflow when summed.
pub fn eligible_base(scope: &Scope, order: &Order<'_>) -> Result<i64, DiscountError> {
    if !scope.is_restricted() {
        return Ok(order.total().to_minor_units());
    }

    subtotal_minor(
        order
            .line_items()
            .iter()
            .filter(|item| scope.matches(item)),
    )
    .map_err(|_err| DiscountError::Overflow)
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use rusty_money::{Money, iso::GBP};
    use testresult::TestResult;

    use crate::{
        codes::DiscountCode,
        orders::LineItem,
        rules::test_support::{keys, now, order},
    };

    use super::*;

    #[test]
    fn unrestricted_scope_passes_and_uses_order_total() -> TestResult {
        let keys = keys();
        let order = Order::with_total(
            [LineItem::new(keys.p1, keys.c1, Money::from_minor(30_00, GBP))],
            Money::from_minor(35_00, GBP),
            GBP,
        )?;
        let code = DiscountCode::percentage("ALL", Decimal::from(10));

        let result = ScopeMatch.check(&RuleContext {
            code: &code,
            order: &order,
            now: now(),
        });

        assert_eq!(result, Ok(()));
        assert_eq!(eligible_base(&code.scope, &order)?, 35_00);

        Ok(())
    }

    #[test]
    fn product_scope_sums_matching_items() -> TestResult {
        let keys = keys();
        let order = order(keys, 30_00, 70_00)?;
        let code = DiscountCode::percentage("P1", Decimal::from(10))
            .with_scope(Scope::for_products([keys.p1]));

        let result = ScopeMatch.check(&RuleContext {
            code: &code,
            order: &order,
            now: now(),
        });

        assert_eq!(result, Ok(()));
        assert_eq!(eligible_base(&code.scope, &order)?, 30_00);

        Ok(())
    }

    #[test]
    fn category_scope_matches_exact_category() -> TestResult {
        let keys = keys();
        let order = order(keys, 30_00, 70_00)?;
        let scope = Scope::for_categories([keys.c2]);

        assert_eq!(eligible_base(&scope, &order)?, 70_00);

        Ok(())
    }

    #[test]
    fn product_and_category_scope_unions_matches() -> TestResult {
        let keys = keys();
        let order = order(keys, 30_00, 70_00)?;
        let scope = Scope {
            products: [keys.p1].into_iter().collect(),
            categories: [keys.c2].into_iter().collect(),
        };

        assert_eq!(eligible_base(&scope, &order)?, 100_00);

        Ok(())
    }

    #[test]
    fn rejects_when_nothing_matches() -> TestResult {
        let keys = keys();
        let order = Order::with_line_items(
            [LineItem::new(keys.p2, keys.c2, Money::from_minor(70_00, GBP))],
            GBP,
        )?;
        let code = DiscountCode::percentage("P1", Decimal::from(10))
            .with_scope(Scope::for_products([keys.p1]));

        let result = ScopeMatch.check(&RuleContext {
            code: &code,
            order: &order,
            now: now(),
        });

        assert_eq!(result, Err(Rejection::NotApplicableToOrder));

        Ok(())
    }
}
