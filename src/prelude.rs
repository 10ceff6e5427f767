//! Rebate prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    codes::{DiscountCode, DiscountKind, DiscountValue, Scope, ValidationError},
    discounts::DiscountError,
    evaluation::{EvaluationError, EvaluationResult, Evaluator, evaluate},
    fixtures::{Fixture, FixtureError},
    orders::{LineItem, Order, OrderError},
    products::{Catalog, CatalogError, Category, CategoryKey, Product, ProductKey},
    redemptions::{InMemoryLedger, RedeemError, RedemptionError, RedemptionLedger, redeem},
    report::{Report, ReportError},
    rules::{Rejection, Rule, RuleContext},
};
