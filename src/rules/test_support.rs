//! Shared helpers for rule tests.

use jiff::Timestamp;
use rusty_money::{Money, iso::GBP};
use slotmap::SlotMap;

use crate::{
    orders::{LineItem, Order, OrderError},
    products::{CategoryKey, ProductKey},
};

/// Two products in two distinct categories.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Keys {
    pub(crate) p1: ProductKey,
    pub(crate) p2: ProductKey,
    pub(crate) c1: CategoryKey,
    pub(crate) c2: CategoryKey,
}

pub(crate) fn keys() -> Keys {
    let mut products = SlotMap::<ProductKey, ()>::with_key();
    let mut categories = SlotMap::<CategoryKey, ()>::with_key();

    Keys {
        p1: products.insert(()),
        p2: products.insert(()),
        c1: categories.insert(()),
        c2: categories.insert(()),
    }
}

/// Order with `P1/C1 = p1_minor` and `P2/C2 = p2_minor` in GBP.
pub(crate) fn order(keys: Keys, p1_minor: i64, p2_minor: i64) -> Result<Order<'static>, OrderError> {
    Order::with_line_items(
        [
            LineItem::new(keys.p1, keys.c1, Money::from_minor(p1_minor, GBP)),
            LineItem::new(keys.p2, keys.c2, Money::from_minor(p2_minor, GBP)),
        ],
        GBP,
    )
}

/// 2026-01-01T00:00:00Z
pub(crate) fn now() -> Timestamp {
    Timestamp::from_second(1_767_225_600).unwrap_or(Timestamp::UNIX_EPOCH)
}

/// `now()` shifted by `seconds`.
pub(crate) fn offset(seconds: i64) -> Timestamp {
    Timestamp::from_second(now().as_second().saturating_add(seconds)).unwrap_or(now())
}
