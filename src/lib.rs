//! Rebate
//!
//! Rebate decides whether a discount code applies to an order and, if it does, how much it
//! takes off. Evaluation is a pure function of the code, the order and the current time.

pub mod codes;
pub mod discounts;
pub mod evaluation;
pub mod fixtures;
pub mod orders;
pub mod prelude;
pub mod products;
pub mod redemptions;
pub mod report;
pub mod rules;
pub mod utils;
