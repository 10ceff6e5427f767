//! Integration tests for the storefront fixture set

use jiff::Timestamp;
use rebate::prelude::*;
use rusty_money::{Money, iso::GBP};
use testresult::TestResult;

fn outcome(
    fixture: &Fixture,
    code: &str,
    order: &str,
) -> TestResult<Result<EvaluationResult<'static>, EvaluationError>> {
    let now: Timestamp = "2026-03-01T12:00:00Z".parse()?;

    Ok(evaluate(fixture.code(code)?, fixture.order(order)?, now))
}

fn applied(discount: i64, remaining: i64) -> Result<EvaluationResult<'static>, EvaluationError> {
    Ok(EvaluationResult::Applied {
        discount_amount: Money::from_minor(discount, GBP),
        final_amount: Money::from_minor(remaining, GBP),
    })
}

fn rejected(reason: Rejection) -> Result<EvaluationResult<'static>, EvaluationError> {
    Ok(EvaluationResult::Rejected { reason })
}

#[test]
fn storefront_set_loads() -> TestResult {
    let fixture = Fixture::from_set("storefront")?;

    assert_eq!(fixture.catalog().categories().len(), 3);
    assert_eq!(fixture.catalog().products().len(), 4);
    assert_eq!(fixture.codes().len(), 9);
    assert_eq!(fixture.orders().len(), 4);
    assert_eq!(fixture.currency()?, GBP);

    assert_eq!(
        fixture.order("big_basket")?.total(),
        &Money::from_minor(79_00, GBP)
    );
    assert_eq!(
        fixture.order("shipped")?.total(),
        &Money::from_minor(39_99, GBP)
    );

    Ok(())
}

#[test]
fn storefront_outcomes() -> TestResult {
    let fixture = Fixture::from_set("storefront")?;

    let expected = [
        ("WELCOME10", "first_order", applied(2_75, 24_75)),
        ("WELCOME10", "big_basket", rejected(Rejection::NotFirstPurchase)),
        ("HALFCAP", "big_basket", applied(10_00, 69_00)),
        ("HALFCAP", "small", applied(7_50, 7_50)),
        ("BOOKS15", "big_basket", applied(7_35, 71_65)),
        ("BOOKS15", "first_order", applied(1_88, 25_62)),
        ("BOOKS15", "small", rejected(Rejection::NotApplicableToOrder)),
        ("CHESS25", "shipped", applied(7_50, 32_49)),
        ("FIVER", "small", rejected(Rejection::BelowMinimum)),
        ("FIVER", "shipped", applied(5_00, 34_99)),
        ("BIGFIXED", "small", applied(15_00, 0)),
        ("NEWYEAR20", "big_basket", rejected(Rejection::Expired)),
        ("LIMITED5", "small", rejected(Rejection::UsageLimitReached)),
        ("RETIRED30", "small", rejected(Rejection::Inactive)),
    ];

    for (code, order, expected) in expected {
        assert_eq!(
            outcome(&fixture, code, order)?,
            expected,
            "{code} on {order}"
        );
    }

    Ok(())
}

#[test]
fn storefront_report_covers_every_pair() -> TestResult {
    let fixture = Fixture::from_set("storefront")?;
    let now: Timestamp = "2026-03-01T12:00:00Z".parse()?;
    let evaluator = Evaluator::standard();
    let mut report = Report::new();

    for code in fixture.codes() {
        for (name, order) in fixture.orders() {
            report.push(
                code.code.clone(),
                name.clone(),
                *order.total(),
                evaluator.evaluate(code, order, now),
            );
        }
    }

    let mut out = Vec::new();

    report.write_to(&mut out)?;

    assert_eq!(report.rows().len(), 36);
    assert!(String::from_utf8(out)?.contains(&format!("{} of 36 applied", report.applied())));

    Ok(())
}
