//! Evaluation Example
//!
//! This example evaluates every discount code in a fixture set against every order in it and
//! prints the outcomes as a table.
//!
//! Use `-f` to load a fixture set by name
//! Use `-a` to evaluate at a fixed RFC 3339 instant instead of now
//! Use `-c` to evaluate a single discount code
//! Use `-l` to set the log filter when `RUST_LOG` is unset

use std::io;

use anyhow::Result;
use clap::Parser;
use rebate::{evaluation::Evaluator, fixtures::Fixture, report::Report, utils::DemoArgs};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Evaluation Example
pub fn main() -> Result<()> {
    let args = DemoArgs::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_err| EnvFilter::new(&args.log_level));

    tracing_subscriber::fmt()
        .compact()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let fixture = Fixture::from_set(&args.fixture)?;
    let evaluator = Evaluator::standard();
    let now = args.now();

    info!(
        fixture = %args.fixture,
        codes = fixture.codes().len(),
        orders = fixture.orders().len(),
        %now,
        "evaluating fixture set"
    );

    let codes = fixture
        .codes()
        .iter()
        .filter(|code| args.code.as_ref().is_none_or(|wanted| &code.code == wanted));

    let mut report = Report::new();

    for code in codes {
        for (name, order) in fixture.orders() {
            report.push(
                code.code.clone(),
                name.clone(),
                *order.total(),
                evaluator.evaluate(code, order, now),
            );
        }
    }

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    report.write_to(&mut handle)?;

    Ok(())
}
