//! Report

use std::io;

use rusty_money::{Money, iso::Currency};
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::evaluation::{EvaluationError, EvaluationResult};

/// Errors that can occur when writing a report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Error writing to the output.
    #[error("failed to write report: {0}")]
    Io(#[from] io::Error),
}

/// One evaluated code/order pair.
#[derive(Debug)]
pub struct ReportRow<'a> {
    /// Code string
    pub code: String,

    /// Order name
    pub order: String,

    /// Order total before the discount
    pub total: Money<'a, Currency>,

    /// Evaluation outcome
    pub outcome: Result<EvaluationResult<'a>, EvaluationError>,
}

/// Table of evaluation outcomes.
#[derive(Debug, Default)]
pub struct Report<'a> {
    rows: Vec<ReportRow<'a>>,
}

impl<'a> Report<'a> {
    /// Create an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an outcome.
    pub fn push(
        &mut self,
        code: impl Into<String>,
        order: impl Into<String>,
        total: Money<'a, Currency>,
        outcome: Result<EvaluationResult<'a>, EvaluationError>,
    ) {
        self.rows.push(ReportRow {
            code: code.into(),
            order: order.into(),
            total,
            outcome,
        });
    }

    /// Recorded rows, in insertion order.
    pub fn rows(&self) -> &[ReportRow<'a>] {
        &self.rows
    }

    /// Number of rows where the code applied.
    pub fn applied(&self) -> usize {
        self.rows
            .iter()
            .filter(|row| matches!(&row.outcome, Ok(result) if result.is_applied()))
            .count()
    }

    /// Write the report as a table followed by a one-line summary.
    ///
    /// # Errors
    ///
    /// Returns a [`ReportError`] if the output cannot be written.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReportError> {
        let mut builder = Builder::default();

        builder.push_record(["Code", "Order", "Total", "Outcome", "Discount", "Final"]);

        for row in &self.rows {
            builder.push_record(row_cells(row));
        }

        let mut table = builder.build();

        table.with(Style::modern_rounded());
        table.modify(Rows::first(), Color::BOLD);
        table.modify(Columns::new(4..6), Alignment::right());
        table.modify(Columns::new(2..3), Alignment::right());

        for (index, row) in self.rows.iter().enumerate() {
            table.modify((index + 1, 3), outcome_color(&row.outcome));
        }

        writeln!(out, "\n{table}")?;
        writeln!(out, " {} of {} applied\n", self.applied(), self.rows.len())?;

        Ok(())
    }
}

fn row_cells(row: &ReportRow<'_>) -> [String; 6] {
    let (outcome, discount, remaining) = match &row.outcome {
        Ok(EvaluationResult::Applied {
            discount_amount,
            final_amount,
        }) => (
            "applied".to_string(),
            format!("-{discount_amount}"),
            final_amount.to_string(),
        ),
        Ok(EvaluationResult::Rejected { reason }) => {
            (reason.to_string(), String::new(), String::new())
        }
        Err(err) => (format!("error: {err}"), String::new(), String::new()),
    };

    [
        row.code.clone(),
        row.order.clone(),
        row.total.to_string(),
        outcome,
        discount,
        remaining,
    ]
}

fn outcome_color(outcome: &Result<EvaluationResult<'_>, EvaluationError>) -> Color {
    match outcome {
        Ok(result) if result.is_applied() => Color::FG_GREEN,
        Ok(_) => Color::FG_YELLOW,
        Err(_) => Color::FG_RED,
    }
}
