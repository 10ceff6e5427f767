//! Redemptions
//!
//! The evaluator reads `usage_count` but never writes it. Committing a redemption is the job
//! of a [`RedemptionLedger`], which must increment the count atomically and only while the
//! count is below the limit, so that two concurrent evaluations cannot both redeem the last
//! use of a code.

use std::sync::{
    RwLock,
    atomic::{AtomicU32, Ordering},
};

use jiff::Timestamp;
use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::debug;

use crate::{
    codes::DiscountCode,
    evaluation::{EvaluationError, EvaluationResult, Evaluator},
    orders::Order,
    rules::Rejection,
};

/// Errors raised by a redemption ledger.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RedemptionError {
    /// The code has no redemptions left.
    #[error("usage limit of {limit} reached for code {code}")]
    LimitReached {
        /// Code string
        code: String,

        /// Configured limit
        limit: u32,
    },

    /// The redemption counter cannot be incremented any further.
    #[error("redemption counter overflowed for code {0}")]
    Overflow(String),

    /// The ledger's lock was poisoned by a panicking writer.
    #[error("redemption ledger lock poisoned")]
    Poisoned,
}

/// Errors raised while redeeming a code.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RedeemError {
    /// Evaluation precondition violation.
    #[error(transparent)]
    Evaluation(#[from] EvaluationError),

    /// Ledger failure.
    #[error(transparent)]
    Ledger(#[from] RedemptionError),
}

/// Storage-side contract for redemption counts.
pub trait RedemptionLedger: Send + Sync {
    /// Current redemption count for a code. Unknown codes have zero redemptions.
    ///
    /// # Errors
    ///
    /// Returns a [`RedemptionError`] if the count cannot be read.
    fn usage_count(&self, code: &str) -> Result<u32, RedemptionError>;

    /// Atomically increment the count if it is below `limit`, returning the new count.
    ///
    /// `recorded` is the count carried by the code record. The ledger never counts from below
    /// it, so a code it has not seen before starts at the record's count rather than zero.
    ///
    /// # Errors
    ///
    /// Returns [`RedemptionError::LimitReached`] if the count already equals or exceeds
    /// `limit`, leaving it unchanged.
    fn try_increment(
        &self,
        code: &str,
        recorded: u32,
        limit: Option<u32>,
    ) -> Result<u32, RedemptionError>;
}

/// Process-local ledger backed by atomic counters.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    counts: RwLock<FxHashMap<String, AtomicU32>>,
}

impl InMemoryLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a ledger seeded with existing counts.
    pub fn with_counts<S: Into<String>>(counts: impl IntoIterator<Item = (S, u32)>) -> Self {
        Self {
            counts: RwLock::new(
                counts
                    .into_iter()
                    .map(|(code, count)| (code.into(), AtomicU32::new(count)))
                    .collect(),
            ),
        }
    }
}

impl RedemptionLedger for InMemoryLedger {
    fn usage_count(&self, code: &str) -> Result<u32, RedemptionError> {
        let counts = self.counts.read().map_err(|_err| RedemptionError::Poisoned)?;

        Ok(counts
            .get(code)
            .map_or(0, |count| count.load(Ordering::Acquire)))
    }

    fn try_increment(
        &self,
        code: &str,
        recorded: u32,
        limit: Option<u32>,
    ) -> Result<u32, RedemptionError> {
        {
            let counts = self.counts.read().map_err(|_err| RedemptionError::Poisoned)?;

            if let Some(counter) = counts.get(code) {
                return increment(counter, code, recorded, limit);
            }
        }

        let mut counts = self.counts.write().map_err(|_err| RedemptionError::Poisoned)?;
        let counter = counts
            .entry(code.to_string())
            .or_insert_with(|| AtomicU32::new(recorded));

        increment(counter, code, recorded, limit)
    }
}

fn increment(
    counter: &AtomicU32,
    code: &str,
    recorded: u32,
    limit: Option<u32>,
) -> Result<u32, RedemptionError> {
    counter
        .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
            let current = current.max(recorded);

            if limit.is_some_and(|limit| current >= limit) {
                None
            } else {
                current.checked_add(1)
            }
        })
        .map(|previous| previous.max(recorded).saturating_add(1))
        .map_err(|current| match limit {
            Some(limit) if current.max(recorded) >= limit => RedemptionError::LimitReached {
                code: code.to_string(),
                limit,
            },
            _ => RedemptionError::Overflow(code.to_string()),
        })
}

/// Evaluate a code against its redemption count and commit the redemption if it applies.
///
/// The count used is the larger of the record's `usage_count` and the ledger's count, so
/// neither a stale record nor a fresh ledger can let an exhausted code through.
///
/// If another caller takes the last redemption between evaluation and commit, the result is
/// [`Rejection::UsageLimitReached`].
///
/// # Errors
///
/// Returns a [`RedeemError`] on an evaluation precondition violation or a ledger failure.
#[tracing::instrument(name = "redemptions.redeem", skip_all, fields(code = %code.code), err)]
pub fn redeem<'a>(
    evaluator: &Evaluator,
    ledger: &dyn RedemptionLedger,
    code: &DiscountCode<'a>,
    order: &Order<'a>,
    now: Timestamp,
) -> Result<EvaluationResult<'a>, RedeemError> {
    let snapshot = DiscountCode {
        usage_count: ledger.usage_count(&code.code)?.max(code.usage_count),
        ..code.clone()
    };

    let result = evaluator.evaluate(&snapshot, order, now)?;

    if !result.is_applied() {
        return Ok(result);
    }

    match ledger.try_increment(&snapshot.code, snapshot.usage_count, snapshot.usage_limit) {
        Ok(count) => {
            debug!(count, "redemption committed");

            Ok(result)
        }
        Err(RedemptionError::LimitReached { .. }) => {
            debug!("redemption lost the race for the last use");

            Ok(EvaluationResult::Rejected {
                reason: Rejection::UsageLimitReached,
            })
        }
        Err(err) => Err(err.into()),
    }
}
