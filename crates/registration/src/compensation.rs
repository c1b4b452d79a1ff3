//! Compensation logging for operator visibility.
//!
//! A failed rollback leaves orphaned data that needs manual
//! reconciliation, so every compensation attempt is recorded whether
//! it succeeded or not. The log is observability only: a failed
//! compensation never changes the error the caller sees.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;

/// Outcome of a single compensation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompensationOutcome {
    /// The rollback removed the record (or it was already gone).
    Succeeded,
    /// The rollback itself failed; the record is orphaned.
    Failed { reason: String },
}

/// One recorded compensation attempt.
#[derive(Debug, Clone)]
pub struct CompensationAttempt {
    /// The saga step being undone.
    pub step: &'static str,
    /// The ID of the record the compensation targeted.
    pub target_id: String,
    pub outcome: CompensationOutcome,
}

impl CompensationAttempt {
    /// Returns true if the rollback failed.
    pub fn failed(&self) -> bool {
        matches!(self.outcome, CompensationOutcome::Failed { .. })
    }
}

/// Sink for compensation attempts.
#[async_trait]
pub trait CompensationLog: Send + Sync {
    /// Records one attempt.
    async fn record(&self, attempt: CompensationAttempt);
}

/// Production log: structured tracing events plus a labeled counter.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingCompensationLog;

impl TracingCompensationLog {
    /// Creates a new tracing-backed log.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CompensationLog for TracingCompensationLog {
    async fn record(&self, attempt: CompensationAttempt) {
        match &attempt.outcome {
            CompensationOutcome::Succeeded => {
                metrics::counter!("registration_compensations_total", "outcome" => "succeeded")
                    .increment(1);
                tracing::warn!(
                    step = attempt.step,
                    target_id = %attempt.target_id,
                    "compensation succeeded"
                );
            }
            CompensationOutcome::Failed { reason } => {
                metrics::counter!("registration_compensations_total", "outcome" => "failed")
                    .increment(1);
                tracing::error!(
                    step = attempt.step,
                    target_id = %attempt.target_id,
                    reason = %reason,
                    "compensation failed, record orphaned"
                );
            }
        }
    }
}

/// In-memory log for tests.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCompensationLog {
    entries: Arc<RwLock<Vec<CompensationAttempt>>>,
}

impl InMemoryCompensationLog {
    /// Creates a new empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of all recorded attempts.
    pub fn entries(&self) -> Vec<CompensationAttempt> {
        self.entries.read().unwrap().clone()
    }

    /// Returns the number of recorded attempts.
    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    /// Returns true if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl CompensationLog for InMemoryCompensationLog {
    async fn record(&self, attempt: CompensationAttempt) {
        self.entries.write().unwrap().push(attempt);
    }
}
