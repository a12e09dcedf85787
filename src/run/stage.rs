//! Lifecycle of a single run generation.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::PayrollRun;

/// The stages a run generation moves through.
///
/// ```text
/// Requested -> Populating -> LinesGenerated -> TotalsComputed -> Persisted
///      \            \               \                 \
///       +------------+---------------+-----------------+--> Aborted
/// ```
///
/// Only `Persisted` leaves anything behind in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStage {
    /// The request was accepted and the run shell is being written.
    Requested,
    /// Eligible employees are being resolved and their payslips created.
    Populating,
    /// Every payslip has its lines; amounts are being written back.
    LinesGenerated,
    /// Every payslip amount is written; run totals and audit are being saved.
    TotalsComputed,
    /// The transaction committed.
    Persisted,
    /// The transaction was rolled back.
    Aborted,
}

impl RunStage {
    /// Name used in logs and error messages.
    pub fn as_str(self) -> &'static str {
        match self {
            RunStage::Requested => "requested",
            RunStage::Populating => "populating",
            RunStage::LinesGenerated => "lines_generated",
            RunStage::TotalsComputed => "totals_computed",
            RunStage::Persisted => "persisted",
            RunStage::Aborted => "aborted",
        }
    }
}

impl fmt::Display for RunStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A committed run and what went into it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedRun {
    /// The run as stored, totals included.
    pub run: PayrollRun,
    /// Payslips written for the run.
    pub payslip_count: usize,
    /// Lines written across all payslips.
    pub line_count: usize,
    /// Version of the salary catalog snapshot the lines were priced from.
    pub catalog_version: u64,
    /// Correlation id shared by every log event of the generation.
    pub correlation_id: Uuid,
    /// 201 for a new run, 200 for a regenerated one.
    pub status_code: u16,
}

/// How a generation ended.
#[derive(Debug)]
pub enum RunOutcome {
    /// Everything committed.
    Persisted(GeneratedRun),
    /// Nothing was kept.
    Aborted {
        /// The last stage reached before the failure.
        stage: RunStage,
        /// What went wrong.
        error: EngineError,
    },
}

impl RunOutcome {
    /// The terminal stage of this outcome.
    pub fn stage(&self) -> RunStage {
        match self {
            RunOutcome::Persisted(_) => RunStage::Persisted,
            RunOutcome::Aborted { .. } => RunStage::Aborted,
        }
    }

    /// Converts the outcome into a result, wrapping an abort in
    /// [`EngineError::RunAborted`].
    pub fn into_result(self) -> EngineResult<GeneratedRun> {
        match self {
            RunOutcome::Persisted(generated) => Ok(generated),
            RunOutcome::Aborted { stage, error } => Err(EngineError::RunAborted {
                stage,
                source: Box::new(error),
            }),
        }
    }
}

/// Tracks the current stage of one generation.
#[derive(Debug)]
pub(crate) struct RunProgress {
    correlation_id: Uuid,
    stage: RunStage,
}

impl RunProgress {
    pub(crate) fn new(correlation_id: Uuid) -> Self {
        Self {
            correlation_id,
            stage: RunStage::Requested,
        }
    }

    pub(crate) fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    pub(crate) fn stage(&self) -> RunStage {
        self.stage
    }

    pub(crate) fn enter(&mut self, next: RunStage) {
        debug!(
            correlation_id = %self.correlation_id,
            from = %self.stage,
            to = %next,
            "Run stage transition"
        );
        self.stage = next;
    }

    pub(crate) fn abort(&self, error: EngineError) -> RunOutcome {
        RunOutcome::Aborted {
            stage: self.stage,
            error,
        }
    }
}
