//! Payroll run generation.
//!
//! This module contains the staged pipeline that turns a pay period into a
//! persisted run with payslips, lines and totals, plus the audit entries
//! written by every run mutation.

pub(crate) mod history;
mod orchestrator;
mod stage;

pub use orchestrator::{RunChanges, RunOrchestrator, STATUS_CREATED, STATUS_OK};
pub use stage::{GeneratedRun, RunOutcome, RunStage};
