//! Audit trail entries written alongside every mutation.

use chrono::Utc;
use tracing::debug;

use crate::error::EngineResult;
use crate::models::{Actor, HistoryEntry, NewHistoryEntry, PayPeriod, PayrollRunId};
use crate::store::PayrollTransaction;

/// Appends one audit entry through `tx`. A failed append fails the caller's
/// transaction.
pub(crate) async fn record(
    tx: &dyn PayrollTransaction,
    actor: &Actor,
    action: String,
) -> EngineResult<HistoryEntry> {
    actor.validate()?;
    let entry = tx
        .append_history(NewHistoryEntry {
            actor_id: actor.id,
            actor: actor.display_name.clone(),
            action,
            created_at: Utc::now(),
        })
        .await?;
    debug!(history_id = %entry.id, action = %entry.action, "History entry appended");
    Ok(entry)
}

pub(crate) fn run_created(run_id: PayrollRunId, period: &PayPeriod, payslips: usize) -> String {
    format!(
        "Payroll run {} created for {} to {} with {} payslips.",
        run_id, period.start_date, period.end_date, payslips
    )
}

pub(crate) fn run_regenerated(run_id: PayrollRunId, payslips: usize) -> String {
    format!("Payroll run {} regenerated with {} payslips.", run_id, payslips)
}

pub(crate) fn run_updated(run_id: PayrollRunId) -> String {
    format!("Payroll run {} has been updated.", run_id)
}

pub(crate) fn run_finalized(run_id: PayrollRunId) -> String {
    format!("Payroll run {} has been finalized.", run_id)
}

pub(crate) fn run_deleted(run_id: PayrollRunId) -> String {
    format!("Deleted a payroll run with the ID {}", run_id)
}
