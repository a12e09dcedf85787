//! Persistence boundary of the engine.
//!
//! The engine never talks to a database directly. It reads the HR registry
//! and writes runs, payslips, lines and audit entries through a
//! [`PayrollTransaction`] obtained from a [`PayrollStore`]. Nothing written
//! through a transaction is visible to anyone else until
//! [`PayrollTransaction::commit`] succeeds; dropping or rolling back a
//! transaction discards every write.

mod memory;

use async_trait::async_trait;

use crate::error::EngineResult;
use crate::models::{
    AbsenceType, Employee, EmployeeId, EmploymentContract, HistoryEntry, NewHistoryEntry,
    NewPayrollLine, NewPayrollRun, NewPayslip, PayPeriod, PayrollLine, PayrollRun, PayrollRunId,
    Payslip, PayslipAmounts, PayslipId, RunTotals, SalaryComponent,
};

pub use memory::{InMemoryStore, WriteFault};

/// A source of transactions.
#[async_trait]
pub trait PayrollStore: Send + Sync {
    /// Opens a transaction.
    async fn begin(&self) -> EngineResult<Box<dyn PayrollTransaction>>;
}

/// One atomic unit of reads and writes.
///
/// Methods take `&self` so independent payslips can be processed
/// concurrently against the same transaction.
#[async_trait]
pub trait PayrollTransaction: Send + Sync {
    /// Revision of the salary component catalog visible to this transaction.
    async fn catalog_version(&self) -> EngineResult<u64>;

    /// Every salary component definition.
    async fn salary_components(&self) -> EngineResult<Vec<SalaryComponent>>;

    /// Employees whose status is active.
    async fn active_employees(&self) -> EngineResult<Vec<Employee>>;

    /// All contracts of the given employees, with their rate links.
    async fn contracts_for_employees(
        &self,
        employee_ids: &[EmployeeId],
    ) -> EngineResult<Vec<EmploymentContract>>;

    /// Attendance rows of an employee within a period.
    async fn count_attendance(&self, employee_id: EmployeeId, period: &PayPeriod)
    -> EngineResult<u32>;

    /// Absence rows of an employee within a period whose type is in `types`.
    async fn count_absences(
        &self,
        employee_id: EmployeeId,
        period: &PayPeriod,
        types: &[AbsenceType],
    ) -> EngineResult<u32>;

    /// Looks up a run.
    async fn find_run(&self, run_id: PayrollRunId) -> EngineResult<Option<PayrollRun>>;

    /// Every run, ordered by id.
    async fn list_runs(&self) -> EngineResult<Vec<PayrollRun>>;

    /// Runs whose period shares at least one day with `period`.
    async fn runs_overlapping(&self, period: &PayPeriod) -> EngineResult<Vec<PayrollRun>>;

    /// Inserts a draft run shell with zero totals and returns it with its id.
    async fn insert_run(&self, run: NewPayrollRun) -> EngineResult<PayrollRun>;

    /// Replaces a run's period, status and manager.
    async fn update_run(&self, run: &PayrollRun) -> EngineResult<PayrollRun>;

    /// Writes a run's totals.
    async fn update_run_totals(
        &self,
        run_id: PayrollRunId,
        totals: RunTotals,
    ) -> EngineResult<PayrollRun>;

    /// Deletes a run with its payslips and lines.
    async fn delete_run(&self, run_id: PayrollRunId) -> EngineResult<()>;

    /// Deletes a run's payslips and their lines, returning how many payslips went.
    async fn delete_payslips_for_run(&self, run_id: PayrollRunId) -> EngineResult<usize>;

    /// Inserts payslip shells in one batch and returns them with their ids,
    /// in input order. Fails with `DuplicatePayslip` if any (employee, run)
    /// pair already has a payslip; nothing from the batch is kept then.
    async fn insert_payslips(&self, payslips: Vec<NewPayslip>) -> EngineResult<Vec<Payslip>>;

    /// Writes a payslip's computed amounts.
    async fn update_payslip_amounts(
        &self,
        payslip_id: PayslipId,
        amounts: PayslipAmounts,
    ) -> EngineResult<()>;

    /// Payslips of a run, ordered by id.
    async fn payslips_for_run(&self, run_id: PayrollRunId) -> EngineResult<Vec<Payslip>>;

    /// Inserts lines in one batch and returns them with their ids, in input
    /// order. Fails with `DuplicatePayrollLine` if any (payslip, component)
    /// pair already has a line.
    async fn insert_lines(&self, lines: Vec<NewPayrollLine>) -> EngineResult<Vec<PayrollLine>>;

    /// Lines of a payslip, ordered by component id.
    async fn lines_for_payslip(&self, payslip_id: PayslipId) -> EngineResult<Vec<PayrollLine>>;

    /// Appends an audit record.
    async fn append_history(&self, entry: NewHistoryEntry) -> EngineResult<HistoryEntry>;

    /// Makes every write of this transaction visible.
    async fn commit(self: Box<Self>) -> EngineResult<()>;

    /// Discards every write of this transaction.
    async fn rollback(self: Box<Self>) -> EngineResult<()>;
}
