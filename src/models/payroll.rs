//! Payroll run, payslip, payroll line and audit history models.
//!
//! Each persisted type has a `New*` counterpart that carries everything
//! except the identity the store assigns on insert.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::money::to_money;
use super::{
    ActorId, ComponentType, ContractId, EmployeeId, HistoryEntryId, PayPeriod, PayrollLineId,
    PayrollRunId, PayslipId, SalaryComponentId,
};

/// Lifecycle status of a payroll run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PayrollStatus {
    /// Generated and still open to regeneration, update or deletion.
    Draft,
    /// Frozen; no further changes are accepted.
    Finalized,
}

/// Aggregate amounts of a payroll run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunTotals {
    /// Sum of payslip gross amounts.
    pub total_gross: Decimal,
    /// Sum of payslip tax amounts.
    pub total_tax: Decimal,
    /// Sum of payslip net amounts.
    pub total_net: Decimal,
    /// Sum of employer-paid earning and deduction lines.
    pub total_employer_contrib: Decimal,
}

impl RunTotals {
    /// All totals at zero, money scale.
    pub fn zero() -> Self {
        Self {
            total_gross: to_money(Decimal::ZERO),
            total_tax: to_money(Decimal::ZERO),
            total_net: to_money(Decimal::ZERO),
            total_employer_contrib: to_money(Decimal::ZERO),
        }
    }
}

/// One payroll computation for a period.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{ActorId, PayPeriod, PayrollRun, PayrollRunId, PayrollStatus, RunTotals};
/// use chrono::{NaiveDate, Utc};
///
/// let run = PayrollRun {
///     id: PayrollRunId(1),
///     period: PayPeriod::new(
///         NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
///         NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
///     )
///     .unwrap(),
///     status: PayrollStatus::Draft,
///     managed_by_id: ActorId(1),
///     created_at: Utc::now(),
///     totals: RunTotals::zero(),
/// };
/// let json = serde_json::to_value(&run).unwrap();
/// assert_eq!(json["totals"]["total_gross"], "0.00");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollRun {
    /// Unique identifier.
    pub id: PayrollRunId,
    /// The period paid by this run.
    pub period: PayPeriod,
    /// Draft or finalized.
    pub status: PayrollStatus,
    /// The actor who owns the run.
    pub managed_by_id: ActorId,
    /// When the run shell was created.
    pub created_at: DateTime<Utc>,
    /// Aggregate amounts.
    pub totals: RunTotals,
}

impl PayrollRun {
    /// Returns true once the run no longer accepts changes.
    pub fn is_finalized(&self) -> bool {
        self.status == PayrollStatus::Finalized
    }
}

/// A run shell to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPayrollRun {
    /// The period paid by this run.
    pub period: PayPeriod,
    /// The owning actor.
    pub managed_by_id: ActorId,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// The computed amounts of one payslip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayslipAmounts {
    /// Sum of earning lines.
    pub gross_amount: Decimal,
    /// Sum of tax lines.
    pub tax_amount: Decimal,
    /// Sum of deduction lines.
    pub deductions_amount: Decimal,
    /// `gross - tax - deductions`.
    pub net_amount: Decimal,
    /// Sum of employer-paid earning and deduction lines.
    pub employer_contrib_amount: Decimal,
}

impl PayslipAmounts {
    /// All amounts at zero, money scale. Payslip shells are inserted with these.
    pub fn zero() -> Self {
        Self {
            gross_amount: to_money(Decimal::ZERO),
            tax_amount: to_money(Decimal::ZERO),
            deductions_amount: to_money(Decimal::ZERO),
            net_amount: to_money(Decimal::ZERO),
            employer_contrib_amount: to_money(Decimal::ZERO),
        }
    }
}

/// One employee's settlement within a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payslip {
    /// Unique identifier.
    pub id: PayslipId,
    /// The run this payslip belongs to.
    pub run_id: PayrollRunId,
    /// The employee being paid.
    pub employee_id: EmployeeId,
    /// The contract the amounts were computed from.
    pub contract_id: ContractId,
    /// Computed amounts.
    #[serde(flatten)]
    pub amounts: PayslipAmounts,
}

/// A payslip shell to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPayslip {
    /// The run.
    pub run_id: PayrollRunId,
    /// The employee.
    pub employee_id: EmployeeId,
    /// The contract used.
    pub contract_id: ContractId,
}

/// One salary component contribution within a payslip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollLine {
    /// Unique identifier.
    pub id: PayrollLineId,
    /// The payslip this line belongs to.
    pub payslip_id: PayslipId,
    /// The catalog component.
    pub salary_component_id: SalaryComponentId,
    /// Earning, deduction or tax side.
    pub component_type: ComponentType,
    /// Line amount at money scale.
    pub amount: Decimal,
    /// Copied from the component definition.
    pub taxable: bool,
    /// Copied from the component definition.
    pub employer_paid: bool,
    /// The actor who generated the line.
    pub created_by_id: ActorId,
}

/// A payroll line to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPayrollLine {
    /// The payslip.
    pub payslip_id: PayslipId,
    /// The catalog component.
    pub salary_component_id: SalaryComponentId,
    /// Earning, deduction or tax side.
    pub component_type: ComponentType,
    /// Line amount at money scale.
    pub amount: Decimal,
    /// Copied from the component definition.
    pub taxable: bool,
    /// Copied from the component definition.
    pub employer_paid: bool,
    /// The actor who generated the line.
    pub created_by_id: ActorId,
}

impl NewPayrollLine {
    /// Attaches the identity assigned by the store.
    pub fn with_id(self, id: PayrollLineId) -> PayrollLine {
        PayrollLine {
            id,
            payslip_id: self.payslip_id,
            salary_component_id: self.salary_component_id,
            component_type: self.component_type,
            amount: self.amount,
            taxable: self.taxable,
            employer_paid: self.employer_paid,
            created_by_id: self.created_by_id,
        }
    }
}

/// A payslip together with its lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayslipDetail {
    /// The payslip.
    pub payslip: Payslip,
    /// Its lines, ordered by component id.
    pub lines: Vec<PayrollLine>,
}

/// A free-text audit record of a mutating operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Unique identifier.
    pub id: HistoryEntryId,
    /// Who performed the operation.
    pub actor_id: ActorId,
    /// Display name of the actor at the time.
    pub actor: String,
    /// What happened.
    pub action: String,
    /// When it happened.
    pub created_at: DateTime<Utc>,
}

/// An audit record to append.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewHistoryEntry {
    /// Who performed the operation.
    pub actor_id: ActorId,
    /// Display name of the actor.
    pub actor: String,
    /// What happened.
    pub action: String,
    /// When it happened.
    pub created_at: DateTime<Utc>,
}
