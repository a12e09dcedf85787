//! Employee and employment contract models.
//!
//! This module defines the registry records the eligibility resolver reads:
//! [`Employee`] and [`EmploymentContract`] with its rate links.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{ContractId, ContractSalaryComponent, EmployeeId, PayPeriod};

/// Lifecycle status of an employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EmployeeStatus {
    /// Currently employed and paid by payroll runs.
    Active,
    /// Temporarily not paid (leave of absence, suspension).
    Inactive,
    /// Employment has ended.
    Terminated,
}

/// Represents an employee in the HR registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier for the employee.
    pub id: EmployeeId,
    /// Display name, used in logs only.
    pub full_name: String,
    /// Current status; only `Active` employees are paid.
    pub status: EmployeeStatus,
}

impl Employee {
    /// Returns true if payroll runs should include this employee.
    pub fn is_active(&self) -> bool {
        self.status == EmployeeStatus::Active
    }
}

/// How often a contract is paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PayFrequency {
    /// Paid every week.
    Weekly,
    /// Paid every other week.
    Biweekly,
    /// Paid once a month.
    Monthly,
}

/// How a contract's base pay is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PayType {
    /// Fixed salary per period.
    Salaried,
    /// Rate per hour worked.
    Hourly,
    /// Rate per eligible day.
    Daily,
}

/// Lifecycle status of an employment contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContractStatus {
    /// Not yet signed.
    Draft,
    /// In force.
    Active,
    /// Temporarily not paid.
    Suspended,
    /// No longer in force.
    Ended,
}

/// An employment contract and its salary component rates.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{
///     ContractId, ContractStatus, EmployeeId, EmploymentContract, PayFrequency, PayPeriod,
///     PayType,
/// };
/// use chrono::NaiveDate;
///
/// let contract = EmploymentContract {
///     id: ContractId(1),
///     employee_id: EmployeeId(1),
///     pay_frequency: PayFrequency::Monthly,
///     pay_type: PayType::Daily,
///     status: ContractStatus::Active,
///     start_date: NaiveDate::from_ymd_opt(2023, 6, 1).unwrap(),
///     end_date: None,
///     salary_components: vec![],
/// };
/// let january = PayPeriod::new(
///     NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
/// )
/// .unwrap();
/// assert!(contract.is_usable_for(&january));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmploymentContract {
    /// Unique identifier for the contract.
    pub id: ContractId,
    /// The employee this contract belongs to.
    pub employee_id: EmployeeId,
    /// Payment cadence.
    pub pay_frequency: PayFrequency,
    /// Pay expression.
    pub pay_type: PayType,
    /// Contract status; only `Active` contracts are used.
    pub status: ContractStatus,
    /// First day the contract is in force.
    pub start_date: NaiveDate,
    /// Last day the contract is in force, if it has one.
    pub end_date: Option<NaiveDate>,
    /// Rate links to catalog salary components.
    #[serde(default)]
    pub salary_components: Vec<ContractSalaryComponent>,
}

impl EmploymentContract {
    /// A contract is usable for a run when it is active and in force for at
    /// least one day of the period.
    pub fn is_usable_for(&self, period: &PayPeriod) -> bool {
        self.status == ContractStatus::Active
            && period.overlaps_range(self.start_date, self.end_date)
    }

    /// Iterates over the active rate links.
    pub fn active_rates(&self) -> impl Iterator<Item = &ContractSalaryComponent> {
        self.salary_components.iter().filter(|link| link.active)
    }
}
