//! Salary component catalog entries and contract rate links.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{ContractId, ContractSalaryComponentId, SalaryComponentId};

/// Which side of the payslip a component lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComponentType {
    /// Adds to gross pay.
    Earning,
    /// Withheld from net pay.
    Deduction,
    /// Tax withheld from net pay.
    Tax,
}

/// How a component's contract rate turns into a line amount.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RateBasis {
    /// The rate is the line amount.
    #[default]
    Flat,
    /// The rate is paid once per eligible day (the BASE salary component).
    PerEligibleDay,
}

/// A catalog definition of a pay, deduction or tax category.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{ComponentType, RateBasis, SalaryComponent, SalaryComponentId};
///
/// let base = SalaryComponent {
///     id: SalaryComponentId(1),
///     code: "BASE".to_string(),
///     name: "Base salary".to_string(),
///     component_type: ComponentType::Earning,
///     taxable: true,
///     employer_paid: false,
///     basis: RateBasis::PerEligibleDay,
/// };
/// assert!(base.is_day_rated());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryComponent {
    /// Unique identifier.
    pub id: SalaryComponentId,
    /// Short stable code, e.g. `BASE`, `IR`, `CNSS`.
    pub code: String,
    /// Human-readable name.
    pub name: String,
    /// Earning, deduction or tax.
    pub component_type: ComponentType,
    /// Whether the line counts toward taxable income.
    pub taxable: bool,
    /// Whether the employer, not the employee, bears the cost.
    pub employer_paid: bool,
    /// How the contract rate is applied.
    #[serde(default)]
    pub basis: RateBasis,
}

impl SalaryComponent {
    /// Returns true if the rate scales with eligible days.
    pub fn is_day_rated(&self) -> bool {
        self.basis == RateBasis::PerEligibleDay
    }
}

/// The rate a contract pays for one catalog component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractSalaryComponent {
    /// Unique identifier of the link.
    pub id: ContractSalaryComponentId,
    /// The contract paying the rate.
    pub contract_id: ContractId,
    /// The catalog component being paid.
    pub salary_component_id: SalaryComponentId,
    /// The rate, at money scale.
    pub amount: Decimal,
    /// Inactive links are ignored by payroll runs.
    pub active: bool,
}
