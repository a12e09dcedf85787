//! Core data models for the Payroll Run Computation Engine.
//!
//! This module contains all the domain models used throughout the engine.

mod actor;
mod attendance;
mod employee;
mod ids;
mod money;
mod pay_period;
mod payroll;
mod salary_component;

pub use actor::Actor;
pub use attendance::{Absence, AbsenceType, Attendance};
pub use employee::{
    ContractStatus, Employee, EmployeeStatus, EmploymentContract, PayFrequency, PayType,
};
pub use ids::{
    ActorId, ContractId, ContractSalaryComponentId, EmployeeId, HistoryEntryId, PayrollLineId,
    PayrollRunId, PayslipId, SalaryComponentId,
};
pub use money::{MONEY_SCALE, check_money, parse_money, to_money};
pub use pay_period::PayPeriod;
pub use payroll::{
    HistoryEntry, NewHistoryEntry, NewPayrollLine, NewPayrollRun, NewPayslip, PayrollLine,
    PayrollRun, PayrollStatus, Payslip, PayslipAmounts, PayslipDetail, RunTotals,
};
pub use salary_component::{ComponentType, ContractSalaryComponent, RateBasis, SalaryComponent};
