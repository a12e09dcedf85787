//! Error types for the Payroll Run Computation Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while generating, querying or
//! mutating payroll runs.

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::{ContractId, EmployeeId, PayrollRunId, PayslipId, SalaryComponentId};
use crate::run::RunStage;

/// Coarse classification of an [`EngineError`].
///
/// Callers that map engine failures onto an outer protocol (HTTP status codes,
/// exit codes) match on this instead of on every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A referenced entity does not exist.
    NotFound,
    /// The input or the stored data is structurally invalid for a run.
    BadRequest,
    /// A uniqueness or lifecycle rule would be violated.
    Conflict,
    /// The backing store failed.
    Storage,
    /// The engine configuration could not be loaded.
    Config,
}

/// The main error type for the Payroll Run Computation Engine.
///
/// # Example
///
/// ```
/// use payroll_engine::error::EngineError;
/// use payroll_engine::models::EmployeeId;
///
/// let error = EngineError::NoContract {
///     employee_id: EmployeeId(7),
/// };
/// assert_eq!(error.to_string(), "No contract for employee 7");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A configuration value was out of range.
    #[error("Invalid configuration value '{field}': {message}")]
    ConfigInvalid {
        /// The offending field.
        field: String,
        /// Why the value was rejected.
        message: String,
    },

    /// An employee referenced by the run does not exist.
    #[error("Employee not found: {employee_id}")]
    EmployeeNotFound {
        /// The missing employee.
        employee_id: EmployeeId,
    },

    /// An employment contract does not exist.
    #[error("Employment contract not found: {contract_id}")]
    ContractNotFound {
        /// The missing contract.
        contract_id: ContractId,
    },

    /// A salary component is not present in the catalog.
    #[error("Salary component not found: {component_id}")]
    SalaryComponentNotFound {
        /// The missing component.
        component_id: SalaryComponentId,
    },

    /// A contract has no rate link for a component it was asked to pay.
    #[error("Contract salary component not found for contract {contract_id} and component {component_id}")]
    ContractSalaryComponentNotFound {
        /// The contract being paid.
        contract_id: ContractId,
        /// The component without a rate.
        component_id: SalaryComponentId,
    },

    /// A payroll run does not exist.
    #[error("Payroll run not found: {run_id}")]
    PayrollRunNotFound {
        /// The missing run.
        run_id: PayrollRunId,
    },

    /// An active employee has no usable contract for the period.
    #[error("No contract for employee {employee_id}")]
    NoContract {
        /// The employee without a contract.
        employee_id: EmployeeId,
    },

    /// An active employee has more than one usable contract for the period.
    #[error("Employee {employee_id} has {} usable contracts: {contract_ids:?}", contract_ids.len())]
    AmbiguousContract {
        /// The employee.
        employee_id: EmployeeId,
        /// Every contract that qualified.
        contract_ids: Vec<ContractId>,
    },

    /// A contract carries no active salary component rates.
    #[error("Contract {contract_id} has no salary components")]
    NoSalaryComponents {
        /// The contract without rates.
        contract_id: ContractId,
    },

    /// The period end precedes its start.
    #[error("Invalid pay period: {start} is after {end}")]
    InvalidPeriod {
        /// Period start.
        start: NaiveDate,
        /// Period end.
        end: NaiveDate,
    },

    /// A monetary value could not be accepted.
    #[error("Invalid amount '{value}': {message}")]
    InvalidAmount {
        /// The raw value.
        value: String,
        /// Why it was rejected.
        message: String,
    },

    /// A mutating operation was attempted without an actor display name.
    #[error("Actor display name is required for history logging")]
    MissingActor,

    /// A payslip already exists for this employee in this run.
    #[error("Payslip already exists for employee {employee_id} in payroll run {run_id}")]
    DuplicatePayslip {
        /// The employee.
        employee_id: EmployeeId,
        /// The run.
        run_id: PayrollRunId,
    },

    /// A payroll line already exists for this component on this payslip.
    #[error("Payroll line already exists for component {component_id} on payslip {payslip_id}")]
    DuplicatePayrollLine {
        /// The payslip.
        payslip_id: PayslipId,
        /// The component.
        component_id: SalaryComponentId,
    },

    /// A contract has two active rates for the same component.
    #[error("Contract {contract_id} has more than one active rate for component {component_id}")]
    DuplicateRateLink {
        /// The contract.
        contract_id: ContractId,
        /// The component linked twice.
        component_id: SalaryComponentId,
    },

    /// Another run already covers part of the requested period.
    #[error("Payroll run {run_id} already covers {start}..{end}")]
    OverlappingRun {
        /// The existing run.
        run_id: PayrollRunId,
        /// Its period start.
        start: NaiveDate,
        /// Its period end.
        end: NaiveDate,
    },

    /// The run has been finalized and can no longer change.
    #[error("Payroll run {run_id} is finalized")]
    RunFinalized {
        /// The finalized run.
        run_id: PayrollRunId,
    },

    /// The backing store failed.
    #[error("Storage error: {message}")]
    Storage {
        /// A description of the failure.
        message: String,
    },

    /// Run generation failed and every write was rolled back.
    #[error("Payroll run aborted during {stage}: {source}")]
    RunAborted {
        /// The last stage the run reached before the failure.
        stage: RunStage,
        /// The underlying failure.
        #[source]
        source: Box<EngineError>,
    },
}

impl EngineError {
    /// Returns the coarse classification of this error.
    ///
    /// An aborted run reports the kind of the failure that aborted it.
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::ConfigNotFound { .. }
            | EngineError::ConfigParseError { .. }
            | EngineError::ConfigInvalid { .. } => ErrorKind::Config,
            EngineError::EmployeeNotFound { .. }
            | EngineError::ContractNotFound { .. }
            | EngineError::SalaryComponentNotFound { .. }
            | EngineError::ContractSalaryComponentNotFound { .. }
            | EngineError::PayrollRunNotFound { .. } => ErrorKind::NotFound,
            EngineError::NoContract { .. }
            | EngineError::AmbiguousContract { .. }
            | EngineError::NoSalaryComponents { .. }
            | EngineError::InvalidPeriod { .. }
            | EngineError::InvalidAmount { .. }
            | EngineError::MissingActor => ErrorKind::BadRequest,
            EngineError::DuplicatePayslip { .. }
            | EngineError::DuplicatePayrollLine { .. }
            | EngineError::DuplicateRateLink { .. }
            | EngineError::OverlappingRun { .. }
            | EngineError::RunFinalized { .. } => ErrorKind::Conflict,
            EngineError::Storage { .. } => ErrorKind::Storage,
            EngineError::RunAborted { source, .. } => source.kind(),
        }
    }

    /// Unwraps any [`EngineError::RunAborted`] layers and returns the failure
    /// that started the abort.
    pub fn root_cause(&self) -> &EngineError {
        match self {
            EngineError::RunAborted { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Builds a storage error from anything printable.
    pub fn storage(message: impl Into<String>) -> Self {
        EngineError::Storage {
            message: message.into(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_contract_displays_employee() {
        let error = EngineError::NoContract {
            employee_id: EmployeeId(3),
        };
        assert_eq!(error.to_string(), "No contract for employee 3");
        assert_eq!(error.kind(), ErrorKind::BadRequest);
    }

    #[test]
    fn test_no_salary_components_displays_contract() {
        let error = EngineError::NoSalaryComponents {
            contract_id: ContractId(12),
        };
        assert_eq!(error.to_string(), "Contract 12 has no salary components");
    }

    #[test]
    fn test_ambiguous_contract_lists_candidates() {
        let error = EngineError::AmbiguousContract {
            employee_id: EmployeeId(4),
            contract_ids: vec![ContractId(10), ContractId(11)],
        };
        assert_eq!(
            error.to_string(),
            "Employee 4 has 2 usable contracts: [ContractId(10), ContractId(11)]"
        );
    }

    #[test]
    fn test_duplicate_payslip_is_conflict() {
        let error = EngineError::DuplicatePayslip {
            employee_id: EmployeeId(1),
            run_id: PayrollRunId(2),
        };
        assert_eq!(error.kind(), ErrorKind::Conflict);
        assert_eq!(
            error.to_string(),
            "Payslip already exists for employee 1 in payroll run 2"
        );
    }

    #[test]
    fn test_run_aborted_reports_stage_and_root_cause() {
        let error = EngineError::RunAborted {
            stage: RunStage::Populating,
            source: Box::new(EngineError::NoContract {
                employee_id: EmployeeId(9),
            }),
        };
        assert_eq!(
            error.to_string(),
            "Payroll run aborted during populating: No contract for employee 9"
        );
        assert_eq!(error.kind(), ErrorKind::BadRequest);
        assert!(matches!(
            error.root_cause(),
            EngineError::NoContract { employee_id } if *employee_id == EmployeeId(9)
        ));
    }

    #[test]
    fn test_config_parse_error_displays_path_and_message() {
        let error = EngineError::ConfigParseError {
            path: "/config/bad.yaml".to_string(),
            message: "invalid YAML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration file '/config/bad.yaml': invalid YAML syntax"
        );
        assert_eq!(error.kind(), ErrorKind::Config);
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error + Send + Sync + 'static>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_source_chain_exposes_inner_error() {
        use std::error::Error;

        let error = EngineError::RunAborted {
            stage: RunStage::LinesGenerated,
            source: Box::new(EngineError::storage("disk full")),
        };
        let source = error.source().expect("aborted run carries a source");
        assert_eq!(source.to_string(), "Storage error: disk full");
    }
}
