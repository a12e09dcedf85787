//! Strongly-typed identifiers.
//!
//! Every stored entity gets its own newtype so a payslip id can never be
//! passed where a contract id is expected.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }
    };
}

entity_id!(
    /// Identifies an employee in the HR registry.
    EmployeeId
);
entity_id!(
    /// Identifies an employment contract.
    ContractId
);
entity_id!(
    /// Identifies a salary component in the catalog.
    SalaryComponentId
);
entity_id!(
    /// Identifies a contract's rate link to a salary component.
    ContractSalaryComponentId
);
entity_id!(
    /// Identifies a payroll run.
    PayrollRunId
);
entity_id!(
    /// Identifies a payslip.
    PayslipId
);
entity_id!(
    /// Identifies a payroll line.
    PayrollLineId
);
entity_id!(
    /// Identifies the user performing an operation.
    ActorId
);
entity_id!(
    /// Identifies an audit history entry.
    HistoryEntryId
);
