//! Daily attendance and absence records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::EmployeeId;

/// Category of an absence day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AbsenceType {
    /// Paid leave.
    Paid,
    /// Sick leave.
    Sick,
    /// Unpaid leave.
    Unpaid,
    /// Absence without justification.
    Unjustified,
}

/// One day on which an employee was present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attendance {
    /// The employee.
    pub employee_id: EmployeeId,
    /// The day worked.
    pub date: NaiveDate,
}

/// One day on which an employee was absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Absence {
    /// The employee.
    pub employee_id: EmployeeId,
    /// The day missed.
    pub date: NaiveDate,
    /// Why the employee was absent.
    pub absence_type: AbsenceType,
}
