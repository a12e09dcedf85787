//! Attendance and absence aggregation.
//!
//! Per-day rates are paid for days actually worked plus compensated absence
//! days. This module snapshots that count once per employee and run so every
//! line of a payslip is scaled by the same number.

use serde::{Deserialize, Serialize};

use crate::error::EngineResult;
use crate::models::{AbsenceType, EmployeeId, PayPeriod};
use crate::store::PayrollTransaction;

/// Absence types that count toward per-day pay unless configured otherwise.
pub const DEFAULT_COMPENSATED_ABSENCES: [AbsenceType; 2] = [AbsenceType::Paid, AbsenceType::Sick];

/// The day count an employee is paid per-day rates for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibleDays {
    /// Attendance rows in the period.
    pub attendance_days: u32,
    /// Absence rows in the period whose type is compensated.
    pub compensated_absence_days: u32,
}

impl EligibleDays {
    /// Attendance plus compensated absence days.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_engine::calculation::EligibleDays;
    ///
    /// let days = EligibleDays { attendance_days: 18, compensated_absence_days: 2 };
    /// assert_eq!(days.total(), 20);
    /// ```
    pub fn total(&self) -> u32 {
        self.attendance_days + self.compensated_absence_days
    }
}

/// Counts the eligible days of one employee within a period.
///
/// Rows are counted, not valued. Unpaid and unjustified absences never
/// contribute unless they appear in `compensated`. The result only depends on
/// the data visible to `tx`, so calling this twice within a transaction yields
/// the same count.
///
/// # Arguments
///
/// * `tx` - The transaction to read attendance and absences through
/// * `employee_id` - The employee being paid
/// * `period` - The run period (inclusive)
/// * `compensated` - Absence types that count as paid days
pub async fn count_eligible_days(
    tx: &dyn PayrollTransaction,
    employee_id: EmployeeId,
    period: &PayPeriod,
    compensated: &[AbsenceType],
) -> EngineResult<EligibleDays> {
    let attendance_days = tx.count_attendance(employee_id, period).await?;
    let compensated_absence_days = if compensated.is_empty() {
        0
    } else {
        tx.count_absences(employee_id, period, compensated).await?
    };

    Ok(EligibleDays {
        attendance_days,
        compensated_absence_days,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Absence, Attendance};
    use crate::store::{InMemoryStore, PayrollStore};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn january() -> PayPeriod {
        PayPeriod::new(date(2024, 1, 1), date(2024, 1, 31)).unwrap()
    }

    async fn seeded_store() -> InMemoryStore {
        let store = InMemoryStore::new();
        let employee = EmployeeId(1);
        for day in 2..=19 {
            store
                .record_attendance(Attendance {
                    employee_id: employee,
                    date: date(2024, 1, day),
                })
                .await;
        }
        // Outside the period.
        store
            .record_attendance(Attendance {
                employee_id: employee,
                date: date(2024, 2, 1),
            })
            .await;
        // Another employee.
        store
            .record_attendance(Attendance {
                employee_id: EmployeeId(2),
                date: date(2024, 1, 5),
            })
            .await;
        for (day, absence_type) in [
            (22, AbsenceType::Paid),
            (23, AbsenceType::Sick),
            (24, AbsenceType::Unpaid),
            (25, AbsenceType::Unjustified),
        ] {
            store
                .record_absence(Absence {
                    employee_id: employee,
                    date: date(2024, 1, day),
                    absence_type,
                })
                .await;
        }
        store
    }

    #[tokio::test]
    async fn test_counts_attendance_and_compensated_absences() {
        let store = seeded_store().await;
        let tx = store.begin().await.unwrap();

        let days = count_eligible_days(
            tx.as_ref(),
            EmployeeId(1),
            &january(),
            &DEFAULT_COMPENSATED_ABSENCES,
        )
        .await
        .unwrap();

        assert_eq!(days.attendance_days, 18);
        assert_eq!(days.compensated_absence_days, 2);
        assert_eq!(days.total(), 20);
    }

    #[tokio::test]
    async fn test_counting_twice_yields_same_total() {
        let store = seeded_store().await;
        let tx = store.begin().await.unwrap();

        let first = count_eligible_days(tx.as_ref(), EmployeeId(1), &january(), &DEFAULT_COMPENSATED_ABSENCES)
            .await
            .unwrap();
        let second = count_eligible_days(tx.as_ref(), EmployeeId(1), &january(), &DEFAULT_COMPENSATED_ABSENCES)
            .await
            .unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_no_compensated_types_counts_attendance_only() {
        let store = seeded_store().await;
        let tx = store.begin().await.unwrap();

        let days = count_eligible_days(tx.as_ref(), EmployeeId(1), &january(), &[])
            .await
            .unwrap();

        assert_eq!(days.total(), 18);
    }

    #[tokio::test]
    async fn test_employee_without_records_has_zero_days() {
        let store = seeded_store().await;
        let tx = store.begin().await.unwrap();

        let days = count_eligible_days(tx.as_ref(), EmployeeId(3), &january(), &DEFAULT_COMPENSATED_ABSENCES)
            .await
            .unwrap();

        assert_eq!(days, EligibleDays::default());
    }
}
