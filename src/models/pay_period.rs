//! Pay period model.
//!
//! This module contains the [`PayPeriod`] type that bounds every payroll run.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Represents a pay period with its inclusive date range.
///
/// # Example
///
/// ```
/// use payroll_engine::models::PayPeriod;
/// use chrono::NaiveDate;
///
/// let period = PayPeriod::new(
///     NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
/// )
/// .unwrap();
///
/// assert!(period.contains_date(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()));
/// assert_eq!(period.len_days(), 31);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PayPeriod {
    /// The start date of the pay period (inclusive).
    pub start_date: NaiveDate,
    /// The end date of the pay period (inclusive).
    pub end_date: NaiveDate,
}

impl PayPeriod {
    /// Creates a pay period, rejecting an end date before the start date.
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> EngineResult<Self> {
        let period = Self {
            start_date,
            end_date,
        };
        period.validate()?;
        Ok(period)
    }

    /// Checks that the period is not inverted.
    ///
    /// Periods that arrive through deserialization bypass [`PayPeriod::new`],
    /// so the run orchestrator calls this before doing any work.
    pub fn validate(&self) -> EngineResult<()> {
        if self.end_date < self.start_date {
            return Err(EngineError::InvalidPeriod {
                start: self.start_date,
                end: self.end_date,
            });
        }
        Ok(())
    }

    /// Returns true if `date` falls inside the period, both ends included.
    ///
    /// # Example
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use payroll_engine::models::PayPeriod;
    ///
    /// let day = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
    /// let first_half = PayPeriod::new(day(1), day(15)).unwrap();
    ///
    /// assert!(first_half.contains_date(day(1)));
    /// assert!(first_half.contains_date(day(15)));
    /// assert!(!first_half.contains_date(day(16)));
    /// ```
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// Returns true if the two periods share at least one day.
    pub fn overlaps(&self, other: &PayPeriod) -> bool {
        self.start_date <= other.end_date && other.start_date <= self.end_date
    }

    /// Returns true if the open-ended range `[start, end]` shares a day with
    /// this period. `None` as `end` means the range never ends.
    pub fn overlaps_range(&self, start: NaiveDate, end: Option<NaiveDate>) -> bool {
        start <= self.end_date && end.is_none_or(|end| end >= self.start_date)
    }

    /// Number of calendar days in the period, both ends included.
    pub fn len_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }
}
