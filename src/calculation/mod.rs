//! Calculation logic for the Payroll Run Computation Engine.
//!
//! This module contains the per-run building blocks: eligibility resolution,
//! eligible-day counting from attendance and absences, payroll line
//! generation from contract rates, and payslip and run amount aggregation.

mod amounts;
mod eligibility;
mod eligible_days;
mod line_generator;

pub use amounts::{day_scaled_amount, payslip_amounts, run_totals};
pub use eligibility::{EligibleContract, resolve_population};
pub use eligible_days::{DEFAULT_COMPENSATED_ABSENCES, EligibleDays, count_eligible_days};
pub use line_generator::generate_lines;
