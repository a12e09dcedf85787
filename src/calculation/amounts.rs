//! Payslip and run amount aggregation.
//!
//! All arithmetic here is exact, checked `Decimal` arithmetic. Results are
//! pinned to money scale only at the end of each sum so no intermediate
//! rounding can drift across thousands of payslips. A sum that leaves the
//! `Decimal` range is an [`EngineError::InvalidAmount`], never a panic.

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::{ComponentType, PayrollLine, PayslipAmounts, RunTotals, to_money};

fn overflow(left: Decimal, right: Decimal) -> EngineError {
    EngineError::InvalidAmount {
        value: format!("{left} and {right}"),
        message: "amount exceeds the representable range".to_string(),
    }
}

fn add(left: Decimal, right: Decimal) -> EngineResult<Decimal> {
    left.checked_add(right).ok_or_else(|| overflow(left, right))
}

fn sub(left: Decimal, right: Decimal) -> EngineResult<Decimal> {
    left.checked_sub(right).ok_or_else(|| overflow(left, right))
}

/// Computes the day-scaled contribution of a per-day rate.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::day_scaled_amount;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let amount = day_scaled_amount(Decimal::from_str("100.00").unwrap(), 20).unwrap();
/// assert_eq!(amount.to_string(), "2000.00");
/// ```
pub fn day_scaled_amount(rate: Decimal, eligible_days: u32) -> EngineResult<Decimal> {
    let days = Decimal::from(eligible_days);
    rate.checked_mul(days)
        .map(to_money)
        .ok_or_else(|| overflow(rate, days))
}

/// Aggregates a payslip's lines into its amounts.
///
/// Earnings make up gross, tax lines make up tax, deduction lines make up
/// deductions, and `net = gross - tax - deductions`. The employer
/// contribution is the sum of earning and deduction lines flagged
/// `employer_paid`.
pub fn payslip_amounts(lines: &[PayrollLine]) -> EngineResult<PayslipAmounts> {
    let mut gross = Decimal::ZERO;
    let mut tax = Decimal::ZERO;
    let mut deductions = Decimal::ZERO;
    let mut employer_contrib = Decimal::ZERO;

    for line in lines {
        match line.component_type {
            ComponentType::Earning => gross = add(gross, line.amount)?,
            ComponentType::Tax => tax = add(tax, line.amount)?,
            ComponentType::Deduction => deductions = add(deductions, line.amount)?,
        }
        if line.employer_paid && line.component_type != ComponentType::Tax {
            employer_contrib = add(employer_contrib, line.amount)?;
        }
    }

    let gross_amount = to_money(gross);
    let tax_amount = to_money(tax);
    let deductions_amount = to_money(deductions);
    let net = sub(sub(gross_amount, tax_amount)?, deductions_amount)?;

    Ok(PayslipAmounts {
        net_amount: to_money(net),
        gross_amount,
        tax_amount,
        deductions_amount,
        employer_contrib_amount: to_money(employer_contrib),
    })
}

/// Sums payslip amounts into run totals.
pub fn run_totals<'a, I>(payslips: I) -> EngineResult<RunTotals>
where
    I: IntoIterator<Item = &'a PayslipAmounts>,
{
    let mut totals = RunTotals {
        total_gross: Decimal::ZERO,
        total_tax: Decimal::ZERO,
        total_net: Decimal::ZERO,
        total_employer_contrib: Decimal::ZERO,
    };

    for amounts in payslips {
        totals.total_gross = add(totals.total_gross, amounts.gross_amount)?;
        totals.total_tax = add(totals.total_tax, amounts.tax_amount)?;
        totals.total_net = add(totals.total_net, amounts.net_amount)?;
        totals.total_employer_contrib =
            add(totals.total_employer_contrib, amounts.employer_contrib_amount)?;
    }

    Ok(RunTotals {
        total_gross: to_money(totals.total_gross),
        total_tax: to_money(totals.total_tax),
        total_net: to_money(totals.total_net),
        total_employer_contrib: to_money(totals.total_employer_contrib),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ActorId, PayrollLineId, PayslipId, SalaryComponentId};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn line(component: u64, component_type: ComponentType, amount: &str, employer_paid: bool) -> PayrollLine {
        PayrollLine {
            id: PayrollLineId(component),
            payslip_id: PayslipId(1),
            salary_component_id: SalaryComponentId(component),
            component_type,
            amount: dec(amount),
            taxable: component_type == ComponentType::Earning,
            employer_paid,
            created_by_id: ActorId(1),
        }
    }

    #[test]
    fn test_day_scaled_amount() {
        assert_eq!(day_scaled_amount(dec("100.00"), 20).unwrap(), dec("2000.00"));
        assert_eq!(day_scaled_amount(dec("33.33"), 3).unwrap(), dec("99.99"));
        assert_eq!(day_scaled_amount(dec("100.00"), 0).unwrap().to_string(), "0.00");
    }

    #[test]
    fn test_day_scaled_amount_overflow_is_invalid_amount() {
        let error = day_scaled_amount(Decimal::MAX, 2).unwrap_err();
        assert!(matches!(error, EngineError::InvalidAmount { .. }));
    }

    #[test]
    fn test_payslip_amounts_by_component_type() {
        let lines = vec![
            line(1, ComponentType::Earning, "2000.00", false),
            line(2, ComponentType::Earning, "250.50", false),
            line(3, ComponentType::Tax, "150.00", false),
            line(4, ComponentType::Deduction, "80.25", false),
        ];

        let amounts = payslip_amounts(&lines).unwrap();

        assert_eq!(amounts.gross_amount, dec("2250.50"));
        assert_eq!(amounts.tax_amount, dec("150.00"));
        assert_eq!(amounts.deductions_amount, dec("80.25"));
        assert_eq!(amounts.net_amount, dec("2020.25"));
        assert_eq!(amounts.employer_contrib_amount, dec("0.00"));
    }

    #[test]
    fn test_tax_line_reduces_net() {
        let without_tax = payslip_amounts(&[line(1, ComponentType::Earning, "2000.00", false)]).unwrap();
        let with_tax = payslip_amounts(&[
            line(1, ComponentType::Earning, "2000.00", false),
            line(2, ComponentType::Tax, "150.00", false),
        ]).unwrap();

        assert_eq!(with_tax.tax_amount, dec("150.00"));
        assert_eq!(without_tax.net_amount - with_tax.net_amount, dec("150.00"));
    }

    #[test]
    fn test_employer_contribution_ignores_tax_lines() {
        let lines = vec![
            line(1, ComponentType::Earning, "1000.00", false),
            line(2, ComponentType::Earning, "40.00", true),
            line(3, ComponentType::Deduction, "60.00", true),
            line(4, ComponentType::Tax, "99.00", true),
        ];

        assert_eq!(payslip_amounts(&lines).unwrap().employer_contrib_amount, dec("100.00"));
    }

    #[test]
    fn test_empty_payslip_is_zero() {
        let amounts = payslip_amounts(&[]).unwrap();
        assert_eq!(amounts, PayslipAmounts::zero());
        assert_eq!(amounts.net_amount.to_string(), "0.00");
    }

    #[test]
    fn test_net_can_go_negative() {
        let amounts = payslip_amounts(&[
            line(1, ComponentType::Earning, "100.00", false),
            line(2, ComponentType::Deduction, "150.00", false),
        ]).unwrap();
        assert_eq!(amounts.net_amount, dec("-50.00"));
    }

    #[test]
    fn test_run_totals_sum_payslips() {
        let first = payslip_amounts(&[
            line(1, ComponentType::Earning, "2000.00", false),
            line(2, ComponentType::Tax, "150.00", false),
        ]).unwrap();
        let second = payslip_amounts(&[
            line(1, ComponentType::Earning, "1500.00", false),
            line(3, ComponentType::Deduction, "25.00", true),
        ]).unwrap();

        let totals = run_totals([&first, &second]).unwrap();

        assert_eq!(totals.total_gross, dec("3500.00"));
        assert_eq!(totals.total_tax, dec("150.00"));
        assert_eq!(totals.total_net, dec("3325.00"));
        assert_eq!(totals.total_employer_contrib, dec("25.00"));
    }

    #[test]
    fn test_run_totals_of_no_payslips() {
        let totals = run_totals(std::iter::empty()).unwrap();
        assert_eq!(totals, RunTotals::zero());
        assert_eq!(totals.total_gross.to_string(), "0.00");
    }

    #[test]
    fn test_payslip_sum_overflow_is_invalid_amount() {
        let mut first = line(1, ComponentType::Earning, "0", false);
        first.amount = Decimal::MAX;
        let mut second = line(2, ComponentType::Earning, "0", false);
        second.amount = Decimal::MAX;

        let error = payslip_amounts(&[first, second]).unwrap_err();
        assert!(matches!(error, EngineError::InvalidAmount { .. }));
    }

    #[test]
    fn test_run_totals_overflow_is_invalid_amount() {
        let mut large = PayslipAmounts::zero();
        large.gross_amount = Decimal::MAX;

        let error = run_totals([&large, &large]).unwrap_err();
        assert!(matches!(error, EngineError::InvalidAmount { .. }));
    }
}
