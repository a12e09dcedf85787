//! Payroll line generation.
//!
//! One line is emitted per salary component a contract pays. Flat components
//! pay their contract rate as is; per-day components pay the rate once per
//! eligible day.

use crate::catalog::SalaryCatalog;
use crate::error::EngineResult;
use crate::models::{ActorId, NewPayrollLine, PayslipId, RateBasis, to_money};

use super::amounts::day_scaled_amount;
use super::eligibility::EligibleContract;
use super::eligible_days::EligibleDays;

/// Generates the lines of one payslip.
///
/// # Arguments
///
/// * `payslip_id` - The payslip the lines belong to
/// * `eligible` - The contract and rates being paid
/// * `catalog` - The run's catalog snapshot
/// * `days` - The eligible-day snapshot taken for this employee and run
/// * `created_by` - The actor recorded on every line
///
/// # Returns
///
/// Lines ordered by component id, or:
/// - `SalaryComponentNotFound` if a component is missing from the catalog
/// - `ContractSalaryComponentNotFound` if the contract has no rate for a component
/// - `InvalidAmount` if a day-scaled amount leaves the `Decimal` range
pub fn generate_lines(
    payslip_id: PayslipId,
    eligible: &EligibleContract,
    catalog: &SalaryCatalog,
    days: EligibleDays,
    created_by: ActorId,
) -> EngineResult<Vec<NewPayrollLine>> {
    let mut lines = Vec::with_capacity(eligible.rates.len());

    for component_id in eligible.component_ids() {
        let component = catalog.get(component_id)?;
        let rate = eligible.rate_for(component_id)?;

        let amount = match component.basis {
            RateBasis::Flat => to_money(rate.amount),
            RateBasis::PerEligibleDay => day_scaled_amount(rate.amount, days.total())?,
        };

        lines.push(NewPayrollLine {
            payslip_id,
            salary_component_id: component.id,
            component_type: component.component_type,
            amount,
            taxable: component.taxable,
            employer_paid: component.employer_paid,
            created_by_id: created_by,
        });
    }

    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::models::{
        ComponentType, ContractId, ContractSalaryComponent, ContractSalaryComponentId,
        ContractStatus, Employee, EmployeeId, EmployeeStatus, EmploymentContract, PayFrequency,
        PayType, SalaryComponent, SalaryComponentId,
    };
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn component(
        id: u64,
        code: &str,
        component_type: ComponentType,
        basis: RateBasis,
        employer_paid: bool,
    ) -> SalaryComponent {
        SalaryComponent {
            id: SalaryComponentId(id),
            code: code.to_string(),
            name: code.to_string(),
            component_type,
            taxable: component_type == ComponentType::Earning,
            employer_paid,
            basis,
        }
    }

    fn catalog() -> SalaryCatalog {
        SalaryCatalog::new(
            1,
            vec![
                component(1, "BASE", ComponentType::Earning, RateBasis::PerEligibleDay, false),
                component(2, "TRANSPORT", ComponentType::Earning, RateBasis::Flat, false),
                component(3, "IR", ComponentType::Tax, RateBasis::Flat, false),
                component(4, "CNSS", ComponentType::Deduction, RateBasis::Flat, true),
            ],
        )
    }

    fn eligible(rates: &[(u64, &str)]) -> EligibleContract {
        EligibleContract {
            employee: Employee {
                id: EmployeeId(1),
                full_name: "Grace Hopper".to_string(),
                status: EmployeeStatus::Active,
            },
            contract: EmploymentContract {
                id: ContractId(10),
                employee_id: EmployeeId(1),
                pay_frequency: PayFrequency::Monthly,
                pay_type: PayType::Daily,
                status: ContractStatus::Active,
                start_date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
                end_date: None,
                salary_components: vec![],
            },
            rates: rates
                .iter()
                .enumerate()
                .map(|(i, (component, amount))| ContractSalaryComponent {
                    id: ContractSalaryComponentId(i as u64 + 1),
                    contract_id: ContractId(10),
                    salary_component_id: SalaryComponentId(*component),
                    amount: dec(amount),
                    active: true,
                })
                .collect(),
        }
    }

    fn twenty_days() -> EligibleDays {
        EligibleDays {
            attendance_days: 20,
            compensated_absence_days: 0,
        }
    }

    #[test]
    fn test_base_rate_is_scaled_by_eligible_days() {
        let lines = generate_lines(
            PayslipId(5),
            &eligible(&[(1, "100.00")]),
            &catalog(),
            twenty_days(),
            ActorId(9),
        )
        .unwrap();

        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].amount, dec("2000.00"));
        assert_eq!(lines[0].amount.to_string(), "2000.00");
        assert_eq!(lines[0].payslip_id, PayslipId(5));
        assert_eq!(lines[0].created_by_id, ActorId(9));
        assert!(lines[0].taxable);
    }

    #[test]
    fn test_flat_components_keep_contract_rate() {
        let lines = generate_lines(
            PayslipId(5),
            &eligible(&[(1, "100.00"), (2, "300"), (3, "150.00"), (4, "45.5")]),
            &catalog(),
            twenty_days(),
            ActorId(9),
        )
        .unwrap();

        let amounts: Vec<String> = lines.iter().map(|l| l.amount.to_string()).collect();
        assert_eq!(amounts, vec!["2000.00", "300.00", "150.00", "45.50"]);
        assert_eq!(lines[2].component_type, ComponentType::Tax);
        assert!(!lines[2].taxable);
        assert!(lines[3].employer_paid);
    }

    #[test]
    fn test_one_line_per_component() {
        let lines = generate_lines(
            PayslipId(5),
            &eligible(&[(1, "100.00"), (3, "150.00")]),
            &catalog(),
            twenty_days(),
            ActorId(9),
        )
        .unwrap();

        let ids: Vec<SalaryComponentId> = lines.iter().map(|l| l.salary_component_id).collect();
        assert_eq!(ids, vec![SalaryComponentId(1), SalaryComponentId(3)]);
    }

    #[test]
    fn test_component_missing_from_catalog_fails() {
        let result = generate_lines(
            PayslipId(5),
            &eligible(&[(99, "1.00")]),
            &catalog(),
            twenty_days(),
            ActorId(9),
        );

        match result {
            Err(EngineError::SalaryComponentNotFound { component_id }) => {
                assert_eq!(component_id, SalaryComponentId(99));
            }
            other => panic!("Expected SalaryComponentNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_days_pays_no_base() {
        let lines = generate_lines(
            PayslipId(5),
            &eligible(&[(1, "100.00")]),
            &catalog(),
            EligibleDays::default(),
            ActorId(9),
        )
        .unwrap();

        assert_eq!(lines[0].amount.to_string(), "0.00");
    }
}
