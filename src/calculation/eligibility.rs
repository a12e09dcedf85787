//! Eligibility resolution.
//!
//! This module selects who is paid by a run: every active employee, the one
//! contract usable for the period, and that contract's active rate links.

use std::collections::{BTreeMap, HashSet};

use tracing::debug;

use crate::catalog::SalaryCatalog;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    ContractId, ContractSalaryComponent, Employee, EmployeeId, EmploymentContract, PayPeriod,
    SalaryComponentId, check_money,
};

/// One employee selected for a run with the contract and rates that pay them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EligibleContract {
    /// The active employee.
    pub employee: Employee,
    /// The single contract usable for the period.
    pub contract: EmploymentContract,
    /// The contract's active rate links, ordered by component id.
    pub rates: Vec<ContractSalaryComponent>,
}

impl EligibleContract {
    /// The employee's id.
    pub fn employee_id(&self) -> EmployeeId {
        self.employee.id
    }

    /// The contract's id.
    pub fn contract_id(&self) -> ContractId {
        self.contract.id
    }

    /// The components this contract pays, in id order.
    pub fn component_ids(&self) -> impl Iterator<Item = SalaryComponentId> + '_ {
        self.rates.iter().map(|rate| rate.salary_component_id)
    }

    /// Finds the contract's rate for a component.
    ///
    /// # Returns
    ///
    /// The rate link, or `ContractSalaryComponentNotFound` if this contract
    /// does not pay the component.
    pub fn rate_for(&self, component_id: SalaryComponentId) -> EngineResult<&ContractSalaryComponent> {
        self.rates
            .iter()
            .find(|rate| rate.salary_component_id == component_id)
            .ok_or(EngineError::ContractSalaryComponentNotFound {
                contract_id: self.contract.id,
                component_id,
            })
    }
}

/// Resolves the population paid by a run.
///
/// Employees that are not active are skipped. Every active employee must end
/// up with exactly one contract; the first employee that does not aborts the
/// whole resolution, since a run with missing employees is never valid.
///
/// # Arguments
///
/// * `period` - The run period; contracts must be in force for part of it
/// * `employees` - Registry employees, in any order
/// * `contracts` - Contracts of those employees, with their rate links
/// * `catalog` - The catalog snapshot every rate link must resolve against
///
/// # Returns
///
/// The eligible population ordered by employee id, or:
/// - `NoContract` if an active employee has no usable contract
/// - `AmbiguousContract` if an active employee has several
/// - `NoSalaryComponents` if the contract has no active rate links
/// - `DuplicateRateLink` if a component is linked twice on one contract
/// - `SalaryComponentNotFound` if a rate link names an unknown component
/// - `InvalidAmount` if a rate is negative or finer than a cent
pub fn resolve_population(
    period: &PayPeriod,
    employees: &[Employee],
    contracts: &[EmploymentContract],
    catalog: &SalaryCatalog,
) -> EngineResult<Vec<EligibleContract>> {
    let mut usable: BTreeMap<EmployeeId, Vec<&EmploymentContract>> = BTreeMap::new();
    for contract in contracts.iter().filter(|c| c.is_usable_for(period)) {
        usable.entry(contract.employee_id).or_default().push(contract);
    }

    let mut active: Vec<&Employee> = employees.iter().filter(|e| e.is_active()).collect();
    active.sort_by_key(|e| e.id);

    let mut population = Vec::with_capacity(active.len());
    for employee in active {
        let contract = match usable.get(&employee.id).map(Vec::as_slice) {
            None | Some([]) => {
                return Err(EngineError::NoContract {
                    employee_id: employee.id,
                });
            }
            Some([contract]) => *contract,
            Some(many) => {
                let mut contract_ids: Vec<ContractId> = many.iter().map(|c| c.id).collect();
                contract_ids.sort();
                return Err(EngineError::AmbiguousContract {
                    employee_id: employee.id,
                    contract_ids,
                });
            }
        };

        let rates = resolve_rates(contract, catalog)?;
        debug!(
            employee_id = %employee.id,
            contract_id = %contract.id,
            rates = rates.len(),
            "Resolved eligible contract"
        );

        population.push(EligibleContract {
            employee: employee.clone(),
            contract: contract.clone(),
            rates,
        });
    }

    Ok(population)
}

/// Collects and checks a contract's active rate links.
fn resolve_rates(
    contract: &EmploymentContract,
    catalog: &SalaryCatalog,
) -> EngineResult<Vec<ContractSalaryComponent>> {
    let mut seen = HashSet::new();
    let mut rates = Vec::new();

    for rate in contract.active_rates() {
        if !seen.insert(rate.salary_component_id) {
            return Err(EngineError::DuplicateRateLink {
                contract_id: contract.id,
                component_id: rate.salary_component_id,
            });
        }
        catalog.get(rate.salary_component_id)?;
        check_money(rate.amount)
            .map_err(|error| invalid_rate(contract.id, rate.salary_component_id, error))?;
        rates.push(rate.clone());
    }

    if rates.is_empty() {
        return Err(EngineError::NoSalaryComponents {
            contract_id: contract.id,
        });
    }

    rates.sort_by_key(|rate| rate.salary_component_id);
    Ok(rates)
}

fn invalid_rate(
    contract_id: ContractId,
    component_id: SalaryComponentId,
    error: EngineError,
) -> EngineError {
    match error {
        EngineError::InvalidAmount { value, message } => EngineError::InvalidAmount {
            value,
            message: format!("rate of contract {contract_id} for component {component_id}: {message}"),
        },
        other => other,
    }
}
