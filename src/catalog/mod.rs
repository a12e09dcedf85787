//! The salary component catalog.
//!
//! A [`SalaryCatalog`] is an immutable snapshot of every salary component
//! definition, taken once at the start of a run and shared by reference
//! across all payslips of that run. Changes to the registry after the snapshot
//! is taken never leak into an in-flight run.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::{EngineError, EngineResult};
use crate::models::{SalaryComponent, SalaryComponentId};

/// A versioned, read-only set of salary component definitions.
///
/// # Example
///
/// ```
/// use payroll_engine::catalog::SalaryCatalog;
/// use payroll_engine::models::{ComponentType, RateBasis, SalaryComponent, SalaryComponentId};
///
/// let catalog = SalaryCatalog::new(
///     3,
///     vec![SalaryComponent {
///         id: SalaryComponentId(1),
///         code: "IR".to_string(),
///         name: "Income tax".to_string(),
///         component_type: ComponentType::Tax,
///         taxable: false,
///         employer_paid: false,
///         basis: RateBasis::Flat,
///     }],
/// );
///
/// assert_eq!(catalog.version(), 3);
/// assert_eq!(catalog.get(SalaryComponentId(1)).unwrap().code, "IR");
/// assert!(catalog.get(SalaryComponentId(2)).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct SalaryCatalog {
    version: u64,
    components: Arc<BTreeMap<SalaryComponentId, SalaryComponent>>,
}

impl SalaryCatalog {
    /// Builds a catalog snapshot from component definitions.
    ///
    /// If two definitions share an id the later one wins.
    pub fn new(version: u64, components: impl IntoIterator<Item = SalaryComponent>) -> Self {
        let components = components
            .into_iter()
            .map(|component| (component.id, component))
            .collect();
        Self {
            version,
            components: Arc::new(components),
        }
    }

    /// The store revision this snapshot was taken at.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Looks up a component definition.
    ///
    /// # Returns
    ///
    /// The definition, or `SalaryComponentNotFound` if the id is unknown.
    pub fn get(&self, id: SalaryComponentId) -> EngineResult<&SalaryComponent> {
        self.components
            .get(&id)
            .ok_or(EngineError::SalaryComponentNotFound { component_id: id })
    }

    /// Number of definitions in the snapshot.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Returns true if the snapshot holds no definitions.
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Iterates over definitions in id order.
    pub fn iter(&self) -> impl Iterator<Item = &SalaryComponent> {
        self.components.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ComponentType, RateBasis};

    fn component(id: u64, code: &str, component_type: ComponentType) -> SalaryComponent {
        SalaryComponent {
            id: SalaryComponentId(id),
            code: code.to_string(),
            name: code.to_string(),
            component_type,
            taxable: component_type == ComponentType::Earning,
            employer_paid: false,
            basis: RateBasis::Flat,
        }
    }

    #[test]
    fn test_get_unknown_component_returns_not_found() {
        let catalog = SalaryCatalog::new(1, vec![component(1, "BASE", ComponentType::Earning)]);

        match catalog.get(SalaryComponentId(99)) {
            Err(EngineError::SalaryComponentNotFound { component_id }) => {
                assert_eq!(component_id, SalaryComponentId(99));
            }
            other => panic!("Expected SalaryComponentNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_iter_is_ordered_by_id() {
        let catalog = SalaryCatalog::new(
            1,
            vec![
                component(3, "IR", ComponentType::Tax),
                component(1, "BASE", ComponentType::Earning),
                component(2, "CNSS", ComponentType::Deduction),
            ],
        );
        let codes: Vec<&str> = catalog.iter().map(|c| c.code.as_str()).collect();
        assert_eq!(codes, vec!["BASE", "CNSS", "IR"]);
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn test_clones_share_the_snapshot() {
        let catalog = SalaryCatalog::new(7, vec![component(1, "BASE", ComponentType::Earning)]);
        let copy = catalog.clone();
        assert!(Arc::ptr_eq(&catalog.components, &copy.components));
        assert_eq!(copy.version(), 7);
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = SalaryCatalog::new(0, Vec::new());
        assert!(catalog.is_empty());
    }
}
