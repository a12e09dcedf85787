//! Transactional in-memory store.
//!
//! [`InMemoryStore`] keeps every table behind one async mutex. A transaction
//! holds that mutex for its whole lifetime, so transactions are fully
//! serialized, and works on a private copy of the tables that replaces the
//! committed state only on commit.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::models::{
    Absence, AbsenceType, Attendance, ContractId, Employee, EmployeeId, EmploymentContract,
    HistoryEntry, HistoryEntryId, NewHistoryEntry, NewPayrollLine, NewPayrollRun, NewPayslip,
    PayPeriod, PayrollLine, PayrollLineId, PayrollRun, PayrollRunId, PayrollStatus, Payslip,
    PayslipAmounts, PayslipId, RunTotals, SalaryComponent, SalaryComponentId,
};

use super::{PayrollStore, PayrollTransaction};

/// A write the store should refuse, for exercising rollback paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteFault {
    /// Fail the n-th payslip amount update (1-based) of each transaction.
    PayslipUpdate {
        /// Which update fails.
        nth: usize,
    },
    /// Fail the n-th line batch insert (1-based) of each transaction.
    LineInsert {
        /// Which batch fails.
        nth: usize,
    },
    /// Fail every audit append.
    History,
    /// Fail at commit time.
    Commit,
}

#[derive(Debug, Clone, Default)]
struct StoreState {
    catalog_version: u64,
    employees: BTreeMap<EmployeeId, Employee>,
    contracts: BTreeMap<ContractId, EmploymentContract>,
    components: BTreeMap<SalaryComponentId, SalaryComponent>,
    attendance: Vec<Attendance>,
    absences: Vec<Absence>,
    runs: BTreeMap<PayrollRunId, PayrollRun>,
    payslips: BTreeMap<PayslipId, Payslip>,
    payslip_keys: HashSet<(EmployeeId, PayrollRunId)>,
    lines: BTreeMap<PayrollLineId, PayrollLine>,
    line_keys: HashSet<(PayslipId, SalaryComponentId)>,
    history: Vec<HistoryEntry>,
    last_id: u64,
}

impl StoreState {
    fn next_id(&mut self) -> u64 {
        self.last_id += 1;
        self.last_id
    }

    fn run(&self, run_id: PayrollRunId) -> EngineResult<&PayrollRun> {
        self.runs
            .get(&run_id)
            .ok_or(EngineError::PayrollRunNotFound { run_id })
    }

    fn remove_payslips_of(&mut self, run_id: PayrollRunId) -> usize {
        let doomed: Vec<PayslipId> = self
            .payslips
            .values()
            .filter(|p| p.run_id == run_id)
            .map(|p| p.id)
            .collect();

        for payslip_id in &doomed {
            if let Some(payslip) = self.payslips.remove(payslip_id) {
                self.payslip_keys.remove(&(payslip.employee_id, payslip.run_id));
            }
        }

        let doomed_set: HashSet<PayslipId> = doomed.iter().copied().collect();
        let line_keys = &mut self.line_keys;
        self.lines.retain(|_, line| {
            let keep = !doomed_set.contains(&line.payslip_id);
            if !keep {
                line_keys.remove(&(line.payslip_id, line.salary_component_id));
            }
            keep
        });

        doomed.len()
    }
}

/// Transactional in-memory implementation of [`PayrollStore`].
///
/// Cloning the store yields another handle to the same tables.
///
/// # Example
///
/// ```
/// use payroll_engine::store::{InMemoryStore, PayrollStore};
///
/// # tokio_test_block(async {
/// let store = InMemoryStore::new();
/// let tx = store.begin().await.unwrap();
/// assert!(tx.list_runs().await.unwrap().is_empty());
/// tx.rollback().await.unwrap();
/// # });
/// # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Runtime::new().unwrap().block_on(f)
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<StoreState>>,
    fault: Option<WriteFault>,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a handle to the same tables that refuses the given write.
    pub fn with_write_fault(&self, fault: WriteFault) -> Self {
        Self {
            state: Arc::clone(&self.state),
            fault: Some(fault),
        }
    }

    /// Returns an independent store holding a copy of the committed tables.
    pub async fn snapshot(&self) -> Self {
        let state = self.state.lock().await.clone();
        Self {
            state: Arc::new(Mutex::new(state)),
            fault: self.fault,
        }
    }

    /// Adds or replaces an employee.
    pub async fn add_employee(&self, employee: Employee) {
        self.state.lock().await.employees.insert(employee.id, employee);
    }

    /// Adds or replaces a contract with its rate links.
    pub async fn add_contract(&self, contract: EmploymentContract) {
        self.state.lock().await.contracts.insert(contract.id, contract);
    }

    /// Adds or replaces a salary component and bumps the catalog version.
    pub async fn add_salary_component(&self, component: SalaryComponent) {
        let mut state = self.state.lock().await;
        state.components.insert(component.id, component);
        state.catalog_version += 1;
    }

    /// Records a day worked.
    pub async fn record_attendance(&self, attendance: Attendance) {
        self.state.lock().await.attendance.push(attendance);
    }

    /// Records a day missed.
    pub async fn record_absence(&self, absence: Absence) {
        self.state.lock().await.absences.push(absence);
    }

    /// Committed runs.
    pub async fn runs(&self) -> Vec<PayrollRun> {
        self.state.lock().await.runs.values().cloned().collect()
    }

    /// Committed payslips.
    pub async fn payslips(&self) -> Vec<Payslip> {
        self.state.lock().await.payslips.values().cloned().collect()
    }

    /// Committed lines.
    pub async fn lines(&self) -> Vec<PayrollLine> {
        self.state.lock().await.lines.values().cloned().collect()
    }

    /// Committed audit entries, oldest first.
    pub async fn history(&self) -> Vec<HistoryEntry> {
        self.state.lock().await.history.clone()
    }
}

#[async_trait]
impl PayrollStore for InMemoryStore {
    async fn begin(&self) -> EngineResult<Box<dyn PayrollTransaction>> {
        let committed = Arc::clone(&self.state).lock_owned().await;
        let staged = committed.clone();
        debug!("In-memory transaction opened");
        Ok(Box::new(MemoryTransaction {
            committed,
            staged: Mutex::new(staged),
            fault: self.fault,
            payslip_updates: AtomicUsize::new(0),
            line_batches: AtomicUsize::new(0),
        }))
    }
}

struct MemoryTransaction {
    committed: OwnedMutexGuard<StoreState>,
    staged: Mutex<StoreState>,
    fault: Option<WriteFault>,
    payslip_updates: AtomicUsize,
    line_batches: AtomicUsize,
}

impl MemoryTransaction {
    fn injected(&self, what: &str) -> EngineError {
        EngineError::storage(format!("injected fault on {}", what))
    }
}

fn count_u32(count: usize) -> EngineResult<u32> {
    u32::try_from(count).map_err(|_| EngineError::storage(format!("count {} overflows u32", count)))
}

#[async_trait]
impl PayrollTransaction for MemoryTransaction {
    async fn catalog_version(&self) -> EngineResult<u64> {
        Ok(self.staged.lock().await.catalog_version)
    }

    async fn salary_components(&self) -> EngineResult<Vec<SalaryComponent>> {
        Ok(self.staged.lock().await.components.values().cloned().collect())
    }

    async fn active_employees(&self) -> EngineResult<Vec<Employee>> {
        Ok(self
            .staged
            .lock()
            .await
            .employees
            .values()
            .filter(|e| e.is_active())
            .cloned()
            .collect())
    }

    async fn contracts_for_employees(
        &self,
        employee_ids: &[EmployeeId],
    ) -> EngineResult<Vec<EmploymentContract>> {
        let wanted: HashSet<EmployeeId> = employee_ids.iter().copied().collect();
        Ok(self
            .staged
            .lock()
            .await
            .contracts
            .values()
            .filter(|c| wanted.contains(&c.employee_id))
            .cloned()
            .collect())
    }

    async fn count_attendance(
        &self,
        employee_id: EmployeeId,
        period: &PayPeriod,
    ) -> EngineResult<u32> {
        let state = self.staged.lock().await;
        count_u32(
            state
                .attendance
                .iter()
                .filter(|a| a.employee_id == employee_id && period.contains_date(a.date))
                .count(),
        )
    }

    async fn count_absences(
        &self,
        employee_id: EmployeeId,
        period: &PayPeriod,
        types: &[AbsenceType],
    ) -> EngineResult<u32> {
        let state = self.staged.lock().await;
        count_u32(
            state
                .absences
                .iter()
                .filter(|a| {
                    a.employee_id == employee_id
                        && period.contains_date(a.date)
                        && types.contains(&a.absence_type)
                })
                .count(),
        )
    }

    async fn find_run(&self, run_id: PayrollRunId) -> EngineResult<Option<PayrollRun>> {
        Ok(self.staged.lock().await.runs.get(&run_id).cloned())
    }

    async fn list_runs(&self) -> EngineResult<Vec<PayrollRun>> {
        Ok(self.staged.lock().await.runs.values().cloned().collect())
    }

    async fn runs_overlapping(&self, period: &PayPeriod) -> EngineResult<Vec<PayrollRun>> {
        Ok(self
            .staged
            .lock()
            .await
            .runs
            .values()
            .filter(|run| run.period.overlaps(period))
            .cloned()
            .collect())
    }

    async fn insert_run(&self, run: NewPayrollRun) -> EngineResult<PayrollRun> {
        let mut state = self.staged.lock().await;
        let run = PayrollRun {
            id: PayrollRunId(state.next_id()),
            period: run.period,
            status: PayrollStatus::Draft,
            managed_by_id: run.managed_by_id,
            created_at: run.created_at,
            totals: RunTotals::zero(),
        };
        state.runs.insert(run.id, run.clone());
        Ok(run)
    }

    async fn update_run(&self, run: &PayrollRun) -> EngineResult<PayrollRun> {
        let mut state = self.staged.lock().await;
        let stored = state
            .runs
            .get_mut(&run.id)
            .ok_or(EngineError::PayrollRunNotFound { run_id: run.id })?;
        stored.period = run.period;
        stored.status = run.status;
        stored.managed_by_id = run.managed_by_id;
        Ok(stored.clone())
    }

    async fn update_run_totals(
        &self,
        run_id: PayrollRunId,
        totals: RunTotals,
    ) -> EngineResult<PayrollRun> {
        let mut state = self.staged.lock().await;
        let stored = state
            .runs
            .get_mut(&run_id)
            .ok_or(EngineError::PayrollRunNotFound { run_id })?;
        stored.totals = totals;
        Ok(stored.clone())
    }

    async fn delete_run(&self, run_id: PayrollRunId) -> EngineResult<()> {
        let mut state = self.staged.lock().await;
        state.run(run_id)?;
        state.remove_payslips_of(run_id);
        state.runs.remove(&run_id);
        Ok(())
    }

    async fn delete_payslips_for_run(&self, run_id: PayrollRunId) -> EngineResult<usize> {
        let mut state = self.staged.lock().await;
        state.run(run_id)?;
        Ok(state.remove_payslips_of(run_id))
    }

    async fn insert_payslips(&self, payslips: Vec<NewPayslip>) -> EngineResult<Vec<Payslip>> {
        let mut state = self.staged.lock().await;

        let mut batch_keys = HashSet::with_capacity(payslips.len());
        for new in &payslips {
            state.run(new.run_id)?;
            let key = (new.employee_id, new.run_id);
            if state.payslip_keys.contains(&key) || !batch_keys.insert(key) {
                return Err(EngineError::DuplicatePayslip {
                    employee_id: new.employee_id,
                    run_id: new.run_id,
                });
            }
        }

        let mut inserted = Vec::with_capacity(payslips.len());
        for new in payslips {
            let payslip = Payslip {
                id: PayslipId(state.next_id()),
                run_id: new.run_id,
                employee_id: new.employee_id,
                contract_id: new.contract_id,
                amounts: PayslipAmounts::zero(),
            };
            state.payslip_keys.insert((payslip.employee_id, payslip.run_id));
            state.payslips.insert(payslip.id, payslip.clone());
            inserted.push(payslip);
        }
        Ok(inserted)
    }

    async fn update_payslip_amounts(
        &self,
        payslip_id: PayslipId,
        amounts: PayslipAmounts,
    ) -> EngineResult<()> {
        let n = self.payslip_updates.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fault == Some(WriteFault::PayslipUpdate { nth: n }) {
            return Err(self.injected("payslip update"));
        }

        let mut state = self.staged.lock().await;
        let payslip = state
            .payslips
            .get_mut(&payslip_id)
            .ok_or_else(|| EngineError::storage(format!("payslip {} does not exist", payslip_id)))?;
        payslip.amounts = amounts;
        Ok(())
    }

    async fn payslips_for_run(&self, run_id: PayrollRunId) -> EngineResult<Vec<Payslip>> {
        Ok(self
            .staged
            .lock()
            .await
            .payslips
            .values()
            .filter(|p| p.run_id == run_id)
            .cloned()
            .collect())
    }

    async fn insert_lines(&self, lines: Vec<NewPayrollLine>) -> EngineResult<Vec<PayrollLine>> {
        let n = self.line_batches.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fault == Some(WriteFault::LineInsert { nth: n }) {
            return Err(self.injected("line insert"));
        }

        let mut state = self.staged.lock().await;

        let mut batch_keys = HashSet::with_capacity(lines.len());
        for new in &lines {
            if !state.payslips.contains_key(&new.payslip_id) {
                return Err(EngineError::storage(format!(
                    "payslip {} does not exist",
                    new.payslip_id
                )));
            }
            let key = (new.payslip_id, new.salary_component_id);
            if state.line_keys.contains(&key) || !batch_keys.insert(key) {
                return Err(EngineError::DuplicatePayrollLine {
                    payslip_id: new.payslip_id,
                    component_id: new.salary_component_id,
                });
            }
        }

        let mut inserted = Vec::with_capacity(lines.len());
        for new in lines {
            let line = new.with_id(PayrollLineId(state.next_id()));
            state.line_keys.insert((line.payslip_id, line.salary_component_id));
            state.lines.insert(line.id, line.clone());
            inserted.push(line);
        }
        Ok(inserted)
    }

    async fn lines_for_payslip(&self, payslip_id: PayslipId) -> EngineResult<Vec<PayrollLine>> {
        let mut lines: Vec<PayrollLine> = self
            .staged
            .lock()
            .await
            .lines
            .values()
            .filter(|l| l.payslip_id == payslip_id)
            .cloned()
            .collect();
        lines.sort_by_key(|l| l.salary_component_id);
        Ok(lines)
    }

    async fn append_history(&self, entry: NewHistoryEntry) -> EngineResult<HistoryEntry> {
        if self.fault == Some(WriteFault::History) {
            return Err(self.injected("history append"));
        }

        let mut state = self.staged.lock().await;
        let entry = HistoryEntry {
            id: HistoryEntryId(state.next_id()),
            actor_id: entry.actor_id,
            actor: entry.actor,
            action: entry.action,
            created_at: entry.created_at,
        };
        state.history.push(entry.clone());
        Ok(entry)
    }

    async fn commit(self: Box<Self>) -> EngineResult<()> {
        if self.fault == Some(WriteFault::Commit) {
            return Err(self.injected("commit"));
        }

        let MemoryTransaction {
            mut committed,
            staged,
            ..
        } = *self;
        *committed = staged.into_inner();
        debug!("In-memory transaction committed");
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> EngineResult<()> {
        debug!("In-memory transaction rolled back");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ActorId, ComponentType};
    use chrono::{NaiveDate, Utc};
    use rust_decimal::Decimal;

    fn january() -> PayPeriod {
        PayPeriod::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        )
        .unwrap()
    }

    fn new_run() -> NewPayrollRun {
        NewPayrollRun {
            period: january(),
            managed_by_id: ActorId(1),
            created_at: Utc::now(),
        }
    }

    fn new_line(payslip_id: PayslipId, component: u64) -> NewPayrollLine {
        NewPayrollLine {
            payslip_id,
            salary_component_id: SalaryComponentId(component),
            component_type: ComponentType::Earning,
            amount: Decimal::new(10000, 2),
            taxable: true,
            employer_paid: false,
            created_by_id: ActorId(1),
        }
    }

    #[tokio::test]
    async fn test_uncommitted_writes_are_invisible() {
        let store = InMemoryStore::new();

        let tx = store.begin().await.unwrap();
        tx.insert_run(new_run()).await.unwrap();
        tx.rollback().await.unwrap();

        assert!(store.runs().await.is_empty());
    }

    #[tokio::test]
    async fn test_dropped_transaction_discards_writes() {
        let store = InMemoryStore::new();

        {
            let tx = store.begin().await.unwrap();
            tx.insert_run(new_run()).await.unwrap();
        }

        assert!(store.runs().await.is_empty());
    }

    #[tokio::test]
    async fn test_committed_writes_are_visible() {
        let store = InMemoryStore::new();

        let tx = store.begin().await.unwrap();
        let run = tx.insert_run(new_run()).await.unwrap();
        tx.commit().await.unwrap();

        let runs = store.runs().await;
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].id, run.id);
        assert_eq!(runs[0].status, PayrollStatus::Draft);
    }

    #[tokio::test]
    async fn test_insert_payslips_returns_identities_in_order() {
        let store = InMemoryStore::new();
        let tx = store.begin().await.unwrap();
        let run = tx.insert_run(new_run()).await.unwrap();

        let payslips = tx
            .insert_payslips(vec![
                NewPayslip {
                    run_id: run.id,
                    employee_id: EmployeeId(2),
                    contract_id: ContractId(20),
                },
                NewPayslip {
                    run_id: run.id,
                    employee_id: EmployeeId(1),
                    contract_id: ContractId(10),
                },
            ])
            .await
            .unwrap();

        assert_eq!(payslips.len(), 2);
        assert_eq!(payslips[0].employee_id, EmployeeId(2));
        assert_eq!(payslips[1].employee_id, EmployeeId(1));
        assert_ne!(payslips[0].id, payslips[1].id);
        assert_eq!(payslips[0].amounts, PayslipAmounts::zero());
    }

    #[tokio::test]
    async fn test_duplicate_payslip_is_rejected() {
        let store = InMemoryStore::new();
        let tx = store.begin().await.unwrap();
        let run = tx.insert_run(new_run()).await.unwrap();
        let shell = NewPayslip {
            run_id: run.id,
            employee_id: EmployeeId(1),
            contract_id: ContractId(10),
        };

        tx.insert_payslips(vec![shell.clone()]).await.unwrap();

        match tx.insert_payslips(vec![shell]).await {
            Err(EngineError::DuplicatePayslip {
                employee_id,
                run_id,
            }) => {
                assert_eq!(employee_id, EmployeeId(1));
                assert_eq!(run_id, run.id);
            }
            other => panic!("Expected DuplicatePayslip, got {:?}", other),
        }
        assert_eq!(tx.payslips_for_run(run.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_within_one_batch_inserts_nothing() {
        let store = InMemoryStore::new();
        let tx = store.begin().await.unwrap();
        let run = tx.insert_run(new_run()).await.unwrap();
        let shell = NewPayslip {
            run_id: run.id,
            employee_id: EmployeeId(1),
            contract_id: ContractId(10),
        };

        let result = tx.insert_payslips(vec![shell.clone(), shell]).await;

        assert!(matches!(result, Err(EngineError::DuplicatePayslip { .. })));
        assert!(tx.payslips_for_run(run.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_line_is_rejected() {
        let store = InMemoryStore::new();
        let tx = store.begin().await.unwrap();
        let run = tx.insert_run(new_run()).await.unwrap();
        let payslip = tx
            .insert_payslips(vec![NewPayslip {
                run_id: run.id,
                employee_id: EmployeeId(1),
                contract_id: ContractId(10),
            }])
            .await
            .unwrap()
            .remove(0);

        tx.insert_lines(vec![new_line(payslip.id, 1)]).await.unwrap();

        match tx.insert_lines(vec![new_line(payslip.id, 1)]).await {
            Err(EngineError::DuplicatePayrollLine {
                payslip_id,
                component_id,
            }) => {
                assert_eq!(payslip_id, payslip.id);
                assert_eq!(component_id, SalaryComponentId(1));
            }
            other => panic!("Expected DuplicatePayrollLine, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_delete_run_cascades() {
        let store = InMemoryStore::new();
        let tx = store.begin().await.unwrap();
        let run = tx.insert_run(new_run()).await.unwrap();
        let payslip = tx
            .insert_payslips(vec![NewPayslip {
                run_id: run.id,
                employee_id: EmployeeId(1),
                contract_id: ContractId(10),
            }])
            .await
            .unwrap()
            .remove(0);
        tx.insert_lines(vec![new_line(payslip.id, 1), new_line(payslip.id, 2)])
            .await
            .unwrap();
        tx.commit().await.unwrap();

        let tx = store.begin().await.unwrap();
        tx.delete_run(run.id).await.unwrap();
        tx.commit().await.unwrap();

        assert!(store.runs().await.is_empty());
        assert!(store.payslips().await.is_empty());
        assert!(store.lines().await.is_empty());
    }

    #[tokio::test]
    async fn test_deleted_payslip_key_can_be_reused() {
        let store = InMemoryStore::new();
        let tx = store.begin().await.unwrap();
        let run = tx.insert_run(new_run()).await.unwrap();
        let shell = NewPayslip {
            run_id: run.id,
            employee_id: EmployeeId(1),
            contract_id: ContractId(10),
        };
        tx.insert_payslips(vec![shell.clone()]).await.unwrap();

        assert_eq!(tx.delete_payslips_for_run(run.id).await.unwrap(), 1);
        assert!(tx.insert_payslips(vec![shell]).await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_missing_run_is_not_found() {
        let store = InMemoryStore::new();
        let tx = store.begin().await.unwrap();

        match tx.delete_run(PayrollRunId(404)).await {
            Err(EngineError::PayrollRunNotFound { run_id }) => assert_eq!(run_id, PayrollRunId(404)),
            other => panic!("Expected PayrollRunNotFound, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_payslip_update_fault_fires_on_nth_update() {
        let store = InMemoryStore::new().with_write_fault(WriteFault::PayslipUpdate { nth: 2 });
        let tx = store.begin().await.unwrap();
        let run = tx.insert_run(new_run()).await.unwrap();
        let payslips = tx
            .insert_payslips(vec![
                NewPayslip {
                    run_id: run.id,
                    employee_id: EmployeeId(1),
                    contract_id: ContractId(10),
                },
                NewPayslip {
                    run_id: run.id,
                    employee_id: EmployeeId(2),
                    contract_id: ContractId(20),
                },
            ])
            .await
            .unwrap();

        assert!(tx.update_payslip_amounts(payslips[0].id, PayslipAmounts::zero()).await.is_ok());
        let second = tx.update_payslip_amounts(payslips[1].id, PayslipAmounts::zero()).await;
        assert!(matches!(second, Err(EngineError::Storage { .. })));
    }

    #[tokio::test]
    async fn test_commit_fault_keeps_committed_state() {
        let store = InMemoryStore::new();
        let faulty = store.with_write_fault(WriteFault::Commit);

        let tx = faulty.begin().await.unwrap();
        tx.insert_run(new_run()).await.unwrap();
        assert!(tx.commit().await.is_err());

        assert!(store.runs().await.is_empty());
    }

    #[tokio::test]
    async fn test_snapshot_is_independent() {
        let store = InMemoryStore::new();
        let copy = store.snapshot().await;

        let tx = copy.begin().await.unwrap();
        tx.insert_run(new_run()).await.unwrap();
        tx.commit().await.unwrap();

        assert_eq!(copy.runs().await.len(), 1);
        assert!(store.runs().await.is_empty());
    }

    #[tokio::test]
    async fn test_catalog_version_tracks_component_changes() {
        let store = InMemoryStore::new();
        store
            .add_salary_component(SalaryComponent {
                id: SalaryComponentId(1),
                code: "BASE".to_string(),
                name: "Base".to_string(),
                component_type: ComponentType::Earning,
                taxable: true,
                employer_paid: false,
                basis: Default::default(),
            })
            .await;

        let tx = store.begin().await.unwrap();
        assert_eq!(tx.catalog_version().await.unwrap(), 1);
        assert_eq!(tx.salary_components().await.unwrap().len(), 1);
    }
}
