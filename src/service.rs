//! Public entry point of the engine.
//!
//! [`PayrollService`] wraps a [`PayrollStore`] and exposes run generation
//! together with the queries and lifecycle operations around a run. Every
//! mutating call runs in one store transaction and appends its audit entry
//! inside it.

use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use crate::config::{ConfigLoader, EngineConfig};
use crate::error::{EngineError, EngineResult};
use crate::models::{Actor, PayPeriod, PayrollRun, PayrollRunId, PayrollStatus, PayslipDetail};
use crate::run::{GeneratedRun, RunChanges, RunOrchestrator, history};
use crate::store::{PayrollStore, PayrollTransaction};

/// Generates payroll runs and manages their lifecycle.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use chrono::NaiveDate;
/// use payroll_engine::config::EngineConfig;
/// use payroll_engine::models::{Actor, ActorId, PayPeriod};
/// use payroll_engine::service::PayrollService;
/// use payroll_engine::store::InMemoryStore;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let service = PayrollService::new(Arc::new(InMemoryStore::new()), EngineConfig::default());
/// let period = PayPeriod::new(
///     NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
/// )
/// .unwrap();
///
/// let created = service
///     .create_run(period, &Actor::new(ActorId(1), "Payroll Admin"))
///     .await
///     .unwrap();
/// assert_eq!(created.status_code, 201);
/// assert_eq!(created.payslip_count, 0);
/// # });
/// ```
pub struct PayrollService {
    store: Arc<dyn PayrollStore>,
    orchestrator: RunOrchestrator,
}

impl PayrollService {
    /// Creates a service over a store.
    pub fn new(store: Arc<dyn PayrollStore>, config: EngineConfig) -> Self {
        let orchestrator = RunOrchestrator::new(Arc::clone(&store), config);
        Self {
            store,
            orchestrator,
        }
    }

    /// Creates a service with configuration loaded from a YAML file.
    ///
    /// # Returns
    ///
    /// The service, or a configuration error from [`ConfigLoader::load`].
    pub fn from_config_file<P: AsRef<Path>>(
        store: Arc<dyn PayrollStore>,
        path: P,
    ) -> EngineResult<Self> {
        let config = ConfigLoader::load(path)?.into_config();
        Ok(Self::new(store, config))
    }

    /// The configuration in use.
    pub fn config(&self) -> &EngineConfig {
        self.orchestrator.config()
    }

    /// Generates a payroll run for `period`.
    ///
    /// Every active employee with exactly one usable contract gets a payslip
    /// with one line per active salary component of that contract.
    ///
    /// # Returns
    ///
    /// The persisted run with status code 201, or `EngineError::RunAborted`
    /// naming the stage and the failure. Nothing is persisted on error.
    pub async fn create_run(&self, period: PayPeriod, actor: &Actor) -> EngineResult<GeneratedRun> {
        self.orchestrator.create(period, actor).await.into_result()
    }

    /// Fetches one run.
    pub async fn get_run(&self, run_id: PayrollRunId) -> EngineResult<PayrollRun> {
        let tx = self.store.begin().await?;
        let result = find_run(tx.as_ref(), run_id).await;
        release(tx, result).await
    }

    /// Lists every run, oldest first.
    pub async fn list_runs(&self) -> EngineResult<Vec<PayrollRun>> {
        let tx = self.store.begin().await?;
        let result = tx.list_runs().await;
        release(tx, result).await
    }

    /// Fetches the payslips of a run, each with its lines.
    pub async fn run_payslips(&self, run_id: PayrollRunId) -> EngineResult<Vec<PayslipDetail>> {
        let tx = self.store.begin().await?;
        let result = payslip_details(tx.as_ref(), run_id).await;
        release(tx, result).await
    }

    /// Updates a draft run.
    ///
    /// A manager-only change is saved as is. A period change regenerates the
    /// run for the new period in the same transaction. Empty changes return
    /// the stored run without writing or auditing anything.
    pub async fn update_run(
        &self,
        run_id: PayrollRunId,
        changes: RunChanges,
        actor: &Actor,
    ) -> EngineResult<PayrollRun> {
        if changes.period.is_some() {
            return self
                .orchestrator
                .regenerate(run_id, changes, actor)
                .await
                .into_result()
                .map(|generated| generated.run);
        }

        actor.validate()?;
        if changes.is_empty() {
            return self.get_run(run_id).await;
        }

        let tx = self.store.begin().await?;
        let result = update_manager(tx.as_ref(), run_id, &changes, actor).await;
        let run = settle(tx, result).await?;
        info!(run_id = %run.id, actor_id = %actor.id, "Payroll run updated");
        Ok(run)
    }

    /// Recomputes a draft run in place against current data.
    pub async fn regenerate_run(
        &self,
        run_id: PayrollRunId,
        actor: &Actor,
    ) -> EngineResult<GeneratedRun> {
        self.orchestrator
            .regenerate(run_id, RunChanges::default(), actor)
            .await
            .into_result()
    }

    /// Moves a draft run to FINALIZED. A finalized run can no longer be
    /// regenerated, updated or deleted.
    pub async fn finalize_run(&self, run_id: PayrollRunId, actor: &Actor) -> EngineResult<PayrollRun> {
        actor.validate()?;
        let tx = self.store.begin().await?;
        let result = finalize(tx.as_ref(), run_id, actor).await;
        let run = settle(tx, result).await?;
        info!(run_id = %run.id, actor_id = %actor.id, "Payroll run finalized");
        Ok(run)
    }

    /// Deletes a draft run together with its payslips and lines.
    pub async fn delete_run(&self, run_id: PayrollRunId, actor: &Actor) -> EngineResult<()> {
        actor.validate()?;
        let tx = self.store.begin().await?;
        let result = delete(tx.as_ref(), run_id, actor).await;
        settle(tx, result).await?;
        info!(run_id = %run_id, actor_id = %actor.id, "Payroll run deleted");
        Ok(())
    }
}

async fn find_run(tx: &dyn PayrollTransaction, run_id: PayrollRunId) -> EngineResult<PayrollRun> {
    tx.find_run(run_id)
        .await?
        .ok_or(EngineError::PayrollRunNotFound { run_id })
}

async fn find_draft(tx: &dyn PayrollTransaction, run_id: PayrollRunId) -> EngineResult<PayrollRun> {
    let run = find_run(tx, run_id).await?;
    if run.is_finalized() {
        return Err(EngineError::RunFinalized { run_id });
    }
    Ok(run)
}

async fn payslip_details(
    tx: &dyn PayrollTransaction,
    run_id: PayrollRunId,
) -> EngineResult<Vec<PayslipDetail>> {
    find_run(tx, run_id).await?;

    let payslips = tx.payslips_for_run(run_id).await?;
    let mut details = Vec::with_capacity(payslips.len());
    for payslip in payslips {
        let lines = tx.lines_for_payslip(payslip.id).await?;
        details.push(PayslipDetail { payslip, lines });
    }
    Ok(details)
}

async fn update_manager(
    tx: &dyn PayrollTransaction,
    run_id: PayrollRunId,
    changes: &RunChanges,
    actor: &Actor,
) -> EngineResult<PayrollRun> {
    let mut run = find_draft(tx, run_id).await?;
    if let Some(manager) = changes.managed_by_id {
        run.managed_by_id = manager;
    }
    let run = tx.update_run(&run).await?;
    history::record(tx, actor, history::run_updated(run.id)).await?;
    Ok(run)
}

async fn finalize(
    tx: &dyn PayrollTransaction,
    run_id: PayrollRunId,
    actor: &Actor,
) -> EngineResult<PayrollRun> {
    let mut run = find_draft(tx, run_id).await?;
    run.status = PayrollStatus::Finalized;
    let run = tx.update_run(&run).await?;
    history::record(tx, actor, history::run_finalized(run.id)).await?;
    Ok(run)
}

async fn delete(tx: &dyn PayrollTransaction, run_id: PayrollRunId, actor: &Actor) -> EngineResult<()> {
    find_draft(tx, run_id).await?;
    tx.delete_run(run_id).await?;
    history::record(tx, actor, history::run_deleted(run_id)).await?;
    Ok(())
}

/// Commits on success, rolls back on failure.
async fn settle<T>(tx: Box<dyn PayrollTransaction>, result: EngineResult<T>) -> EngineResult<T> {
    match result {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(error) => {
            if let Err(rollback_error) = tx.rollback().await {
                warn!(error = %rollback_error, "Rollback failed");
            }
            Err(error)
        }
    }
}

/// Ends a read-only transaction.
async fn release<T>(tx: Box<dyn PayrollTransaction>, result: EngineResult<T>) -> EngineResult<T> {
    tx.rollback().await?;
    result
}
