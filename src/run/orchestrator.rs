//! Run generation pipeline.
//!
//! A generation opens one store transaction and moves through the stages of
//! [`RunStage`]: it writes the run shell, resolves who is paid, inserts their
//! payslips in one batch, prices every payslip on a bounded pool, writes the
//! payslip amounts back in chunks, and finally stores the run totals and an
//! audit entry before committing. Any failure rolls the whole transaction
//! back.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use futures::future::{BoxFuture, FutureExt};
use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::calculation::{
    EligibleContract, count_eligible_days, generate_lines, payslip_amounts, resolve_population,
    run_totals,
};
use crate::catalog::SalaryCatalog;
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    Actor, ActorId, EmployeeId, NewPayrollRun, NewPayslip, PayPeriod, PayrollLine, PayrollRun,
    PayrollRunId, Payslip, PayslipAmounts, PayslipId,
};
use crate::store::{PayrollStore, PayrollTransaction};

use super::history;
use super::stage::{GeneratedRun, RunOutcome, RunProgress, RunStage};

/// Status code reported for a newly created run.
pub const STATUS_CREATED: u16 = 201;

/// Status code reported for a run regenerated in place.
pub const STATUS_OK: u16 = 200;

/// Changes applied to a draft run before it is regenerated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunChanges {
    /// New period for the run.
    pub period: Option<PayPeriod>,
    /// New manager for the run.
    pub managed_by_id: Option<ActorId>,
}

impl RunChanges {
    /// Returns true when nothing would change.
    pub fn is_empty(&self) -> bool {
        self.period.is_none() && self.managed_by_id.is_none()
    }
}

/// What a populated run produced inside its transaction.
struct Populated {
    run: PayrollRun,
    payslip_count: usize,
    line_count: usize,
    catalog_version: u64,
}

/// Generates and regenerates payroll runs.
pub struct RunOrchestrator {
    store: Arc<dyn PayrollStore>,
    config: EngineConfig,
}

impl RunOrchestrator {
    /// Creates an orchestrator over a store.
    pub fn new(store: Arc<dyn PayrollStore>, config: EngineConfig) -> Self {
        Self { store, config }
    }

    /// The configuration in use.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Creates a run for `period` and pays every eligible employee.
    ///
    /// # Returns
    ///
    /// `RunOutcome::Persisted` with status code 201, or `RunOutcome::Aborted`
    /// carrying the last stage reached and the failure. An aborted run leaves
    /// no rows behind.
    pub async fn create(&self, period: PayPeriod, actor: &Actor) -> RunOutcome {
        let mut progress = RunProgress::new(Uuid::new_v4());
        info!(
            correlation_id = %progress.correlation_id(),
            start = %period.start_date,
            end = %period.end_date,
            actor_id = %actor.id,
            "Generating payroll run"
        );

        if let Err(error) = period.validate().and_then(|()| actor.validate()) {
            return self.aborted(&progress, error);
        }

        let started = Instant::now();
        let tx = match self.store.begin().await {
            Ok(tx) => tx,
            Err(error) => return self.aborted(&progress, error),
        };

        let result = self.create_in(tx.as_ref(), period, actor, &mut progress).await;
        self.settle(tx, result, progress, started, STATUS_CREATED).await
    }

    /// Recomputes a draft run in place, optionally changing its period or
    /// manager first.
    ///
    /// Existing payslips and lines of the run are deleted and the pipeline
    /// runs again against the current registry and catalog.
    pub async fn regenerate(
        &self,
        run_id: PayrollRunId,
        changes: RunChanges,
        actor: &Actor,
    ) -> RunOutcome {
        let mut progress = RunProgress::new(Uuid::new_v4());
        info!(
            correlation_id = %progress.correlation_id(),
            run_id = %run_id,
            actor_id = %actor.id,
            "Regenerating payroll run"
        );

        if let Err(error) = actor.validate() {
            return self.aborted(&progress, error);
        }

        let started = Instant::now();
        let tx = match self.store.begin().await {
            Ok(tx) => tx,
            Err(error) => return self.aborted(&progress, error),
        };

        let result = self
            .regenerate_in(tx.as_ref(), run_id, changes, actor, &mut progress)
            .await;
        self.settle(tx, result, progress, started, STATUS_OK).await
    }

    async fn create_in(
        &self,
        tx: &dyn PayrollTransaction,
        period: PayPeriod,
        actor: &Actor,
        progress: &mut RunProgress,
    ) -> EngineResult<Populated> {
        self.ensure_no_overlap(tx, &period, None).await?;

        let run = tx
            .insert_run(NewPayrollRun {
                period,
                managed_by_id: actor.id,
                created_at: Utc::now(),
            })
            .await?;
        debug!(
            correlation_id = %progress.correlation_id(),
            run_id = %run.id,
            "Run shell written"
        );

        let populated = self.populate(tx, run, actor.id, progress).await?;
        history::record(
            tx,
            actor,
            history::run_created(populated.run.id, &populated.run.period, populated.payslip_count),
        )
        .await?;
        Ok(populated)
    }

    async fn regenerate_in(
        &self,
        tx: &dyn PayrollTransaction,
        run_id: PayrollRunId,
        changes: RunChanges,
        actor: &Actor,
        progress: &mut RunProgress,
    ) -> EngineResult<Populated> {
        let mut run = tx
            .find_run(run_id)
            .await?
            .ok_or(EngineError::PayrollRunNotFound { run_id })?;
        if run.is_finalized() {
            return Err(EngineError::RunFinalized { run_id });
        }

        let changed = !changes.is_empty();
        if let Some(period) = changes.period {
            period.validate()?;
            if period != run.period {
                self.ensure_no_overlap(tx, &period, Some(run.id)).await?;
                run.period = period;
            }
        }
        if let Some(manager) = changes.managed_by_id {
            run.managed_by_id = manager;
        }
        if changed {
            run = tx.update_run(&run).await?;
        }

        let removed = tx.delete_payslips_for_run(run.id).await?;
        debug!(
            correlation_id = %progress.correlation_id(),
            run_id = %run.id,
            removed_payslips = removed,
            "Previous payslips removed"
        );

        let populated = self.populate(tx, run, actor.id, progress).await?;
        let action = if changed {
            history::run_updated(populated.run.id)
        } else {
            history::run_regenerated(populated.run.id, populated.payslip_count)
        };
        history::record(tx, actor, action).await?;
        Ok(populated)
    }

    /// Pays every eligible employee into `run` and stores the run totals.
    async fn populate(
        &self,
        tx: &dyn PayrollTransaction,
        run: PayrollRun,
        created_by: ActorId,
        progress: &mut RunProgress,
    ) -> EngineResult<Populated> {
        progress.enter(RunStage::Populating);
        let concurrency = self.config.batching.max_concurrency.max(1);
        let chunk_size = self.config.batching.update_chunk_size.max(1);

        let catalog = SalaryCatalog::new(
            tx.catalog_version().await?,
            tx.salary_components().await?,
        );
        let employees = tx.active_employees().await?;
        let employee_ids: Vec<EmployeeId> = employees.iter().map(|e| e.id).collect();
        let contracts = tx.contracts_for_employees(&employee_ids).await?;
        let population = resolve_population(&run.period, &employees, &contracts, &catalog)?;

        let shells = population
            .iter()
            .map(|eligible| NewPayslip {
                run_id: run.id,
                employee_id: eligible.employee_id(),
                contract_id: eligible.contract_id(),
            })
            .collect();
        let payslips = tx.insert_payslips(shells).await?;
        if payslips.len() != population.len() {
            return Err(EngineError::storage(format!(
                "inserted {} payslips for {} eligible employees",
                payslips.len(),
                population.len()
            )));
        }
        debug!(
            correlation_id = %progress.correlation_id(),
            run_id = %run.id,
            payslips = payslips.len(),
            catalog_version = catalog.version(),
            "Payslip shells written"
        );

        let pairs = pair_payslips(&payslips, &population)?;
        let period = run.period;
        let catalog = &catalog;
        let pricing: Vec<BoxFuture<'_, EngineResult<(PayslipId, Vec<PayrollLine>)>>> = pairs
            .into_iter()
            .map(|(payslip, eligible)| {
                self.price_payslip(tx, period, payslip, eligible, catalog, created_by)
                    .boxed()
            })
            .collect();
        let priced: Vec<(PayslipId, Vec<PayrollLine>)> = stream::iter(pricing)
            .buffer_unordered(concurrency)
            .try_collect()
            .await?;
        progress.enter(RunStage::LinesGenerated);

        let line_count = priced.iter().map(|(_, lines)| lines.len()).sum();
        let amounts = priced
            .iter()
            .map(|(payslip_id, lines)| Ok((*payslip_id, payslip_amounts(lines)?)))
            .collect::<EngineResult<Vec<(PayslipId, PayslipAmounts)>>>()?;

        for chunk in amounts.chunks(chunk_size) {
            let updates: Vec<BoxFuture<'_, EngineResult<()>>> = chunk
                .iter()
                .map(|(payslip_id, amounts)| tx.update_payslip_amounts(*payslip_id, amounts.clone()))
                .collect();
            stream::iter(updates)
                .buffer_unordered(concurrency)
                .try_collect::<Vec<()>>()
                .await?;
        }
        progress.enter(RunStage::TotalsComputed);

        let totals = run_totals(amounts.iter().map(|(_, payslip)| payslip))?;
        let run = tx.update_run_totals(run.id, totals).await?;

        Ok(Populated {
            run,
            payslip_count: payslips.len(),
            line_count,
            catalog_version: catalog.version(),
        })
    }

    /// Counts eligible days once, generates and inserts the payslip's lines.
    async fn price_payslip(
        &self,
        tx: &dyn PayrollTransaction,
        period: PayPeriod,
        payslip: &Payslip,
        eligible: &EligibleContract,
        catalog: &SalaryCatalog,
        created_by: ActorId,
    ) -> EngineResult<(PayslipId, Vec<PayrollLine>)> {
        let days = count_eligible_days(
            tx,
            payslip.employee_id,
            &period,
            &self.config.runs.compensated_absences,
        )
        .await?;
        let lines = generate_lines(payslip.id, eligible, catalog, days, created_by)?;
        let lines = tx.insert_lines(lines).await?;

        debug!(
            payslip_id = %payslip.id,
            employee_id = %payslip.employee_id,
            eligible_days = days.total(),
            lines = lines.len(),
            "Payslip priced"
        );
        Ok((payslip.id, lines))
    }

    async fn ensure_no_overlap(
        &self,
        tx: &dyn PayrollTransaction,
        period: &PayPeriod,
        except: Option<PayrollRunId>,
    ) -> EngineResult<()> {
        if !self.config.runs.reject_overlapping_runs {
            return Ok(());
        }

        let clash = tx
            .runs_overlapping(period)
            .await?
            .into_iter()
            .find(|run| Some(run.id) != except);
        match clash {
            Some(run) => Err(EngineError::OverlappingRun {
                run_id: run.id,
                start: run.period.start_date,
                end: run.period.end_date,
            }),
            None => Ok(()),
        }
    }

    /// Commits on success, rolls back on failure.
    async fn settle(
        &self,
        tx: Box<dyn PayrollTransaction>,
        result: EngineResult<Populated>,
        mut progress: RunProgress,
        started: Instant,
        status_code: u16,
    ) -> RunOutcome {
        let populated = match result {
            Ok(populated) => populated,
            Err(error) => {
                if let Err(rollback_error) = tx.rollback().await {
                    warn!(
                        correlation_id = %progress.correlation_id(),
                        error = %rollback_error,
                        "Rollback failed"
                    );
                }
                return self.aborted(&progress, error);
            }
        };

        if let Err(error) = tx.commit().await {
            return self.aborted(&progress, error);
        }
        progress.enter(RunStage::Persisted);

        info!(
            correlation_id = %progress.correlation_id(),
            run_id = %populated.run.id,
            payslips = populated.payslip_count,
            lines = populated.line_count,
            total_gross = %populated.run.totals.total_gross,
            total_net = %populated.run.totals.total_net,
            duration_us = started.elapsed().as_micros(),
            "Payroll run persisted"
        );

        RunOutcome::Persisted(GeneratedRun {
            run: populated.run,
            payslip_count: populated.payslip_count,
            line_count: populated.line_count,
            catalog_version: populated.catalog_version,
            correlation_id: progress.correlation_id(),
            status_code,
        })
    }

    fn aborted(&self, progress: &RunProgress, error: EngineError) -> RunOutcome {
        warn!(
            correlation_id = %progress.correlation_id(),
            stage = %progress.stage(),
            error = %error,
            "Payroll run aborted"
        );
        progress.abort(error)
    }
}

/// Matches every stored payslip with the eligible contract it was written
/// for, by employee rather than by position.
///
/// # Returns
///
/// The pairs in payslip order, or:
/// - `EmployeeNotFound` if a payslip names an employee outside the population
/// - `ContractNotFound` if a payslip names a contract other than the one resolved
fn pair_payslips<'a>(
    payslips: &'a [Payslip],
    population: &'a [EligibleContract],
) -> EngineResult<Vec<(&'a Payslip, &'a EligibleContract)>> {
    let by_employee: HashMap<EmployeeId, &EligibleContract> = population
        .iter()
        .map(|eligible| (eligible.employee_id(), eligible))
        .collect();

    payslips
        .iter()
        .map(|payslip| {
            let eligible = by_employee.get(&payslip.employee_id).copied().ok_or(
                EngineError::EmployeeNotFound {
                    employee_id: payslip.employee_id,
                },
            )?;
            if eligible.contract_id() != payslip.contract_id {
                return Err(EngineError::ContractNotFound {
                    contract_id: payslip.contract_id,
                });
            }
            Ok((payslip, eligible))
        })
        .collect()
}
