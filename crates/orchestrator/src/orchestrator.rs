//! Close orchestration service.
//!
//! Every operation here is a pure decision over a freshly fetched snapshot:
//! reads compute derived state, writes validate preconditions and emit a
//! [`DomainIntent`] without touching storage. Concurrency control and
//! persistence belong to the executor consuming the intents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use closekit_core::{ClosePeriod, DomainError, JournalId, TaskId, UserId};
use closekit_evidence::{EvidenceRequirement, ValidationSummary, summarize, validate};
use closekit_graph::{
    CloseTaskNode, ProgressSummary, ResolveOptions, TaskGraph, TaskStatus, compute_progress,
    is_close_complete, resolve,
};

use crate::intent::{DomainIntent, IntentPayload, IntentSink};
use crate::read_model::{ChecklistReadModel, TaskRow};
use crate::run::{CloseRun, CloseRunState};

/// Orchestrator-level failure.
///
/// Graph conditions (cycles, blocked tasks) are never errors — they come back
/// as data on [`Checklist`]. Errors here are collaborator failures plus
/// precondition violations on write operations.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("read model failure: {0}")]
    ReadModel(String),

    #[error("intent delivery failure: {0}")]
    IntentDelivery(String),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Checklist view for one period: the snapshot plus everything derived from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checklist {
    pub tasks: Vec<CloseTaskNode>,
    pub execution_order: Vec<TaskId>,
    pub ready_tasks: Vec<TaskId>,
    pub has_cycle: bool,
    pub cycle_ids: Vec<TaskId>,
    pub cycle_path: Vec<TaskId>,
    pub progress: ProgressSummary,
}

/// Lightweight status read for dashboards.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloseStatus {
    pub progress: ProgressSummary,
    pub is_complete: bool,
}

/// Completed-task artifact listed in a close pack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskArtifact {
    pub task_id: TaskId,
    pub task_code: String,
}

/// Snapshot evidence pack for a period.
///
/// `signed_off_by` is populated only when the close is complete, tying the
/// same predicate that gates finalization to the generated document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClosePack {
    pub period_key: String,
    pub progress: ProgressSummary,
    pub completed_tasks: Vec<TaskArtifact>,
    pub signed_off_by: Option<UserId>,
    pub generated_at: DateTime<Utc>,
}

/// Service-level close state machine over a read model and an intent sink.
#[derive(Debug)]
pub struct CloseOrchestrator<R, S> {
    read_model: R,
    sink: S,
}

impl<R, S> CloseOrchestrator<R, S>
where
    R: ChecklistReadModel,
    S: IntentSink,
{
    pub fn new(read_model: R, sink: S) -> Self {
        Self { read_model, sink }
    }

    pub fn read_model(&self) -> &R {
        &self.read_model
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    fn load_graph(&self, period: &ClosePeriod) -> Result<TaskGraph, OrchestratorError> {
        let rows = self
            .read_model
            .fetch_tasks(period)
            .map_err(|e| OrchestratorError::ReadModel(format!("{e:?}")))?;
        debug!(period = %period.period_key(), rows = rows.len(), "fetched checklist rows");
        Ok(TaskGraph::new(
            rows.into_iter().map(TaskRow::into_node).collect(),
        ))
    }

    fn emit(&self, payload: IntentPayload) -> Result<DomainIntent, OrchestratorError> {
        let intent = DomainIntent::new(payload);
        info!(
            intent_type = intent.intent_type(),
            idempotency_key = %intent.idempotency_key,
            "emitting close intent"
        );
        self.sink
            .deliver(intent.clone())
            .map_err(|e| OrchestratorError::IntentDelivery(format!("{e:?}")))?;
        Ok(intent)
    }

    /// Load the period's tasks and derive execution order, cycle report,
    /// ready frontier and progress. Read-only.
    pub fn fetch_checklist(
        &self,
        period: &ClosePeriod,
        options: ResolveOptions,
    ) -> Result<Checklist, OrchestratorError> {
        let graph = self.load_graph(period)?;
        let resolution = resolve(graph.tasks(), options);
        let progress = compute_progress(graph.tasks());
        Ok(Checklist {
            execution_order: resolution.execution_order,
            ready_tasks: resolution.ready_tasks,
            has_cycle: resolution.has_cycle,
            cycle_ids: resolution.cycle_ids,
            cycle_path: resolution.cycle_path,
            progress,
            tasks: graph.tasks().to_vec(),
        })
    }

    /// Progress counts plus the finalization predicate. Read-only.
    pub fn fetch_close_status(
        &self,
        period: &ClosePeriod,
    ) -> Result<CloseStatus, OrchestratorError> {
        let graph = self.load_graph(period)?;
        Ok(CloseStatus {
            progress: compute_progress(graph.tasks()),
            is_complete: is_close_complete(graph.tasks()),
        })
    }

    /// Decide a task completion and emit `close.task.complete`.
    ///
    /// Preconditions: the task exists, is not already completed and is not
    /// blocked. Violations fail fast with no partial mutation.
    pub fn complete_task(
        &self,
        run: &CloseRun,
        task_id: TaskId,
        evidence_ref: Option<String>,
    ) -> Result<DomainIntent, OrchestratorError> {
        let graph = self.load_graph(&run.period)?;
        let task = graph
            .get(task_id)
            .ok_or_else(DomainError::not_found)?;

        match task.status {
            TaskStatus::Completed => {
                return Err(DomainError::invariant(format!(
                    "task {} is already completed",
                    task.task_code
                ))
                .into());
            }
            TaskStatus::Blocked => {
                return Err(DomainError::invariant(format!(
                    "task {} is blocked by unmet dependencies",
                    task.task_code
                ))
                .into());
            }
            _ => {}
        }

        self.emit(IntentPayload::TaskComplete {
            run_id: run.id,
            task_id,
            evidence_ref,
        })
    }

    /// Gate run finalization on full completion and emit `close.run.finalize`.
    ///
    /// Refetches the task set; a failure names how many tasks remain pending
    /// and how many are blocked so operators know what is left.
    pub fn finalize_close_run(&self, run: &CloseRun) -> Result<DomainIntent, OrchestratorError> {
        if run.state != CloseRunState::Open {
            return Err(DomainError::invariant(format!(
                "close run is not open (state: {:?})",
                run.state
            ))
            .into());
        }

        let graph = self.load_graph(&run.period)?;
        if !is_close_complete(graph.tasks()) {
            let progress = compute_progress(graph.tasks());
            return Err(DomainError::invariant(format!(
                "close run cannot be finalized: {} task(s) pending, {} task(s) blocked",
                progress.pending, progress.blocked
            ))
            .into());
        }

        self.emit(IntentPayload::RunFinalize {
            run_id: run.id,
            period_key: run.period.period_key(),
            company_id: run.company_id,
            task_count: graph.len(),
        })
    }

    /// Emit `close.adjustment.post`. Thin emitter, no graph logic.
    pub fn post_adjustment(
        &self,
        run: &CloseRun,
        journal_id: JournalId,
        adjustment_type: impl Into<String>,
    ) -> Result<DomainIntent, OrchestratorError> {
        self.emit(IntentPayload::AdjustmentPost {
            run_id: run.id,
            journal_id,
            adjustment_type: adjustment_type.into(),
        })
    }

    /// Emit `close.lock.hard`, guarded on a prior finalize of the same run.
    pub fn hard_lock_period(&self, run: &CloseRun) -> Result<DomainIntent, OrchestratorError> {
        if run.state != CloseRunState::Finalized {
            return Err(DomainError::invariant(format!(
                "close run must be finalized before hard lock (state: {:?})",
                run.state
            ))
            .into());
        }

        self.emit(IntentPayload::HardLock {
            run_id: run.id,
            period_key: run.period.period_key(),
            company_id: run.company_id,
            ledger_id: run.period.ledger_id,
        })
    }

    /// Evaluate evidence requirements into the aggregate readiness summary.
    /// An empty requirements list is vacuously all-passed.
    pub fn validate_close_readiness(
        &self,
        requirements: &[EvidenceRequirement],
    ) -> ValidationSummary {
        summarize(&validate(requirements))
    }

    /// Assemble the snapshot evidence pack for a period.
    pub fn generate_close_pack(
        &self,
        period: &ClosePeriod,
        acting_user: UserId,
    ) -> Result<ClosePack, OrchestratorError> {
        let graph = self.load_graph(period)?;
        let progress = compute_progress(graph.tasks());
        let completed_tasks: Vec<TaskArtifact> = graph
            .tasks()
            .iter()
            .filter(|t| t.status == TaskStatus::Completed)
            .map(|t| TaskArtifact {
                task_id: t.id,
                task_code: t.task_code.clone(),
            })
            .collect();
        let signed_off_by = is_close_complete(graph.tasks()).then_some(acting_user);

        Ok(ClosePack {
            period_key: period.period_key(),
            progress,
            completed_tasks,
            signed_off_by,
            generated_at: Utc::now(),
        })
    }
}
