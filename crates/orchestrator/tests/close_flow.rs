//! End-to-end close flow over the in-memory read model and intent sink.

use std::collections::BTreeSet;

use closekit_core::{ClosePeriod, CloseRunId, CompanyId, JournalId, LedgerId, TaskId, UserId};
use closekit_graph::{ResolveOptions, TaskCategory, TaskStatus};
use closekit_orchestrator::{
    CloseOrchestrator, CloseRun, CloseRunState, InMemoryIntentSink, InMemoryReadModel,
    IntentPayload, TaskRow,
};

fn row(
    id: TaskId,
    code: &str,
    category: TaskCategory,
    seq: i32,
    status: TaskStatus,
    deps: &[TaskId],
) -> TaskRow {
    TaskRow {
        id,
        task_code: code.to_string(),
        category,
        sequence_order: seq,
        task_status: status,
        depends_on: deps.iter().copied().collect::<BTreeSet<_>>(),
    }
}

#[test]
fn full_close_flow_from_checklist_to_hard_lock() {
    let period = ClosePeriod::new(LedgerId::new(), 2026, 12).unwrap();
    let company_id = CompanyId::new();
    let user = UserId::new();

    let reconcile = TaskId::new();
    let accruals = TaskId::new();
    let review = TaskId::new();

    let read_model = InMemoryReadModel::new();
    read_model.put(
        period,
        vec![
            row(reconcile, "RECONCILE", TaskCategory::PreClose, 1, TaskStatus::Pending, &[]),
            row(accruals, "ACCRUALS", TaskCategory::Close, 1, TaskStatus::Pending, &[reconcile]),
            row(review, "MGMT_REVIEW", TaskCategory::Review, 1, TaskStatus::Pending, &[accruals]),
        ],
    );
    let orch = CloseOrchestrator::new(read_model, InMemoryIntentSink::new());
    let run = CloseRun::open(CloseRunId::new(), company_id, period);

    // Only the root of the chain is ready; the resolved order follows the
    // dependency chain.
    let checklist = orch.fetch_checklist(&period, ResolveOptions::default()).unwrap();
    assert!(!checklist.has_cycle);
    assert_eq!(checklist.execution_order, vec![reconcile, accruals, review]);
    assert_eq!(checklist.ready_tasks, vec![reconcile]);
    assert_eq!(checklist.progress.progress_pct, 0);

    // Finalizing now fails, naming what remains.
    let err = orch.finalize_close_run(&run).unwrap_err();
    assert!(err.to_string().contains("3 task(s) pending"));

    // Work through the chain; the executor applies each completion, modeled
    // here as whole-snapshot replacement.
    orch.complete_task(&run, reconcile, Some("bank-recon.pdf".to_string())).unwrap();

    // Not completed nor blocked: re-completing an in-progress task is legal.
    let replay = orch.complete_task(&run, reconcile, Some("bank-recon.pdf".to_string())).unwrap();

    orch.read_model().put(
        period,
        vec![
            row(reconcile, "RECONCILE", TaskCategory::PreClose, 1, TaskStatus::Completed, &[]),
            row(accruals, "ACCRUALS", TaskCategory::Close, 1, TaskStatus::Completed, &[reconcile]),
            row(review, "MGMT_REVIEW", TaskCategory::Review, 1, TaskStatus::Skipped, &[accruals]),
        ],
    );

    let status = orch.fetch_close_status(&period).unwrap();
    assert!(status.is_complete);
    assert_eq!(status.progress.progress_pct, 100);

    let pack = orch.generate_close_pack(&period, user).unwrap();
    assert_eq!(pack.signed_off_by, Some(user));
    assert_eq!(pack.completed_tasks.len(), 2);

    let finalize = orch.finalize_close_run(&run).unwrap();
    match &finalize.payload {
        IntentPayload::RunFinalize { task_count, period_key, .. } => {
            assert_eq!(*task_count, 3);
            assert_eq!(period_key, "2026-P12");
        }
        other => panic!("unexpected payload: {other:?}"),
    }

    orch.post_adjustment(&run, JournalId::new(), "late-accrual").unwrap();

    let finalized = run.with_state(CloseRunState::Finalized);
    let lock = orch.hard_lock_period(&finalized).unwrap();
    assert_eq!(lock.intent_type(), "close.lock.hard");

    let delivered = orch.sink().delivered();
    assert_eq!(
        delivered.iter().map(|i| i.intent_type()).collect::<Vec<_>>(),
        vec![
            "close.task.complete",
            "close.task.complete",
            "close.run.finalize",
            "close.adjustment.post",
            "close.lock.hard",
        ]
    );

    // At-least-once delivery: the replayed completion carries the same
    // idempotency key as the original, so the executor can de-duplicate.
    assert_eq!(delivered[0].idempotency_key, replay.idempotency_key);
    assert_ne!(delivered[0].idempotency_key, delivered[2].idempotency_key);
}

#[test]
fn cyclic_checklist_is_rendered_not_raised() {
    let period = ClosePeriod::new(LedgerId::new(), 2026, 6).unwrap();
    let a = TaskId::new();
    let b = TaskId::new();

    let read_model = InMemoryReadModel::new();
    read_model.put(
        period,
        vec![
            row(a, "A", TaskCategory::Close, 1, TaskStatus::Pending, &[b]),
            row(b, "B", TaskCategory::Close, 2, TaskStatus::Pending, &[a]),
        ],
    );
    let orch = CloseOrchestrator::new(read_model, InMemoryIntentSink::new());

    let checklist = orch.fetch_checklist(&period, ResolveOptions::default()).unwrap();
    assert!(checklist.has_cycle);
    assert_eq!(checklist.cycle_path.len(), 3);
    assert_eq!(checklist.cycle_path.first(), checklist.cycle_path.last());
    assert_eq!(checklist.cycle_ids.len(), 2);
    assert!(checklist.ready_tasks.is_empty());
}
