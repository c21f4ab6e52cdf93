//! Completion progress derived from a task snapshot.

use serde::{Deserialize, Serialize};

use crate::task::{CloseTaskNode, TaskStatus};

/// Per-status counts plus rounded completion percentage.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSummary {
    pub total: usize,
    pub completed: usize,
    pub skipped: usize,
    /// Counts both `pending` and `in-progress` (not yet done).
    pub pending: usize,
    pub blocked: usize,
    pub progress_pct: u8,
}

/// Derive progress counts from a snapshot.
///
/// An empty task list reports 100% — nothing to do is done. Callers gating
/// empty periods must replicate that policy, not special-case it away.
pub fn compute_progress(tasks: &[CloseTaskNode]) -> ProgressSummary {
    let total = tasks.len();
    let mut completed = 0usize;
    let mut skipped = 0usize;
    let mut pending = 0usize;
    let mut blocked = 0usize;

    for task in tasks {
        match task.status {
            TaskStatus::Completed => completed += 1,
            TaskStatus::Skipped => skipped += 1,
            TaskStatus::Pending | TaskStatus::InProgress => pending += 1,
            TaskStatus::Blocked => blocked += 1,
        }
    }

    let progress_pct = if total == 0 {
        100
    } else {
        (100.0 * (completed + skipped) as f64 / total as f64).round() as u8
    };

    ProgressSummary {
        total,
        completed,
        skipped,
        pending,
        blocked,
        progress_pct,
    }
}

/// The single gating predicate for run finalization: every task is
/// `completed` or `skipped`.
pub fn is_close_complete(tasks: &[CloseTaskNode]) -> bool {
    tasks.iter().all(|t| t.status.is_done())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use proptest::prelude::*;

    use closekit_core::TaskId;

    use super::*;
    use crate::task::TaskCategory;

    fn task(status: TaskStatus) -> CloseTaskNode {
        CloseTaskNode {
            id: TaskId::new(),
            task_code: "T".to_string(),
            category: TaskCategory::Close,
            sequence_order: 0,
            status,
            depends_on: BTreeSet::new(),
        }
    }

    #[test]
    fn empty_snapshot_is_vacuously_complete() {
        let p = compute_progress(&[]);
        assert_eq!(p.total, 0);
        assert_eq!(p.progress_pct, 100);
        assert!(is_close_complete(&[]));
    }

    #[test]
    fn counts_and_percentage_follow_statuses() {
        let tasks = vec![
            task(TaskStatus::Completed),
            task(TaskStatus::Skipped),
            task(TaskStatus::Pending),
            task(TaskStatus::InProgress),
            task(TaskStatus::Blocked),
            task(TaskStatus::Completed),
        ];
        let p = compute_progress(&tasks);
        assert_eq!(p.total, 6);
        assert_eq!(p.completed, 2);
        assert_eq!(p.skipped, 1);
        assert_eq!(p.pending, 2);
        assert_eq!(p.blocked, 1);
        // round(100 * 3/6)
        assert_eq!(p.progress_pct, 50);
    }

    #[test]
    fn percentage_rounds_to_nearest() {
        let tasks = vec![
            task(TaskStatus::Completed),
            task(TaskStatus::Pending),
            task(TaskStatus::Pending),
        ];
        // 100/3 = 33.33 -> 33
        assert_eq!(compute_progress(&tasks).progress_pct, 33);

        let tasks = vec![
            task(TaskStatus::Completed),
            task(TaskStatus::Completed),
            task(TaskStatus::Pending),
        ];
        // 200/3 = 66.67 -> 67
        assert_eq!(compute_progress(&tasks).progress_pct, 67);
    }

    #[test]
    fn close_is_complete_only_when_every_task_is_done() {
        let done = vec![task(TaskStatus::Completed), task(TaskStatus::Skipped)];
        assert!(is_close_complete(&done));

        for not_done in [TaskStatus::Pending, TaskStatus::InProgress, TaskStatus::Blocked] {
            let mut tasks = done.clone();
            tasks.push(task(not_done));
            assert!(!is_close_complete(&tasks));
        }
    }

    proptest! {
        /// Property: N tasks with K done yields round(100*K/N).
        #[test]
        fn percentage_matches_done_ratio(done in 0usize..50, rest in 0usize..50) {
            prop_assume!(done + rest > 0);
            let mut tasks: Vec<CloseTaskNode> =
                (0..done).map(|_| task(TaskStatus::Completed)).collect();
            tasks.extend((0..rest).map(|_| task(TaskStatus::Pending)));

            let expected = (100.0 * done as f64 / (done + rest) as f64).round() as u8;
            prop_assert_eq!(compute_progress(&tasks).progress_pct, expected);
        }
    }
}
