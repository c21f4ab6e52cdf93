//! Close task nodes and the per-period task graph.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use closekit_core::TaskId;

/// Coarse execution phase of a close task.
///
/// The numeric weight orders phases for deterministic traversal; it never
/// overrides declared dependencies, only breaks ties between unrelated tasks.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskCategory {
    PreClose,
    Close,
    PostClose,
    Review,
}

impl TaskCategory {
    pub fn weight(&self) -> u8 {
        match self {
            TaskCategory::PreClose => 0,
            TaskCategory::Close => 1,
            TaskCategory::PostClose => 2,
            TaskCategory::Review => 3,
        }
    }
}

/// Lifecycle status of a close task.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
    Skipped,
    Blocked,
}

impl TaskStatus {
    /// `completed` and `skipped` are the only statuses that satisfy a
    /// downstream dependency.
    pub fn is_done(&self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Skipped)
    }
}

/// One unit of close work within a period's graph.
///
/// `depends_on` edges point dependency → dependent and may reference ids
/// absent from the graph; such edges are treated as never satisfied, not as
/// errors. `BTreeSet` keeps edge iteration deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloseTaskNode {
    pub id: TaskId,
    /// Human-readable code (e.g. "RECONCILE"); stable for display, not
    /// guaranteed unique across periods.
    pub task_code: String,
    pub category: TaskCategory,
    /// Tie-break within a category.
    pub sequence_order: i32,
    pub status: TaskStatus,
    pub depends_on: BTreeSet<TaskId>,
}

/// The set of close tasks for one close period.
///
/// Pure in-memory structure; mutation happens only by whole-snapshot
/// replacement upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskGraph {
    tasks: Vec<CloseTaskNode>,
}

impl TaskGraph {
    pub fn new(tasks: Vec<CloseTaskNode>) -> Self {
        Self { tasks }
    }

    pub fn tasks(&self) -> &[CloseTaskNode] {
        &self.tasks
    }

    pub fn get(&self, id: TaskId) -> Option<&CloseTaskNode> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
