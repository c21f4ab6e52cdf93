//! Read-model boundary: raw checklist rows and the provider contract.
//!
//! Storage is loosely typed: `depends_on` arrives as a JSON array of task ids
//! but may be anything (null, scalar, object) in older rows. Tolerance lives
//! here — a non-array value parses as empty — so the pure resolver only ever
//! sees a well-typed set.

use std::collections::{BTreeSet, HashMap};
use std::sync::Mutex;

use serde::{Deserialize, Deserializer, Serialize};

use closekit_core::{ClosePeriod, TaskId};
use closekit_graph::{CloseTaskNode, TaskCategory, TaskStatus};

/// One checklist row as supplied by the read-model provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRow {
    pub id: TaskId,
    pub task_code: String,
    pub category: TaskCategory,
    pub sequence_order: i32,
    pub task_status: TaskStatus,
    #[serde(default, deserialize_with = "depends_on_or_empty")]
    pub depends_on: BTreeSet<TaskId>,
}

impl TaskRow {
    pub fn into_node(self) -> CloseTaskNode {
        CloseTaskNode {
            id: self.id,
            task_code: self.task_code,
            category: self.category,
            sequence_order: self.sequence_order,
            status: self.task_status,
            depends_on: self.depends_on,
        }
    }
}

fn depends_on_or_empty<'de, D>(deserializer: D) -> Result<BTreeSet<TaskId>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::Array(items) => {
            let mut ids = BTreeSet::new();
            for item in items {
                let id: TaskId =
                    serde_json::from_value(item).map_err(serde::de::Error::custom)?;
                ids.insert(id);
            }
            Ok(ids)
        }
        _ => Ok(BTreeSet::new()),
    }
}

/// Provider of checklist rows for one (ledger, fiscal year, period number).
pub trait ChecklistReadModel: Send + Sync {
    type Error: core::fmt::Debug + Send + Sync + 'static;

    fn fetch_tasks(&self, period: &ClosePeriod) -> Result<Vec<TaskRow>, Self::Error>;
}

#[derive(Debug)]
pub enum InMemoryReadModelError {
    /// Fetch failed due to internal lock poisoning.
    Poisoned,
}

/// In-memory read model for tests/dev. Whole-snapshot replacement per period.
#[derive(Debug, Default)]
pub struct InMemoryReadModel {
    rows: Mutex<HashMap<ClosePeriod, Vec<TaskRow>>>,
}

impl InMemoryReadModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the snapshot for a period.
    pub fn put(&self, period: ClosePeriod, rows: Vec<TaskRow>) {
        if let Ok(mut map) = self.rows.lock() {
            map.insert(period, rows);
        }
    }
}

impl ChecklistReadModel for InMemoryReadModel {
    type Error = InMemoryReadModelError;

    fn fetch_tasks(&self, period: &ClosePeriod) -> Result<Vec<TaskRow>, Self::Error> {
        let map = self
            .rows
            .lock()
            .map_err(|_| InMemoryReadModelError::Poisoned)?;
        Ok(map.get(period).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depends_on_array_parses_into_a_set() {
        let dep = TaskId::new();
        let json = serde_json::json!({
            "id": TaskId::new(),
            "task_code": "RECONCILE",
            "category": "pre-close",
            "sequence_order": 1,
            "task_status": "pending",
            "depends_on": [dep],
        });
        let row: TaskRow = serde_json::from_value(json).unwrap();
        assert_eq!(row.depends_on.len(), 1);
        assert!(row.depends_on.contains(&dep));
    }

    #[test]
    fn non_array_depends_on_is_treated_as_empty() {
        for bogus in [
            serde_json::Value::Null,
            serde_json::json!("t1,t2"),
            serde_json::json!(42),
            serde_json::json!({"first": "t1"}),
        ] {
            let json = serde_json::json!({
                "id": TaskId::new(),
                "task_code": "ACCRUALS",
                "category": "close",
                "sequence_order": 2,
                "task_status": "in-progress",
                "depends_on": bogus,
            });
            let row: TaskRow = serde_json::from_value(json).unwrap();
            assert!(row.depends_on.is_empty());
        }
    }

    #[test]
    fn missing_depends_on_defaults_to_empty() {
        let json = serde_json::json!({
            "id": TaskId::new(),
            "task_code": "REVIEW",
            "category": "review",
            "sequence_order": 9,
            "task_status": "pending",
        });
        let row: TaskRow = serde_json::from_value(json).unwrap();
        assert!(row.depends_on.is_empty());
    }
}
