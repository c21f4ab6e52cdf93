//! Dependency resolution: topological order, cycle reconstruction, ready
//! frontier.
//!
//! The resolver is a pure function of the task snapshot it is given. Cycles
//! and blocked tasks are expected, displayable states, so they come back as
//! data on [`Resolution`] — this module never returns an error.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use closekit_core::TaskId;

use crate::task::{CloseTaskNode, TaskStatus};

/// Resolver options.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct ResolveOptions {
    /// When true, `in-progress` tasks with satisfied dependencies are
    /// reported as ready again (operator restarting abandoned work).
    pub allow_restart: bool,
}

/// Result of resolving one task snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    /// Post-order task ids: a valid topological order whenever
    /// `has_cycle == false`. When a cycle was found this holds only what
    /// resolved before the short-circuit and must not be treated as complete.
    pub execution_order: Vec<TaskId>,
    /// Tasks whose own status permits starting and whose dependencies are all
    /// completed/skipped.
    pub ready_tasks: Vec<TaskId>,
    pub has_cycle: bool,
    /// Unique ids participating in the first cycle found.
    pub cycle_ids: Vec<TaskId>,
    /// Full cyclic path `[v, ..., v]` (first id repeated at the end);
    /// length >= 3 for any real cycle. Empty when `has_cycle == false`.
    pub cycle_path: Vec<TaskId>,
}

/// Depth-first traversal state.
///
/// `stack_list` mirrors `in_stack` but ordered, so a back edge can be turned
/// into the actual cycle path rather than just cycle membership.
struct Dfs<'a> {
    nodes: &'a HashMap<TaskId, &'a CloseTaskNode>,
    visited: HashSet<TaskId>,
    in_stack: HashSet<TaskId>,
    stack_list: Vec<TaskId>,
    execution_order: Vec<TaskId>,
}

impl Dfs<'_> {
    /// Visit one node; returns the reconstructed cycle path on the first back
    /// edge found, which short-circuits all further exploration.
    fn visit(&mut self, id: TaskId) -> Option<Vec<TaskId>> {
        if self.visited.contains(&id) {
            return None;
        }
        self.in_stack.insert(id);
        self.stack_list.push(id);

        if let Some(node) = self.nodes.get(&id) {
            for dep in &node.depends_on {
                if self.in_stack.contains(dep) {
                    // in_stack mirrors stack_list, so the position exists.
                    let pos = self
                        .stack_list
                        .iter()
                        .position(|x| x == dep)
                        .unwrap_or(0);
                    let mut path: Vec<TaskId> = self.stack_list[pos..].to_vec();
                    path.push(*dep);
                    return Some(path);
                }
                // Dangling dependency ids are skipped here; they only matter
                // for readiness, where they are never satisfied.
                if self.nodes.contains_key(dep) {
                    if let Some(cycle) = self.visit(*dep) {
                        return Some(cycle);
                    }
                }
            }
        }

        self.in_stack.remove(&id);
        self.stack_list.pop();
        self.visited.insert(id);
        self.execution_order.push(id);
        None
    }
}

/// Resolve a task snapshot into execution order, cycle report and ready
/// frontier.
///
/// Input is ordered by (category weight, sequence order) before traversal so
/// that the DFS — and therefore cycle detection and `execution_order` — is
/// deterministic across runs with identical input, independent of map
/// iteration order. The input slice is never mutated.
pub fn resolve(tasks: &[CloseTaskNode], options: ResolveOptions) -> Resolution {
    let mut ordered: Vec<&CloseTaskNode> = tasks.iter().collect();
    ordered.sort_by_key(|t| (t.category.weight(), t.sequence_order));

    let nodes: HashMap<TaskId, &CloseTaskNode> = tasks.iter().map(|t| (t.id, t)).collect();

    let mut dfs = Dfs {
        nodes: &nodes,
        visited: HashSet::new(),
        in_stack: HashSet::new(),
        stack_list: Vec::new(),
        execution_order: Vec::new(),
    };

    let mut cycle_path: Vec<TaskId> = Vec::new();
    for node in &ordered {
        if let Some(path) = dfs.visit(node.id) {
            cycle_path = path;
            break;
        }
    }

    let has_cycle = !cycle_path.is_empty();
    let cycle_ids: Vec<TaskId> = if has_cycle {
        // Drop the duplicated closing id; stack entries are already unique.
        cycle_path[..cycle_path.len() - 1].to_vec()
    } else {
        Vec::new()
    };

    // Readiness is independent of the cycle check: a cyclic graph still
    // yields whatever frontier is determinable from the completed/skipped
    // closure.
    let done: HashSet<TaskId> = tasks
        .iter()
        .filter(|t| t.status.is_done())
        .map(|t| t.id)
        .collect();
    let ready_tasks: Vec<TaskId> = ordered
        .iter()
        .filter(|t| {
            let startable = match t.status {
                TaskStatus::Pending => true,
                TaskStatus::InProgress => options.allow_restart,
                _ => false,
            };
            startable && t.depends_on.iter().all(|d| done.contains(d))
        })
        .map(|t| t.id)
        .collect();

    Resolution {
        execution_order: dfs.execution_order,
        ready_tasks,
        has_cycle,
        cycle_ids,
        cycle_path,
    }
}
