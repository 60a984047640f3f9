//! Reconstruction of the task hierarchy for one process.
//!
//! The store keeps tasks flat; each row at most points at a parent. This
//! module turns one process's rows back into a forest of root tasks with
//! their subtasks attached, recursively.

use std::collections::{HashMap, HashSet};

use procflow_core::{Task, TaskId};
use thiserror::Error;

/// Hierarchy reconstruction errors.
#[derive(Debug, Error)]
pub enum HierarchyError {
    /// A parent chain loops back onto itself.
    #[error("cyclic parent reference involving task {task_id}")]
    CycleDetected { task_id: TaskId },
}

/// One node of a reconstructed task tree.
///
/// The forest is an owned value, not a web of references into a shared
/// lookup: a caller may hold or mutate one subtree without any other
/// view of the data observing it.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskNode {
    /// The task record itself.
    pub task: Task,
    /// Direct children, in the order the input supplied them.
    pub subtasks: Vec<TaskNode>,
}

impl TaskNode {
    fn leaf(task: Task) -> Self {
        Self {
            task,
            subtasks: Vec::new(),
        }
    }

    /// Number of tasks in this subtree, this node included.
    pub fn count(&self) -> usize {
        1 + self.subtasks.iter().map(TaskNode::count).sum::<usize>()
    }
}

/// Rebuild the forest of root tasks from one process's flat task list.
///
/// Root order and sibling order follow the input order (stable, never
/// re-sorted). A task whose parent id is absent from the input is an
/// orphan and is promoted to root rather than dropped; partial or
/// filtered inputs must not fail the build. A parent chain that loops
/// is reported as [`HierarchyError::CycleDetected`] instead of being
/// recursed into.
pub fn build_task_forest(tasks: Vec<Task>) -> Result<Vec<TaskNode>, HierarchyError> {
    let known: HashSet<TaskId> = tasks.iter().map(|task| task.id.clone()).collect();

    let mut children: HashMap<TaskId, Vec<Task>> = HashMap::new();
    let mut roots: Vec<Task> = Vec::new();

    for task in tasks {
        match &task.parent_task_id {
            Some(parent) if known.contains(parent) => {
                let parent = parent.clone();
                children.entry(parent).or_default().push(task);
            }
            // No parent, or a parent nobody in the input carries.
            _ => roots.push(task),
        }
    }

    let forest: Vec<TaskNode> = roots
        .into_iter()
        .map(|task| attach_subtasks(task, &mut children))
        .collect();

    // Anything never reached from a root sits on a parent cycle.
    if let Some(task) = children.into_values().flatten().next() {
        return Err(HierarchyError::CycleDetected { task_id: task.id });
    }

    Ok(forest)
}

fn attach_subtasks(task: Task, children: &mut HashMap<TaskId, Vec<Task>>) -> TaskNode {
    let mut node = TaskNode::leaf(task);
    if let Some(kids) = children.remove(&node.task.id) {
        node.subtasks = kids
            .into_iter()
            .map(|kid| attach_subtasks(kid, children))
            .collect();
    }
    node
}

/// Depth-first traversal emitting every task in the forest exactly once.
///
/// Branch tasks count the same as leaves: a task that merely organizes
/// subtasks is still one unit of work.
pub fn flatten(forest: &[TaskNode]) -> Vec<&Task> {
    let mut flat = Vec::new();
    for node in forest {
        push_subtree(node, &mut flat);
    }
    flat
}

fn push_subtree<'a>(node: &'a TaskNode, flat: &mut Vec<&'a Task>) {
    flat.push(&node.task);
    for child in &node.subtasks {
        push_subtree(child, flat);
    }
}
