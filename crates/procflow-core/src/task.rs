//! Task record for process work items.

use crate::{Priority, ProcessId, TaskId, TaskStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A Task is one unit of work within a Process.
///
/// Tasks form a hierarchy through `parent_task_id`; a task with no parent
/// is a root task. The reconstructed hierarchy lives in the engine as a
/// separate value type and is never stored on this record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique task identifier.
    pub id: TaskId,

    /// Process this task belongs to. Immutable after creation.
    pub process_id: ProcessId,

    /// Parent task within the same process, if any.
    #[serde(default)]
    pub parent_task_id: Option<TaskId>,

    /// Short title.
    pub title: String,

    /// Longer free-text description.
    #[serde(default)]
    pub description: Option<String>,

    /// Current status. A record missing its status is treated as not
    /// started, never as an error.
    #[serde(default)]
    pub status: TaskStatus,

    /// Priority classification.
    #[serde(default)]
    pub priority: Priority,

    /// Identifier of the team member this task is assigned to.
    #[serde(default)]
    pub assigned_to: Option<String>,

    /// When the task is due.
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,

    /// When the task was completed.
    #[serde(default)]
    pub completed_date: Option<DateTime<Utc>>,

    /// When the task was created.
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Create a new root Task in the given process.
    pub fn new(process_id: ProcessId, title: impl Into<String>) -> Self {
        Self {
            id: TaskId::generate(),
            process_id,
            parent_task_id: None,
            title: title.into(),
            description: None,
            status: TaskStatus::default(),
            priority: Priority::default(),
            assigned_to: None,
            due_date: None,
            completed_date: None,
            created_at: Utc::now(),
        }
    }

    /// Builder method to set a specific ID (useful for testing).
    pub fn with_id(mut self, id: TaskId) -> Self {
        self.id = id;
        self
    }

    /// Builder method to attach this task under a parent.
    pub fn with_parent(mut self, parent: TaskId) -> Self {
        self.parent_task_id = Some(parent);
        self
    }

    /// Builder method to set the status.
    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    /// Builder method to set the priority.
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Builder method to set the description.
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    /// Builder method to set the due date.
    pub fn with_due_date(mut self, due: DateTime<Utc>) -> Self {
        self.due_date = Some(due);
        self
    }

    /// Returns true if this task counts as done for progress purposes.
    pub fn is_completed(&self) -> bool {
        self.status.is_completed()
    }

    /// Returns true if this task is a root (has no parent).
    pub fn is_root(&self) -> bool {
        self.parent_task_id.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_task_is_root_and_not_completed() {
        let task = Task::new(ProcessId::generate(), "Collect requirements");
        assert!(task.is_root());
        assert!(!task.is_completed());
        assert!(task.due_date.is_none());
    }

    #[test]
    fn test_missing_status_deserializes_as_not_started() {
        // A record from a partial/legacy store row may lack the status
        // field entirely; it must default rather than fail.
        let json = r#"{
            "id": "t-1",
            "process_id": "p-1",
            "title": "Migrate data",
            "created_at": "2025-06-01T00:00:00Z"
        }"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.status.as_str(), "Not Started");
        assert!(!task.is_completed());
        assert!(task.parent_task_id.is_none());
    }

    #[test]
    fn test_with_parent() {
        let parent_id = TaskId::new("t-parent");
        let task =
            Task::new(ProcessId::generate(), "Write tests").with_parent(parent_id.clone());
        assert!(!task.is_root());
        assert_eq!(task.parent_task_id, Some(parent_id));
    }
}
