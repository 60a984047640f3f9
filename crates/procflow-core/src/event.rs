//! Timeline events for the CRM audit trail.
//!
//! Every major state transition (customer/process/task lifecycle) is
//! recorded as an append-only event row. Histories are reconstructed by
//! reading these rows back in order; nothing ever updates an event.

use crate::ids::{CustomerId, EventId, ProcessId, TaskId};
use crate::status::{ProcessStage, TaskStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// An append-only event recording one state transition in the CRM.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineEvent {
    /// Unique event identifier.
    pub id: EventId,
    /// Customer this event belongs to, if resolved at append time.
    pub customer_id: Option<CustomerId>,
    /// Process this event refers to, if any.
    pub process_id: Option<ProcessId>,
    /// Task this event refers to, if any.
    pub task_id: Option<TaskId>,
    /// Type of event.
    pub event_type: TimelineEventType,
    /// When the event occurred.
    pub occurred_at: DateTime<Utc>,
    /// Event-specific metadata (name, stage, status, etc.).
    pub metadata: HashMap<String, String>,
}

impl TimelineEvent {
    fn new(event_type: TimelineEventType, metadata: HashMap<String, String>) -> Self {
        Self {
            id: EventId::generate(),
            customer_id: None,
            process_id: None,
            task_id: None,
            event_type,
            occurred_at: Utc::now(),
            metadata,
        }
    }

    /// Builder method to attribute this event to a customer.
    pub fn with_customer(mut self, customer_id: CustomerId) -> Self {
        self.customer_id = Some(customer_id);
        self
    }

    /// Create a CustomerCreated event.
    pub fn customer_created(customer_id: CustomerId, name: &str) -> Self {
        let mut metadata = HashMap::new();
        metadata.insert("name".to_string(), name.to_string());
        Self::new(TimelineEventType::CustomerCreated, metadata).with_customer(customer_id)
    }

    /// Create a ProcessCreated event.
    pub fn process_created(customer_id: CustomerId, process_id: ProcessId, name: &str) -> Self {
        let mut metadata = HashMap::new();
        metadata.insert("name".to_string(), name.to_string());
        let mut event =
            Self::new(TimelineEventType::ProcessCreated, metadata).with_customer(customer_id);
        event.process_id = Some(process_id);
        event
    }

    /// Create a StageChanged event.
    pub fn stage_changed(process_id: ProcessId, from: ProcessStage, to: ProcessStage) -> Self {
        let mut metadata = HashMap::new();
        metadata.insert("from".to_string(), format!("{:?}", from));
        metadata.insert("to".to_string(), format!("{:?}", to));
        let mut event = Self::new(TimelineEventType::StageChanged, metadata);
        event.process_id = Some(process_id);
        event
    }

    /// Create a TaskCreated event.
    pub fn task_created(process_id: ProcessId, task_id: TaskId, title: &str) -> Self {
        let mut metadata = HashMap::new();
        metadata.insert("title".to_string(), title.to_string());
        let mut event = Self::new(TimelineEventType::TaskCreated, metadata);
        event.process_id = Some(process_id);
        event.task_id = Some(task_id);
        event
    }

    /// Create a TaskStatusChanged event.
    pub fn task_status_changed(
        process_id: ProcessId,
        task_id: TaskId,
        from: &TaskStatus,
        to: &TaskStatus,
    ) -> Self {
        let mut metadata = HashMap::new();
        metadata.insert("from".to_string(), from.as_str().to_string());
        metadata.insert("to".to_string(), to.as_str().to_string());
        let mut event = Self::new(TimelineEventType::TaskStatusChanged, metadata);
        event.process_id = Some(process_id);
        event.task_id = Some(task_id);
        event
    }

    /// Create a TaskCompleted event.
    pub fn task_completed(process_id: ProcessId, task_id: TaskId) -> Self {
        let mut event = Self::new(TimelineEventType::TaskCompleted, HashMap::new());
        event.process_id = Some(process_id);
        event.task_id = Some(task_id);
        event
    }

    /// Create a TaskDeleted event.
    pub fn task_deleted(process_id: ProcessId, task_id: TaskId) -> Self {
        let mut event = Self::new(TimelineEventType::TaskDeleted, HashMap::new());
        event.process_id = Some(process_id);
        event.task_id = Some(task_id);
        event
    }

    /// Create a ProcessDeleted event.
    pub fn process_deleted(customer_id: CustomerId, process_id: ProcessId) -> Self {
        let mut event =
            Self::new(TimelineEventType::ProcessDeleted, HashMap::new()).with_customer(customer_id);
        event.process_id = Some(process_id);
        event
    }
}

/// Type of timeline event.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TimelineEventType {
    /// A customer record was created.
    CustomerCreated,
    /// A process was opened for a customer.
    ProcessCreated,
    /// A process moved to another workflow stage.
    StageChanged,
    /// A task was added to a process.
    TaskCreated,
    /// A task changed status (any transition).
    TaskStatusChanged,
    /// A task reached the completed status.
    TaskCompleted,
    /// A task was removed from a process.
    TaskDeleted,
    /// A process and its tasks were removed.
    ProcessDeleted,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_created() {
        let customer_id = CustomerId::generate();
        let process_id = ProcessId::generate();
        let event =
            TimelineEvent::process_created(customer_id.clone(), process_id.clone(), "CRM rollout");

        assert_eq!(event.customer_id, Some(customer_id));
        assert_eq!(event.process_id, Some(process_id));
        assert_eq!(event.event_type, TimelineEventType::ProcessCreated);
        assert_eq!(event.metadata.get("name"), Some(&"CRM rollout".to_string()));
        assert!(event.task_id.is_none());
    }

    #[test]
    fn test_task_status_changed() {
        let process_id = ProcessId::generate();
        let task_id = TaskId::generate();
        let event = TimelineEvent::task_status_changed(
            process_id,
            task_id,
            &TaskStatus::not_started(),
            &TaskStatus::in_progress(),
        );

        assert_eq!(event.event_type, TimelineEventType::TaskStatusChanged);
        assert_eq!(event.metadata.get("from"), Some(&"Not Started".to_string()));
        assert_eq!(event.metadata.get("to"), Some(&"In Progress".to_string()));
    }

    #[test]
    fn test_stage_changed() {
        let process_id = ProcessId::generate();
        let event = TimelineEvent::stage_changed(
            process_id,
            ProcessStage::Development,
            ProcessStage::Testing,
        );

        assert_eq!(event.event_type, TimelineEventType::StageChanged);
        assert_eq!(event.metadata.get("from"), Some(&"Development".to_string()));
        assert_eq!(event.metadata.get("to"), Some(&"Testing".to_string()));
    }
}
