//! In-memory Process/Customer store.
//!
//! Backs tests and single-node deployments. State lives in RwLock'd maps
//! keyed by id; every mutation appends the matching timeline event. Reads
//! clone records out, so callers never observe later mutations.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::info;

use procflow_core::{
    Customer, CustomerId, Process, ProcessId, Task, TaskId, TaskStatus, TimelineEvent,
};

use crate::error::StoreError;
use crate::store::ProcessStore;

/// In-memory store over RwLock'd hash maps.
#[derive(Default)]
pub struct InMemoryStore {
    customers: RwLock<HashMap<CustomerId, Customer>>,
    processes: RwLock<HashMap<ProcessId, Process>>,
    tasks: RwLock<HashMap<TaskId, Task>>,
    events: RwLock<Vec<TimelineEvent>>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    async fn append_event(&self, event: TimelineEvent) {
        self.events.write().await.push(event);
    }

    /// Insert a new customer record.
    pub async fn create_customer(&self, customer: Customer) -> CustomerId {
        let customer_id = customer.id.clone();

        info!(customer_id = %customer_id, name = %customer.name, "Creating customer");

        self.append_event(TimelineEvent::customer_created(
            customer_id.clone(),
            &customer.name,
        ))
        .await;
        self.customers
            .write()
            .await
            .insert(customer_id.clone(), customer);

        customer_id
    }

    /// Insert a new process record. The owning customer must exist.
    pub async fn create_process(&self, process: Process) -> Result<ProcessId, StoreError> {
        if !self
            .customers
            .read()
            .await
            .contains_key(&process.customer_id)
        {
            return Err(StoreError::CustomerNotFound(process.customer_id.clone()));
        }

        let process_id = process.id.clone();

        info!(
            process_id = %process_id,
            customer_id = %process.customer_id,
            name = %process.name,
            "Creating process"
        );

        self.append_event(TimelineEvent::process_created(
            process.customer_id.clone(),
            process_id.clone(),
            &process.name,
        ))
        .await;
        self.processes
            .write()
            .await
            .insert(process_id.clone(), process);

        Ok(process_id)
    }

    /// Insert a new task record.
    ///
    /// The owning process must exist, and a parent task, if given, must
    /// exist and belong to the same process.
    pub async fn create_task(&self, task: Task) -> Result<TaskId, StoreError> {
        let customer_id = {
            let processes = self.processes.read().await;
            let process = processes
                .get(&task.process_id)
                .ok_or_else(|| StoreError::ProcessNotFound(task.process_id.clone()))?;
            process.customer_id.clone()
        };

        if let Some(parent_id) = &task.parent_task_id {
            let tasks = self.tasks.read().await;
            let parent = tasks
                .get(parent_id)
                .ok_or_else(|| StoreError::TaskNotFound(parent_id.clone()))?;
            if parent.process_id != task.process_id {
                return Err(StoreError::ParentTaskMismatch {
                    parent: parent_id.clone(),
                });
            }
        }

        let task_id = task.id.clone();

        info!(task_id = %task_id, process_id = %task.process_id, title = %task.title, "Creating task");

        self.append_event(
            TimelineEvent::task_created(task.process_id.clone(), task_id.clone(), &task.title)
                .with_customer(customer_id),
        )
        .await;
        self.tasks.write().await.insert(task_id.clone(), task);

        Ok(task_id)
    }

    /// Fetch one task record.
    pub async fn get_task(&self, task_id: &TaskId) -> Option<Task> {
        self.tasks.read().await.get(task_id).cloned()
    }

    /// Update a task's status.
    ///
    /// Entering the completed status stamps `completed_date`; leaving it
    /// clears the stamp again.
    pub async fn update_task_status(
        &self,
        task_id: &TaskId,
        status: TaskStatus,
    ) -> Result<Task, StoreError> {
        let (updated, previous) = {
            let mut tasks = self.tasks.write().await;
            let task = tasks
                .get_mut(task_id)
                .ok_or_else(|| StoreError::TaskNotFound(task_id.clone()))?;

            let previous = task.status.clone();
            let was_completed = task.is_completed();
            task.status = status;

            if task.is_completed() && !was_completed {
                task.completed_date = Some(Utc::now());
            } else if !task.is_completed() {
                task.completed_date = None;
            }

            (task.clone(), previous)
        };

        // Task lock released; attribute the event to the owning customer.
        let customer_id = self
            .processes
            .read()
            .await
            .get(&updated.process_id)
            .map(|p| p.customer_id.clone());

        info!(
            task_id = %task_id,
            from = %previous,
            to = %updated.status,
            "Updating task status"
        );

        let mut event = TimelineEvent::task_status_changed(
            updated.process_id.clone(),
            task_id.clone(),
            &previous,
            &updated.status,
        );
        if let Some(customer_id) = &customer_id {
            event = event.with_customer(customer_id.clone());
        }
        self.append_event(event).await;

        if updated.is_completed() && !previous.is_completed() {
            let mut event =
                TimelineEvent::task_completed(updated.process_id.clone(), task_id.clone());
            if let Some(customer_id) = customer_id {
                event = event.with_customer(customer_id);
            }
            self.append_event(event).await;
        }

        Ok(updated)
    }

    /// Assign a task to a team member.
    pub async fn assign_task(
        &self,
        task_id: &TaskId,
        assignee: impl Into<String>,
    ) -> Result<Task, StoreError> {
        let mut tasks = self.tasks.write().await;
        let task = tasks
            .get_mut(task_id)
            .ok_or_else(|| StoreError::TaskNotFound(task_id.clone()))?;
        task.assigned_to = Some(assignee.into());
        Ok(task.clone())
    }

    /// Update a task's due date.
    pub async fn update_task_due_date(
        &self,
        task_id: &TaskId,
        due_date: Option<DateTime<Utc>>,
    ) -> Result<Task, StoreError> {
        let mut tasks = self.tasks.write().await;
        let task = tasks
            .get_mut(task_id)
            .ok_or_else(|| StoreError::TaskNotFound(task_id.clone()))?;
        task.due_date = due_date;
        Ok(task.clone())
    }

    /// Remove a task.
    ///
    /// Children of the removed task are left in place; the hierarchy
    /// engine promotes them to roots when it next rebuilds the tree.
    pub async fn delete_task(&self, task_id: &TaskId) -> Result<(), StoreError> {
        let task = self
            .tasks
            .write()
            .await
            .remove(task_id)
            .ok_or_else(|| StoreError::TaskNotFound(task_id.clone()))?;

        info!(task_id = %task_id, process_id = %task.process_id, "Deleting task");

        let customer_id = self
            .processes
            .read()
            .await
            .get(&task.process_id)
            .map(|p| p.customer_id.clone());
        let mut event = TimelineEvent::task_deleted(task.process_id, task_id.clone());
        if let Some(customer_id) = customer_id {
            event = event.with_customer(customer_id);
        }
        self.append_event(event).await;

        Ok(())
    }

    /// Remove a process together with all of its tasks.
    pub async fn delete_process(&self, process_id: &ProcessId) -> Result<(), StoreError> {
        let process = self
            .processes
            .write()
            .await
            .remove(process_id)
            .ok_or_else(|| StoreError::ProcessNotFound(process_id.clone()))?;

        let mut tasks = self.tasks.write().await;
        tasks.retain(|_, task| task.process_id != *process_id);
        drop(tasks);

        info!(process_id = %process_id, customer_id = %process.customer_id, "Deleting process");

        self.append_event(TimelineEvent::process_deleted(
            process.customer_id,
            process_id.clone(),
        ))
        .await;

        Ok(())
    }

    /// Advance a process to its next workflow stage.
    ///
    /// A process already at the final stage is returned unchanged.
    pub async fn advance_stage(&self, process_id: &ProcessId) -> Result<Process, StoreError> {
        let (updated, transition) = {
            let mut processes = self.processes.write().await;
            let process = processes
                .get_mut(process_id)
                .ok_or_else(|| StoreError::ProcessNotFound(process_id.clone()))?;

            match process.stage.next() {
                Some(next) => {
                    let from = process.stage;
                    process.stage = next;
                    (process.clone(), Some((from, next)))
                }
                None => (process.clone(), None),
            }
        };

        if let Some((from, to)) = transition {
            info!(process_id = %process_id, from = ?from, to = ?to, "Advancing process stage");
            self.append_event(
                TimelineEvent::stage_changed(process_id.clone(), from, to)
                    .with_customer(updated.customer_id.clone()),
            )
            .await;
        }

        Ok(updated)
    }

    /// The recorded history for one customer, oldest first.
    pub async fn timeline_for_customer(&self, customer_id: &CustomerId) -> Vec<TimelineEvent> {
        let mut events: Vec<TimelineEvent> = self
            .events
            .read()
            .await
            .iter()
            .filter(|e| e.customer_id.as_ref() == Some(customer_id))
            .cloned()
            .collect();
        events.sort_by_key(|e| e.occurred_at);
        events
    }

    /// The recorded history for one process, oldest first.
    pub async fn timeline_for_process(&self, process_id: &ProcessId) -> Vec<TimelineEvent> {
        let mut events: Vec<TimelineEvent> = self
            .events
            .read()
            .await
            .iter()
            .filter(|e| e.process_id.as_ref() == Some(process_id))
            .cloned()
            .collect();
        events.sort_by_key(|e| e.occurred_at);
        events
    }
}

#[async_trait]
impl ProcessStore for InMemoryStore {
    async fn list_process_ids(&self) -> Result<Vec<ProcessId>, StoreError> {
        Ok(self.processes.read().await.keys().cloned().collect())
    }

    async fn list_tasks(&self, process_id: &ProcessId) -> Result<Vec<Task>, StoreError> {
        let tasks = self.tasks.read().await;
        let mut listed: Vec<Task> = tasks
            .values()
            .filter(|task| task.process_id == *process_id)
            .cloned()
            .collect();
        // Deterministic listing order: creation time, id as tiebreak.
        listed.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.as_str().cmp(b.id.as_str()))
        });
        Ok(listed)
    }

    async fn list_tasks_with_upcoming_due_date(
        &self,
        today: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<Task>, StoreError> {
        let tasks = self.tasks.read().await;
        let mut upcoming: Vec<Task> = tasks
            .values()
            .filter(|task| !task.is_completed())
            .filter(|task| task.due_date.is_some_and(|due| due >= today))
            .cloned()
            .collect();
        upcoming.sort_by_key(|task| task.due_date);
        upcoming.truncate(limit);
        Ok(upcoming)
    }

    async fn get_process(&self, process_id: &ProcessId) -> Result<Option<Process>, StoreError> {
        Ok(self.processes.read().await.get(process_id).cloned())
    }

    async fn get_customer_name(
        &self,
        customer_id: &CustomerId,
    ) -> Result<Option<String>, StoreError> {
        Ok(self
            .customers
            .read()
            .await
            .get(customer_id)
            .map(|c| c.name.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use procflow_core::TimelineEventType;

    async fn store_with_process() -> (InMemoryStore, CustomerId, ProcessId) {
        let store = InMemoryStore::new();
        let customer_id = store.create_customer(Customer::new("Acme Pharma")).await;
        let process_id = store
            .create_process(Process::new(customer_id.clone(), "ERP rollout"))
            .await
            .unwrap();
        (store, customer_id, process_id)
    }

    #[tokio::test]
    async fn test_create_process_requires_customer() {
        let store = InMemoryStore::new();
        let result = store
            .create_process(Process::new(CustomerId::new("nobody"), "Orphan process"))
            .await;
        assert!(matches!(result, Err(StoreError::CustomerNotFound(_))));
    }

    #[tokio::test]
    async fn test_create_task_rejects_cross_process_parent() {
        let (store, customer_id, process_id) = store_with_process().await;
        let other_process_id = store
            .create_process(Process::new(customer_id, "Second process"))
            .await
            .unwrap();

        let parent_id = store
            .create_task(Task::new(process_id, "Parent"))
            .await
            .unwrap();

        let result = store
            .create_task(Task::new(other_process_id, "Child elsewhere").with_parent(parent_id))
            .await;
        assert!(matches!(
            result,
            Err(StoreError::ParentTaskMismatch { .. })
        ));
    }

    #[tokio::test]
    async fn test_update_task_status_stamps_completed_date() {
        let (store, _, process_id) = store_with_process().await;
        let task_id = store
            .create_task(Task::new(process_id, "Ship it"))
            .await
            .unwrap();

        let task = store
            .update_task_status(&task_id, TaskStatus::completed())
            .await
            .unwrap();
        assert!(task.completed_date.is_some());

        // Reopening clears the stamp.
        let task = store
            .update_task_status(&task_id, TaskStatus::in_progress())
            .await
            .unwrap();
        assert!(task.completed_date.is_none());
    }

    #[tokio::test]
    async fn test_delete_task_keeps_children() {
        let (store, _, process_id) = store_with_process().await;
        let parent_id = store
            .create_task(Task::new(process_id.clone(), "Parent"))
            .await
            .unwrap();
        let child_id = store
            .create_task(Task::new(process_id.clone(), "Child").with_parent(parent_id.clone()))
            .await
            .unwrap();

        store.delete_task(&parent_id).await.unwrap();

        let remaining = store.list_tasks(&process_id).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, child_id);
        // The dangling parent reference stays on the record.
        assert_eq!(remaining[0].parent_task_id, Some(parent_id));
    }

    #[tokio::test]
    async fn test_upcoming_due_date_filter_and_order() {
        let (store, _, process_id) = store_with_process().await;
        let now = Utc::now();

        store
            .create_task(
                Task::new(process_id.clone(), "Overdue").with_due_date(now - Duration::days(1)),
            )
            .await
            .unwrap();
        store
            .create_task(
                Task::new(process_id.clone(), "Tomorrow").with_due_date(now + Duration::days(1)),
            )
            .await
            .unwrap();
        store
            .create_task(
                Task::new(process_id.clone(), "Next week").with_due_date(now + Duration::days(7)),
            )
            .await
            .unwrap();
        store
            .create_task(
                Task::new(process_id.clone(), "Done already")
                    .with_status(TaskStatus::completed())
                    .with_due_date(now + Duration::days(2)),
            )
            .await
            .unwrap();

        let upcoming = store
            .list_tasks_with_upcoming_due_date(now, 10)
            .await
            .unwrap();
        let titles: Vec<&str> = upcoming.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["Tomorrow", "Next week"]);
    }

    #[tokio::test]
    async fn test_timeline_records_lifecycle() {
        let (store, customer_id, process_id) = store_with_process().await;
        let task_id = store
            .create_task(Task::new(process_id.clone(), "Design schema"))
            .await
            .unwrap();
        store
            .update_task_status(&task_id, TaskStatus::completed())
            .await
            .unwrap();
        store.advance_stage(&process_id).await.unwrap();

        let history = store.timeline_for_customer(&customer_id).await;
        let kinds: Vec<TimelineEventType> = history.iter().map(|e| e.event_type).collect();
        assert_eq!(
            kinds,
            vec![
                TimelineEventType::CustomerCreated,
                TimelineEventType::ProcessCreated,
                TimelineEventType::TaskCreated,
                TimelineEventType::TaskStatusChanged,
                TimelineEventType::TaskCompleted,
                TimelineEventType::StageChanged,
            ]
        );
    }

    #[tokio::test]
    async fn test_advance_stage_stops_at_complete() {
        let (store, _, process_id) = store_with_process().await;
        for _ in 0..10 {
            store.advance_stage(&process_id).await.unwrap();
        }
        let process = store.get_process(&process_id).await.unwrap().unwrap();
        assert!(process.stage.is_complete());
    }
}
