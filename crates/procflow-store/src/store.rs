//! Read contract the progress engine depends on.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use procflow_core::{CustomerId, Process, ProcessId, Task};

use crate::error::StoreError;

/// Read access to processes, tasks and customers.
///
/// Every method is a potential suspension point (a database-backed
/// implementation goes over the network); timeout and cancellation policy
/// belong to the implementation, not to callers.
#[async_trait]
pub trait ProcessStore: Send + Sync {
    /// List the ids of every process in the system.
    async fn list_process_ids(&self) -> Result<Vec<ProcessId>, StoreError>;

    /// The flat, unfiltered list of tasks for one process, all hierarchy
    /// levels included.
    async fn list_tasks(&self, process_id: &ProcessId) -> Result<Vec<Task>, StoreError>;

    /// Tasks across all processes that are not completed and due on or
    /// after `today`, ascending by due date, at most `limit` of them.
    async fn list_tasks_with_upcoming_due_date(
        &self,
        today: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<Task>, StoreError>;

    /// Fetch one process record. `Ok(None)` when the id is unknown.
    async fn get_process(&self, process_id: &ProcessId) -> Result<Option<Process>, StoreError>;

    /// Fetch a customer's display name. `Ok(None)` when the id is unknown.
    async fn get_customer_name(
        &self,
        customer_id: &CustomerId,
    ) -> Result<Option<String>, StoreError>;
}
