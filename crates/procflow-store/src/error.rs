//! Store layer errors.

use procflow_core::{CustomerId, ProcessId, TaskId};
use thiserror::Error;

/// Errors raised by a Process/Customer store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Process not found.
    #[error("process not found: {0}")]
    ProcessNotFound(ProcessId),

    /// Task not found.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// Customer not found.
    #[error("customer not found: {0}")]
    CustomerNotFound(CustomerId),

    /// A task's parent must live in the same process.
    #[error("parent task {parent} belongs to a different process")]
    ParentTaskMismatch { parent: TaskId },

    /// The store could not be reached or the query failed.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
