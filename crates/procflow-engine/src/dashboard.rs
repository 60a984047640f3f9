//! Dashboard queries over the store.
//!
//! Serves the three read paths a dashboard renders: per-process progress,
//! the progress map across every process, and the forward-looking
//! upcoming-tasks widget. Failures degrade to zeros, placeholders or an
//! empty list so a flaky store dims the dashboard instead of replacing it
//! with an error page.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::warn;

use procflow_core::{ProcessId, Task};
use procflow_store::{ProcessStore, StoreError};

use crate::hierarchy::{build_task_forest, HierarchyError, TaskNode};
use crate::progress::ProcessProgress;

/// Default number of rows for the upcoming-tasks widget.
pub const DEFAULT_UPCOMING_LIMIT: usize = 5;

/// Placeholder when the owning process cannot be resolved.
const UNKNOWN_PROCESS: &str = "Unknown Process";
/// Placeholder when the owning customer cannot be resolved.
const UNKNOWN_CUSTOMER: &str = "Unknown Customer";

/// Dashboard errors.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// The store could not serve the query.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The stored hierarchy is malformed.
    #[error(transparent)]
    Hierarchy(#[from] HierarchyError),
}

/// An upcoming task joined with its process and customer names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpcomingTask {
    /// The task record itself.
    pub task: Task,
    /// Name of the owning process, or a placeholder.
    pub process_name: String,
    /// Name of the owning customer, or a placeholder.
    pub customer_name: String,
}

/// Dashboard queries over a Process/Customer store.
pub struct DashboardService<S> {
    pub(crate) store: Arc<S>,
}

impl<S> DashboardService<S>
where
    S: ProcessStore + 'static,
{
    /// Create a new DashboardService over the given store.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Completion figures for one process.
    pub async fn process_progress(
        &self,
        process_id: &ProcessId,
    ) -> Result<ProcessProgress, StoreError> {
        let tasks = self.store.list_tasks(process_id).await?;
        Ok(ProcessProgress::from_tasks(&tasks))
    }

    /// The reconstructed task hierarchy for one process.
    pub async fn task_tree(&self, process_id: &ProcessId) -> Result<Vec<TaskNode>, DashboardError> {
        let tasks = self.store.list_tasks(process_id).await?;
        Ok(build_task_forest(tasks)?)
    }

    /// Completion percentage for every process in the system.
    ///
    /// The per-process fetches fan out concurrently; the processes are
    /// independent and no ordering is required between them. A failed
    /// fetch logs a warning and reports 0 for that process while the rest
    /// of the batch proceeds, so one broken record cannot blank out the
    /// whole dashboard. Only the id listing itself fails the call.
    pub async fn progress_for_all(&self) -> Result<HashMap<ProcessId, u8>, StoreError> {
        let process_ids = self.store.list_process_ids().await?;

        let mut fetches = JoinSet::new();
        for process_id in process_ids {
            let store = Arc::clone(&self.store);
            fetches.spawn(async move {
                let tasks = store.list_tasks(&process_id).await;
                (process_id, tasks)
            });
        }

        let mut progress = HashMap::new();
        while let Some(joined) = fetches.join_next().await {
            let Ok((process_id, tasks)) = joined else {
                warn!("progress fetch task panicked");
                continue;
            };
            match tasks {
                Ok(tasks) => {
                    progress.insert(process_id, ProcessProgress::from_tasks(&tasks).percentage);
                }
                Err(error) => {
                    warn!(
                        process_id = %process_id,
                        error = %error,
                        "Failed to load tasks, reporting 0% progress"
                    );
                    progress.insert(process_id, 0);
                }
            }
        }

        Ok(progress)
    }

    /// Tasks due on or after the day of `now`, soonest first, at most
    /// `limit` of them.
    ///
    /// `now` is an explicit parameter so callers (and tests) control the
    /// clock. The view is forward-looking only: tasks overdue before
    /// today are not listed. A failed store query degrades to an empty
    /// list; a failed name lookup degrades to a placeholder on that row.
    pub async fn upcoming_tasks(&self, now: DateTime<Utc>, limit: usize) -> Vec<UpcomingTask> {
        let today = start_of_day(now);

        let tasks = match self
            .store
            .list_tasks_with_upcoming_due_date(today, limit)
            .await
        {
            Ok(tasks) => tasks,
            Err(error) => {
                warn!(error = %error, "Failed to load upcoming tasks");
                return Vec::new();
            }
        };

        let mut upcoming = Vec::with_capacity(tasks.len());
        for task in tasks {
            let (process_name, customer_name) = self.resolve_names(&task).await;
            upcoming.push(UpcomingTask {
                task,
                process_name,
                customer_name,
            });
        }
        upcoming
    }

    /// Resolve the process and customer names for one task, degrading to
    /// placeholders instead of dropping the row.
    async fn resolve_names(&self, task: &Task) -> (String, String) {
        let process = match self.store.get_process(&task.process_id).await {
            Ok(Some(process)) => process,
            Ok(None) => {
                warn!(process_id = %task.process_id, "Process missing for upcoming task");
                return (UNKNOWN_PROCESS.to_string(), UNKNOWN_CUSTOMER.to_string());
            }
            Err(error) => {
                warn!(
                    process_id = %task.process_id,
                    error = %error,
                    "Failed to resolve process for upcoming task"
                );
                return (UNKNOWN_PROCESS.to_string(), UNKNOWN_CUSTOMER.to_string());
            }
        };

        let customer_name = match self.store.get_customer_name(&process.customer_id).await {
            Ok(Some(name)) => name,
            Ok(None) => {
                warn!(customer_id = %process.customer_id, "Customer missing for upcoming task");
                UNKNOWN_CUSTOMER.to_string()
            }
            Err(error) => {
                warn!(
                    customer_id = %process.customer_id,
                    error = %error,
                    "Failed to resolve customer for upcoming task"
                );
                UNKNOWN_CUSTOMER.to_string()
            }
        };

        (process.name, customer_name)
    }
}

/// Start of the UTC day containing `now`.
fn start_of_day(now: DateTime<Utc>) -> DateTime<Utc> {
    now.date_naive().and_time(NaiveTime::MIN).and_utc()
}
