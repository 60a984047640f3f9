//! Aggregate CRM statistics rendered as plain text.
//!
//! The chat assistant consumes these figures as prompt context, so the
//! rendering is line-oriented and stable rather than structured.

use std::fmt::Write;

use serde::{Deserialize, Serialize};
use tracing::warn;

use procflow_store::{ProcessStore, StoreError};

use crate::dashboard::DashboardService;
use crate::progress::ProcessProgress;

/// Aggregate figures across every process in the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrmStats {
    /// Number of processes.
    pub total_processes: usize,
    /// Tasks across all processes.
    pub total_tasks: usize,
    /// Completed tasks across all processes.
    pub completed_tasks: usize,
    /// Mean completion percentage across processes.
    pub average_progress: u8,
    /// Processes at 100%.
    pub fully_complete_processes: usize,
}

impl CrmStats {
    /// Render as stable line-oriented text.
    pub fn render(&self) -> String {
        let mut out = String::new();
        writeln!(out, "Processes: {}", self.total_processes).ok();
        writeln!(
            out,
            "Tasks: {} total, {} completed",
            self.total_tasks, self.completed_tasks
        )
        .ok();
        writeln!(out, "Average process progress: {}%", self.average_progress).ok();
        writeln!(
            out,
            "Processes fully complete: {}",
            self.fully_complete_processes
        )
        .ok();
        out
    }
}

impl<S> DashboardService<S>
where
    S: ProcessStore + 'static,
{
    /// Collect aggregate statistics across every process.
    ///
    /// Shares the isolation policy of the progress map: a process whose
    /// tasks cannot be loaded contributes zero figures and a warning,
    /// and still counts toward the process total.
    pub async fn stats(&self) -> Result<CrmStats, StoreError> {
        let process_ids = self.store.list_process_ids().await?;
        let total_processes = process_ids.len();

        let mut total_tasks = 0;
        let mut completed_tasks = 0;
        let mut percent_sum: u64 = 0;
        let mut fully_complete_processes = 0;

        for process_id in process_ids {
            let tasks = match self.store.list_tasks(&process_id).await {
                Ok(tasks) => tasks,
                Err(error) => {
                    warn!(
                        process_id = %process_id,
                        error = %error,
                        "Failed to load tasks for stats"
                    );
                    continue;
                }
            };

            let progress = ProcessProgress::from_tasks(&tasks);
            total_tasks += progress.total;
            completed_tasks += progress.completed;
            percent_sum += u64::from(progress.percentage);
            if progress.percentage == 100 {
                fully_complete_processes += 1;
            }
        }

        let average_progress = if total_processes == 0 {
            0
        } else {
            (percent_sum as f64 / total_processes as f64).round() as u8
        };

        Ok(CrmStats {
            total_processes,
            total_tasks,
            completed_tasks,
            average_progress,
            fully_complete_processes,
        })
    }
}
