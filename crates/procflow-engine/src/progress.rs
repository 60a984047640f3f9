//! Completion progress for one process.

use procflow_core::Task;
use serde::{Deserialize, Serialize};

use crate::hierarchy::{flatten, TaskNode};

/// Completion figures for one process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessProgress {
    /// All tasks in the process, branches and leaves alike.
    pub total: usize,
    /// Tasks whose status is completed.
    pub completed: usize,
    /// `completed / total` as a whole percent, 0 when there are no tasks.
    pub percentage: u8,
}

impl ProcessProgress {
    /// Figures for a process with no tasks at all.
    pub const EMPTY: ProcessProgress = ProcessProgress {
        total: 0,
        completed: 0,
        percentage: 0,
    };

    /// Compute progress over a flat task list.
    ///
    /// Pure and infallible. A record with a defaulted status counts as
    /// not completed rather than raising.
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let completed = tasks.iter().filter(|task| task.is_completed()).count();
        Self::from_counts(tasks.len(), completed)
    }

    /// Compute progress over a reconstructed forest.
    pub fn from_forest(forest: &[TaskNode]) -> Self {
        let flat = flatten(forest);
        let completed = flat.iter().filter(|task| task.is_completed()).count();
        Self::from_counts(flat.len(), completed)
    }

    fn from_counts(total: usize, completed: usize) -> Self {
        // A process with zero tasks is a valid, common state (a newly
        // created process before work breakdown), not a division error.
        let percentage = if total == 0 {
            0
        } else {
            // Rounds halves away from zero: 5 of 8 is 63%.
            ((completed as f64 / total as f64) * 100.0).round() as u8
        };
        Self {
            total,
            completed,
            percentage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::build_task_forest;
    use procflow_core::{ProcessId, TaskId, TaskStatus};

    fn task(process: &ProcessId, id: &str, status: &str) -> Task {
        Task::new(process.clone(), id)
            .with_id(TaskId::new(id))
            .with_status(TaskStatus::new(status))
    }

    #[test]
    fn test_empty_process_is_zero_percent() {
        let progress = ProcessProgress::from_tasks(&[]);
        assert_eq!(progress, ProcessProgress::EMPTY);
        assert_eq!(progress.percentage, 0);
    }

    #[test]
    fn test_flat_list_percentage() {
        let process = ProcessId::generate();
        let tasks = vec![
            task(&process, "a", "Completed"),
            task(&process, "b", "In Progress"),
            task(&process, "c", "Not Started"),
            task(&process, "d", "Completed"),
        ];

        let progress = ProcessProgress::from_tasks(&tasks);
        assert_eq!(progress.total, 4);
        assert_eq!(progress.completed, 2);
        assert_eq!(progress.percentage, 50);
    }

    #[test]
    fn test_branch_tasks_count_like_leaves() {
        // Root (not done) with one completed and one open child:
        // 1 of 3 tasks done, 33%.
        let process = ProcessId::generate();
        let tasks = vec![
            task(&process, "root", "In Progress"),
            task(&process, "c1", "Completed").with_parent(TaskId::new("root")),
            task(&process, "c2", "Not Started").with_parent(TaskId::new("root")),
        ];

        let forest = build_task_forest(tasks).unwrap();
        let progress = ProcessProgress::from_forest(&forest);
        assert_eq!(progress.total, 3);
        assert_eq!(progress.completed, 1);
        assert_eq!(progress.percentage, 33);
    }

    #[test]
    fn test_status_matching_is_case_insensitive() {
        let process = ProcessId::generate();
        let tasks = vec![
            task(&process, "a", "completed"),
            task(&process, "b", "Completed"),
            task(&process, "c", "COMPLETED"),
        ];

        let progress = ProcessProgress::from_tasks(&tasks);
        assert_eq!(progress.completed, 3);
        assert_eq!(progress.percentage, 100);
    }

    #[test]
    fn test_rounding_half_goes_up() {
        // 5 of 8 is exactly 62.5; halves round away from zero.
        let process = ProcessId::generate();
        let mut tasks = Vec::new();
        for i in 0..5 {
            tasks.push(task(&process, &format!("done-{i}"), "Completed"));
        }
        for i in 0..3 {
            tasks.push(task(&process, &format!("open-{i}"), "In Progress"));
        }

        let progress = ProcessProgress::from_tasks(&tasks);
        assert_eq!(progress.total, 8);
        assert_eq!(progress.completed, 5);
        assert_eq!(progress.percentage, 63);
    }

    #[test]
    fn test_serialize_shape() {
        let progress = ProcessProgress {
            total: 8,
            completed: 5,
            percentage: 63,
        };
        let json = serde_json::to_value(progress).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"total": 8, "completed": 5, "percentage": 63})
        );
    }

    #[test]
    fn test_flat_and_forest_agree() {
        let process = ProcessId::generate();
        let tasks = vec![
            task(&process, "root", "Completed"),
            task(&process, "kid", "Not Started").with_parent(TaskId::new("root")),
        ];

        let from_flat = ProcessProgress::from_tasks(&tasks);
        let forest = build_task_forest(tasks).unwrap();
        assert_eq!(from_flat, ProcessProgress::from_forest(&forest));
    }
}
