//! ProcFlow Task Hierarchy & Progress Engine
//!
//! Reconstructs per-process task trees from the flat rows a store
//! returns, computes completion percentages, aggregates them across
//! every process for dashboard display, and serves the forward-looking
//! upcoming-tasks view.
//!
//! The engine never writes: every entry point is a stateless function
//! over its inputs and/or a set of read-only store queries.

pub mod dashboard;
pub mod hierarchy;
pub mod progress;
pub mod stats;

// Re-export commonly used types
pub use dashboard::{DashboardError, DashboardService, UpcomingTask, DEFAULT_UPCOMING_LIMIT};
pub use hierarchy::{build_task_forest, flatten, HierarchyError, TaskNode};
pub use progress::ProcessProgress;
pub use stats::CrmStats;
