//! Status and classification vocabulary for tasks and processes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of a Task.
///
/// The set of status values is owned by the store schema, not by this
/// library, so the status is carried as an opaque string rather than a
/// closed enum. The only value the progress engine interprets is
/// `"Completed"`, matched case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskStatus(String);

impl TaskStatus {
    /// Create a status from a raw store value.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// The "Not Started" status.
    pub fn not_started() -> Self {
        Self("Not Started".to_string())
    }

    /// The "In Progress" status.
    pub fn in_progress() -> Self {
        Self("In Progress".to_string())
    }

    /// The "Blocked" status.
    pub fn blocked() -> Self {
        Self("Blocked".to_string())
    }

    /// The "Completed" status.
    pub fn completed() -> Self {
        Self("Completed".to_string())
    }

    /// Returns true if this status marks the task as done.
    ///
    /// Matching is case-insensitive: `"completed"`, `"Completed"` and
    /// `"COMPLETED"` all count as done; every other value does not.
    pub fn is_completed(&self) -> bool {
        self.0.eq_ignore_ascii_case("completed")
    }

    /// Get the inner string reference.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TaskStatus {
    /// A record missing its status is treated as not started.
    fn default() -> Self {
        Self::not_started()
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for TaskStatus {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for TaskStatus {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Priority of a Task.
///
/// Ordinal classification carried through for consumers; the progress
/// engine does not consult it.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    /// Nice to have.
    Low,
    /// Normal priority.
    #[default]
    Medium,
    /// Needs attention soon.
    High,
    /// Blocking the process.
    Critical,
}

/// Stage of a Process in its delivery workflow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProcessStage {
    /// Initial scoping with the customer.
    #[default]
    Discovery,
    /// Work breakdown and scheduling.
    Planning,
    /// Active build.
    Development,
    /// Verification against requirements.
    Testing,
    /// Rollout to the customer.
    Deployment,
    /// Process has reached the end of its workflow.
    Complete,
}

impl ProcessStage {
    /// Returns true if the process has reached the end of its workflow.
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete)
    }

    /// The next stage in the workflow, or `None` from `Complete`.
    pub fn next(&self) -> Option<ProcessStage> {
        match self {
            Self::Discovery => Some(Self::Planning),
            Self::Planning => Some(Self::Development),
            Self::Development => Some(Self::Testing),
            Self::Testing => Some(Self::Deployment),
            Self::Deployment => Some(Self::Complete),
            Self::Complete => None,
        }
    }
}
