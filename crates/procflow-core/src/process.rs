//! Process and milestone records.

use crate::{CustomerId, ProcessId, ProcessStage};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A Process is a tracked unit of work owned by a customer.
///
/// It contains tasks (held separately in the store, keyed by
/// `process_id`) and milestones (carried inline on the record).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Process {
    /// Unique process identifier.
    pub id: ProcessId,

    /// Customer this process is run for.
    pub customer_id: CustomerId,

    /// Display name.
    pub name: String,

    /// Longer free-text description.
    #[serde(default)]
    pub description: Option<String>,

    /// Current workflow stage.
    #[serde(default)]
    pub stage: ProcessStage,

    /// When work started.
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,

    /// Target completion date.
    #[serde(default)]
    pub target_date: Option<DateTime<Utc>>,

    /// Dated checkpoints within the process.
    #[serde(default)]
    pub milestones: Vec<Milestone>,

    /// When the process record was created.
    pub created_at: DateTime<Utc>,
}

impl Process {
    /// Create a new Process for the given customer.
    pub fn new(customer_id: CustomerId, name: impl Into<String>) -> Self {
        Self {
            id: ProcessId::generate(),
            customer_id,
            name: name.into(),
            description: None,
            stage: ProcessStage::default(),
            start_date: None,
            target_date: None,
            milestones: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Builder method to set a specific ID (useful for testing).
    pub fn with_id(mut self, id: ProcessId) -> Self {
        self.id = id;
        self
    }

    /// Builder method to set the stage.
    pub fn with_stage(mut self, stage: ProcessStage) -> Self {
        self.stage = stage;
        self
    }

    /// Builder method to set the description.
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    /// Builder method to set the target date.
    pub fn with_target_date(mut self, target: DateTime<Utc>) -> Self {
        self.target_date = Some(target);
        self
    }

    /// Builder method to add a milestone.
    pub fn with_milestone(mut self, milestone: Milestone) -> Self {
        self.milestones.push(milestone);
        self
    }
}

/// A Milestone is a dated checkpoint within a process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    /// Short title.
    pub title: String,

    /// When the milestone is due.
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,

    /// Whether the milestone has been reached.
    #[serde(default)]
    pub completed: bool,
}

impl Milestone {
    /// Create a new open Milestone.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            due_date: None,
            completed: false,
        }
    }

    /// Builder method to set the due date.
    pub fn with_due_date(mut self, due: DateTime<Utc>) -> Self {
        self.due_date = Some(due);
        self
    }
}
