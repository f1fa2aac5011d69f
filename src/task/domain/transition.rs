//! Status transition rules.
//!
//! A sequential transition may only advance one stage. An override
//! transition (board drag-and-drop) may target any status. Both modes are
//! subject to the checklist gate on `in_review -> done`.

use super::{StatusHistoryEntry, TaskDomainError, TaskId, TaskStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How a requested status change is validated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionMode {
    /// Advance exactly one stage.
    #[default]
    Sequential,
    /// Reposition freely, bypassing sequence validation.
    Override,
}

impl TransitionMode {
    /// Returns the canonical wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sequential => "sequential",
            Self::Override => "override",
        }
    }
}

/// Non-blank notes accompanying a status change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionNotes(String);

impl TransitionNotes {
    /// Validates transition notes.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::MissingNotes`] when the notes are blank.
    pub fn new(value: impl Into<String>) -> Result<Self, TaskDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TaskDomainError::MissingNotes);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the notes as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the wrapper.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Checks whether `current -> requested` is allowed.
///
/// `unchecked_items` is the number of unchecked checklist items on the task;
/// it only matters for `in_review -> done`.
///
/// # Errors
///
/// Returns [`TaskDomainError::OutOfSequence`] for a sequential request that
/// does not target [`TaskStatus::next`], and
/// [`TaskDomainError::ChecklistIncomplete`] when the review gate fails.
pub fn validate_transition(
    task_id: TaskId,
    current: TaskStatus,
    requested: TaskStatus,
    mode: TransitionMode,
    unchecked_items: usize,
) -> Result<(), TaskDomainError> {
    if mode == TransitionMode::Sequential && current.next() != Some(requested) {
        return Err(TaskDomainError::OutOfSequence {
            task_id,
            from: current,
            to: requested,
        });
    }

    let enters_done_from_review =
        current == TaskStatus::InReview && requested == TaskStatus::Done;
    if enters_done_from_review && unchecked_items > 0 {
        return Err(TaskDomainError::ChecklistIncomplete {
            task_id,
            unchecked: unchecked_items,
        });
    }

    Ok(())
}

/// A validated status change ready to be persisted atomically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    /// Task being transitioned.
    pub task_id: TaskId,
    /// Status the task held when validation ran.
    pub previous: TaskStatus,
    /// History entry to append; its status is the new task status.
    pub entry: StatusHistoryEntry,
    /// New `updated_at` timestamp for the task.
    pub updated_at: DateTime<Utc>,
}

impl StatusChange {
    /// Returns the status being entered.
    #[must_use]
    pub const fn next(&self) -> TaskStatus {
        self.entry.status()
    }
}
