//! Error types for task domain validation, transitions, and parsing.

use super::{ChecklistItemId, TaskId, TaskStatus};
use thiserror::Error;

/// Errors returned while constructing or mutating domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// The task description is empty after trimming.
    #[error("task description must not be empty")]
    EmptyDescription,

    /// Transition notes are missing or blank.
    #[error("status transition notes must not be empty")]
    MissingNotes,

    /// A sequential transition did not target the next status.
    #[error("task {task_id} cannot move from {from} to {to}: status must progress in sequence")]
    OutOfSequence {
        /// Task whose transition was rejected.
        task_id: TaskId,
        /// Current status.
        from: TaskStatus,
        /// Requested status.
        to: TaskStatus,
    },

    /// The review-to-done gate found unchecked checklist items.
    #[error(
        "task {task_id} has {unchecked} unchecked PR checklist item(s); all items must be checked before marking as done"
    )]
    ChecklistIncomplete {
        /// Task whose transition was rejected.
        task_id: TaskId,
        /// Number of unchecked items.
        unchecked: usize,
    },

    /// The checklist item does not belong to the task.
    #[error("checklist item {item_id} not found on task {task_id}")]
    ChecklistItemNotFound {
        /// Task that was searched.
        task_id: TaskId,
        /// Item that was requested.
        item_id: ChecklistItemId,
    },
}

/// Error returned while parsing task statuses from requests or persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);
