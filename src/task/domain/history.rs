//! Append-only status history entries.

use super::{StatusHistoryId, TaskId, TaskStatus, TransitionNotes};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Notes recorded on the history entry seeded at task creation.
pub const CREATED_NOTES: &str = "Task created";

/// One audit-trail record of a status the task entered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusHistoryEntry {
    id: StatusHistoryId,
    task_id: TaskId,
    status: TaskStatus,
    notes: String,
    created_at: DateTime<Utc>,
}

impl StatusHistoryEntry {
    /// Creates a new entry stamped with `created_at`.
    #[must_use]
    pub fn new(
        task_id: TaskId,
        status: TaskStatus,
        notes: TransitionNotes,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: StatusHistoryId::new(),
            task_id,
            status,
            notes: notes.into_inner(),
            created_at,
        }
    }

    /// Reconstructs an entry from persisted storage.
    #[must_use]
    pub const fn from_persisted(
        id: StatusHistoryId,
        task_id: TaskId,
        status: TaskStatus,
        notes: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            task_id,
            status,
            notes,
            created_at,
        }
    }

    /// Returns the entry identifier.
    #[must_use]
    pub const fn id(&self) -> StatusHistoryId {
        self.id
    }

    /// Returns the owning task identifier.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the status that was entered.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the notes submitted with the change.
    #[must_use]
    pub fn notes(&self) -> &str {
        &self.notes
    }

    /// Returns when the entry was recorded.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
