//! JSON bodies exchanged over the HTTP interface.
//!
//! Request bodies keep required fields optional so that a missing field is
//! reported as a validation error with a readable message rather than a
//! framework rejection.

use crate::task::domain::{
    ChecklistItem, PrMetadata, PrMetadataFields, StatusHistoryEntry, Task, TaskId, TaskStatus,
    TransitionMode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body of `POST /tasks`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTaskBody {
    /// Task title.
    pub title: Option<String>,
    /// Task description.
    pub description: Option<String>,
    /// Initial pull request metadata.
    pub pr_metadata: Option<PrMetadataFields>,
}

/// Body of `PUT /tasks/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateTaskBody {
    /// New title.
    pub title: Option<String>,
    /// New description.
    pub description: Option<String>,
}

/// Body of `POST /tasks/{id}/status`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionBody {
    /// Requested status, in either wire form.
    pub status: Option<String>,
    /// Mandatory notes for the history entry.
    pub notes: Option<String>,
    /// Validation mode; sequential when omitted.
    #[serde(default)]
    pub mode: TransitionMode,
}

/// Body of `PUT /tasks/{id}/checklist/{item_id}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistBody {
    /// New checked flag.
    pub checked: Option<bool>,
}

/// Task representation returned by every task endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskResponse {
    /// Task identifier.
    pub id: TaskId,
    /// Title.
    pub title: String,
    /// Description.
    pub description: String,
    /// Current status.
    pub status: TaskStatus,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
    /// History, most recent entry first.
    pub status_history: Vec<StatusHistoryEntry>,
    /// Checklist in template order.
    pub pr_checklist: Vec<ChecklistItem>,
    /// Pull request metadata, when present.
    pub pr_metadata: Option<PrMetadata>,
}

impl From<&Task> for TaskResponse {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id(),
            title: task.title().to_owned(),
            description: task.description().to_owned(),
            status: task.status(),
            created_at: task.created_at(),
            updated_at: task.updated_at(),
            status_history: task.history_most_recent_first().cloned().collect(),
            pr_checklist: task.checklist().to_vec(),
            pr_metadata: task.pr_metadata().cloned(),
        }
    }
}

/// Confirmation returned by `DELETE /tasks/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Human-readable confirmation.
    pub message: String,
}

/// Rendered pull request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrDescriptionResponse {
    /// Markdown text.
    pub markdown: String,
}

/// Result of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"ok"` when the repository answered.
    pub status: String,
}
