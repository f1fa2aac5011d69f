//! Diesel row models for task persistence.

use super::schema::{task_pr_checklist_items, task_pr_metadata, task_status_history, tasks};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Task title.
    pub title: String,
    /// Task description.
    pub description: String,
    /// Workflow status.
    pub status: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for task records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Task title.
    pub title: String,
    /// Task description.
    pub description: String,
    /// Workflow status.
    pub status: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Query result row for status history entries.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = task_status_history)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct StatusHistoryRow {
    /// History entry identifier.
    pub id: uuid::Uuid,
    /// Owning task.
    pub task_id: uuid::Uuid,
    /// Status entered.
    pub status: String,
    /// Submitted notes.
    pub notes: String,
    /// Recording timestamp.
    pub created_at: DateTime<Utc>,
}

/// Insert model for status history entries. `seq` is assigned by the
/// database.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = task_status_history)]
pub struct NewStatusHistoryRow {
    /// History entry identifier.
    pub id: uuid::Uuid,
    /// Owning task.
    pub task_id: uuid::Uuid,
    /// Status entered.
    pub status: String,
    /// Submitted notes.
    pub notes: String,
    /// Recording timestamp.
    pub created_at: DateTime<Utc>,
}

/// Row model for checklist items, used for both reads and inserts.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = task_pr_checklist_items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ChecklistItemRow {
    /// Item identifier.
    pub id: uuid::Uuid,
    /// Owning task.
    pub task_id: uuid::Uuid,
    /// Template position.
    pub position: i32,
    /// Checklist text.
    pub text: String,
    /// Checked flag.
    pub checked: bool,
}

/// Row model for pull request metadata, used for reads and inserts.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = task_pr_metadata)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PrMetadataRow {
    /// Metadata identifier.
    pub id: uuid::Uuid,
    /// Owning task.
    pub task_id: uuid::Uuid,
    /// External ticket identifier.
    pub ticket_id: String,
    /// External ticket link.
    pub ticket_link: String,
    /// Pull request description.
    pub description: String,
    /// Testing plan.
    pub testing_plan: String,
}
