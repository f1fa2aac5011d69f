//! Repository port for task persistence.

use crate::task::domain::{
    ChecklistItem, ChecklistItemId, PrMetadata, StatusChange, Task, TaskId, TaskStatus,
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Task persistence contract.
///
/// Deleting a task removes its history, checklist, and metadata with it.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task together with its history, checklist, and metadata.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the task ID
    /// already exists.
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Persists title, description, and `updated_at` of an existing task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist.
    async fn update_details(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Atomically updates the task status and appends the history entry.
    ///
    /// The update only applies while the stored status still equals
    /// `change.previous`. Either both writes become visible or neither does.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task is gone and
    /// [`TaskRepositoryError::StatusConflict`] when its status moved on.
    async fn record_transition(&self, change: &StatusChange) -> TaskRepositoryResult<()>;

    /// Sets the checked flag on an item belonging to `task_id`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::ChecklistItemNotFound`] when no item
    /// with `item_id` belongs to `task_id`.
    async fn set_checklist_item(
        &self,
        task_id: TaskId,
        item_id: ChecklistItemId,
        checked: bool,
    ) -> TaskRepositoryResult<ChecklistItem>;

    /// Inserts or overwrites the metadata row for `metadata.task_id()`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist.
    async fn save_pr_metadata(&self, metadata: &PrMetadata) -> TaskRepositoryResult<PrMetadata>;

    /// Finds the metadata attached to a task.
    async fn find_pr_metadata(&self, task_id: TaskId) -> TaskRepositoryResult<Option<PrMetadata>>;

    /// Finds a task with its related records.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Returns all tasks, most recently updated first.
    async fn list(&self) -> TaskRepositoryResult<Vec<Task>>;

    /// Deletes a task and everything attached to it.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist.
    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()>;

    /// Verifies the backing store is reachable.
    async fn ping(&self) -> TaskRepositoryResult<()>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The checklist item was not found on the task.
    #[error("checklist item {item_id} not found on task {task_id}")]
    ChecklistItemNotFound {
        /// Task that was searched.
        task_id: TaskId,
        /// Requested item.
        item_id: ChecklistItemId,
    },

    /// The stored status no longer matches the status validated against.
    #[error("task {task_id} status changed concurrently: expected {expected}, found {actual}")]
    StatusConflict {
        /// Task being transitioned.
        task_id: TaskId,
        /// Status the transition was validated against.
        expected: TaskStatus,
        /// Status currently stored.
        actual: TaskStatus,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
