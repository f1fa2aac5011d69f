//! Service layer for task creation, editing, and workflow transitions.

use super::pr_description::{PrDescriptionError, render_pr_description};
use crate::task::{
    domain::{
        ChecklistItem, ChecklistItemId, ParseTaskStatusError, PrMetadata, PrMetadataFields, Task,
        TaskDomainError, TaskId, TaskStatus, TransitionMode, TransitionNotes,
    },
    ports::{TaskRepository, TaskRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    title: String,
    description: String,
    pr_metadata: PrMetadataFields,
}

impl CreateTaskRequest {
    /// Creates a request with the required task fields.
    #[must_use]
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            pr_metadata: PrMetadataFields::default(),
        }
    }

    /// Sets the initial pull request metadata.
    #[must_use]
    pub fn with_pr_metadata(mut self, fields: PrMetadataFields) -> Self {
        self.pr_metadata = fields;
        self
    }
}

/// Request payload for editing a task's title and description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateTaskRequest {
    task_id: TaskId,
    title: String,
    description: String,
}

impl UpdateTaskRequest {
    /// Creates an edit request.
    #[must_use]
    pub fn new(task_id: TaskId, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            task_id,
            title: title.into(),
            description: description.into(),
        }
    }
}

/// Request payload for a status change.
///
/// The status is kept as raw text so that notes are checked before the
/// status value is parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionTaskRequest {
    task_id: TaskId,
    status: String,
    notes: String,
    mode: TransitionMode,
}

impl TransitionTaskRequest {
    /// Creates a sequential transition request.
    #[must_use]
    pub fn new(task_id: TaskId, status: impl Into<String>, notes: impl Into<String>) -> Self {
        Self {
            task_id,
            status: status.into(),
            notes: notes.into(),
            mode: TransitionMode::Sequential,
        }
    }

    /// Sets the transition mode.
    #[must_use]
    pub const fn with_mode(mut self, mode: TransitionMode) -> Self {
        self.mode = mode;
        self
    }
}

/// Request payload for creating or updating pull request metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpsertPrMetadataRequest {
    task_id: TaskId,
    fields: PrMetadataFields,
}

impl UpsertPrMetadataRequest {
    /// Creates an upsert request. Fields left as `None` keep their value.
    #[must_use]
    pub const fn new(task_id: TaskId, fields: PrMetadataFields) -> Self {
        Self { task_id, fields }
    }
}

/// Service-level errors for task lifecycle operations.
#[derive(Debug, Error)]
pub enum TaskLifecycleError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),

    /// The requested status is not a known workflow status.
    #[error(transparent)]
    InvalidStatus(#[from] ParseTaskStatusError),

    /// The task does not exist.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The checklist item does not exist on the task.
    #[error("checklist item {item_id} not found on task {task_id}")]
    ChecklistItemNotFound {
        /// Task that was searched.
        task_id: TaskId,
        /// Requested item.
        item_id: ChecklistItemId,
    },

    /// The task has no pull request metadata.
    #[error("pull request metadata not found for task {0}")]
    PrMetadataNotFound(TaskId),

    /// The pull request description could not be rendered.
    #[error(transparent)]
    PrDescription(#[from] PrDescriptionError),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(TaskRepositoryError),
}

impl From<TaskRepositoryError> for TaskLifecycleError {
    fn from(err: TaskRepositoryError) -> Self {
        match err {
            TaskRepositoryError::NotFound(task_id) => Self::NotFound(task_id),
            TaskRepositoryError::ChecklistItemNotFound { task_id, item_id } => {
                Self::ChecklistItemNotFound { task_id, item_id }
            }
            other => Self::Repository(other),
        }
    }
}

/// Result type for task lifecycle service operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;

/// Task lifecycle orchestration service.
#[derive(Clone)]
pub struct TaskLifecycleService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> TaskLifecycleService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new task lifecycle service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Creates a task in the initial status with its checklist and
    /// metadata.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] when title or description is
    /// blank and [`TaskLifecycleError::Repository`] when persistence fails.
    pub async fn create_task(&self, request: CreateTaskRequest) -> TaskLifecycleResult<Task> {
        let task = Task::new(
            request.title,
            request.description,
            request.pr_metadata,
            &*self.clock,
        )?;
        self.repository.store(&task).await?;
        info!(task_id = %task.id(), "task created");
        Ok(task)
    }

    /// Finds a task by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when the lookup fails.
    pub async fn find_task(&self, task_id: TaskId) -> TaskLifecycleResult<Option<Task>> {
        Ok(self.repository.find_by_id(task_id).await?)
    }

    /// Loads a task that must exist.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] when the task does not exist.
    pub async fn get_task(&self, task_id: TaskId) -> TaskLifecycleResult<Task> {
        self.find_task(task_id)
            .await?
            .ok_or(TaskLifecycleError::NotFound(task_id))
    }

    /// Lists every task, most recently updated first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when the lookup fails.
    pub async fn list_tasks(&self) -> TaskLifecycleResult<Vec<Task>> {
        Ok(self.repository.list().await?)
    }

    /// Replaces title and description. Status and history are untouched.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] for blank fields and
    /// [`TaskLifecycleError::NotFound`] when the task does not exist.
    pub async fn update_task(&self, request: UpdateTaskRequest) -> TaskLifecycleResult<Task> {
        let mut task = self.get_task(request.task_id).await?;
        task.update_details(request.title, request.description, &*self.clock)?;
        self.repository.update_details(&task).await?;
        Ok(task)
    }

    /// Deletes a task together with its history, checklist, and metadata.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] when the task does not exist.
    pub async fn delete_task(&self, task_id: TaskId) -> TaskLifecycleResult<()> {
        self.repository.delete(task_id).await?;
        info!(%task_id, "task deleted");
        Ok(())
    }

    /// Sets the checked flag on one checklist item of a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::ChecklistItemNotFound`] when the item
    /// does not belong to the task.
    pub async fn set_checklist_item(
        &self,
        task_id: TaskId,
        item_id: ChecklistItemId,
        checked: bool,
    ) -> TaskLifecycleResult<ChecklistItem> {
        Ok(self
            .repository
            .set_checklist_item(task_id, item_id, checked)
            .await?)
    }

    /// Moves a task to a new status and records the history entry.
    ///
    /// Notes are validated first, then the status value, then the task is
    /// loaded and the transition rules applied. The status update and the
    /// history append are persisted together.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] for missing notes or a
    /// rejected transition, [`TaskLifecycleError::InvalidStatus`] for an
    /// unknown status, [`TaskLifecycleError::NotFound`] when the task does
    /// not exist, and [`TaskLifecycleError::Repository`] when the stored
    /// status changed concurrently or persistence fails.
    pub async fn transition_task(
        &self,
        request: TransitionTaskRequest,
    ) -> TaskLifecycleResult<Task> {
        let TransitionTaskRequest {
            task_id,
            status,
            notes,
            mode,
        } = request;
        let checked_notes = TransitionNotes::new(notes)?;
        let requested = TaskStatus::try_from(status.as_str())?;
        let mut task = self.get_task(task_id).await?;
        let current = task.status();

        let change = task
            .transition_to(requested, checked_notes, mode, &*self.clock)
            .inspect_err(|err| {
                warn!(
                    %task_id,
                    from = %current,
                    to = %requested,
                    mode = mode.as_str(),
                    %err,
                    "transition rejected"
                );
            })?;
        self.repository.record_transition(&change).await?;
        info!(
            %task_id,
            from = %change.previous,
            to = %change.next(),
            mode = mode.as_str(),
            "task status changed"
        );
        Ok(task)
    }

    /// Returns the pull request metadata of a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::PrMetadataNotFound`] when the task has
    /// none.
    pub async fn get_pr_metadata(&self, task_id: TaskId) -> TaskLifecycleResult<PrMetadata> {
        self.repository
            .find_pr_metadata(task_id)
            .await?
            .ok_or(TaskLifecycleError::PrMetadataNotFound(task_id))
    }

    /// Overwrites the provided metadata fields, creating the row when the
    /// task has none.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] when the task does not exist.
    pub async fn upsert_pr_metadata(
        &self,
        request: UpsertPrMetadataRequest,
    ) -> TaskLifecycleResult<PrMetadata> {
        let UpsertPrMetadataRequest { task_id, fields } = request;
        let mut metadata = self
            .repository
            .find_pr_metadata(task_id)
            .await?
            .unwrap_or_else(|| PrMetadata::new(task_id, PrMetadataFields::default()));
        metadata.apply(fields);
        Ok(self.repository.save_pr_metadata(&metadata).await?)
    }

    /// Renders the markdown pull request body for a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] when the task does not exist
    /// and [`TaskLifecycleError::PrDescription`] when rendering fails.
    pub async fn render_pr_description(&self, task_id: TaskId) -> TaskLifecycleResult<String> {
        let task = self.get_task(task_id).await?;
        Ok(render_pr_description(&task)?)
    }

    /// Verifies the repository is reachable.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when it is not.
    pub async fn check_health(&self) -> TaskLifecycleResult<()> {
        Ok(self.repository.ping().await?)
    }
}
