//! Task aggregate root.

use super::{
    CREATED_NOTES, ChecklistItem, ChecklistItemId, PrMetadata, PrMetadataFields, StatusChange,
    StatusHistoryEntry, TaskDomainError, TaskId, TaskStatus, TransitionMode, TransitionNotes,
    unchecked_count, validate_transition,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Task aggregate root.
///
/// `status` always equals the status of the most recent history entry.
/// History is kept in chronological order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    title: String,
    description: String,
    status: TaskStatus,
    history: Vec<StatusHistoryEntry>,
    checklist: Vec<ChecklistItem>,
    pr_metadata: Option<PrMetadata>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted title.
    pub title: String,
    /// Persisted description.
    pub description: String,
    /// Persisted workflow status.
    pub status: TaskStatus,
    /// Persisted history in chronological order.
    pub history: Vec<StatusHistoryEntry>,
    /// Persisted checklist in template order.
    pub checklist: Vec<ChecklistItem>,
    /// Persisted pull request metadata, if any.
    pub pr_metadata: Option<PrMetadata>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a task in the initial status with one seeded history entry,
    /// the default checklist, and eager pull request metadata.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] or
    /// [`TaskDomainError::EmptyDescription`] when either is blank.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        pr_fields: PrMetadataFields,
        clock: &impl Clock,
    ) -> Result<Self, TaskDomainError> {
        let checked_title = required_text(title.into(), TaskDomainError::EmptyTitle)?;
        let checked_description =
            required_text(description.into(), TaskDomainError::EmptyDescription)?;
        let timestamp = clock.utc();
        let id = TaskId::new();
        let seeded = StatusHistoryEntry::new(
            id,
            TaskStatus::INITIAL,
            TransitionNotes::new(CREATED_NOTES)?,
            timestamp,
        );

        Ok(Self {
            id,
            title: checked_title,
            description: checked_description,
            status: TaskStatus::INITIAL,
            history: vec![seeded],
            checklist: ChecklistItem::from_template(id),
            pr_metadata: Some(PrMetadata::new(id, pr_fields)),
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            description: data.description,
            status: data.status,
            history: data.history,
            checklist: data.checklist,
            pr_metadata: data.pr_metadata,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Decomposes the aggregate into its persisted form.
    #[must_use]
    pub fn into_persisted(self) -> PersistedTaskData {
        PersistedTaskData {
            id: self.id,
            title: self.title,
            description: self.description,
            status: self.status,
            history: self.history,
            checklist: self.checklist,
            pr_metadata: self.pr_metadata,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the current workflow status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the history in chronological order.
    #[must_use]
    pub fn history(&self) -> &[StatusHistoryEntry] {
        &self.history
    }

    /// Iterates the history from the most recent entry backwards.
    pub fn history_most_recent_first(&self) -> impl Iterator<Item = &StatusHistoryEntry> {
        self.history.iter().rev()
    }

    /// Returns the most recent history entry.
    #[must_use]
    pub fn latest_history(&self) -> Option<&StatusHistoryEntry> {
        self.history.last()
    }

    /// Returns the pull request checklist in template order.
    #[must_use]
    pub fn checklist(&self) -> &[ChecklistItem] {
        &self.checklist
    }

    /// Returns the pull request metadata, if any.
    #[must_use]
    pub const fn pr_metadata(&self) -> Option<&PrMetadata> {
        self.pr_metadata.as_ref()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Replaces title and description. Status and history are untouched.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] or
    /// [`TaskDomainError::EmptyDescription`] without mutating the task.
    pub fn update_details(
        &mut self,
        title: impl Into<String>,
        description: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        let checked_title = required_text(title.into(), TaskDomainError::EmptyTitle)?;
        let checked_description =
            required_text(description.into(), TaskDomainError::EmptyDescription)?;
        self.title = checked_title;
        self.description = checked_description;
        self.touch(clock);
        Ok(())
    }

    /// Validates and applies a status change.
    ///
    /// On success the task holds the new status, the history has one more
    /// entry, and the returned [`StatusChange`] describes what must be
    /// persisted. On failure nothing changes.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::OutOfSequence`] or
    /// [`TaskDomainError::ChecklistIncomplete`].
    pub fn transition_to(
        &mut self,
        requested: TaskStatus,
        notes: TransitionNotes,
        mode: TransitionMode,
        clock: &impl Clock,
    ) -> Result<StatusChange, TaskDomainError> {
        validate_transition(
            self.id,
            self.status,
            requested,
            mode,
            unchecked_count(&self.checklist),
        )?;

        let timestamp = clock.utc();
        let change = StatusChange {
            task_id: self.id,
            previous: self.status,
            entry: StatusHistoryEntry::new(self.id, requested, notes, timestamp),
            updated_at: timestamp,
        };
        self.apply_status_change(&change);
        Ok(change)
    }

    /// Sets the checked flag of one of this task's checklist items.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::ChecklistItemNotFound`] when the item does
    /// not belong to this task.
    pub fn set_checklist_item(
        &mut self,
        item_id: ChecklistItemId,
        checked: bool,
    ) -> Result<&ChecklistItem, TaskDomainError> {
        let task_id = self.id;
        let item = self
            .checklist
            .iter_mut()
            .find(|item| item.id() == item_id)
            .ok_or(TaskDomainError::ChecklistItemNotFound { task_id, item_id })?;
        item.set_checked(checked);
        Ok(item)
    }

    /// Applies an already validated status change.
    pub(crate) fn apply_status_change(&mut self, change: &StatusChange) {
        self.status = change.next();
        self.history.push(change.entry.clone());
        self.updated_at = change.updated_at;
    }

    /// Replaces the pull request metadata.
    pub(crate) fn replace_pr_metadata(&mut self, metadata: PrMetadata) {
        self.pr_metadata = Some(metadata);
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}

/// Trims `value` and rejects it with `empty_error` when nothing remains.
fn required_text(value: String, empty_error: TaskDomainError) -> Result<String, TaskDomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(empty_error);
    }
    Ok(trimmed.to_owned())
}
