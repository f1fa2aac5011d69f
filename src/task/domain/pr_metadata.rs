//! Pull request metadata attached one-to-one to a task.

use super::{PrMetadataId, TaskId};
use serde::{Deserialize, Serialize};

/// Free-text pull request metadata. Empty strings mean "not set".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrMetadata {
    id: PrMetadataId,
    task_id: TaskId,
    ticket_id: String,
    ticket_link: String,
    description: String,
    testing_plan: String,
}

/// Partial update applied to [`PrMetadata`].
///
/// `None` leaves the stored value untouched, so replaying the same update
/// yields the same state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrMetadataFields {
    /// External ticket identifier, such as `TASK-123`.
    pub ticket_id: Option<String>,
    /// Link to the external ticket.
    pub ticket_link: Option<String>,
    /// Pull request description.
    pub description: Option<String>,
    /// Testing plan for reviewers.
    pub testing_plan: Option<String>,
}

impl PrMetadata {
    /// Creates metadata for `task_id`, defaulting missing fields to empty
    /// strings.
    #[must_use]
    pub fn new(task_id: TaskId, fields: PrMetadataFields) -> Self {
        Self {
            id: PrMetadataId::new(),
            task_id,
            ticket_id: fields.ticket_id.unwrap_or_default(),
            ticket_link: fields.ticket_link.unwrap_or_default(),
            description: fields.description.unwrap_or_default(),
            testing_plan: fields.testing_plan.unwrap_or_default(),
        }
    }

    /// Parameter-object reconstruction from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedPrMetadata) -> Self {
        Self {
            id: data.id,
            task_id: data.task_id,
            ticket_id: data.ticket_id,
            ticket_link: data.ticket_link,
            description: data.description,
            testing_plan: data.testing_plan,
        }
    }

    /// Overwrites every field present in `fields`.
    pub fn apply(&mut self, fields: PrMetadataFields) {
        if let Some(ticket_id) = fields.ticket_id {
            self.ticket_id = ticket_id;
        }
        if let Some(ticket_link) = fields.ticket_link {
            self.ticket_link = ticket_link;
        }
        if let Some(description) = fields.description {
            self.description = description;
        }
        if let Some(testing_plan) = fields.testing_plan {
            self.testing_plan = testing_plan;
        }
    }

    /// Returns the metadata identifier.
    #[must_use]
    pub const fn id(&self) -> PrMetadataId {
        self.id
    }

    /// Returns the owning task identifier.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the external ticket identifier.
    #[must_use]
    pub fn ticket_id(&self) -> &str {
        &self.ticket_id
    }

    /// Returns the external ticket link.
    #[must_use]
    pub fn ticket_link(&self) -> &str {
        &self.ticket_link
    }

    /// Returns the pull request description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the testing plan.
    #[must_use]
    pub fn testing_plan(&self) -> &str {
        &self.testing_plan
    }
}

/// Parameter object for reconstructing persisted metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedPrMetadata {
    /// Persisted metadata identifier.
    pub id: PrMetadataId,
    /// Owning task.
    pub task_id: TaskId,
    /// External ticket identifier.
    pub ticket_id: String,
    /// External ticket link.
    pub ticket_link: String,
    /// Pull request description.
    pub description: String,
    /// Testing plan.
    pub testing_plan: String,
}
