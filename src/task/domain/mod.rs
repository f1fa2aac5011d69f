//! Domain model for task tracking.
//!
//! The domain covers the workflow status ordering, the task aggregate with
//! its status history, pull request checklist and metadata, and the
//! transition rules. Infrastructure concerns stay outside this boundary.

mod checklist;
mod error;
mod history;
mod ids;
mod pr_metadata;
mod status;
mod task;
mod transition;

pub use checklist::{ChecklistItem, DEFAULT_PR_CHECKLIST, unchecked_count};
pub use error::{ParseTaskStatusError, TaskDomainError};
pub use history::{CREATED_NOTES, StatusHistoryEntry};
pub use ids::{ChecklistItemId, PrMetadataId, StatusHistoryId, TaskId};
pub use pr_metadata::{PersistedPrMetadata, PrMetadata, PrMetadataFields};
pub use status::TaskStatus;
pub use task::{PersistedTaskData, Task};
pub use transition::{StatusChange, TransitionMode, TransitionNotes, validate_transition};
