//! Pull request checklist items and the fixed per-task template.

use super::{ChecklistItemId, TaskId};
use serde::{Deserialize, Serialize};

/// Checklist text cloned onto every new task, in display order.
pub const DEFAULT_PR_CHECKLIST: [&str; 8] = [
    "Code follows project style guidelines",
    "All tests are passing",
    "Documentation has been updated",
    "Self-review has been completed",
    "No unnecessary debug code or comments",
    "No sensitive information is exposed",
    "Performance considerations have been addressed",
    "Accessibility requirements have been met",
];

/// A single pull request checklist entry owned by a task.
///
/// Text is fixed at task creation; only the checked flag changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    id: ChecklistItemId,
    task_id: TaskId,
    text: String,
    checked: bool,
}

impl ChecklistItem {
    /// Clones the default template into unchecked items for `task_id`.
    #[must_use]
    pub fn from_template(task_id: TaskId) -> Vec<Self> {
        DEFAULT_PR_CHECKLIST
            .iter()
            .map(|text| Self {
                id: ChecklistItemId::new(),
                task_id,
                text: (*text).to_owned(),
                checked: false,
            })
            .collect()
    }

    /// Reconstructs an item from persisted storage.
    #[must_use]
    pub const fn from_persisted(
        id: ChecklistItemId,
        task_id: TaskId,
        text: String,
        checked: bool,
    ) -> Self {
        Self {
            id,
            task_id,
            text,
            checked,
        }
    }

    /// Returns the item identifier.
    #[must_use]
    pub const fn id(&self) -> ChecklistItemId {
        self.id
    }

    /// Returns the owning task identifier.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the checklist text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns whether the item is checked.
    #[must_use]
    pub const fn checked(&self) -> bool {
        self.checked
    }

    pub(crate) const fn set_checked(&mut self, checked: bool) {
        self.checked = checked;
    }
}

/// Counts unchecked items in a checklist.
#[must_use]
pub fn unchecked_count(items: &[ChecklistItem]) -> usize {
    items.iter().filter(|item| !item.checked()).count()
}
