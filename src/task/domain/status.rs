//! Workflow status enumeration and its total ordering.

use super::ParseTaskStatusError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Workflow stage of a task.
///
/// Declaration order is the workflow order. [`TaskStatus::next`] and the
/// transition rules depend on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// The problem is being investigated.
    Investigation,
    /// Work is being planned.
    Planning,
    /// The change is being implemented.
    InProgress,
    /// The change is being tested.
    InTesting,
    /// The pull request is under review.
    InReview,
    /// The task is complete.
    Done,
}

impl TaskStatus {
    /// Every status in workflow order.
    pub const ALL: [Self; 6] = [
        Self::Investigation,
        Self::Planning,
        Self::InProgress,
        Self::InTesting,
        Self::InReview,
        Self::Done,
    ];

    /// Status assigned to newly created tasks.
    pub const INITIAL: Self = Self::Investigation;

    /// Returns the status immediately after this one, or `None` for the
    /// terminal status.
    ///
    /// # Examples
    ///
    ///     use taskflow::task::domain::TaskStatus;
    ///
    ///     assert_eq!(TaskStatus::InReview.next(), Some(TaskStatus::Done));
    ///     assert_eq!(TaskStatus::Done.next(), None);
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Investigation => Some(Self::Planning),
            Self::Planning => Some(Self::InProgress),
            Self::InProgress => Some(Self::InTesting),
            Self::InTesting => Some(Self::InReview),
            Self::InReview => Some(Self::Done),
            Self::Done => None,
        }
    }

    /// Returns `true` when no sequential transition leaves this status.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        self.next().is_none()
    }

    /// Returns the canonical storage and wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Investigation => "investigation",
            Self::Planning => "planning",
            Self::InProgress => "in_progress",
            Self::InTesting => "in_testing",
            Self::InReview => "in_review",
            Self::Done => "done",
        }
    }

    /// Returns the human-readable label shown on board columns.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Investigation => "Investigation",
            Self::Planning => "Planning",
            Self::InProgress => "In Progress",
            Self::InTesting => "In Testing",
            Self::InReview => "In Review",
            Self::Done => "Done",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    /// Parses either the snake_case form or the upper-case legacy form
    /// (`IN_PROGRESS`); matching ignores case and surrounding whitespace.
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "investigation" => Ok(Self::Investigation),
            "planning" => Ok(Self::Planning),
            "in_progress" => Ok(Self::InProgress),
            "in_testing" => Ok(Self::InTesting),
            "in_review" => Ok(Self::InReview),
            "done" => Ok(Self::Done),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

impl FromStr for TaskStatus {
    type Err = ParseTaskStatusError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::try_from(value)
    }
}
