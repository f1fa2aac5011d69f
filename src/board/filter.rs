//! Pure task filters for the board and list views.

use crate::{api::TaskResponse, task::domain::TaskStatus};

/// Query parameter carrying the status filter.
pub const STATUS_PARAM: &str = "status";
/// Query parameter carrying the free-text search.
pub const QUERY_PARAM: &str = "q";

const ALL_STATUSES: &str = "all";

/// Restriction on task status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum StatusFilter {
    /// Every status passes.
    #[default]
    All,
    /// Only tasks in this status pass.
    Only(TaskStatus),
}

impl StatusFilter {
    /// Returns `true` when `status` passes the filter.
    #[must_use]
    pub fn accepts(self, status: TaskStatus) -> bool {
        match self {
            Self::All => true,
            Self::Only(only) => only == status,
        }
    }

    /// Parses a query parameter value. Unknown values mean [`Self::All`].
    #[must_use]
    pub fn from_param(value: &str) -> Self {
        TaskStatus::try_from(value).map_or(Self::All, Self::Only)
    }

    /// Returns the query parameter value.
    #[must_use]
    pub const fn as_param(self) -> &'static str {
        match self {
            Self::All => ALL_STATUSES,
            Self::Only(status) => status.as_str(),
        }
    }
}

/// Status restriction combined with a case-insensitive text search.
///
/// Both parts must match. A blank query matches every task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    /// Status restriction.
    pub status: StatusFilter,
    /// Free-text search over title, description, and history notes.
    pub query: String,
}

impl TaskFilter {
    /// Creates a filter.
    #[must_use]
    pub fn new(status: StatusFilter, query: impl Into<String>) -> Self {
        Self {
            status,
            query: query.into(),
        }
    }

    /// Returns `true` when `task` passes both the status and text checks.
    #[must_use]
    pub fn matches(&self, task: &TaskResponse) -> bool {
        self.status.accepts(task.status) && self.matches_text(task)
    }

    fn matches_text(&self, task: &TaskResponse) -> bool {
        let needle = self.query.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        let contains = |haystack: &str| haystack.to_lowercase().contains(&needle);
        contains(&task.title)
            || contains(&task.description)
            || task
                .status_history
                .iter()
                .any(|entry| contains(entry.notes()))
    }

    /// Encodes the filter as URL query parameters. A blank query is left
    /// out.
    #[must_use]
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![(STATUS_PARAM, self.status.as_param().to_owned())];
        let query = self.query.trim();
        if !query.is_empty() {
            pairs.push((QUERY_PARAM, query.to_owned()));
        }
        pairs
    }

    /// Restores a filter from URL query parameters. Missing or invalid
    /// values fall back to the defaults.
    #[must_use]
    pub fn from_query_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        pairs
            .into_iter()
            .fold(Self::default(), |mut filter, (key, value)| {
                match key {
                    STATUS_PARAM => filter.status = StatusFilter::from_param(value),
                    QUERY_PARAM => value.clone_into(&mut filter.query),
                    _ => {}
                }
                filter
            })
    }
}
