//! Client-side task cache with derived board and list views.

use super::filter::TaskFilter;
use crate::{
    api::TaskResponse,
    task::domain::{TaskId, TaskStatus},
};
use std::collections::HashMap;

/// One board column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardColumn<'a> {
    /// Status shown in the column.
    pub status: TaskStatus,
    /// Column heading.
    pub label: &'static str,
    /// Matching tasks, most recently updated first.
    pub tasks: Vec<&'a TaskResponse>,
}

/// The single owned copy of every task known to the client.
///
/// Filtered views are computed on read so there is nothing to keep in
/// sync.
#[derive(Debug, Clone, Default)]
pub struct TaskCache {
    tasks: HashMap<TaskId, TaskResponse>,
}

impl TaskCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole contents with a server snapshot.
    pub fn replace_all(&mut self, tasks: impl IntoIterator<Item = TaskResponse>) {
        self.tasks = tasks.into_iter().map(|task| (task.id, task)).collect();
    }

    /// Inserts or replaces one task.
    pub fn upsert(&mut self, task: TaskResponse) {
        self.tasks.insert(task.id, task);
    }

    /// Removes a task, returning it when present.
    pub fn remove(&mut self, task_id: TaskId) -> Option<TaskResponse> {
        self.tasks.remove(&task_id)
    }

    /// Looks up a task.
    #[must_use]
    pub fn get(&self, task_id: TaskId) -> Option<&TaskResponse> {
        self.tasks.get(&task_id)
    }

    /// Overwrites the displayed status of a task and returns the previous
    /// one.
    pub fn set_status(&mut self, task_id: TaskId, status: TaskStatus) -> Option<TaskStatus> {
        self.tasks
            .get_mut(&task_id)
            .map(|task| std::mem::replace(&mut task.status, status))
    }

    /// Number of cached tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Returns `true` when no task is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Tasks passing `filter`, most recently updated first.
    #[must_use]
    pub fn visible(&self, filter: &TaskFilter) -> Vec<&TaskResponse> {
        let mut tasks: Vec<&TaskResponse> =
            self.tasks.values().filter(|task| filter.matches(task)).collect();
        tasks.sort_by(|left, right| {
            right
                .updated_at
                .cmp(&left.updated_at)
                .then_with(|| left.id.cmp(&right.id))
        });
        tasks
    }

    /// Tasks passing `filter`, grouped into one column per status in
    /// workflow order.
    #[must_use]
    pub fn columns(&self, filter: &TaskFilter) -> Vec<BoardColumn<'_>> {
        let visible = self.visible(filter);
        TaskStatus::ALL
            .into_iter()
            .map(|status| BoardColumn {
                status,
                label: status.label(),
                tasks: visible
                    .iter()
                    .copied()
                    .filter(|task| task.status == status)
                    .collect(),
            })
            .collect()
    }
}
