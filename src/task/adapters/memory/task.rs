//! In-memory repository for task tracking tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::task::{
    domain::{ChecklistItem, ChecklistItemId, PrMetadata, StatusChange, Task, TaskId},
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};

/// Thread-safe in-memory task repository.
///
/// Every operation holds the state lock for its whole duration, so a
/// status change and its history entry are applied together.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<InMemoryTaskState>>,
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    tasks: HashMap<TaskId, Task>,
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> TaskRepositoryResult<RwLockReadGuard<'_, InMemoryTaskState>> {
        self.state.read().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(&self) -> TaskRepositoryResult<RwLockWriteGuard<'_, InMemoryTaskState>> {
        self.state.write().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

impl InMemoryTaskState {
    fn task_mut(&mut self, id: TaskId) -> TaskRepositoryResult<&mut Task> {
        self.tasks
            .get_mut(&id)
            .ok_or(TaskRepositoryError::NotFound(id))
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.write()?;
        if state.tasks.contains_key(&task.id()) {
            return Err(TaskRepositoryError::DuplicateTask(task.id()));
        }
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn update_details(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.write()?;
        let stored = state.task_mut(task.id())?;

        let mut data = stored.clone().into_persisted();
        task.title().clone_into(&mut data.title);
        task.description().clone_into(&mut data.description);
        data.updated_at = task.updated_at();
        *stored = Task::from_persisted(data);
        Ok(())
    }

    async fn record_transition(&self, change: &StatusChange) -> TaskRepositoryResult<()> {
        let mut state = self.write()?;
        let stored = state.task_mut(change.task_id)?;
        if stored.status() != change.previous {
            return Err(TaskRepositoryError::StatusConflict {
                task_id: change.task_id,
                expected: change.previous,
                actual: stored.status(),
            });
        }
        stored.apply_status_change(change);
        Ok(())
    }

    async fn set_checklist_item(
        &self,
        task_id: TaskId,
        item_id: ChecklistItemId,
        checked: bool,
    ) -> TaskRepositoryResult<ChecklistItem> {
        let mut state = self.write()?;
        let not_found = TaskRepositoryError::ChecklistItemNotFound { task_id, item_id };
        let stored = state.tasks.get_mut(&task_id).ok_or_else(|| not_found.clone())?;
        stored
            .set_checklist_item(item_id, checked)
            .cloned()
            .map_err(|_| not_found)
    }

    async fn save_pr_metadata(&self, metadata: &PrMetadata) -> TaskRepositoryResult<PrMetadata> {
        let mut state = self.write()?;
        let stored = state.task_mut(metadata.task_id())?;
        stored.replace_pr_metadata(metadata.clone());
        Ok(metadata.clone())
    }

    async fn find_pr_metadata(&self, task_id: TaskId) -> TaskRepositoryResult<Option<PrMetadata>> {
        let state = self.read()?;
        Ok(state
            .tasks
            .get(&task_id)
            .and_then(|task| task.pr_metadata().cloned()))
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let state = self.read()?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn list(&self) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.read()?;
        let mut tasks: Vec<Task> = state.tasks.values().cloned().collect();
        tasks.sort_by(|left, right| right.updated_at().cmp(&left.updated_at()));
        Ok(tasks)
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        let mut state = self.write()?;
        state
            .tasks
            .remove(&id)
            .map(|_| ())
            .ok_or(TaskRepositoryError::NotFound(id))
    }

    async fn ping(&self) -> TaskRepositoryResult<()> {
        self.read().map(|_| ())
    }
}
