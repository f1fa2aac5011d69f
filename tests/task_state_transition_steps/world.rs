//! Shared world state for task state transition BDD scenarios.

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use taskflow::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::Task,
    services::{TaskLifecycleError, TaskLifecycleService, TransitionTaskRequest},
};

/// Service type used by the BDD world.
pub type TestTaskService = TaskLifecycleService<InMemoryTaskRepository, DefaultClock>;

/// Scenario world for task transition behaviour tests.
pub struct TaskTransitionWorld {
    pub service: TestTaskService,
    pub task: Option<Task>,
    pub last_transition_result: Option<Result<Task, TaskLifecycleError>>,
}

impl TaskTransitionWorld {
    /// Creates a world with no task yet.
    #[must_use]
    pub fn new() -> Self {
        let service = TaskLifecycleService::new(
            Arc::new(InMemoryTaskRepository::new()),
            Arc::new(DefaultClock),
        );

        Self {
            service,
            task: None,
            last_transition_result: None,
        }
    }

    /// Returns the task created by the scenario.
    ///
    /// # Errors
    ///
    /// Returns an error when no task has been created yet.
    pub fn task(&self) -> Result<&Task, eyre::Report> {
        self.task
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing task in scenario world"))
    }

    /// Sends a transition and records its result, keeping the task current
    /// on success.
    pub fn transition(&mut self, request: TransitionTaskRequest) {
        let result = run_async(self.service.transition_task(request));
        if let Ok(updated) = &result {
            self.task = Some(updated.clone());
        }
        self.last_transition_result = Some(result);
    }

    /// Reloads the task from the service.
    ///
    /// # Errors
    ///
    /// Returns an error when the task is missing or cannot be fetched.
    pub fn reload(&mut self) -> Result<&Task, eyre::Report> {
        let task_id = self.task()?.id();
        let stored = run_async(self.service.get_task(task_id))?;
        Ok(self.task.insert(stored))
    }
}

impl Default for TaskTransitionWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> TaskTransitionWorld {
    TaskTransitionWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
