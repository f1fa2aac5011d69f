//! Board state: the task cache plus optimistic moves and refresh.

use super::{
    cache::{BoardColumn, TaskCache},
    client::{ClientError, TaskApi},
    filter::TaskFilter,
    refresh::RefreshGate,
};
use crate::{
    api::{CreateTaskBody, TaskResponse, TransitionBody},
    task::domain::{TaskId, TaskStatus, TransitionMode},
};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Age after which an unsettled move stops pinning its task during
/// reconciliation.
pub const DEFAULT_MOVE_TIMEOUT: Duration = Duration::from_secs(30);

/// Handle for an optimistic move awaiting the server's answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveTicket {
    /// Task being moved.
    pub task_id: TaskId,
    /// Last status the server confirmed; restored if the move fails.
    pub previous: TaskStatus,
    /// Status shown while the request is in flight.
    pub target: TaskStatus,
    /// Orders moves of the same task. Only the newest may settle.
    pub generation: u64,
}

/// How a move settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The server accepted the move; the cache holds its copy of the task.
    Confirmed,
    /// The server rejected the move and the previous status was restored.
    RolledBack {
        /// Message to show the user.
        message: String,
    },
    /// A newer move of the same task superseded this one.
    Stale,
}

/// Newest unsettled move of one task.
#[derive(Debug, Clone, Copy)]
struct PendingMove {
    generation: u64,
    confirmed: TaskStatus,
    started_at: Instant,
}

/// Kanban board and list state for one client.
pub struct Board<A: TaskApi> {
    api: A,
    cache: TaskCache,
    filter: TaskFilter,
    refresh: RefreshGate,
    in_flight: HashMap<TaskId, PendingMove>,
    next_generation: u64,
    move_timeout: Duration,
}

impl<A: TaskApi> Board<A> {
    /// Creates an empty board using default refresh timings.
    #[must_use]
    pub fn new(api: A) -> Self {
        Self::with_refresh_gate(api, RefreshGate::default())
    }

    /// Creates an empty board with custom refresh timings.
    #[must_use]
    pub fn with_refresh_gate(api: A, refresh: RefreshGate) -> Self {
        Self {
            api,
            cache: TaskCache::new(),
            filter: TaskFilter::default(),
            refresh,
            in_flight: HashMap::new(),
            next_generation: 0,
            move_timeout: DEFAULT_MOVE_TIMEOUT,
        }
    }

    /// Sets how long an unsettled move keeps its optimistic status across
    /// reloads.
    #[must_use]
    pub const fn with_move_timeout(mut self, timeout: Duration) -> Self {
        self.move_timeout = timeout;
        self
    }

    /// Returns `true` while a move of `task_id` awaits the server.
    #[must_use]
    pub fn is_moving(&self, task_id: TaskId) -> bool {
        self.in_flight.contains_key(&task_id)
    }

    /// Returns the task cache.
    #[must_use]
    pub const fn cache(&self) -> &TaskCache {
        &self.cache
    }

    /// Returns the active filter.
    #[must_use]
    pub const fn filter(&self) -> &TaskFilter {
        &self.filter
    }

    /// Replaces the active filter. The cache is not touched.
    pub fn set_filter(&mut self, filter: TaskFilter) {
        self.filter = filter;
    }

    /// Tasks for the list view.
    #[must_use]
    pub fn visible(&self) -> Vec<&TaskResponse> {
        self.cache.visible(&self.filter)
    }

    /// Columns for the board view.
    #[must_use]
    pub fn columns(&self) -> Vec<BoardColumn<'_>> {
        self.cache.columns(&self.filter)
    }

    /// Loads every task from the server, replacing the cache.
    ///
    /// # Errors
    ///
    /// Returns the [`ClientError`] of the failed request; the cache is left
    /// as it was.
    pub async fn load(&mut self, now: Instant) -> Result<(), ClientError> {
        let tasks = self.api.list_tasks().await?;
        self.reconcile(tasks, now);
        self.refresh.mark_refreshed(now);
        Ok(())
    }

    /// Inserts or replaces a task in the cache, for example after an edit
    /// made outside the board.
    pub fn upsert_task(&mut self, task: TaskResponse) {
        self.cache.upsert(task);
    }

    /// Drops a task from the cache and forgets any move in flight for it.
    pub fn remove_task(&mut self, task_id: TaskId) -> Option<TaskResponse> {
        self.in_flight.remove(&task_id);
        self.cache.remove(task_id)
    }

    /// Creates a task and adds it to the cache.
    ///
    /// # Errors
    ///
    /// Returns the [`ClientError`] of the failed request.
    pub async fn create_task(&mut self, body: CreateTaskBody) -> Result<TaskId, ClientError> {
        let task = self.api.create_task(body).await?;
        let task_id = task.id;
        self.cache.upsert(task);
        Ok(task_id)
    }

    /// Records that the user picked up a card.
    pub const fn drag_started(&mut self) {
        self.refresh.drag_started();
    }

    /// Records that the user dropped a card.
    pub const fn drag_ended(&mut self, now: Instant) {
        self.refresh.drag_ended(now);
    }

    /// Reloads tasks when the refresh gate allows it.
    ///
    /// Tasks with a move in flight keep the status shown to the user.
    /// Returns `true` when a reload happened.
    ///
    /// # Errors
    ///
    /// Returns the [`ClientError`] of the failed request.
    pub async fn refresh_if_due(&mut self, now: Instant) -> Result<bool, ClientError> {
        if !self.refresh.refresh_due(now) {
            return Ok(false);
        }
        self.load(now).await?;
        Ok(true)
    }

    /// Shows `task_id` in `target` immediately.
    ///
    /// A move started while another move of the same task is unsettled
    /// supersedes it and inherits its last confirmed status. Returns `None`
    /// when the task is not cached or already shown in `target`.
    pub fn begin_move(
        &mut self,
        task_id: TaskId,
        target: TaskStatus,
        now: Instant,
    ) -> Option<MoveTicket> {
        let shown = self.cache.get(task_id)?.status;
        if shown == target {
            return None;
        }
        let confirmed = self
            .in_flight
            .get(&task_id)
            .map_or(shown, |pending| pending.confirmed);
        self.cache.set_status(task_id, target);
        let generation = self.next_generation;
        self.next_generation += 1;
        self.in_flight.insert(
            task_id,
            PendingMove {
                generation,
                confirmed,
                started_at: now,
            },
        );
        Some(MoveTicket {
            task_id,
            previous: confirmed,
            target,
            generation,
        })
    }

    /// Settles a move with the server's answer.
    ///
    /// Answers for a move that a newer move of the same task superseded are
    /// discarded, though an accepted one still updates the status the newer
    /// move falls back to. A failed move restores the last status the
    /// server confirmed.
    pub fn complete_move(
        &mut self,
        ticket: MoveTicket,
        result: Result<TaskResponse, ClientError>,
    ) -> MoveOutcome {
        let Some(pending) = self.in_flight.get_mut(&ticket.task_id) else {
            debug!(task_id = %ticket.task_id, "move settled after it was forgotten");
            return MoveOutcome::Stale;
        };
        if pending.generation != ticket.generation {
            if let Ok(task) = &result {
                pending.confirmed = task.status;
            }
            debug!(
                task_id = %ticket.task_id,
                generation = ticket.generation,
                "stale move discarded"
            );
            return MoveOutcome::Stale;
        }
        let confirmed = pending.confirmed;
        self.in_flight.remove(&ticket.task_id);

        match result {
            Ok(task) => {
                self.cache.upsert(task);
                MoveOutcome::Confirmed
            }
            Err(err) => {
                warn!(task_id = %ticket.task_id, %err, "move rolled back");
                self.cache.set_status(ticket.task_id, confirmed);
                MoveOutcome::RolledBack {
                    message: err.to_string(),
                }
            }
        }
    }

    /// Drag-and-drop move: optimistic update, override request, settle.
    ///
    /// Returns `None` when nothing needed to move.
    pub async fn move_task(
        &mut self,
        task_id: TaskId,
        target: TaskStatus,
        now: Instant,
    ) -> Option<MoveOutcome> {
        let ticket = self.begin_move(task_id, target, now)?;
        let body = TransitionBody {
            status: Some(target.as_str().to_owned()),
            notes: Some(drag_notes(target)),
            mode: TransitionMode::Override,
        };
        let result = self.api.transition_task(task_id, body).await;
        Some(self.complete_move(ticket, result))
    }

    /// Advances a task one stage with user-supplied notes.
    ///
    /// The cache is only updated from the server's answer.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::UnknownTask`], [`ClientError::MoveInFlight`]
    /// or [`ClientError::AlreadyDone`] without calling the server, or the
    /// error of the failed request.
    pub async fn advance_task(
        &mut self,
        task_id: TaskId,
        notes: impl Into<String> + Send,
    ) -> Result<TaskStatus, ClientError> {
        if self.is_moving(task_id) {
            return Err(ClientError::MoveInFlight(task_id));
        }
        let current = self
            .cache
            .get(task_id)
            .ok_or(ClientError::UnknownTask(task_id))?
            .status;
        let next = current.next().ok_or(ClientError::AlreadyDone(task_id))?;
        let body = TransitionBody {
            status: Some(next.as_str().to_owned()),
            notes: Some(notes.into()),
            mode: TransitionMode::Sequential,
        };
        let task = self.api.transition_task(task_id, body).await?;
        let status = task.status;
        self.cache.upsert(task);
        Ok(status)
    }

    fn reconcile(&mut self, tasks: Vec<TaskResponse>, now: Instant) {
        let timeout = self.move_timeout;
        self.in_flight.retain(|task_id, pending| {
            let live = now.saturating_duration_since(pending.started_at) < timeout;
            if !live {
                warn!(%task_id, generation = pending.generation, "unsettled move expired");
            }
            live
        });
        let pending: Vec<(TaskId, TaskStatus)> = self
            .in_flight
            .keys()
            .filter_map(|task_id| self.cache.get(*task_id).map(|task| (*task_id, task.status)))
            .collect();
        self.cache.replace_all(tasks);
        for (task_id, shown) in pending {
            self.cache.set_status(task_id, shown);
        }
    }
}

/// Notes recorded for a drag-and-drop move into `target`.
#[must_use]
pub fn drag_notes(target: TaskStatus) -> String {
    format!("Task moved to {} via drag and drop", target.label())
}
