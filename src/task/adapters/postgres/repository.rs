//! `PostgreSQL` repository implementation for task storage.

use super::{
    models::{
        ChecklistItemRow, NewStatusHistoryRow, NewTaskRow, PrMetadataRow, StatusHistoryRow,
        TaskRow,
    },
    schema::{task_pr_checklist_items, task_pr_metadata, task_status_history, tasks},
};
use crate::task::{
    domain::{
        ChecklistItem, ChecklistItemId, PersistedPrMetadata, PersistedTaskData, PrMetadata,
        PrMetadataId, StatusChange, StatusHistoryEntry, StatusHistoryId, Task, TaskId, TaskStatus,
    },
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use async_trait::async_trait;
use diesel::connection::SimpleConnection;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::upsert::excluded;
use std::collections::HashMap;
use uuid::Uuid;

/// `PostgreSQL` connection pool type used by task adapters.
pub type TaskPgPool = Pool<ConnectionManager<PgConnection>>;

/// Schema applied by [`PostgresTaskRepository::apply_schema`].
pub const CREATE_TASK_TABLES_SQL: &str =
    include_str!("../../../../migrations/2026-10-01-000000_create_task_tables/up.sql");

/// `PostgreSQL`-backed task repository.
///
/// Diesel calls run on [`tokio::task::spawn_blocking`] so the async
/// executor is never blocked by database I/O.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: TaskPgPool,
}

impl From<DieselError> for TaskRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    /// Creates the task tables when they do not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Persistence`] when the DDL fails.
    pub async fn apply_schema(&self) -> TaskRepositoryResult<()> {
        self.run_blocking(|connection| {
            connection
                .batch_execute(CREATE_TASK_TABLES_SQL)
                .map_err(TaskRepositoryError::persistence)
        })
        .await
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskRepositoryError::persistence)?
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let rows = TaskInsertRows::from_task(task);

        self.run_blocking(move |connection| {
            connection.transaction::<_, TaskRepositoryError, _>(|tx| {
                diesel::insert_into(tasks::table)
                    .values(&rows.task)
                    .execute(tx)
                    .map_err(|err| match err {
                        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                            TaskRepositoryError::DuplicateTask(task_id)
                        }
                        _ => TaskRepositoryError::persistence(err),
                    })?;
                diesel::insert_into(task_status_history::table)
                    .values(&rows.history)
                    .execute(tx)?;
                if !rows.checklist.is_empty() {
                    diesel::insert_into(task_pr_checklist_items::table)
                        .values(&rows.checklist)
                        .execute(tx)?;
                }
                if let Some(metadata) = &rows.pr_metadata {
                    diesel::insert_into(task_pr_metadata::table)
                        .values(metadata)
                        .execute(tx)?;
                }
                Ok(())
            })
        })
        .await
    }

    async fn update_details(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let title = task.title().to_owned();
        let description = task.description().to_owned();
        let updated_at = task.updated_at();

        self.run_blocking(move |connection| {
            let updated = diesel::update(tasks::table.filter(tasks::id.eq(task_id.into_inner())))
                .set((
                    tasks::title.eq(title),
                    tasks::description.eq(description),
                    tasks::updated_at.eq(updated_at),
                ))
                .execute(connection)?;
            if updated == 0 {
                return Err(TaskRepositoryError::NotFound(task_id));
            }
            Ok(())
        })
        .await
    }

    async fn record_transition(&self, change: &StatusChange) -> TaskRepositoryResult<()> {
        let pending = change.clone();

        self.run_blocking(move |connection| {
            connection.transaction::<_, TaskRepositoryError, _>(|tx| {
                let task_uuid = pending.task_id.into_inner();
                let updated = diesel::update(
                    tasks::table
                        .filter(tasks::id.eq(task_uuid))
                        .filter(tasks::status.eq(pending.previous.as_str())),
                )
                .set((
                    tasks::status.eq(pending.next().as_str()),
                    tasks::updated_at.eq(pending.updated_at),
                ))
                .execute(tx)?;

                if updated == 0 {
                    return Err(describe_missed_transition(tx, &pending));
                }

                diesel::insert_into(task_status_history::table)
                    .values(&history_row(&pending.entry))
                    .execute(tx)?;
                Ok(())
            })
        })
        .await
    }

    async fn set_checklist_item(
        &self,
        task_id: TaskId,
        item_id: ChecklistItemId,
        checked: bool,
    ) -> TaskRepositoryResult<ChecklistItem> {
        self.run_blocking(move |connection| {
            let row = diesel::update(
                task_pr_checklist_items::table
                    .filter(task_pr_checklist_items::id.eq(item_id.into_inner()))
                    .filter(task_pr_checklist_items::task_id.eq(task_id.into_inner())),
            )
            .set(task_pr_checklist_items::checked.eq(checked))
            .returning(ChecklistItemRow::as_returning())
            .get_result::<ChecklistItemRow>(connection)
            .optional()?;

            row.map(row_to_checklist_item)
                .ok_or(TaskRepositoryError::ChecklistItemNotFound { task_id, item_id })
        })
        .await
    }

    async fn save_pr_metadata(&self, metadata: &PrMetadata) -> TaskRepositoryResult<PrMetadata> {
        let task_id = metadata.task_id();
        let row = pr_metadata_row(metadata);

        self.run_blocking(move |connection| {
            connection.transaction::<_, TaskRepositoryError, _>(|tx| {
                if find_task_row(tx, task_id)?.is_none() {
                    return Err(TaskRepositoryError::NotFound(task_id));
                }
                let saved = diesel::insert_into(task_pr_metadata::table)
                    .values(&row)
                    .on_conflict(task_pr_metadata::task_id)
                    .do_update()
                    .set((
                        task_pr_metadata::ticket_id.eq(excluded(task_pr_metadata::ticket_id)),
                        task_pr_metadata::ticket_link.eq(excluded(task_pr_metadata::ticket_link)),
                        task_pr_metadata::description.eq(excluded(task_pr_metadata::description)),
                        task_pr_metadata::testing_plan
                            .eq(excluded(task_pr_metadata::testing_plan)),
                    ))
                    .returning(PrMetadataRow::as_returning())
                    .get_result::<PrMetadataRow>(tx)?;
                Ok(row_to_pr_metadata(saved))
            })
        })
        .await
    }

    async fn find_pr_metadata(&self, task_id: TaskId) -> TaskRepositoryResult<Option<PrMetadata>> {
        self.run_blocking(move |connection| {
            let row = task_pr_metadata::table
                .filter(task_pr_metadata::task_id.eq(task_id.into_inner()))
                .select(PrMetadataRow::as_select())
                .first::<PrMetadataRow>(connection)
                .optional()?;
            Ok(row.map(row_to_pr_metadata))
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let Some(row) = find_task_row(connection, id)? else {
                return Ok(None);
            };
            let mut children = TaskChildren::load(connection, &[row.id])?;
            row_to_task(row, &mut children).map(Some)
        })
        .await
    }

    async fn list(&self) -> TaskRepositoryResult<Vec<Task>> {
        self.run_blocking(|connection| {
            let rows = tasks::table
                .order(tasks::updated_at.desc())
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)?;
            let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
            let mut children = TaskChildren::load(connection, &ids)?;
            rows.into_iter()
                .map(|row| row_to_task(row, &mut children))
                .collect()
        })
        .await
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        self.run_blocking(move |connection| {
            let deleted = diesel::delete(tasks::table.filter(tasks::id.eq(id.into_inner())))
                .execute(connection)?;
            if deleted == 0 {
                return Err(TaskRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn ping(&self) -> TaskRepositoryResult<()> {
        self.run_blocking(|connection| {
            diesel::sql_query("SELECT 1").execute(connection)?;
            Ok(())
        })
        .await
    }
}

/// Rows written when a new task is stored.
struct TaskInsertRows {
    task: NewTaskRow,
    history: Vec<NewStatusHistoryRow>,
    checklist: Vec<ChecklistItemRow>,
    pr_metadata: Option<PrMetadataRow>,
}

impl TaskInsertRows {
    fn from_task(task: &Task) -> Self {
        let checklist = (0_i32..)
            .zip(task.checklist())
            .map(|(position, item)| ChecklistItemRow {
                id: item.id().into_inner(),
                task_id: task.id().into_inner(),
                position,
                text: item.text().to_owned(),
                checked: item.checked(),
            })
            .collect();

        Self {
            task: NewTaskRow {
                id: task.id().into_inner(),
                title: task.title().to_owned(),
                description: task.description().to_owned(),
                status: task.status().as_str().to_owned(),
                created_at: task.created_at(),
                updated_at: task.updated_at(),
            },
            history: task.history().iter().map(history_row).collect(),
            checklist,
            pr_metadata: task.pr_metadata().map(pr_metadata_row),
        }
    }
}

/// Child records of a batch of tasks, grouped by task identifier.
#[derive(Default)]
struct TaskChildren {
    history: HashMap<Uuid, Vec<StatusHistoryRow>>,
    checklist: HashMap<Uuid, Vec<ChecklistItemRow>>,
    pr_metadata: HashMap<Uuid, PrMetadataRow>,
}

impl TaskChildren {
    fn load(connection: &mut PgConnection, task_ids: &[Uuid]) -> TaskRepositoryResult<Self> {
        let mut children = Self::default();
        if task_ids.is_empty() {
            return Ok(children);
        }

        let history_rows = task_status_history::table
            .filter(task_status_history::task_id.eq_any(task_ids))
            .order((
                task_status_history::created_at.asc(),
                task_status_history::seq.asc(),
            ))
            .select(StatusHistoryRow::as_select())
            .load::<StatusHistoryRow>(connection)?;
        for row in history_rows {
            children.history.entry(row.task_id).or_default().push(row);
        }

        let checklist_rows = task_pr_checklist_items::table
            .filter(task_pr_checklist_items::task_id.eq_any(task_ids))
            .order(task_pr_checklist_items::position.asc())
            .select(ChecklistItemRow::as_select())
            .load::<ChecklistItemRow>(connection)?;
        for row in checklist_rows {
            children.checklist.entry(row.task_id).or_default().push(row);
        }

        let metadata_rows = task_pr_metadata::table
            .filter(task_pr_metadata::task_id.eq_any(task_ids))
            .select(PrMetadataRow::as_select())
            .load::<PrMetadataRow>(connection)?;
        for row in metadata_rows {
            children.pr_metadata.insert(row.task_id, row);
        }

        Ok(children)
    }
}

fn find_task_row(
    connection: &mut PgConnection,
    id: TaskId,
) -> TaskRepositoryResult<Option<TaskRow>> {
    tasks::table
        .filter(tasks::id.eq(id.into_inner()))
        .select(TaskRow::as_select())
        .first::<TaskRow>(connection)
        .optional()
        .map_err(TaskRepositoryError::persistence)
}

/// Explains why a guarded status update touched no rows.
fn describe_missed_transition(
    connection: &mut PgConnection,
    change: &StatusChange,
) -> TaskRepositoryError {
    match find_task_row(connection, change.task_id) {
        Ok(None) => TaskRepositoryError::NotFound(change.task_id),
        Ok(Some(row)) => match parse_status(&row.status) {
            Ok(actual) => TaskRepositoryError::StatusConflict {
                task_id: change.task_id,
                expected: change.previous,
                actual,
            },
            Err(err) => err,
        },
        Err(err) => err,
    }
}

fn parse_status(value: &str) -> TaskRepositoryResult<TaskStatus> {
    TaskStatus::try_from(value).map_err(TaskRepositoryError::persistence)
}

fn history_row(entry: &StatusHistoryEntry) -> NewStatusHistoryRow {
    NewStatusHistoryRow {
        id: entry.id().into_inner(),
        task_id: entry.task_id().into_inner(),
        status: entry.status().as_str().to_owned(),
        notes: entry.notes().to_owned(),
        created_at: entry.created_at(),
    }
}

fn pr_metadata_row(metadata: &PrMetadata) -> PrMetadataRow {
    PrMetadataRow {
        id: metadata.id().into_inner(),
        task_id: metadata.task_id().into_inner(),
        ticket_id: metadata.ticket_id().to_owned(),
        ticket_link: metadata.ticket_link().to_owned(),
        description: metadata.description().to_owned(),
        testing_plan: metadata.testing_plan().to_owned(),
    }
}

fn row_to_task(row: TaskRow, children: &mut TaskChildren) -> TaskRepositoryResult<Task> {
    let TaskRow {
        id,
        title,
        description,
        status: persisted_status,
        created_at,
        updated_at,
    } = row;

    let history = children
        .history
        .remove(&id)
        .unwrap_or_default()
        .into_iter()
        .map(row_to_history_entry)
        .collect::<TaskRepositoryResult<Vec<_>>>()?;
    let checklist = children
        .checklist
        .remove(&id)
        .unwrap_or_default()
        .into_iter()
        .map(row_to_checklist_item)
        .collect();
    let pr_metadata = children.pr_metadata.remove(&id).map(row_to_pr_metadata);

    Ok(Task::from_persisted(PersistedTaskData {
        id: TaskId::from_uuid(id),
        title,
        description,
        status: parse_status(&persisted_status)?,
        history,
        checklist,
        pr_metadata,
        created_at,
        updated_at,
    }))
}

fn row_to_history_entry(row: StatusHistoryRow) -> TaskRepositoryResult<StatusHistoryEntry> {
    Ok(StatusHistoryEntry::from_persisted(
        StatusHistoryId::from_uuid(row.id),
        TaskId::from_uuid(row.task_id),
        parse_status(&row.status)?,
        row.notes,
        row.created_at,
    ))
}

fn row_to_checklist_item(row: ChecklistItemRow) -> ChecklistItem {
    ChecklistItem::from_persisted(
        ChecklistItemId::from_uuid(row.id),
        TaskId::from_uuid(row.task_id),
        row.text,
        row.checked,
    )
}

fn row_to_pr_metadata(row: PrMetadataRow) -> PrMetadata {
    PrMetadata::from_persisted(PersistedPrMetadata {
        id: PrMetadataId::from_uuid(row.id),
        task_id: TaskId::from_uuid(row.task_id),
        ticket_id: row.ticket_id,
        ticket_link: row.ticket_link,
        description: row.description,
        testing_plan: row.testing_plan,
    })
}
