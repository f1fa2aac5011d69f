//! Shared test helpers for `PostgreSQL` integration tests.

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sql_types::{BigInt, Uuid as SqlUuid};
use mockable::DefaultClock;
use std::sync::Arc;
use taskflow::task::{
    adapters::postgres::{PostgresTaskRepository, TaskPgPool},
    domain::TaskId,
    services::TaskLifecycleService,
};
use uuid::Uuid;

/// Boxed error type for test results.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Environment variable naming the server used for these tests.
pub const DATABASE_URL_ENV: &str = "TASKFLOW_TEST_DATABASE_URL";

/// A database created for one test and dropped afterwards.
pub struct TemporaryDatabase {
    admin_url: String,
    name: String,
    url: String,
}

impl TemporaryDatabase {
    /// Creates an empty database next to the one named by `admin_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the server is unreachable or refuses the
    /// `CREATE DATABASE`.
    pub fn create(admin_url: &str) -> Result<Self, BoxError> {
        let name = format!("taskflow_test_{}", Uuid::new_v4().simple());
        let mut connection = PgConnection::establish(admin_url)?;
        connection.batch_execute(&format!("CREATE DATABASE {name}"))?;
        let url = sibling_database_url(admin_url, &name);
        Ok(Self {
            admin_url: admin_url.to_owned(),
            name,
            url,
        })
    }

    /// Connection string of the temporary database.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Drop for TemporaryDatabase {
    fn drop(&mut self) {
        let result = PgConnection::establish(&self.admin_url)
            .map_err(|err| Box::new(err) as BoxError)
            .and_then(|mut connection| {
                connection
                    .batch_execute(&format!("DROP DATABASE IF EXISTS {} WITH (FORCE)", self.name))
                    .map_err(|err| Box::new(err) as BoxError)
            });
        if let Err(err) = result {
            tracing::warn!(database = %self.name, %err, "failed to drop test database");
        }
    }
}

/// Replaces the database name in `url`, keeping any query string.
fn sibling_database_url(url: &str, name: &str) -> String {
    let (base, query) = url.split_once('?').map_or((url, None), |(b, q)| (b, Some(q)));
    let prefix = base.rsplit_once('/').map_or(base, |(head, _)| head);
    query.map_or_else(
        || format!("{prefix}/{name}"),
        |params| format!("{prefix}/{name}?{params}"),
    )
}

/// Tables holding rows that belong to a task.
pub const TASK_CHILD_TABLES: [&str; 3] = [
    "task_status_history",
    "task_pr_checklist_items",
    "task_pr_metadata",
];

#[derive(QueryableByName)]
struct RowCount {
    #[diesel(sql_type = BigInt)]
    count: i64,
}

/// Repository and service wired to a fresh temporary database.
pub struct TaskTestContext {
    /// Pool shared with [`Self::repository`], for direct SQL checks.
    pub pool: TaskPgPool,
    /// Repository under test.
    pub repository: Arc<PostgresTaskRepository>,
    /// Service sharing [`Self::repository`].
    pub service: TaskLifecycleService<PostgresTaskRepository, DefaultClock>,
    _database: TemporaryDatabase,
}

/// Builds a context when [`DATABASE_URL_ENV`] is set.
///
/// Returns `Ok(None)` when the variable is unset so callers can skip.
///
/// # Errors
///
/// Returns an error if the database, pool or schema cannot be set up.
pub async fn setup_context() -> Result<Option<TaskTestContext>, BoxError> {
    let Ok(admin_url) = std::env::var(DATABASE_URL_ENV) else {
        return Ok(None);
    };
    let database = tokio::task::spawn_blocking(move || TemporaryDatabase::create(&admin_url))
        .await??;

    let manager = ConnectionManager::<PgConnection>::new(database.url());
    let pool: TaskPgPool = Pool::builder().max_size(2).build(manager)?;
    let repository = Arc::new(PostgresTaskRepository::new(pool.clone()));
    repository.apply_schema().await?;
    let service = TaskLifecycleService::new(Arc::clone(&repository), Arc::new(DefaultClock));
    Ok(Some(TaskTestContext {
        pool,
        repository,
        service,
        _database: database,
    }))
}

impl TaskTestContext {
    /// Counts rows of `table` whose `task_id` is `task_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn count_task_rows(
        &self,
        table: &'static str,
        task_id: TaskId,
    ) -> Result<i64, BoxError> {
        let pool = self.pool.clone();
        let row = tokio::task::spawn_blocking(move || -> Result<RowCount, BoxError> {
            let mut connection = pool.get()?;
            let query = format!("SELECT COUNT(*) AS count FROM {table} WHERE task_id = $1");
            Ok(diesel::sql_query(query)
                .bind::<SqlUuid, _>(task_id.into_inner())
                .get_result::<RowCount>(&mut connection)?)
        })
        .await??;
        Ok(row.count)
    }
}

#[cfg(test)]
mod tests {
    use super::sibling_database_url;
    use rstest::rstest;

    #[rstest]
    #[case("postgres://u:p@localhost:5432/postgres", "postgres://u:p@localhost:5432/t1")]
    #[case(
        "postgres://u:p@localhost/postgres?sslmode=disable",
        "postgres://u:p@localhost/t1?sslmode=disable"
    )]
    fn sibling_url_swaps_database_name(#[case] admin: &str, #[case] expected: &str) {
        assert_eq!(sibling_database_url(admin, "t1"), expected);
    }
}
