//! `PostgreSQL` integration tests for the task repository.
//!
//! The tests need a server reachable through `TASKFLOW_TEST_DATABASE_URL`
//! with permission to create databases. Each test runs against its own
//! temporary database. When the variable is unset the tests pass without
//! doing anything.
//!
//! Tests are organized into modules by functionality:
//! - `helpers`: Temporary database and repository setup
//! - `task_lifecycle_tests`: CRUD, guarded transitions, checklist and PR
//!   metadata persistence

mod postgres {
    pub mod helpers;

    mod task_lifecycle_tests;
}
