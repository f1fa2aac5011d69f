//! Persistence adapters for the task module.
//!
//! - [`memory::InMemoryTaskRepository`]: thread-safe in-memory storage for
//!   tests and local development
//! - [`postgres::PostgresTaskRepository`]: `PostgreSQL` persistence using
//!   Diesel ORM
//!
//! Both implement [`TaskRepository`].
//!
//! [`TaskRepository`]: crate::task::ports::TaskRepository

pub mod memory;
pub mod postgres;
