//! Taskflow: task tracking through a linear delivery workflow.
//!
//! Tasks move through six statuses, from investigation to done. Every move
//! requires notes and is recorded in an append-only history. Completion is
//! gated on a PR checklist.
//!
//! # Architecture
//!
//! Taskflow follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, HTTP)
//!
//! # Modules
//!
//! - [`task`]: Task lifecycle, status workflow and PR metadata
//! - [`api`]: HTTP endpoints over the task lifecycle service
//! - [`board`]: Client-side board state with optimistic moves
//! - [`config`]: Server configuration
//! - [`telemetry`]: Log subscriber setup

pub mod api;
pub mod board;
pub mod config;
pub mod task;
pub mod telemetry;
