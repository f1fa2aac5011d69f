//! HTTP interface for task tracking.
//!
//! The router exposes task CRUD, status transitions, checklist toggles, and
//! pull request metadata over JSON. Failures are returned as
//! `{"error": "...", "reason": "..."}` bodies; see [`ErrorReason`] for the
//! reason codes.

mod dto;
mod error;
mod handlers;
mod router;

pub use dto::{
    ChecklistBody, CreateTaskBody, HealthResponse, MessageResponse, PrDescriptionResponse,
    TaskResponse, TransitionBody, UpdateTaskBody,
};
pub use error::{ApiError, ErrorBody, ErrorReason};
pub use router::{AppState, router};
