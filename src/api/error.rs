//! Mapping of service errors onto HTTP responses.

use crate::task::{
    domain::TaskDomainError, ports::TaskRepositoryError, services::TaskLifecycleError,
};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::error;

/// Machine-readable failure category carried in every error body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorReason {
    /// A required field is missing or blank.
    ValidationFailed,
    /// Status change notes are missing or blank.
    MissingNotes,
    /// The requested status is unknown.
    InvalidStatus,
    /// A sequential change skipped or reversed a stage.
    OutOfSequence,
    /// The review gate found unchecked checklist items.
    ChecklistIncomplete,
    /// The addressed resource does not exist.
    NotFound,
    /// The task status changed while the request was processed.
    StatusConflict,
    /// Anything the caller cannot fix.
    InternalError,
}

impl ErrorReason {
    /// Returns the wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ValidationFailed => "validation_failed",
            Self::MissingNotes => "missing_notes",
            Self::InvalidStatus => "invalid_status",
            Self::OutOfSequence => "out_of_sequence",
            Self::ChecklistIncomplete => "checklist_incomplete",
            Self::NotFound => "not_found",
            Self::StatusConflict => "status_conflict",
            Self::InternalError => "internal_error",
        }
    }
}

impl fmt::Display for ErrorReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// JSON body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable message.
    pub error: String,
    /// Failure category.
    pub reason: ErrorReason,
}

/// An error ready to be returned from a handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorBody,
}

impl ApiError {
    /// Creates an error response.
    #[must_use]
    pub fn new(status: StatusCode, reason: ErrorReason, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorBody {
                error: message.into(),
                reason,
            },
        }
    }

    /// 400 with [`ErrorReason::ValidationFailed`].
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, ErrorReason::ValidationFailed, message)
    }

    /// 404 with [`ErrorReason::NotFound`].
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, ErrorReason::NotFound, message)
    }

    /// 500 with a generic message. The cause is logged, never returned.
    #[must_use]
    pub fn internal(cause: &dyn std::error::Error) -> Self {
        error!(error = %cause, "request failed");
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorReason::InternalError,
            "internal server error",
        )
    }

    /// Returns the HTTP status.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the response body.
    #[must_use]
    pub const fn body(&self) -> &ErrorBody {
        &self.body
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl From<TaskDomainError> for ApiError {
    fn from(err: TaskDomainError) -> Self {
        match err {
            TaskDomainError::EmptyTitle | TaskDomainError::EmptyDescription => {
                Self::validation("Title and description are required")
            }
            TaskDomainError::MissingNotes => Self::new(
                StatusCode::BAD_REQUEST,
                ErrorReason::MissingNotes,
                "Notes are required",
            ),
            TaskDomainError::OutOfSequence { .. } => Self::new(
                StatusCode::BAD_REQUEST,
                ErrorReason::OutOfSequence,
                "Invalid status transition. Status must progress in sequence.",
            ),
            TaskDomainError::ChecklistIncomplete { .. } => Self::new(
                StatusCode::BAD_REQUEST,
                ErrorReason::ChecklistIncomplete,
                "All PR checklist items must be checked before marking as Done",
            ),
            TaskDomainError::ChecklistItemNotFound { .. } => {
                Self::not_found("Checklist item not found")
            }
        }
    }
}

impl From<TaskLifecycleError> for ApiError {
    fn from(err: TaskLifecycleError) -> Self {
        match err {
            TaskLifecycleError::Domain(domain) => domain.into(),
            TaskLifecycleError::InvalidStatus(_) => Self::new(
                StatusCode::BAD_REQUEST,
                ErrorReason::InvalidStatus,
                "Invalid status value",
            ),
            TaskLifecycleError::NotFound(_) => Self::not_found("Task not found"),
            TaskLifecycleError::ChecklistItemNotFound { .. } => {
                Self::not_found("Checklist item not found")
            }
            TaskLifecycleError::PrMetadataNotFound(_) => Self::not_found("PR metadata not found"),
            TaskLifecycleError::Repository(TaskRepositoryError::StatusConflict { .. }) => {
                Self::new(
                    StatusCode::CONFLICT,
                    ErrorReason::StatusConflict,
                    "Task status changed concurrently; reload and retry",
                )
            }
            TaskLifecycleError::PrDescription(cause) => Self::internal(&cause),
            TaskLifecycleError::Repository(cause) => Self::internal(&cause),
        }
    }
}
