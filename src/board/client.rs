//! Port for the task endpoints used by the board, with a `reqwest`
//! implementation.

use crate::{
    api::{CreateTaskBody, ErrorBody, ErrorReason, TaskResponse, TransitionBody},
    task::domain::TaskId,
};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Errors surfaced to board callers.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server answered with an error body.
    #[error("{}", body.error)]
    Api {
        /// HTTP status code.
        status: u16,
        /// Decoded error body.
        body: ErrorBody,
    },

    /// The request could not be sent or the response decoded.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The task is not in the local cache.
    #[error("task {0} is not loaded")]
    UnknownTask(TaskId),

    /// A drag of the task has not been settled yet.
    #[error("task {0} has a move in progress")]
    MoveInFlight(TaskId),

    /// The task is already in the final status.
    #[error("task {0} is already done")]
    AlreadyDone(TaskId),
}

impl ClientError {
    /// Returns the server reason code when the server produced the error.
    #[must_use]
    pub const fn reason(&self) -> Option<ErrorReason> {
        match self {
            Self::Api { body, .. } => Some(body.reason),
            Self::Transport(_)
            | Self::UnknownTask(_)
            | Self::MoveInFlight(_)
            | Self::AlreadyDone(_) => None,
        }
    }
}

/// Task endpoints the board depends on.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskApi: Send + Sync {
    /// Fetches every task.
    async fn list_tasks(&self) -> Result<Vec<TaskResponse>, ClientError>;

    /// Creates a task.
    async fn create_task(&self, body: CreateTaskBody) -> Result<TaskResponse, ClientError>;

    /// Requests a status change.
    async fn transition_task(
        &self,
        task_id: TaskId,
        body: TransitionBody,
    ) -> Result<TaskResponse, ClientError>;
}

/// [`TaskApi`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpTaskApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTaskApi {
    /// Creates a client for the server at `base_url`, for example
    /// `http://127.0.0.1:3000`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Creates a client reusing an existing `reqwest` client.
    #[must_use]
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let mut base = base_url.into();
        while base.ends_with('/') {
            base.pop();
        }
        Self {
            client,
            base_url: base,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }
    let body = response
        .json::<ErrorBody>()
        .await
        .unwrap_or_else(|_| ErrorBody {
            error: format!("request failed with status {status}"),
            reason: ErrorReason::InternalError,
        });
    Err(ClientError::Api {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl TaskApi for HttpTaskApi {
    async fn list_tasks(&self) -> Result<Vec<TaskResponse>, ClientError> {
        let response = self.client.get(self.url("/tasks")).send().await?;
        decode(response).await
    }

    async fn create_task(&self, body: CreateTaskBody) -> Result<TaskResponse, ClientError> {
        let response = self
            .client
            .post(self.url("/tasks"))
            .json(&body)
            .send()
            .await?;
        decode(response).await
    }

    async fn transition_task(
        &self,
        task_id: TaskId,
        body: TransitionBody,
    ) -> Result<TaskResponse, ClientError> {
        let response = self
            .client
            .post(self.url(&format!("/tasks/{task_id}/status")))
            .json(&body)
            .send()
            .await?;
        decode(response).await
    }
}
